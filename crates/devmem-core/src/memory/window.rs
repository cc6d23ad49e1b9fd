use crate::error::{Error, Result};
use crate::memory::PhysAddr;
use crate::util::{align_down, align_up};

/// Page-aligned window of the physical memory device covering a byte range.
///
/// `file_offset` is the largest multiple of the page size not exceeding the
/// requested address, and `length` is the smallest multiple of the page size
/// that covers the requested range starting at `file_offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappingWindow {
    file_offset: u64,
    length: usize,
    /// Distance from `file_offset` to the requested address
    offset: usize,
}

impl MappingWindow {
    /// Computes the window covering `[address, address + byte_len)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page_size` is not a power of two or
    /// the range overflows the address space.
    pub fn covering(address: PhysAddr, byte_len: u64, page_size: usize) -> Result<Self> {
        if !page_size.is_power_of_two() {
            return Err(Error::InvalidArgument(format!(
                "page size {:#x} is not a power of two",
                page_size
            )));
        }
        let page_size = page_size as u64;
        let file_offset = align_down(address.as_u64(), page_size);
        let offset = address.as_u64() - file_offset;
        let length = offset
            .checked_add(byte_len)
            .and_then(|end| align_up(end, page_size))
            .and_then(|length| usize::try_from(length).ok())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "range of {:#x} bytes at {:?} overflows the address space",
                    byte_len, address
                ))
            })?;
        Ok(MappingWindow {
            file_offset,
            length,
            offset: offset as usize,
        })
    }

    /// Page-aligned offset into the device.
    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    /// Page-aligned length of the mapping.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Byte offset of the requested address within the window.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
