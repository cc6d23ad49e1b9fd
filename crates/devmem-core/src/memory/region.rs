use std::ptr;

use log::trace;

use crate::access::{HardwareAccess, Width};
use crate::memory::{Mapping, PhysAddr};

/// Bounds-checked view of the requested range inside a [`Mapping`].
///
/// Offsets passed to the [`HardwareAccess`] methods are relative to the
/// requested address, not to the page-aligned start of the mapping. Every
/// access must stay inside the region and be aligned to its width, otherwise
/// it panics before touching memory.
#[derive(Debug)]
pub struct AccessedRegion {
    mapping: Mapping,
    address: PhysAddr,
    len: usize,
}

impl AccessedRegion {
    /// Creates a view of `len` bytes starting at the requested address of `mapping`.
    ///
    /// Panics if the range does not fit into the mapping.
    pub fn new(mapping: Mapping, address: PhysAddr, len: usize) -> Self {
        let window = mapping.window();
        assert_eq!(
            window.file_offset() + window.offset() as u64,
            address.as_u64(),
            "mapping does not start at {:?}",
            address
        );
        assert!(
            window.offset() + len <= window.length(),
            "region of {} bytes does not fit into mapping of {} bytes",
            len,
            window.length()
        );
        AccessedRegion {
            mapping,
            address,
            len,
        }
    }

    fn ptr(&self, width: Width, offset: usize) -> *mut u8 {
        assert!(
            offset + width.bytes() <= self.len,
            "AccessedRegion access failed. Offset {} + {} > {}",
            offset,
            width.bytes(),
            self.len
        );
        let p = self
            .mapping
            .byte_ptr(self.mapping.window().offset() + offset, width.bytes());
        assert!(
            (p as usize).is_multiple_of(width.bytes()),
            "AccessedRegion access failed. {:?} not aligned on {}-bit boundary",
            self.address + offset as u64,
            width.bits()
        );
        p
    }
}

impl HardwareAccess for AccessedRegion {
    fn read_width(&self, width: Width, offset: usize) -> u32 {
        let p = self.ptr(width, offset);
        let value = unsafe {
            match width {
                Width::OneByte => ptr::read_volatile(p) as u32,
                Width::TwoByte => ptr::read_volatile(p as *const u16) as u32,
                Width::FourByte => ptr::read_volatile(p as *const u32),
            }
        };
        trace!(
            "read {} at {:?}: {:#x}",
            width,
            self.address + offset as u64,
            value
        );
        value
    }

    fn write_width(&mut self, width: Width, offset: usize, value: u32) {
        let p = self.ptr(width, offset);
        trace!(
            "write {} at {:?}: {:#x}",
            width,
            self.address + offset as u64,
            value
        );
        unsafe {
            match width {
                Width::OneByte => ptr::write_volatile(p, value as u8),
                Width::TwoByte => ptr::write_volatile(p as *mut u16, value as u16),
                Width::FourByte => ptr::write_volatile(p as *mut u32, value),
            }
        }
    }
}
