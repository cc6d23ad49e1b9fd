use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use libc::{MAP_FAILED, MAP_SHARED, PROT_READ, PROT_WRITE};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::memory::{MappingWindow, PhysAddr};
use crate::util::{DEV_MEM_PATH, page_size};

/// Protection requested for a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protection {
    /// `PROT_READ`
    ReadOnly,
    /// `PROT_READ | PROT_WRITE`
    ReadWrite,
}

impl Protection {
    fn flags(&self) -> libc::c_int {
        match self {
            Protection::ReadOnly => PROT_READ,
            Protection::ReadWrite => PROT_READ | PROT_WRITE,
        }
    }
}

/// Maps page-aligned windows of a physical memory device.
///
/// The device is opened read/write for every acquisition, independent of the
/// requested protection.
#[derive(Clone, Debug)]
pub struct PageMapper {
    device: PathBuf,
    page_size: usize,
}

impl PageMapper {
    /// Creates a mapper for `device` with the given page size.
    pub fn new(device: impl Into<PathBuf>, page_size: usize) -> Self {
        PageMapper {
            device: device.into(),
            page_size,
        }
    }

    /// Creates a mapper for `/dev/mem` using the system page size.
    pub fn dev_mem() -> Self {
        Self::new(DEV_MEM_PATH, page_size())
    }

    /// Creates a mapper for `device` using the system page size.
    pub fn for_device(device: impl Into<PathBuf>) -> Self {
        Self::new(device, page_size())
    }

    /// Returns the device path.
    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Returns the page size used for window computation.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Maps the window covering `[address, address + byte_len)`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if the range overflows
    /// * [`Error::DeviceOpen`] if the device cannot be opened
    /// * [`Error::Mapping`] if `mmap` fails; the device is closed before returning
    pub fn acquire(
        &self,
        address: PhysAddr,
        byte_len: u64,
        protection: Protection,
    ) -> Result<Mapping> {
        let window = MappingWindow::covering(address, byte_len, self.page_size)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.device)
            .map_err(|source| Error::DeviceOpen {
                path: self.device.clone(),
                source,
            })?;
        let map_error = |source: std::io::Error| Error::Mapping {
            offset: window.file_offset(),
            length: window.length(),
            source,
        };
        let file_offset = libc::off_t::try_from(window.file_offset()).map_err(|_| {
            map_error(std::io::Error::from_raw_os_error(libc::EOVERFLOW))
        })?;
        debug!(
            "mmap {} offset={:#x} length={:#x} {:?}",
            self.device.display(),
            window.file_offset(),
            window.length(),
            protection
        );
        let p = unsafe {
            libc::mmap(
                ptr::null_mut(),
                window.length(),
                protection.flags(),
                MAP_SHARED,
                file.as_raw_fd(),
                file_offset,
            )
        };
        if p == MAP_FAILED {
            return Err(map_error(std::io::Error::last_os_error()));
        }
        let base = NonNull::new(p as *mut u8)
            .ok_or_else(|| map_error(std::io::Error::from_raw_os_error(libc::EFAULT)))?;
        Ok(Mapping {
            base,
            window,
            _file: file,
        })
    }
}

/// A live shared mapping of the device.
///
/// Unmaps the window when dropped; the device handle closes right after.
#[derive(Debug)]
pub struct Mapping {
    base: NonNull<u8>,
    window: MappingWindow,
    _file: File,
}

impl Mapping {
    /// The window this mapping covers.
    pub fn window(&self) -> &MappingWindow {
        &self.window
    }

    /// Pointer to the byte at `offset` from the start of the window.
    ///
    /// Panics if `offset + size` exceeds the mapping.
    pub(crate) fn byte_ptr(&self, offset: usize, size: usize) -> *mut u8 {
        assert!(
            offset
                .checked_add(size)
                .is_some_and(|end| end <= self.window.length()),
            "Mapping::byte_ptr failed. Offset {} + {} > {}",
            offset,
            size,
            self.window.length()
        );
        unsafe { self.base.as_ptr().byte_add(offset) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        debug!(
            "munmap offset={:#x} length={:#x}",
            self.window.file_offset(),
            self.window.length()
        );
        if unsafe { libc::munmap(self.base.as_ptr() as *mut libc::c_void, self.window.length()) }
            != 0
        {
            warn!("munmap failed: {}", std::io::Error::last_os_error());
        }
    }
}
