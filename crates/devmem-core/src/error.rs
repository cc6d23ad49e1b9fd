use std::path::PathBuf;

use thiserror::Error;

use crate::access::Width;
use crate::memory::PhysAddr;
use crate::request::Mode;

/// Errors that can occur while validating or executing an access request.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed operator input (unknown token, missing value, bad hex literal)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Address is not a multiple of the access width
    #[error("address {address:?} not aligned on {}-bit boundary", .width.bits())]
    MisalignedAddress {
        /// Requested address
        address: PhysAddr,
        /// Requested access width
        width: Width,
    },
    /// Width not supported by the selected mode
    #[error("only a byte width is supported in {mode} mode, got {width}")]
    UnsupportedWidth {
        /// Requested mode
        mode: Mode,
        /// Requested access width
        width: Width,
    },
    /// The physical memory device could not be opened
    #[error("failed to open {}", .path.display())]
    DeviceOpen {
        /// Device path
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// `mmap` rejected the mapping window
    #[error("failed to map {length:#x} bytes at offset {offset:#x}")]
    Mapping {
        /// Page-aligned file offset
        offset: u64,
        /// Page-aligned mapping length
        length: usize,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// Reading input or writing output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
