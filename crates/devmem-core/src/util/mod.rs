//! Utility functions and constants used throughout the crate.
//!
//! This module provides:
//! - Constants for page arithmetic and CLI defaults ([`PAGE_SIZE`], [`DEV_MEM_PATH`], etc.)
//! - [`page_size`] for querying the system page size
//! - [`align_down`] and [`align_up`] helpers for page-granular arithmetic

mod constants;

pub use self::constants::*;

use log::warn;

/// Returns the system page size.
///
/// Queries `sysconf(_SC_PAGESIZE)` and falls back to [`PAGE_SIZE`] if the
/// query fails or reports a value that is not a power of two.
pub fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 || !(size as usize).is_power_of_two() {
        warn!(
            "sysconf(_SC_PAGESIZE) returned {}, falling back to {:#x}",
            size, PAGE_SIZE
        );
        return PAGE_SIZE;
    }
    size as usize
}

/// Rounds `value` down to a multiple of `align`.
///
/// `align` must be a power of two.
pub const fn align_down(value: u64, align: u64) -> u64 {
    value & !(align - 1)
}

/// Rounds `value` up to a multiple of `align`, or `None` on overflow.
///
/// `align` must be a power of two.
pub const fn align_up(value: u64, align: u64) -> Option<u64> {
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}
