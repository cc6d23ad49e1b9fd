//! # devmem core
//!
//! `devmem-core` implements direct access to physical memory and
//! memory-mapped device registers through the `/dev/mem` pseudo-device.
//!
//! ## Architecture Overview
//!
//! A single invocation flows through three components:
//!
//! - [`memory::PageMapper`] - Opens the device and maps the page-aligned
//!   [`memory::MappingWindow`] covering the requested byte range as a shared
//!   mapping. The returned [`memory::Mapping`] is unmapped on drop.
//!
//! - [`access::HardwareAccess`] - Width-qualified (1/2/4 byte) volatile loads
//!   and stores. [`memory::AccessedRegion`] implements it over a mapping.
//!
//! - [`Dispatcher`] - Selects one of the four [`Mode`]s (hex dump, write,
//!   raw read, raw write) for a validated [`AccessRequest`].
//!
//! ## Platform Support
//!
//! Linux and other POSIX systems providing `mmap` on a physical memory
//! character device. Access to `/dev/mem` usually requires root privileges and
//! a kernel that does not restrict it (`CONFIG_STRICT_DEVMEM`).

#![warn(missing_docs)]

pub mod access;
mod dispatch;
mod error;
pub mod memory;
mod request;
pub mod util;

pub use crate::access::{HardwareAccess, Width};
pub use crate::dispatch::{Dispatcher, print_buffer, print_raw, write_buffer, write_from_input};
pub use crate::error::{Error, Result};
pub use crate::request::{AccessRequest, Mode, parse_hex};
