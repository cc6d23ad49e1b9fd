//! The `memory` module maps windows of the physical memory device and exposes
//! them as bounds-checked regions.
//!
//! - `PhysAddr`: A physical address newtype.
//! - `MappingWindow`: The page-aligned offset and length covering a byte range.
//! - `PageMapper`: Opens the device and establishes shared mappings.
//! - `Mapping`: An owned mapping, unmapped on drop.
//! - `AccessedRegion`: The requested range inside a mapping, implementing
//!   [`HardwareAccess`](crate::access::HardwareAccess).
mod mapper;
mod phys_addr;
mod region;
mod window;

pub use self::mapper::{Mapping, PageMapper, Protection};
pub use self::phys_addr::PhysAddr;
pub use self::region::AccessedRegion;
pub use self::window::MappingWindow;
