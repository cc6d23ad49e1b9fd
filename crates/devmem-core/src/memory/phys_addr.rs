use std::fmt::{Debug, Formatter, LowerHex};
use std::ops::Add;

#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Physical memory address.
///
/// A newtype wrapper around a physical address value. Offsets into the
/// physical memory device correspond directly to physical addresses.
pub struct PhysAddr(u64);

impl Debug for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("PhysAddr(0x{:02x})", self.0))
    }
}

impl LowerHex for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(&self.0, f)
    }
}

impl PhysAddr {
    /// Creates a new physical address.
    pub const fn new(addr: u64) -> Self {
        PhysAddr(addr)
    }

    /// Returns the address as a u64.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns true if the address is a multiple of `align` bytes.
    pub const fn is_aligned(&self, align: usize) -> bool {
        self.0.is_multiple_of(align as u64)
    }

    /// Adds `offset` bytes, or returns `None` on overflow.
    pub const fn checked_add(&self, offset: u64) -> Option<PhysAddr> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(PhysAddr(addr)),
            None => None,
        }
    }
}

impl Add<u64> for PhysAddr {
    type Output = PhysAddr;

    fn add(self, rhs: u64) -> Self::Output {
        PhysAddr(self.0 + rhs)
    }
}
