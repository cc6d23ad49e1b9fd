//! Width-qualified hardware access.
//!
//! Device registers are not ordinary memory: a load may have side effects and
//! a value may change between two loads. [`HardwareAccess`] is the only way the
//! crate touches mapped memory, and every implementor performs exactly one
//! volatile load or store of the requested width per call.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Size of each individually accessed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    /// 1 byte (`b`)
    OneByte,
    /// 2 bytes (`w`)
    TwoByte,
    /// 4 bytes (`l`)
    FourByte,
}

impl Width {
    /// Returns the width in bytes.
    pub const fn bytes(&self) -> usize {
        match self {
            Width::OneByte => 1,
            Width::TwoByte => 2,
            Width::FourByte => 4,
        }
    }

    /// Returns the width in bits.
    pub const fn bits(&self) -> usize {
        self.bytes() * 8
    }

    /// Number of hex digits needed to print one element.
    pub const fn hex_digits(&self) -> usize {
        self.bytes() * 2
    }

    /// Truncates `value` to the low-order bytes of this width.
    pub const fn truncate(&self, value: u64) -> u32 {
        match self {
            Width::OneByte => value as u8 as u32,
            Width::TwoByte => value as u16 as u32,
            Width::FourByte => value as u32,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl FromStr for Width {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "b" => Ok(Width::OneByte),
            "w" => Ok(Width::TwoByte),
            "l" => Ok(Width::FourByte),
            _ => Err(Error::InvalidArgument(format!("invalid width: {}", s))),
        }
    }
}

/// Volatile, width-qualified access to a region of hardware memory.
///
/// Offsets are in bytes relative to the start of the region. Values are
/// carried as `u32` regardless of width; reads zero-extend and writes keep the
/// low-order `width` bytes.
pub trait HardwareAccess {
    /// Performs a single volatile load of `width` bytes at `offset`.
    fn read_width(&self, width: Width, offset: usize) -> u32;

    /// Performs a single volatile store of the low `width` bytes of `value` at `offset`.
    fn write_width(&mut self, width: Width, offset: usize, value: u32);
}
