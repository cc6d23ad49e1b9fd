//! Validated access requests.

use std::fmt;
use std::str::FromStr;

use crate::access::Width;
use crate::error::{Error, Result};
use crate::memory::PhysAddr;
use crate::util::{DEFAULT_READ_COUNT, DEFAULT_WRITE_COUNT};

/// The four access modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read and print a hex dump (`r`)
    Read,
    /// Write a value from the command line (`w`)
    Write,
    /// Read and emit raw little-endian bytes (`R`)
    ReadRaw,
    /// Write raw bytes taken from the input stream (`W`)
    WriteRaw,
}

impl Mode {
    /// Element count used when none is given.
    pub const fn default_count(&self) -> u64 {
        match self {
            Mode::Write => DEFAULT_WRITE_COUNT,
            Mode::Read | Mode::ReadRaw | Mode::WriteRaw => DEFAULT_READ_COUNT,
        }
    }

    /// Returns true if the mode stores to memory.
    pub const fn writes(&self) -> bool {
        matches!(self, Mode::Write | Mode::WriteRaw)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Read => "read",
            Mode::Write => "write",
            Mode::ReadRaw => "raw read",
            Mode::WriteRaw => "raw write",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r" => Ok(Mode::Read),
            "w" => Ok(Mode::Write),
            "R" => Ok(Mode::ReadRaw),
            "W" => Ok(Mode::WriteRaw),
            _ => Err(Error::InvalidArgument(format!("invalid command: {}", s))),
        }
    }
}

/// Parses a hexadecimal literal with an optional `0x`/`0X` prefix.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for empty or malformed literals.
pub fn parse_hex(s: &str) -> Result<u64> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || digits.starts_with('+') {
        return Err(Error::InvalidArgument(format!("invalid hex literal: {:?}", s)));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::InvalidArgument(format!("invalid hex literal {:?}: {}", s, e)))
}

/// A validated request for one invocation.
///
/// Construction checks alignment, the width restriction of
/// [`Mode::WriteRaw`] and that the addressed range does not overflow; a
/// request is never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessRequest {
    mode: Mode,
    width: Width,
    address: PhysAddr,
    count: u64,
    value: u64,
}

impl AccessRequest {
    /// Creates a request. `value` is only meaningful for [`Mode::Write`].
    ///
    /// # Errors
    ///
    /// * [`Error::MisalignedAddress`] if `address` is not a multiple of the width
    /// * [`Error::UnsupportedWidth`] for [`Mode::WriteRaw`] with a width other than one byte
    /// * [`Error::InvalidArgument`] if `address + count * width` overflows
    pub fn new(
        mode: Mode,
        width: Width,
        address: PhysAddr,
        count: u64,
        value: u64,
    ) -> Result<Self> {
        if !address.is_aligned(width.bytes()) {
            return Err(Error::MisalignedAddress { address, width });
        }
        if mode == Mode::WriteRaw && width != Width::OneByte {
            return Err(Error::UnsupportedWidth { mode, width });
        }
        let byte_len = count.checked_mul(width.bytes() as u64);
        if byte_len
            .and_then(|len| address.checked_add(len))
            .is_none()
        {
            return Err(Error::InvalidArgument(format!(
                "{:#x} {} elements at {:?} overflow the address space",
                count, width, address
            )));
        }
        Ok(AccessRequest {
            mode,
            width,
            address,
            count,
            value: if mode == Mode::Write { value } else { 0 },
        })
    }

    /// Builds a request from the positional operands following the address.
    ///
    /// For [`Mode::Write`] the operands are `<value> [<count>]`, for all other
    /// modes `[<count>]`. Missing counts take [`Mode::default_count`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the write value is missing or there
    /// are too many operands, plus everything [`AccessRequest::new`] rejects.
    pub fn from_operands(
        mode: Mode,
        width: Width,
        address: PhysAddr,
        operands: &[u64],
    ) -> Result<Self> {
        let (value, rest) = match mode {
            Mode::Write => match operands.split_first() {
                Some((value, rest)) => (*value, rest),
                None => {
                    return Err(Error::InvalidArgument("missing write value".into()));
                }
            },
            Mode::Read | Mode::ReadRaw | Mode::WriteRaw => (0, operands),
        };
        let count = match rest {
            [] => mode.default_count(),
            [count] => *count,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "too many operands for {} mode",
                    mode
                )));
            }
        };
        Self::new(mode, width, address, count, value)
    }

    /// Access mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Access width.
    pub fn width(&self) -> Width {
        self.width
    }

    /// Physical start address.
    pub fn address(&self) -> PhysAddr {
        self.address
    }

    /// Number of width-sized elements.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Value to store; zero unless the mode is [`Mode::Write`].
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of bytes covered, `count * width`.
    pub fn byte_len(&self) -> u64 {
        // checked in `new`
        self.count * self.width.bytes() as u64
    }
}
