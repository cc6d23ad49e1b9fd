//! The four access modes.
//!
//! [`Dispatcher::run`] maps the requested range and hands the region to one of
//! the mode routines below. The routines only see a [`HardwareAccess`], so they
//! run the same against a device mapping or any other implementor.

use std::io::{BufWriter, Read, Write};

use log::{debug, info};

use crate::access::{HardwareAccess, Width};
use crate::error::{Error, Result};
use crate::memory::{AccessedRegion, PageMapper, PhysAddr, Protection};
use crate::request::{AccessRequest, Mode};
use crate::util::BYTES_PER_LINE;

/// Executes access requests against a physical memory device.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    mapper: PageMapper,
}

impl Dispatcher {
    /// Creates a dispatcher that maps through `mapper`.
    pub fn new(mapper: PageMapper) -> Self {
        Dispatcher { mapper }
    }

    /// Runs `request` to completion.
    ///
    /// `input` is only consumed in [`Mode::WriteRaw`]; `output` is only written
    /// in [`Mode::Read`] and [`Mode::ReadRaw`]. A request with a count of zero
    /// does not touch the device. The mapping is released before returning, on
    /// success and on error.
    ///
    /// # Errors
    ///
    /// Returns the mapping errors of [`PageMapper::acquire`], and
    /// [`Error::Io`] if reading `input` or writing `output` fails.
    pub fn run<R: Read, W: Write>(
        &self,
        request: &AccessRequest,
        input: R,
        output: W,
    ) -> Result<()> {
        debug!("dispatching {:?}", request);
        if request.count() == 0 {
            debug!("count is zero, nothing to do");
            return Ok(());
        }
        let protection = if request.mode().writes() {
            Protection::ReadWrite
        } else {
            Protection::ReadOnly
        };
        let mapping = self
            .mapper
            .acquire(request.address(), request.byte_len(), protection)?;
        // the window length fits into usize, so do count and byte_len
        let len = usize::try_from(request.byte_len())
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let count = len / request.width().bytes();
        let mut region = AccessedRegion::new(mapping, request.address(), len);

        match request.mode() {
            Mode::Read => {
                let mut out = BufWriter::new(output);
                print_buffer(&region, request.address(), request.width(), count, &mut out)?;
                out.flush()?;
            }
            Mode::Write => {
                let value = request.width().truncate(request.value());
                write_buffer(&mut region, request.width(), count, value);
                info!(
                    "wrote {:#x} to {:#x} {} element(s) at {:?}",
                    value,
                    count,
                    request.width(),
                    request.address()
                );
            }
            Mode::ReadRaw => {
                let mut out = BufWriter::new(output);
                print_raw(&region, request.width(), count, &mut out)?;
                out.flush()?;
            }
            Mode::WriteRaw => {
                let written = write_from_input(&mut region, count, input)?;
                info!(
                    "wrote {:#x} byte(s) from input at {:?}",
                    written,
                    request.address()
                );
            }
        }
        Ok(())
    }
}

/// Prints `count` elements as a hex dump of 16 bytes per line.
///
/// Each line starts with the physical address of its first element, e.g.
/// `00001000: 00 01 02 03`.
pub fn print_buffer<A, W>(
    region: &A,
    address: PhysAddr,
    width: Width,
    count: usize,
    out: &mut W,
) -> std::io::Result<()>
where
    A: HardwareAccess + ?Sized,
    W: Write + ?Sized,
{
    let per_line = BYTES_PER_LINE / width.bytes();
    for line_start in (0..count).step_by(per_line) {
        let line_offset = line_start * width.bytes();
        write!(out, "{:08x}:", address + line_offset as u64)?;
        for i in line_start..count.min(line_start + per_line) {
            let value = region.read_width(width, i * width.bytes());
            write!(out, " {:0digits$x}", value, digits = width.hex_digits())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Stores `value` into `count` consecutive elements.
pub fn write_buffer<A>(region: &mut A, width: Width, count: usize, value: u32)
where
    A: HardwareAccess + ?Sized,
{
    for i in 0..count {
        region.write_width(width, i * width.bytes(), value);
    }
}

/// Emits `count` elements as raw little-endian bytes.
pub fn print_raw<A, W>(region: &A, width: Width, count: usize, out: &mut W) -> std::io::Result<()>
where
    A: HardwareAccess + ?Sized,
    W: Write + ?Sized,
{
    for i in 0..count {
        let value = region.read_width(width, i * width.bytes());
        out.write_all(&value.to_le_bytes()[..width.bytes()])?;
    }
    Ok(())
}

/// Copies bytes from `input` into consecutive addresses, one byte at a time.
///
/// Stops after `count` bytes or at end of input, whichever comes first, and
/// returns the number of bytes written. Never reads more than `count` bytes.
pub fn write_from_input<A, R>(region: &mut A, count: usize, input: R) -> std::io::Result<usize>
where
    A: HardwareAccess + ?Sized,
    R: Read,
{
    let mut written = 0;
    for byte in input.take(count as u64).bytes() {
        region.write_width(Width::OneByte, written, byte? as u32);
        written += 1;
    }
    Ok(written)
}
