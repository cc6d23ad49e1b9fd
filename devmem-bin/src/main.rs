use std::fs::File;
use std::os::fd::AsFd;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use devmem_core::memory::{PageMapper, PhysAddr};
use devmem_core::util::DEV_MEM_PATH;
use devmem_core::{AccessRequest, Dispatcher, Mode, Width, parse_hex};
use log::{LevelFilter, debug, info};

/// mem: Access memory/register space using /dev/mem
///
/// All numbers are hexadecimal, with or without a `0x` prefix.
#[derive(Debug, Parser)]
#[command(name = "mem", version)]
struct CliArgs {
    /// r: read, w: write, R: read raw data to stdout, W: write raw data from stdin
    mode: Mode,
    /// Access width. b: 8-bit, w: 16-bit, l: 32-bit
    width: Width,
    /// Physical start address, aligned to the access width
    #[arg(value_parser = parse_hex)]
    address: u64,
    /// `r`/`R`/`W`: [count] (defaults to 0x40). `w`: <value> [count] (count defaults to 1)
    #[arg(value_parser = parse_hex, num_args = 0..=2)]
    operands: Vec<u64>,
    /// The physical memory device to map.
    #[arg(long = "device", env = "DEVMEM_DEVICE", default_value = DEV_MEM_PATH)]
    device: PathBuf,
    /// Verbose output, repeat for more detail. Logs go to stderr.
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

impl CliArgs {
    fn request(&self) -> devmem_core::Result<AccessRequest> {
        AccessRequest::from_operands(
            self.mode,
            self.width,
            PhysAddr::new(self.address),
            &self.operands,
        )
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Standard input without the std buffer in front of it.
///
/// `W` must consume no more than `count` bytes, so every byte is read with its
/// own `read(2)` on file descriptor 0 and anything after `count` stays unread.
fn unbuffered_stdin() -> std::io::Result<File> {
    Ok(File::from(std::io::stdin().as_fd().try_clone_to_owned()?))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    debug!("CLI args: {:?}", args);

    let request = args.request().context("invalid request")?;
    let mapper = PageMapper::for_device(&args.device);
    info!(
        "{} {:#x} {} element(s) at {:?} via {} (page size {:#x})",
        request.mode(),
        request.count(),
        request.width(),
        request.address(),
        mapper.device().display(),
        mapper.page_size()
    );

    let input = unbuffered_stdin().context("failed to duplicate stdin")?;
    Dispatcher::new(mapper)
        .run(&request, input, std::io::stdout().lock())
        .with_context(|| format!("{} at {:?} failed", request.mode(), request.address()))?;
    Ok(())
}
