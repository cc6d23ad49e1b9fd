//! # devmem
//!
//! Inspect and modify physical memory and memory-mapped device registers
//! through `/dev/mem`. This crate re-exports [`devmem_core`]; the `mem`
//! command line tool lives in the `devmem-bin` workspace member.
//!
//! ## Usage
//!
//! ```text
//! mem [r|w|R|W] [b|w|l] <addr> [rcount/wvalue] [wcount]
//!     r: Read memory. rcount is optional (defaults to 0x40)
//!     w: Write memory. wcount is optional (defaults to 1)
//!     R: Read memory and output raw data to stdout
//!     W: Write to memory, but get raw data from stdin
//! ```
//!
//! ## Library example
//!
//! ```no_run
//! use devmem::memory::{PageMapper, PhysAddr};
//! use devmem::{AccessRequest, Dispatcher, Mode, Width};
//!
//! let request = AccessRequest::new(Mode::Read, Width::FourByte, PhysAddr::new(0xff99_0000), 4, 0)?;
//! Dispatcher::new(PageMapper::dev_mem()).run(&request, std::io::empty(), std::io::stdout())?;
//! # Ok::<(), devmem::Error>(())
//! ```

pub use devmem_core::*;
