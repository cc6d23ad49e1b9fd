/// Fallback page size (4096 bytes), used when the system cannot be queried
pub const PAGE_SIZE: usize = 0x1000;

/// Default physical memory device
pub const DEV_MEM_PATH: &str = "/dev/mem";

/// Default element count for `r`, `R` and `W`
pub const DEFAULT_READ_COUNT: u64 = 0x40;
/// Default element count for `w`
pub const DEFAULT_WRITE_COUNT: u64 = 1;

/// Bytes shown per line of a hex dump
pub const BYTES_PER_LINE: usize = 16;
