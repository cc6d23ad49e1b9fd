use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use devmem::memory::{AccessedRegion, PageMapper, PhysAddr, Protection};
use devmem::util::page_size;
use devmem::{AccessRequest, Dispatcher, Error, HardwareAccess, Mode, Width};

/// A regular file standing in for the physical memory device.
///
/// File offsets play the role of physical addresses, just like `/dev/mem`.
struct ImageDevice {
    path: PathBuf,
}

impl ImageDevice {
    fn new(name: &str, contents: &[u8]) -> anyhow::Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!(
            "devmem-{}-{}.img",
            std::process::id(),
            name
        ));
        let mut file = File::create(&path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(ImageDevice { path })
    }

    /// Four pages of `0x00, 0x01, .., 0xff, 0x00, ..`
    fn counting(name: &str) -> anyhow::Result<Self> {
        let contents: Vec<u8> = (0..4 * page_size()).map(|i| i as u8).collect();
        Self::new(name, &contents)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(PageMapper::for_device(&self.path))
    }

    fn contents(&self) -> anyhow::Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

impl Drop for ImageDevice {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn run(
    device: &ImageDevice,
    mode: Mode,
    width: Width,
    address: u64,
    count: u64,
    value: u64,
    input: &[u8],
) -> anyhow::Result<Vec<u8>> {
    let request = AccessRequest::new(mode, width, PhysAddr::new(address), count, value)?;
    let mut out = Vec::new();
    device.dispatcher().run(&request, Cursor::new(input), &mut out)?;
    Ok(out)
}

#[test]
fn test_read_hex_dump() -> anyhow::Result<()> {
    let device = ImageDevice::counting("read_hex_dump")?;
    let out = run(&device, Mode::Read, Width::OneByte, 0x1000, 16, 0, &[])?;
    assert_eq!(
        String::from_utf8(out)?,
        "00001000: 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n"
    );
    Ok(())
}

#[test]
fn test_read_hex_dump_longs_across_pages() -> anyhow::Result<()> {
    let device = ImageDevice::counting("read_longs")?;
    let address = page_size() as u64 - 8;
    let out = String::from_utf8(run(&device, Mode::Read, Width::FourByte, address, 6, 0, &[])?)?;
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!("{:08x}: fbfaf9f8 fffefdfc 03020100 07060504", address)
    );
    assert_eq!(lines[1], format!("{:08x}: 0b0a0908 0f0e0d0c", address + 16));
    Ok(())
}

#[test]
fn test_read_zero_count() -> anyhow::Result<()> {
    let device = ImageDevice::counting("read_zero_count")?;
    let out = run(&device, Mode::Read, Width::TwoByte, 0x10, 0, 0, &[])?;
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_read_raw_little_endian() -> anyhow::Result<()> {
    let device = ImageDevice::counting("read_raw")?;
    for width in [Width::OneByte, Width::TwoByte, Width::FourByte] {
        let out = run(&device, Mode::ReadRaw, width, 0x20, 5, 0, &[])?;
        assert_eq!(out.len(), 5 * width.bytes());
        let expected: Vec<u8> = (0x20..0x20 + 5 * width.bytes() as u8).collect();
        assert_eq!(out, expected);
    }
    Ok(())
}

#[test]
fn test_write_then_read() -> anyhow::Result<()> {
    let device = ImageDevice::new("write_then_read", &vec![0u8; 4 * page_size()])?;
    let address = page_size() as u64 - 2;
    run(&device, Mode::Write, Width::TwoByte, address, 2, 0x1234_5678, &[])?;

    let contents = device.contents()?;
    let start = address as usize;
    assert_eq!(&contents[start - 1..start + 5], &[0, 0x78, 0x56, 0x78, 0x56, 0]);

    let out = run(&device, Mode::ReadRaw, Width::TwoByte, address, 2, 0, &[])?;
    assert_eq!(out, vec![0x78, 0x56, 0x78, 0x56]);
    let out = run(&device, Mode::Read, Width::TwoByte, address, 1, 0, &[])?;
    assert_eq!(String::from_utf8(out)?, format!("{:08x}: 5678\n", address));
    Ok(())
}

#[test]
fn test_write_defaults_to_single_element() -> anyhow::Result<()> {
    let device = ImageDevice::new("write_single", &vec![0u8; 2 * page_size()])?;
    let request =
        AccessRequest::from_operands(Mode::Write, Width::FourByte, PhysAddr::new(0x40), &[0xdeadbeef])?;
    device.dispatcher().run(&request, std::io::empty(), std::io::sink())?;
    let contents = device.contents()?;
    assert_eq!(&contents[0x3c..0x48], &[0, 0, 0, 0, 0xef, 0xbe, 0xad, 0xde, 0, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_write_raw_stops_at_count() -> anyhow::Result<()> {
    let device = ImageDevice::new("write_raw_count", &vec![0u8; page_size()])?;
    let request = AccessRequest::new(Mode::WriteRaw, Width::OneByte, PhysAddr::new(0x100), 4, 0)?;
    let mut input = Cursor::new(vec![0xa1u8, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6]);
    device.dispatcher().run(&request, &mut input, std::io::sink())?;
    assert_eq!(input.position(), 4);
    let contents = device.contents()?;
    assert_eq!(&contents[0x100..0x106], &[0xa1, 0xa2, 0xa3, 0xa4, 0, 0]);
    Ok(())
}

#[test]
fn test_write_raw_stops_at_end_of_input() -> anyhow::Result<()> {
    let device = ImageDevice::new("write_raw_eof", &vec![0xffu8; page_size()])?;
    run(&device, Mode::WriteRaw, Width::OneByte, 0x7, 0x40, 0, &[1, 2, 3])?;
    let contents = device.contents()?;
    assert_eq!(&contents[0x6..0xc], &[0xff, 1, 2, 3, 0xff, 0xff]);
    Ok(())
}

#[test]
fn test_region_truncating_round_trip() -> anyhow::Result<()> {
    let device = ImageDevice::new("region_round_trip", &vec![0u8; page_size()])?;
    let mapper = PageMapper::for_device(device.path());
    let address = PhysAddr::new(0x80);
    let mapping = mapper.acquire(address, 8, Protection::ReadWrite)?;
    assert_eq!(mapping.window().file_offset(), 0);
    assert_eq!(mapping.window().length(), page_size());
    let mut region = AccessedRegion::new(mapping, address, 8);

    for width in [Width::OneByte, Width::TwoByte, Width::FourByte] {
        region.write_width(width, 4, width.truncate(0xa1b2_c3d4));
        assert_eq!(region.read_width(width, 4), width.truncate(0xa1b2_c3d4));
    }
    region.write_width(Width::FourByte, 0, 0);
    region.write_width(Width::OneByte, 1, 0x1ff);
    assert_eq!(region.read_width(Width::FourByte, 0), 0x0000_ff00);
    Ok(())
}

#[test]
#[should_panic]
fn test_region_out_of_bounds() {
    let device = ImageDevice::new("region_bounds", &vec![0u8; page_size()]).unwrap();
    let mapper = PageMapper::for_device(device.path());
    let address = PhysAddr::new(0x10);
    let mapping = mapper.acquire(address, 4, Protection::ReadOnly).unwrap();
    let region = AccessedRegion::new(mapping, address, 4);
    region.read_width(Width::FourByte, 4);
}

#[test]
#[should_panic(expected = "not aligned")]
fn test_region_misaligned_access() {
    let device = ImageDevice::new("region_misaligned", &vec![0u8; page_size()]).unwrap();
    let mapper = PageMapper::for_device(device.path());
    let address = PhysAddr::new(0x10);
    let mapping = mapper.acquire(address, 8, Protection::ReadWrite).unwrap();
    let mut region = AccessedRegion::new(mapping, address, 8);
    region.write_width(Width::FourByte, 1, 0x1122_3344);
}

#[test]
#[should_panic(expected = "not aligned")]
fn test_region_misaligned_base() {
    let device = ImageDevice::new("region_misaligned_base", &vec![0u8; page_size()]).unwrap();
    let mapper = PageMapper::for_device(device.path());
    let address = PhysAddr::new(0x11);
    let mapping = mapper.acquire(address, 4, Protection::ReadOnly).unwrap();
    let region = AccessedRegion::new(mapping, address, 4);
    region.read_width(Width::TwoByte, 0);
}

#[test]
fn test_misaligned_rejected_before_open() {
    let err = AccessRequest::new(Mode::Read, Width::FourByte, PhysAddr::new(0x1001), 1, 0)
        .unwrap_err();
    assert!(matches!(err, Error::MisalignedAddress { .. }));
}

#[test]
fn test_device_open_error() -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(PageMapper::for_device("/nonexistent/mem"));
    let request = AccessRequest::new(Mode::Write, Width::OneByte, PhysAddr::new(0), 1, 1)?;
    let err = dispatcher
        .run(&request, std::io::empty(), std::io::sink())
        .unwrap_err();
    assert!(matches!(err, Error::DeviceOpen { .. }));
    Ok(())
}

#[test]
fn test_mapping_error() -> anyhow::Result<()> {
    // /dev/null opens read/write but cannot be mapped
    let dispatcher = Dispatcher::new(PageMapper::for_device("/dev/null"));
    let request = AccessRequest::new(Mode::Read, Width::OneByte, PhysAddr::new(0x1000), 1, 0)?;
    let err = dispatcher
        .run(&request, std::io::empty(), std::io::sink())
        .unwrap_err();
    assert!(matches!(err, Error::Mapping { .. }));
    Ok(())
}
