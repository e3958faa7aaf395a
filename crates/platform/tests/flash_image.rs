//! `FileFlash` reads against real image files.

use std::io::Write;

use platform::flash_image::{FileFlash, FlashImageError};
use platform::FlashRegion;

fn image(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reads_at_offset() {
    let file = image(&[0, 1, 2, 3, 4, 5, 6, 7]);
    let flash = FileFlash::open(file.path()).unwrap();
    assert_eq!(flash.capacity(), 8);

    let mut buf = [0u8; 3];
    flash.read(4, &mut buf).unwrap();
    assert_eq!(buf, [4, 5, 6]);

    // Reads are positional: a later read at a lower offset still works.
    flash.read(0, &mut buf).unwrap();
    assert_eq!(buf, [0, 1, 2]);
}

#[test]
fn read_past_end_is_out_of_bounds() {
    let file = image(&[0; 8]);
    let flash = FileFlash::open(file.path()).unwrap();
    let mut buf = [0u8; 4];
    assert!(matches!(flash.read(6, &mut buf), Err(FlashImageError::OutOfBounds)));
}

#[test]
fn missing_image_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FileFlash::open(dir.path().join("absent.bin"));
    assert!(matches!(result, Err(FlashImageError::Io(_))));
}
