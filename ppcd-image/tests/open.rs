mod common;

use common::temp_file;
use ppcd_image::{Error, Image};
use ppcd_isa::{Address, Endianness};

#[test]
fn open_maps_the_file() {
    let path = temp_file(&[0x38, 0x60, 0x00, 0x2A, 0x4E, 0x80, 0x00, 0x20, 0xFF]);
    let img = Image::open(&path, Address(0x8200_0000)).unwrap();
    assert!(img.is_memory_mapped());
    assert_eq!(img.len(), 9);
    assert_eq!(img.end(), Address(0x8200_0009));

    let mut r = img.reader(Endianness::Big);
    assert_eq!(r.try_read_u32(), Some(0x3860_002A));
    assert_eq!(r.try_read_u32(), Some(0x4E80_0020));
    assert_eq!(r.try_read_u32(), None);

    drop(img);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn slices_share_the_mapping() {
    let path = temp_file(&[0, 1, 2, 3, 4, 5, 6, 7]);
    let img = Image::open(&path, Address(0)).unwrap();
    let tail = img.slice(4, 4).unwrap();
    assert!(tail.is_memory_mapped());
    assert_eq!(tail.reader(Endianness::Little).try_read_u32(), Some(0x0706_0504));
    drop((img, tail));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn empty_file_is_rejected() {
    let path = temp_file(&[]);
    assert!(matches!(Image::open(&path, Address(0)), Err(Error::EmptyImage(_))));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("ppcd-image-does-not-exist.bin");
    let err = Image::open(&path, Address(0)).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().starts_with("I/O error: "));
}
