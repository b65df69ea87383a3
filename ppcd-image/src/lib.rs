//! Code images for the decoder.
//!
//! An [`Image`] is a byte buffer placed at a base address, either a read-only
//! memory map of a file or an owned vector. Sub-images made by
//! [`Image::slice`] share the buffer and keep the addresses their bytes had
//! in the parent image.

pub mod error;

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use ppcd_isa::{Address, Endianness, ImageReader};

pub use error::{Error, Result};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Mapped(m) => &m[..],
            Backing::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone)]
pub struct Image {
    backing: Arc<Backing>,
    start: usize,
    len: usize,
    base: Address,
}

impl Image {
    /// Map `path` read-only; its first byte lives at `base`.
    pub fn open(path: &Path, base: Address) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        let size = file
            .metadata()
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?
            .len();
        if size == 0 {
            return Err(Error::EmptyImage(path.to_path_buf()));
        }
        // SAFETY: the map is read-only and lives as long as the image. A file
        // truncated by another process while mapped is outside our control.
        let map = unsafe { Mmap::map(&file) }
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        log::debug!("mapped {} bytes of {} at {base}", map.len(), path.display());
        let len = map.len();
        Ok(Self {
            backing: Arc::new(Backing::Mapped(map)),
            start: 0,
            len,
            base,
        })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>, base: Address) -> Self {
        let bytes = bytes.into();
        let len = bytes.len();
        Self {
            backing: Arc::new(Backing::Owned(bytes)),
            start: 0,
            len,
            base,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.backing.bytes()[self.start..self.start + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte.
    pub fn base(&self) -> Address {
        self.base
    }

    /// Address one past the last byte.
    pub fn end(&self) -> Address {
        self.base.offset(self.len as i64)
    }

    pub fn is_memory_mapped(&self) -> bool {
        matches!(*self.backing, Backing::Mapped(_))
    }

    /// Offset of `address` from the start of the image.
    pub fn offset_of(&self, address: Address) -> Result<usize> {
        address
            .value()
            .checked_sub(self.base.value())
            .and_then(|d| usize::try_from(d).ok())
            .filter(|&d| d < self.len)
            .ok_or(Error::AddressOutOfRange(address))
    }

    /// Reader over the whole image.
    pub fn reader(&self, endianness: Endianness) -> ImageReader<'_> {
        ImageReader::new(self.bytes(), self.base, endianness)
    }

    /// Reader whose first word is the one at `address`.
    pub fn reader_at(&self, address: Address, endianness: Endianness) -> Result<ImageReader<'_>> {
        let mut reader = self.reader(endianness);
        reader.seek(address)?;
        Ok(reader)
    }

    /// `len` bytes starting `offset` bytes in; the sub-image's base is the
    /// address those bytes had in `self`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<Image> {
        let out_of_bounds = Error::OffsetOutOfBounds {
            offset,
            len,
            size: self.len,
        };
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(Image {
                backing: Arc::clone(&self.backing),
                start: self.start + offset,
                len,
                base: self.base.offset(offset as i64),
            }),
            _ => Err(out_of_bounds),
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("base", &self.base)
            .field("len", &self.len)
            .field("mapped", &self.is_memory_mapped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Image {
        Image::from_bytes(vec![0x38, 0x60, 0x00, 0x2A, 0x4E, 0x80, 0x00, 0x20], Address(0x1000))
    }

    #[test]
    fn slice_keeps_addresses() {
        let img = sample();
        let tail = img.slice(4, 4).unwrap();
        assert_eq!(tail.base(), Address(0x1004));
        assert_eq!(tail.bytes(), [0x4E, 0x80, 0x00, 0x20]);
        assert_eq!(tail.end(), img.end());
        assert!(!tail.is_memory_mapped());
    }

    #[test]
    fn slice_of_slice() {
        let img = sample();
        let inner = img.slice(2, 6).unwrap().slice(2, 2).unwrap();
        assert_eq!(inner.base(), Address(0x1004));
        assert_eq!(inner.bytes(), [0x4E, 0x80]);
    }

    #[test]
    fn slice_out_of_bounds() {
        let img = sample();
        assert!(matches!(
            img.slice(6, 4),
            Err(Error::OffsetOutOfBounds { offset: 6, len: 4, size: 8 })
        ));
        assert!(img.slice(usize::MAX, 2).is_err());
        assert!(img.slice(8, 0).unwrap().is_empty());
    }

    #[test]
    fn offsets_of_addresses() {
        let img = sample();
        assert_eq!(img.offset_of(Address(0x1004)).unwrap(), 4);
        assert!(matches!(
            img.offset_of(Address(0x1008)),
            Err(Error::AddressOutOfRange(Address(0x1008)))
        ));
        assert!(img.offset_of(Address(0xFFF)).is_err());
    }

    #[test]
    fn reader_at_positions_the_reader() {
        let img = sample();
        let mut r = img.reader_at(Address(0x1004), Endianness::Big).unwrap();
        assert_eq!(r.try_read_u32(), Some(0x4E80_0020));
        assert!(matches!(
            img.reader_at(Address(0x2000), Endianness::Big),
            Err(Error::Reader(_))
        ));
    }

    #[test]
    fn error_messages() {
        let e = sample().slice(6, 4).unwrap_err();
        assert_eq!(e.to_string(), "Range 0x6+0x4 out of bounds (image size: 0x8)");
        let e = Error::AddressOutOfRange(Address(0x1008));
        assert_eq!(e.to_string(), "Address 00001008 is not inside the image");
    }
}
