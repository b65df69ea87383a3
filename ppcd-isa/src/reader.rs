//! Sequential word reader over an image.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A virtual address in the image being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub u64);

impl Address {
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Add a signed displacement, wrapping at the top of the address space.
    #[inline]
    pub const fn offset(self, delta: i64) -> Address {
        Address(self.0.wrapping_add_signed(delta))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address(value)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Byte order of encoding words in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

impl Endianness {
    #[inline]
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endianness::Big => u32::from_be_bytes(bytes),
            Endianness::Little => u32::from_le_bytes(bytes),
        }
    }

    /// The bytes a word occupies in the image.
    #[inline]
    pub fn word_bytes(self, word: u32) -> [u8; 4] {
        match self {
            Endianness::Big => word.to_be_bytes(),
            Endianness::Little => word.to_le_bytes(),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endianness::Big => "big",
            Endianness::Little => "little",
        })
    }
}

impl FromStr for Endianness {
    type Err = ParseEndiannessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(Endianness::Big),
            "little" | "le" => Ok(Endianness::Little),
            _ => Err(ParseEndiannessError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown byte order {0:?} (expected big or little)")]
pub struct ParseEndiannessError(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Address {address} outside image {base}..+{len:#x}")]
    OutOfRange {
        address: Address,
        base: Address,
        len: usize,
    },
}

/// Reads 32-bit words in sequence, tracking the address of the next one.
#[derive(Debug, Clone)]
pub struct ImageReader<'a> {
    bytes: &'a [u8],
    base: Address,
    offset: usize,
    endianness: Endianness,
}

impl<'a> ImageReader<'a> {
    /// Reader positioned at the first byte, which lives at `base`.
    pub fn new(bytes: &'a [u8], base: Address, endianness: Endianness) -> Self {
        Self {
            bytes,
            base,
            offset: 0,
            endianness,
        }
    }

    /// Address of the next word.
    #[inline]
    pub fn address(&self) -> Address {
        Address(self.base.0.wrapping_add(self.offset as u64))
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Next word, or `None` once fewer than four bytes remain. A failed read
    /// does not move the reader.
    pub fn try_read_u32(&mut self) -> Option<u32> {
        let end = self.offset.checked_add(4)?;
        let chunk: [u8; 4] = self.bytes.get(self.offset..end)?.try_into().ok()?;
        self.offset = end;
        Some(self.endianness.read_u32(chunk))
    }

    /// Move to `address`. The end of the image is a valid position.
    pub fn seek(&mut self, address: Address) -> Result<(), ReaderError> {
        let out_of_range = || ReaderError::OutOfRange {
            address,
            base: self.base,
            len: self.bytes.len(),
        };
        let delta = address.0.checked_sub(self.base.0).ok_or_else(out_of_range)?;
        let offset = usize::try_from(delta).map_err(|_| out_of_range())?;
        if offset > self.bytes.len() {
            return Err(out_of_range());
        }
        self.offset = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: [u8; 10] = [0x38, 0x60, 0x00, 0x01, 0x4E, 0x80, 0x00, 0x20, 0xAA, 0xBB];

    #[test]
    fn reads_big_endian_words_and_tracks_address() {
        let mut r = ImageReader::new(&CODE, Address(0x8000_0000), Endianness::Big);
        assert_eq!(r.try_read_u32(), Some(0x3860_0001));
        assert_eq!(r.address(), Address(0x8000_0004));
        assert_eq!(r.try_read_u32(), Some(0x4E80_0020));
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn short_tail_is_end_of_stream() {
        let mut r = ImageReader::new(&CODE, Address(0), Endianness::Big);
        r.try_read_u32();
        r.try_read_u32();
        assert_eq!(r.try_read_u32(), None);
        // Position is unchanged by the failed read.
        assert_eq!(r.address(), Address(8));
    }

    #[test]
    fn little_endian_words() {
        let mut r = ImageReader::new(&CODE[..4], Address(0), Endianness::Little);
        assert_eq!(r.try_read_u32(), Some(0x0100_6038));
        assert_eq!(Endianness::Little.word_bytes(0x0100_6038), [0x38, 0x60, 0x00, 0x01]);
    }

    #[test]
    fn seek_bounds() {
        let mut r = ImageReader::new(&CODE, Address(0x100), Endianness::Big);
        r.seek(Address(0x104)).unwrap();
        assert_eq!(r.try_read_u32(), Some(0x4E80_0020));
        r.seek(Address(0x10A)).unwrap();
        assert_eq!(r.try_read_u32(), None);

        let err = r.seek(Address(0xFC)).unwrap_err();
        assert_eq!(
            err,
            ReaderError::OutOfRange {
                address: Address(0xFC),
                base: Address(0x100),
                len: 10
            }
        );
        assert!(r.seek(Address(0x10B)).is_err());
        assert_eq!(err.to_string(), "Address 000000FC outside image 00000100..+0xa");
    }

    #[test]
    fn address_display_and_offset() {
        assert_eq!(Address(0x1234).to_string(), "00001234");
        assert_eq!(Address(0x100).offset(-4), Address(0xFC));
        assert_eq!(format!("{:#x}", Address(0x10)), "0x10");
    }
}
