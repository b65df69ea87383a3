use std::path::PathBuf;

use ppcd_isa::{Address, ReaderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Empty image: {}", .0.display())]
    EmptyImage(PathBuf),

    #[error("Range {offset:#x}+{len:#x} out of bounds (image size: {size:#x})")]
    OffsetOutOfBounds { offset: usize, len: usize, size: usize },

    #[error("Address {0} is not inside the image")]
    AddressOutOfRange(Address),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

pub type Result<T> = std::result::Result<T, Error>;
