//! Retargetable decoding engine for fixed-width instruction sets.
//!
//! This crate knows nothing about a particular architecture. It provides the
//! pieces an architecture crate composes into a disassembler:
//!
//! - [`Bitfield`] extraction over 32-bit encoding words,
//! - [`Mutator`] decode steps that append operands or set flags,
//! - [`Decoder`] dispatch trees whose leaves name a mnemonic and its mutators,
//! - the [`DecodeContext`] trait an architecture's per-instruction state implements,
//! - an address-tracked [`ImageReader`] and the [`DiagnosticsSink`] hook.

pub mod bitfield;
pub mod class;
pub mod decoder;
pub mod diagnostics;
pub mod mutator;
pub mod reader;

pub use bitfield::Bitfield;
pub use class::InstrClass;
pub use decoder::{DecodeContext, Decoder, InstrDecoder, Leaf, Pattern};
pub use diagnostics::{
    Collector, Diagnostic, DiagnosticGroup, DiagnosticKind, DiagnosticsSink, LogSink, NullSink,
};
pub use mutator::{Effect, Mutator};
pub use reader::{Address, Endianness, ImageReader, ParseEndiannessError, ReaderError};

// Architecture crates re-export this so generated flag types stay consistent.
pub use bitflags;
