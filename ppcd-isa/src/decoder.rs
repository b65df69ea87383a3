//! Decoder dispatch trees.
//!
//! A [`Decoder`] is built once per architecture and then shared read-only by
//! every decode session. Inner nodes extract a key from the encoding word and
//! select a child; leaves either name an instruction and the mutators that
//! build its operands, or reject the encoding.
//!
//! Dispatch is total: dense tables are padded with [`Decoder::Invalid`] and
//! sparse tables carry an explicit default, so every 32-bit word reaches a leaf.

use std::collections::BTreeMap;
use std::fmt;

use crate::bitfield::Bitfield;
use crate::class::InstrClass;
use crate::diagnostics::DiagnosticKind;
use crate::mutator::{Effect, Mutator};

/// Per-instruction state an architecture exposes to the decoder.
///
/// The decoder never builds instructions itself: leaves ask the context to
/// assemble one from the operands its mutators accumulated.
pub trait DecodeContext {
    type Mnemonic: Copy + fmt::Debug + Send + Sync + 'static;
    type Instruction;

    /// Assemble an instruction from the accumulated operands and flags.
    fn make_instruction(&mut self, class: InstrClass, mnemonic: Self::Mnemonic)
    -> Self::Instruction;

    /// The record produced for encodings that do not decode.
    fn create_invalid_instruction(&mut self) -> Self::Instruction;

    /// Forward a decode problem to the diagnostics hook. Implementations must
    /// not let this influence the decode result.
    fn report(&mut self, word: u32, kind: DiagnosticKind, message: &str);

    /// Called by [`Decoder::Nyi`] leaves.
    fn not_yet_implemented(&mut self, word: u32, message: &str) -> Self::Instruction {
        self.report(word, DiagnosticKind::NotYetImplemented, message);
        self.create_invalid_instruction()
    }
}

/// Terminal decoder: a mnemonic, its class, and the mutators building its operands.
pub struct InstrDecoder<D: DecodeContext> {
    mnemonic: D::Mnemonic,
    class: InstrClass,
    mutators: Vec<Mutator<D>>,
}

impl<D: DecodeContext> InstrDecoder<D> {
    pub fn new(mnemonic: D::Mnemonic, class: InstrClass, mutators: Vec<Mutator<D>>) -> Self {
        Self {
            mnemonic,
            class,
            mutators,
        }
    }

    pub fn mnemonic(&self) -> D::Mnemonic {
        self.mnemonic
    }

    pub fn class(&self) -> InstrClass {
        self.class
    }

    pub fn mutators(&self) -> &[Mutator<D>] {
        &self.mutators
    }

    /// Number of operands a successful decode produces.
    pub fn operand_count(&self) -> usize {
        self.mutators
            .iter()
            .filter(|m| m.effect() == Effect::Operand)
            .count()
    }

    /// Run the mutators left to right; the first failure makes the whole
    /// instruction invalid.
    pub fn decode(&self, word: u32, ctx: &mut D) -> D::Instruction {
        for m in &self.mutators {
            if !m.apply(word, ctx) {
                let message = format!("{:?} rejected by {}", self.mnemonic, m.name());
                ctx.report(word, DiagnosticKind::MutatorFailed, &message);
                return ctx.create_invalid_instruction();
            }
        }
        ctx.make_instruction(self.class, self.mnemonic)
    }
}

impl<D: DecodeContext> fmt::Debug for InstrDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.mutators.iter().map(|m| m.name()).collect();
        f.debug_struct("InstrDecoder")
            .field("mnemonic", &self.mnemonic)
            .field("class", &self.class)
            .field("mutators", &names)
            .finish()
    }
}

/// A node of the dispatch tree.
pub enum Decoder<D: DecodeContext> {
    /// Terminal instruction.
    Instr(InstrDecoder<D>),
    /// Dense table indexed by the concatenated key fields.
    Table {
        key: Box<[Bitfield]>,
        entries: Box<[Decoder<D>]>,
    },
    /// Table with a few populated keys and a default for the rest.
    Sparse {
        key: Box<[Bitfield]>,
        entries: BTreeMap<u32, Decoder<D>>,
        default: Box<Decoder<D>>,
    },
    /// No instruction has this encoding.
    Invalid,
    /// Known encoding the decoder does not handle yet.
    Nyi(&'static str),
}

impl<D: DecodeContext> Decoder<D> {
    pub fn instr(mnemonic: D::Mnemonic, class: InstrClass, mutators: Vec<Mutator<D>>) -> Self {
        Decoder::Instr(InstrDecoder::new(mnemonic, class, mutators))
    }

    /// Dense table keyed by `key`. Missing trailing entries decode as invalid.
    pub fn table(key: &[Bitfield], mut entries: Vec<Decoder<D>>) -> Self {
        let size = 1usize << Bitfield::total_length(key);
        debug_assert!(
            entries.len() <= size,
            "decoder table has {} entries for a {size}-entry key",
            entries.len()
        );
        entries.truncate(size);
        entries.resize_with(size, || Decoder::Invalid);
        Decoder::Table {
            key: key.into(),
            entries: entries.into_boxed_slice(),
        }
    }

    /// Sparse table keyed by `key`; keys not listed go to `default`.
    ///
    /// Listing the same key twice is a table construction bug and panics in
    /// debug builds.
    pub fn sparse(key: &[Bitfield], default: Decoder<D>, entries: Vec<(u32, Decoder<D>)>) -> Self {
        let width = Bitfield::total_length(key);
        let mut map = BTreeMap::new();
        for (k, decoder) in entries {
            debug_assert!(
                u64::from(k) < (1u64 << width),
                "key {k:#x} does not fit a {width}-bit decoder key"
            );
            let previous = map.insert(k, decoder);
            debug_assert!(previous.is_none(), "duplicate key {k:#x} in sparse decoder table");
        }
        Decoder::Sparse {
            key: key.into(),
            entries: map,
            default: Box::new(default),
        }
    }

    /// Decode one word, leaving the result construction to `ctx`.
    pub fn decode(&self, word: u32, ctx: &mut D) -> D::Instruction {
        match self {
            Decoder::Instr(d) => d.decode(word, ctx),
            Decoder::Table { key, entries } => {
                let index = Bitfield::read_fields(key, word) as usize;
                match entries.get(index) {
                    Some(d) => d.decode(word, ctx),
                    None => unmapped(word, ctx),
                }
            }
            Decoder::Sparse {
                key,
                entries,
                default,
            } => {
                let k = Bitfield::read_fields(key, word);
                entries.get(&k).unwrap_or(&**default).decode(word, ctx)
            }
            Decoder::Invalid => unmapped(word, ctx),
            Decoder::Nyi(message) => ctx.not_yet_implemented(word, message),
        }
    }

    /// Visit every leaf together with the fixed bits that lead to it.
    ///
    /// Leaves whose key contradicts the bits fixed by an ancestor can never be
    /// reached; instruction leaves in that position are reported as
    /// [`Leaf::Shadowed`] so table bugs show up in tests.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(Pattern, Leaf<'a, D>)) {
        self.walk_from(Pattern::default(), &mut f);
    }

    fn walk_from<'a>(&'a self, at: Pattern, f: &mut dyn FnMut(Pattern, Leaf<'a, D>)) {
        match self {
            Decoder::Instr(d) => f(at, Leaf::Instr(d)),
            Decoder::Invalid => f(at, Leaf::Invalid),
            Decoder::Nyi(message) => f(at, Leaf::Nyi(message)),
            Decoder::Table { key, entries } => {
                let mask = Bitfield::fields_mask(key);
                for (i, entry) in entries.iter().enumerate() {
                    let value = Bitfield::place_fields(key, i as u32);
                    match at.refine(mask, value) {
                        Some(p) => entry.walk_from(p, f),
                        None => entry.walk_shadowed(at, f),
                    }
                }
            }
            Decoder::Sparse {
                key,
                entries,
                default,
            } => {
                let mask = Bitfield::fields_mask(key);
                let size = 1u64 << Bitfield::total_length(key);
                for k in 0..size {
                    let k = k as u32;
                    let entry = entries.get(&k).unwrap_or(&**default);
                    let value = Bitfield::place_fields(key, k);
                    match at.refine(mask, value) {
                        Some(p) => entry.walk_from(p, f),
                        None if entries.contains_key(&k) => entry.walk_shadowed(at, f),
                        None => {}
                    }
                }
            }
        }
    }

    fn walk_shadowed<'a>(&'a self, at: Pattern, f: &mut dyn FnMut(Pattern, Leaf<'a, D>)) {
        match self {
            Decoder::Instr(d) => f(at, Leaf::Shadowed(d)),
            Decoder::Table { entries, .. } => {
                for entry in entries.iter() {
                    entry.walk_shadowed(at, f);
                }
            }
            Decoder::Sparse { entries, .. } => {
                for entry in entries.values() {
                    entry.walk_shadowed(at, f);
                }
            }
            Decoder::Invalid | Decoder::Nyi(_) => {}
        }
    }
}

fn unmapped<D: DecodeContext>(word: u32, ctx: &mut D) -> D::Instruction {
    log::trace!("no decoder for {word:#010x}");
    ctx.report(word, DiagnosticKind::UnmappedEncoding, "no decoder for encoding");
    ctx.create_invalid_instruction()
}

impl<D: DecodeContext> fmt::Debug for Decoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Instr(d) => fmt::Debug::fmt(d, f),
            Decoder::Table { key, entries } => f
                .debug_struct("Table")
                .field("key", key)
                .field("entries", &entries.len())
                .finish(),
            Decoder::Sparse { key, entries, .. } => f
                .debug_struct("Sparse")
                .field("key", key)
                .field("entries", &entries.len())
                .finish(),
            Decoder::Invalid => f.write_str("Invalid"),
            Decoder::Nyi(message) => f.debug_tuple("Nyi").field(message).finish(),
        }
    }
}

/// Fixed bits of the words that reach a leaf: `word & mask == value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    pub mask: u32,
    pub value: u32,
}

impl Pattern {
    #[inline]
    pub fn matches(self, word: u32) -> bool {
        word & self.mask == self.value
    }

    /// How many 32-bit words match.
    pub fn word_count(self) -> u64 {
        1u64 << (32 - self.mask.count_ones())
    }

    /// Add constraints; `None` if they contradict the existing ones.
    pub fn refine(self, mask: u32, value: u32) -> Option<Pattern> {
        if (self.value ^ value) & self.mask & mask != 0 {
            return None;
        }
        Some(Pattern {
            mask: self.mask | mask,
            value: self.value | (value & mask),
        })
    }
}

/// A leaf reported by [`Decoder::walk`].
pub enum Leaf<'a, D: DecodeContext> {
    Instr(&'a InstrDecoder<D>),
    Invalid,
    Nyi(&'static str),
    /// An instruction leaf no word can reach.
    Shadowed(&'a InstrDecoder<D>),
}
