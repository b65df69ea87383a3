//! Processor models and the architecture descriptor.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ppcd_isa::{
    Address, Decoder, DiagnosticsSink, Endianness, ImageReader, Leaf, NullSink,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::disassembler::{DecodeState, PowerPcDisassembler};
use crate::instruction::PowerPcInstruction;
use crate::registers::RegisterCatalog;
use crate::tables;

/// Supported processor models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// 32-bit PowerPC with AltiVec.
    #[default]
    Ppc32,
    /// 64-bit PowerPC with AltiVec.
    Ppc64,
    /// Xbox 360 CPU: 64-bit with the VMX128 extension.
    Xenon,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Ppc32, Model::Ppc64, Model::Xenon];

    pub const fn word_width(self) -> WordWidth {
        match self {
            Model::Ppc32 => WordWidth::W32,
            Model::Ppc64 | Model::Xenon => WordWidth::W64,
        }
    }

    pub const fn has_vmx128(self) -> bool {
        matches!(self, Model::Xenon)
    }

    pub const fn vector_register_count(self) -> u16 {
        if self.has_vmx128() { 128 } else { 32 }
    }

    /// Special-purpose registers this model names on top of the shared set.
    pub const fn extra_sprs(self) -> &'static [(u16, &'static str)] {
        match self {
            Model::Ppc32 => &[],
            Model::Ppc64 => HYPERVISOR_SPRS,
            Model::Xenon => XENON_SPRS,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Model::Ppc32 => "ppc32",
            Model::Ppc64 => "ppc64",
            Model::Xenon => "xenon",
        }
    }
}

const HYPERVISOR_SPRS: &[(u16, &str)] = &[
    (304, "hsprg0"),
    (305, "hsprg1"),
    (310, "hdec"),
    (313, "hrmor"),
    (314, "hsrr0"),
    (315, "hsrr1"),
    (318, "lpcr"),
    (319, "lpidr"),
];

const XENON_SPRS: &[(u16, &str)] = &[
    (304, "hsprg0"),
    (305, "hsprg1"),
    (310, "hdec"),
    (313, "hrmor"),
    (314, "hsrr0"),
    (315, "hsrr1"),
    (318, "lpcr"),
    (319, "lpidr"),
    (1012, "hid4"),
    (1017, "hid6"),
];

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown model {0:?} (expected ppc32, ppc64 or xenon)")]
pub struct ParseModelError(String);

impl FromStr for Model {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Model::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| ParseModelError(s.to_string()))
    }
}

/// Natural word width of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth {
    W32,
    W64,
}

impl WordWidth {
    pub const fn bits(self) -> u32 {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
        }
    }
}

/// Leaf counts of a model's decoder tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Reachable instruction leaves.
    pub instructions: usize,
    /// Distinct mnemonics among them.
    pub mnemonics: usize,
    /// Known encodings without a decoder.
    pub not_implemented: usize,
    /// Number of 32-bit words that decode as illegal by dispatch alone.
    pub invalid_words: u64,
    /// Instruction leaves no word can reach.
    pub shadowed: usize,
}

/// Everything needed to decode one processor model.
///
/// Built once and cheap to clone; clones share the decoder tables and register
/// catalog, which are never mutated after construction.
#[derive(Clone)]
pub struct PowerPcArchitecture {
    model: Model,
    endianness: Endianness,
    registers: Arc<RegisterCatalog>,
    primary: Arc<Decoder<DecodeState>>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl PowerPcArchitecture {
    pub fn new(model: Model) -> Self {
        let primary = tables::primary(model);
        log::debug!("built {model} decoder tables");
        Self {
            model,
            endianness: Endianness::Big,
            registers: Arc::new(
                RegisterCatalog::new(model.vector_register_count()).with_sprs(model.extra_sprs()),
            ),
            primary: Arc::new(primary),
            sink: Arc::new(NullSink),
        }
    }

    /// Send decode diagnostics to `sink` instead of discarding them.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Byte order used by [`decode`](Self::decode) when reporting diagnostics.
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn word_width(&self) -> WordWidth {
        self.model.word_width()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn registers(&self) -> &Arc<RegisterCatalog> {
        &self.registers
    }

    pub fn primary(&self) -> &Arc<Decoder<DecodeState>> {
        &self.primary
    }

    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticsSink> {
        &self.sink
    }

    /// Decode a single word as if it were located at `address`.
    pub fn decode(&self, word: u32, address: Address) -> PowerPcInstruction {
        let mut state = DecodeState::new(self, self.endianness);
        state.decode(&self.primary, word, address)
    }

    pub fn disassembler<'a>(&self, reader: ImageReader<'a>) -> PowerPcDisassembler<'a> {
        PowerPcDisassembler::new(self, reader)
    }

    pub fn stats(&self) -> DecoderStats {
        let mut stats = DecoderStats::default();
        let mut mnemonics = BTreeSet::new();
        self.primary.walk(|pattern, leaf| match leaf {
            Leaf::Instr(d) => {
                stats.instructions += 1;
                mnemonics.insert(d.mnemonic());
            }
            Leaf::Invalid => stats.invalid_words += pattern.word_count(),
            Leaf::Nyi(_) => stats.not_implemented += 1,
            Leaf::Shadowed(_) => stats.shadowed += 1,
        });
        stats.mnemonics = mnemonics.len();
        stats
    }
}

impl fmt::Debug for PowerPcArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerPcArchitecture")
            .field("model", &self.model)
            .field("endianness", &self.endianness)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_round_trip() {
        for m in Model::ALL {
            assert_eq!(m.name().parse::<Model>(), Ok(m));
        }
        assert_eq!("XENON".parse::<Model>(), Ok(Model::Xenon));
        assert!("ppc128".parse::<Model>().is_err());
    }

    #[test]
    fn model_properties() {
        assert_eq!(Model::Ppc32.word_width().bits(), 32);
        assert_eq!(Model::Xenon.word_width(), WordWidth::W64);
        assert_eq!(Model::Xenon.vector_register_count(), 128);
        assert_eq!(Model::Ppc64.vector_register_count(), 32);
    }

    #[test]
    fn spr_set_follows_model() {
        let ppc32 = PowerPcArchitecture::new(Model::Ppc32);
        let ppc64 = PowerPcArchitecture::new(Model::Ppc64);
        let xenon = PowerPcArchitecture::new(Model::Xenon);
        assert_eq!(ppc32.registers().spr_name(1012), None);
        assert_eq!(ppc64.registers().spr_name(1012), None);
        assert_eq!(xenon.registers().spr_name(1012), Some("hid4"));
        assert_eq!(ppc32.registers().spr_name(318), None);
        assert_eq!(ppc64.registers().spr_name(318), Some("lpcr"));
        assert!(xenon.registers().spr_count() > ppc64.registers().spr_count());
        assert!(ppc64.registers().spr_count() > ppc32.registers().spr_count());
    }

    #[test]
    fn clones_share_tables() {
        let a = PowerPcArchitecture::new(Model::Ppc32);
        let b = a.clone();
        assert!(Arc::ptr_eq(a.primary(), b.primary()));
        assert!(Arc::ptr_eq(a.registers(), b.registers()));
    }

    #[test]
    fn xenon_has_more_instructions() {
        let ppc64 = PowerPcArchitecture::new(Model::Ppc64).stats();
        let xenon = PowerPcArchitecture::new(Model::Xenon).stats();
        assert!(xenon.instructions > ppc64.instructions);
        assert!(xenon.not_implemented > 0);
        assert_eq!(ppc64.shadowed, 0);
        assert_eq!(xenon.shadowed, 0);
    }
}
