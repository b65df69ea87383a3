//! Decode sessions.
//!
//! [`DecodeState`] is the per-instruction context every mutator sees. It is
//! reset before each word, so nothing one decode does can leak into the next.
//! [`PowerPcDisassembler`] pairs a state with an [`ImageReader`] and yields
//! one record per word until the image runs out.

use std::sync::Arc;

use ppcd_isa::{
    Address, DecodeContext, Decoder, Diagnostic, DiagnosticKind, DiagnosticsSink, Endianness,
    ImageReader, InstrClass,
};

use crate::arch::{PowerPcArchitecture, WordWidth};
use crate::instruction::{Mnemonic, PowerPcInstruction};
use crate::operand::Operand;
use crate::registers::RegisterCatalog;

/// Tag carried by every diagnostic this decoder reports.
pub const DECODER_TAG: &str = "PPCDis";

/// Length of every PowerPC instruction in bytes.
pub const INSTRUCTION_LENGTH: usize = 4;

/// Mutable state of one decode.
pub struct DecodeState {
    pub(crate) registers: Arc<RegisterCatalog>,
    pub(crate) word_width: WordWidth,
    endianness: Endianness,
    pub(crate) address: Address,
    pub(crate) operands: Vec<Operand>,
    pub(crate) sets_cr0: bool,
    sink: Arc<dyn DiagnosticsSink>,
}

impl DecodeState {
    pub fn new(arch: &PowerPcArchitecture, endianness: Endianness) -> Self {
        Self {
            registers: Arc::clone(arch.registers()),
            word_width: arch.word_width(),
            endianness,
            address: Address::default(),
            operands: Vec::with_capacity(5),
            sets_cr0: false,
            sink: Arc::clone(arch.diagnostics()),
        }
    }

    /// Decode one word located at `address`.
    pub fn decode(
        &mut self,
        primary: &Decoder<DecodeState>,
        word: u32,
        address: Address,
    ) -> PowerPcInstruction {
        self.address = address;
        self.sets_cr0 = false;
        self.operands.clear();

        let mut instr = primary.decode(word, self);
        if word == 0 {
            instr.class |= InstrClass::ZERO;
        }
        instr.address = address;
        instr.length = INSTRUCTION_LENGTH;
        instr
    }

    pub fn registers(&self) -> &RegisterCatalog {
        &self.registers
    }

    pub fn word_width(&self) -> WordWidth {
        self.word_width
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Operands accumulated so far.
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn sets_cr0(&self) -> bool {
        self.sets_cr0
    }

    #[inline]
    pub(crate) fn push(&mut self, op: impl Into<Operand>) {
        self.operands.push(op.into());
    }
}

impl DecodeContext for DecodeState {
    type Mnemonic = Mnemonic;
    type Instruction = PowerPcInstruction;

    fn make_instruction(&mut self, class: InstrClass, mnemonic: Mnemonic) -> PowerPcInstruction {
        PowerPcInstruction {
            mnemonic,
            class,
            address: self.address,
            length: INSTRUCTION_LENGTH,
            operands: std::mem::take(&mut self.operands),
            sets_cr0: self.sets_cr0,
        }
    }

    fn create_invalid_instruction(&mut self) -> PowerPcInstruction {
        self.operands.clear();
        self.sets_cr0 = false;
        PowerPcInstruction::invalid(self.address)
    }

    fn report(&mut self, word: u32, kind: DiagnosticKind, message: &str) {
        self.sink.report(&Diagnostic {
            decoder: DECODER_TAG,
            kind,
            address: self.address,
            bytes: self.endianness.word_bytes(word),
            message: message.to_string(),
        });
    }
}

/// Iterator over the instructions of an image.
///
/// Yields one record per 32-bit word, including `illegal` records for words
/// that do not decode, and stops when fewer than four bytes remain.
pub struct PowerPcDisassembler<'a> {
    reader: ImageReader<'a>,
    primary: Arc<Decoder<DecodeState>>,
    state: DecodeState,
}

impl<'a> PowerPcDisassembler<'a> {
    pub fn new(arch: &PowerPcArchitecture, reader: ImageReader<'a>) -> Self {
        let state = DecodeState::new(arch, reader.endianness());
        Self {
            reader,
            primary: Arc::clone(arch.primary()),
            state,
        }
    }

    /// Address of the next word to decode.
    pub fn address(&self) -> Address {
        self.reader.address()
    }

    pub fn reader(&self) -> &ImageReader<'a> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut ImageReader<'a> {
        &mut self.reader
    }
}

impl Iterator for PowerPcDisassembler<'_> {
    type Item = PowerPcInstruction;

    fn next(&mut self) -> Option<PowerPcInstruction> {
        let address = self.reader.address();
        let word = self.reader.try_read_u32()?;
        Some(self.state.decode(&self.primary, word, address))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.reader.remaining() / INSTRUCTION_LENGTH;
        (n, Some(n))
    }
}
