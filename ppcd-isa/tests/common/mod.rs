#![allow(dead_code)]

use std::sync::Arc;

use ppcd_isa::*;

/// A four-instruction machine: the top nibble selects the instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinyInstr {
    pub mnemonic: &'static str,
    pub class: InstrClass,
    pub operands: Vec<u32>,
    pub wide: bool,
}

pub struct Tiny {
    pub address: Address,
    pub operands: Vec<u32>,
    pub wide: bool,
    pub sink: Arc<dyn DiagnosticsSink>,
}

impl Tiny {
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            address: Address(0),
            operands: Vec::new(),
            wide: false,
            sink,
        }
    }

    pub fn decode(&mut self, decoder: &Decoder<Tiny>, word: u32, address: Address) -> TinyInstr {
        self.address = address;
        self.operands.clear();
        self.wide = false;
        decoder.decode(word, self)
    }
}

impl DecodeContext for Tiny {
    type Mnemonic = &'static str;
    type Instruction = TinyInstr;

    fn make_instruction(&mut self, class: InstrClass, mnemonic: &'static str) -> TinyInstr {
        TinyInstr {
            mnemonic,
            class,
            operands: std::mem::take(&mut self.operands),
            wide: self.wide,
        }
    }

    fn create_invalid_instruction(&mut self) -> TinyInstr {
        self.operands.clear();
        TinyInstr {
            mnemonic: "invalid",
            class: InstrClass::INVALID,
            operands: Vec::new(),
            wide: false,
        }
    }

    fn report(&mut self, word: u32, kind: DiagnosticKind, message: &str) {
        self.sink.report(&Diagnostic {
            decoder: "Tiny",
            kind,
            address: self.address,
            bytes: word.to_be_bytes(),
            message: message.to_string(),
        });
    }
}

fn reg(position: u32) -> Mutator<Tiny> {
    let field = Bitfield::new(position, 4);
    Mutator::operand(format!("reg({position})"), move |w, d: &mut Tiny| {
        d.operands.push(field.read(w));
        true
    })
}

fn imm() -> Mutator<Tiny> {
    Mutator::operand("imm", |w, d: &mut Tiny| {
        d.operands.push(w & 0xFFFF);
        true
    })
}

fn wide() -> Mutator<Tiny> {
    Mutator::flag("wide", |w, d: &mut Tiny| d.wide = w & (1 << 27) != 0)
}

fn aligned() -> Mutator<Tiny> {
    Mutator::guard("aligned", |w, _: &Tiny| w & 0x3 == 0)
}

/// `load` and `jump` are dense entries; nibble 2 is a sparse group keyed by
/// the low nibble with one unimplemented member.
pub fn tiny_isa() -> Decoder<Tiny> {
    Decoder::table(
        &[Bitfield::new(28, 4)],
        vec![
            Decoder::Invalid,
            Decoder::instr("load", InstrClass::LINEAR, vec![wide(), reg(20), imm()]),
            Decoder::sparse(
                &[Bitfield::new(0, 4)],
                Decoder::Invalid,
                vec![
                    (1, Decoder::instr("push", InstrClass::LINEAR, vec![reg(20)])),
                    (2, Decoder::Nyi("pop")),
                ],
            ),
            Decoder::instr("jump", InstrClass::TRANSFER, vec![aligned(), imm()]),
        ],
    )
}
