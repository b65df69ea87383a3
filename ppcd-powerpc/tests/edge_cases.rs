mod common;

use common::*;
use ppcd_isa::{Address, DiagnosticKind, InstrClass};
use ppcd_powerpc::*;

#[test]
fn zero_word_is_tagged() {
    let i = decode(Model::Ppc32, 0x0000_0000);
    assert!(i.class.contains(InstrClass::ZERO), "class was {:?}", i.class);
    assert_eq!(i.mnemonic, Mnemonic::illegal);
    assert_eq!(i.length, 4);
}

#[test]
fn zero_tag_only_on_zero() {
    // ori r0,r0,0 is the canonical nop; it is not the zero word.
    let i = decode(Model::Ppc32, 0x6000_0000);
    assert_eq!(i.mnemonic, Mnemonic::ori);
    assert!(!i.class.contains(InstrClass::ZERO));
}

#[test]
fn odd_register_pair_is_illegal() {
    // lfdp f3,16(r1)
    let word = (57 << 26) | (3 << 21) | (1 << 16) | 0x10;
    let (arch, collector) = collecting(Model::Ppc32);
    let i = arch.decode(word, BASE);
    assert_eq!(i.mnemonic, Mnemonic::illegal);
    assert!(i.class.contains(InstrClass::INVALID));
    assert!(i.operands.is_empty());

    let reports = collector.take();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, DiagnosticKind::MutatorFailed);
    assert!(reports[0].message.contains("p(21)"), "{}", reports[0].message);
}

#[test]
fn even_register_pair_decodes() {
    // lfdp f2,16(r1) and stfdp f4,-8(r5)
    assert_eq!(
        asm(Model::Ppc32, (57 << 26) | (2 << 21) | (1 << 16) | 0x10),
        "lfdp\tf2,16(r1)"
    );
    assert_eq!(
        asm(Model::Ppc32, (61 << 26) | (4 << 21) | (5 << 16) | 0xFFF8),
        "stfdp\tf4,-8(r5)"
    );
}

#[test]
fn unnamed_spr_becomes_raw_number() {
    // mfspr r3,1012: halves 20 and 31 swapped into bits 16..20 and 11..15.
    let word = 0x7C74_FAA6;
    assert_eq!(((word >> 16) & 0x1F) | ((word >> 6) & 0x3E0), 1012);
    let i = decode(Model::Ppc32, word);
    assert_eq!(i.mnemonic, Mnemonic::mfspr);
    assert_eq!(
        i.operands,
        [
            Operand::Register(Register::gpr(3)),
            Operand::Immediate(Immediate::UInt32(1012)),
        ]
    );
}

#[test]
fn named_spr_resolves() {
    // mflr r0 and mtctr r12
    assert_eq!(asm(Model::Ppc32, 0x7C08_02A6), "mfspr\tr0,lr");
    assert_eq!(asm(Model::Ppc32, 0x7D89_03A6), "mtspr\tctr,r12");
}

#[test]
fn model_specific_spr_resolves() {
    // mfspr r3,1012 names HID4 only on Xenon.
    assert_eq!(asm(Model::Xenon, 0x7C74_FAA6), "mfspr\tr3,hid4");
    assert_eq!(asm(Model::Ppc64, 0x7C74_FAA6), "mfspr\tr3,0x3F4");
}

#[test]
fn all_ones_simm_is_minus_one() {
    // addi r3,r0,-1
    let i = decode(Model::Ppc32, 0x3860_FFFF);
    assert_eq!(i.mnemonic, Mnemonic::addi);
    assert_eq!(i.operand(2), Some(&Operand::Immediate(Immediate::Int16(-1))));
    assert_eq!(i.to_string(), "addi\tr3,r0,-1");
}

#[test]
fn aligned_displacement_rejects_low_bits() {
    let base = (57 << 26) | (2 << 21) | (1 << 16);
    let misaligned = decode(Model::Ppc32, base | 0b01);
    assert_eq!(misaligned.mnemonic, Mnemonic::illegal);

    let aligned = decode(Model::Ppc32, base | 0b100);
    assert_eq!(aligned.mnemonic, Mnemonic::lfdp);
    assert_eq!(
        aligned.operand(1),
        Some(&Operand::Memory {
            base: Register::gpr(1),
            offset: 4,
            width: AccessWidth::Word32,
        })
    );
}

#[test]
fn address_is_kept_on_illegal_records() {
    let arch = PowerPcArchitecture::new(Model::Ppc32);
    let i = arch.decode(0x0400_0000, Address(0x1234));
    assert!(!i.is_valid());
    assert_eq!(i.address, Address(0x1234));
    assert_eq!(i.next_address(), Address(0x1238));
}
