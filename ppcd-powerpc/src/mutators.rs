//! Mutator families used by the PowerPC tables.
//!
//! Each constructor takes the bit offset of the field it reads (counted from
//! the least significant bit) and returns a named [`Mutator`]. The name is
//! what a diagnostic reports when the mutator rejects an encoding.

use ppcd_isa::{Address, Bitfield, Mutator};

use crate::arch::WordWidth;
use crate::disassembler::DecodeState;
use crate::operand::{AccessWidth, Immediate, Operand};

pub type PpcMutator = Mutator<DecodeState>;

fn memory(d: &DecodeState, base_bits: u32, offset: i16) -> Operand {
    Operand::Memory {
        base: d.registers.gpr(base_bits),
        offset,
        width: AccessWidth::Word32,
    }
}

// Registers

/// General purpose register from the 5 bits at `offset`.
pub fn r(offset: u32) -> PpcMutator {
    Mutator::operand(format!("r({offset})"), move |w, d: &mut DecodeState| {
        let reg = d.registers.gpr(w >> offset);
        d.push(reg);
        true
    })
}

/// Floating point register from the 5 bits at `offset`.
pub fn f(offset: u32) -> PpcMutator {
    Mutator::operand(format!("f({offset})"), move |w, d: &mut DecodeState| {
        let reg = d.registers.fpr(w >> offset);
        d.push(reg);
        true
    })
}

/// First register of an even/odd floating point pair. Odd numbers reject.
pub fn p(offset: u32) -> PpcMutator {
    Mutator::operand(format!("p({offset})"), move |w, d: &mut DecodeState| {
        let reg = d.registers.fpr(w >> offset);
        if reg.number() & 1 != 0 {
            return false;
        }
        d.push(reg);
        true
    })
}

/// AltiVec register from the 5 bits at `offset`.
pub fn v(offset: u32) -> PpcMutator {
    Mutator::operand(format!("v({offset})"), move |w, d: &mut DecodeState| {
        let reg = d.registers.vr((w >> offset) & 0x1F);
        d.push(reg);
        true
    })
}


/// Condition register field from the 3 bits at `offset`.
pub fn cr(offset: u32) -> PpcMutator {
    Mutator::operand(format!("cr({offset})"), move |w, d: &mut DecodeState| {
        let reg = d.registers.cr(w >> offset);
        d.push(reg);
        true
    })
}

/// Target CR field of the compare instructions (bits 23..25).
pub fn crf() -> PpcMutator {
    Mutator::operand("X3", |w, d: &mut DecodeState| {
        let reg = d.registers.cr((w >> 23) & 0x7);
        d.push(reg);
        true
    })
}

/// Special purpose register. The 10-bit number is stored with its two
/// 5-bit halves swapped; numbers without a name decode as an immediate.
pub fn spr() -> PpcMutator {
    Mutator::operand("SPR", |w, d: &mut DecodeState| {
        let number = ((w >> 16) & 0x1F) | ((w >> 6) & 0x3E0);
        match d.registers.spr(number) {
            Some(reg) => d.push(reg),
            None => d.push(Immediate::UInt32(number)),
        }
        true
    })
}

// VMX128 extended vector registers. The extra high bits live in otherwise
// unused corners of the encoding.

/// `VD128 = VD | (w[2..3] << 5)`.
pub fn wd() -> PpcMutator {
    Mutator::operand("Wd", |w, d: &mut DecodeState| {
        let reg = d.registers.vr(((w >> 21) & 0x1F) | ((w & 0xC) << 3));
        d.push(reg);
        true
    })
}

/// `VA128 = VA | w[10] << 6 | w[5] << 5`.
pub fn wa() -> PpcMutator {
    Mutator::operand("Wa", |w, d: &mut DecodeState| {
        let reg = d.registers.vr(((w >> 16) & 0x1F) | ((w >> 4) & 0x40) | (w & 0x20));
        d.push(reg);
        true
    })
}

/// `VB128 = VB | (w[0..1] << 5)`.
pub fn wb() -> PpcMutator {
    Mutator::operand("Wb", |w, d: &mut DecodeState| {
        let reg = d.registers.vr(((w >> 11) & 0x1F) | ((w & 0x3) << 5));
        d.push(reg);
        true
    })
}

/// VC of `vperm128`, limited to v0..v7.
pub fn wc() -> PpcMutator {
    Mutator::operand("Wc", |w, d: &mut DecodeState| {
        let reg = d.registers.vr((w >> 6) & 0x7);
        d.push(reg);
        true
    })
}

// Immediates

/// Signed 16-bit immediate in the low half.
pub fn simm() -> PpcMutator {
    Mutator::operand("S", |w, d: &mut DecodeState| {
        d.push(Immediate::Int16(w as u16 as i16));
        true
    })
}

/// Unsigned 16-bit immediate in the low half.
pub fn uimm() -> PpcMutator {
    Mutator::operand("U", |w, d: &mut DecodeState| {
        d.push(Immediate::Word16(w as u16));
        true
    })
}

/// 5-bit unsigned field at `offset` (shift counts, BO/BI, CR bits).
pub fn imm5(offset: u32) -> PpcMutator {
    Mutator::operand(format!("I({offset})"), move |w, d: &mut DecodeState| {
        d.push(Immediate::Byte(((w >> offset) & 0x1F) as u8));
        true
    })
}

/// Unsigned field of at most 8 bits.
pub fn u(position: u32, length: u32) -> PpcMutator {
    debug_assert!(length <= 8, "u({position},{length}) does not fit a byte");
    let field = Bitfield::new(position, length);
    Mutator::operand(format!("u{position}_{length}"), move |w, d: &mut DecodeState| {
        d.push(Immediate::Byte(field.read(w) as u8));
        true
    })
}

/// Sign-extended field.
pub fn s(position: u32, length: u32) -> PpcMutator {
    let field = Bitfield::new(position, length);
    Mutator::operand(format!("s{position}_{length}"), move |w, d: &mut DecodeState| {
        d.push(Immediate::Int32(field.read_signed(w)));
        true
    })
}

/// Unsigned value scattered over several fields, first field most significant.
pub fn u_fields(fields: &[Bitfield]) -> PpcMutator {
    let fields: Box<[Bitfield]> = fields.into();
    let narrow = Bitfield::total_length(&fields) <= 8;
    Mutator::operand(fields_name("u", &fields), move |w, d: &mut DecodeState| {
        let value = Bitfield::read_fields(&fields, w);
        if narrow {
            d.push(Immediate::Byte(value as u8));
        } else {
            d.push(Immediate::UInt32(value));
        }
        true
    })
}

/// Signed immediate gathered from scattered fields, sign-extended over their
/// combined width.
pub fn s_fields(fields: &[Bitfield]) -> PpcMutator {
    let fields: Box<[Bitfield]> = fields.into();
    Mutator::operand(fields_name("s", &fields), move |w, d: &mut DecodeState| {
        d.push(Immediate::Int32(Bitfield::read_signed_fields(&fields, w)));
        true
    })
}

fn fields_name(prefix: &str, fields: &[Bitfield]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| format!("{}_{}", f.position(), f.length()))
        .collect();
    format!("{prefix}[{}]", parts.join(","))
}

/// CRM field of `mtcrf` (bits 12..19).
pub fn crm() -> PpcMutator {
    Mutator::operand("M", |w, d: &mut DecodeState| {
        d.push(Immediate::Byte(((w >> 12) & 0xFF) as u8));
        true
    })
}

// Memory references

/// `d(rA)` with the base register at `offset` and a signed 16-bit displacement.
pub fn mem(offset: u32) -> PpcMutator {
    Mutator::operand(format!("E({offset})"), move |w, d: &mut DecodeState| {
        let op = memory(d, w >> offset, w as u16 as i16);
        d.push(op);
        true
    })
}

/// `d(rA)` whose displacement must be a multiple of four.
pub fn mem_aligned() -> PpcMutator {
    Mutator::operand("E2_2", |w, d: &mut DecodeState| {
        if w & 0x3 != 0 {
            return false;
        }
        let op = memory(d, w >> 16, w as u16 as i16);
        d.push(op);
        true
    })
}

/// DS-form `ds(rA)`: the low two bits select the opcode, not the displacement.
pub fn mem_ds(offset: u32) -> PpcMutator {
    Mutator::operand("Ds", move |w, d: &mut DecodeState| {
        let op = memory(d, w >> offset, (w & 0xFFFC) as u16 as i16);
        d.push(op);
        true
    })
}

// Branch targets

/// Branch target from a word displacement field; bit 1 (AA) makes it absolute.
pub fn target(field: Bitfield) -> PpcMutator {
    Mutator::operand("J", move |w, d: &mut DecodeState| {
        let displacement = i64::from(field.read_signed(w)) << 2;
        let target = if w & 0x2 != 0 {
            Address(displacement as u64)
        } else {
            d.address.offset(displacement)
        };
        let target = match d.word_width {
            WordWidth::W32 => Address(target.0 & 0xFFFF_FFFF),
            WordWidth::W64 => target,
        };
        d.push(Operand::Address(target));
        true
    })
}

// Flags and guards

/// Record bit in bit 0.
pub fn rc() -> PpcMutator {
    Mutator::flag("C", |w, d: &mut DecodeState| d.sets_cr0 = w & 1 != 0)
}

/// Record bit of the VMX128 compares, bit 6.
pub fn rc6() -> PpcMutator {
    Mutator::flag("C6", |w, d: &mut DecodeState| d.sets_cr0 = w & (1 << 6) != 0)
}

/// Record bit of the AltiVec compares, bit 10.
pub fn rc10() -> PpcMutator {
    Mutator::flag("C10", |w, d: &mut DecodeState| d.sets_cr0 = w & (1 << 10) != 0)
}

/// Instructions that always update CR0 (`andi.`, `stwcx.`).
pub fn rc_always() -> PpcMutator {
    Mutator::flag("CC", |_, d: &mut DecodeState| d.sets_cr0 = true)
}

/// Only 64-bit models accept the encoding.
pub fn is_64bit() -> PpcMutator {
    Mutator::guard("Is64Bit", |_, d: &DecodeState| d.word_width == WordWidth::W64)
}

#[cfg(test)]
mod tests {
    use ppcd_isa::Endianness;

    use super::*;
    use crate::arch::{Model, PowerPcArchitecture};
    use crate::registers::Register;

    fn state(model: Model) -> DecodeState {
        let arch = PowerPcArchitecture::new(model);
        let mut st = DecodeState::new(&arch, Endianness::Big);
        st.address = Address(0x8000_0000);
        st
    }

    fn run(m: &PpcMutator, w: u32, st: &mut DecodeState) -> Option<Operand> {
        st.operands.clear();
        if !m.apply(w, st) {
            return None;
        }
        st.operands.last().copied()
    }

    #[test]
    fn register_families_read_their_offset() {
        let mut st = state(Model::Ppc32);
        // addi r3,r4,42
        let w = 0x3864_002A;
        assert_eq!(run(&r(21), w, &mut st), Some(Register::gpr(3).into()));
        assert_eq!(run(&r(16), w, &mut st), Some(Register::gpr(4).into()));
        assert_eq!(run(&f(21), w, &mut st), Some(Register::fpr(3).into()));
        assert_eq!(run(&cr(23), 0x2F83_0000, &mut st), Some(Register::cr(7).into()));
    }

    #[test]
    fn paired_fpr_rejects_odd_register() {
        let mut st = state(Model::Ppc32);
        assert_eq!(run(&p(21), 2 << 21, &mut st), Some(Register::fpr(2).into()));
        assert_eq!(run(&p(21), 3 << 21, &mut st), None);
        assert!(st.operands.is_empty());
    }

    #[test]
    fn spr_halves_are_swapped() {
        let mut st = state(Model::Ppc32);
        // mflr r0: SPR 8 encoded as 0x01000 in bits 11..20
        assert_eq!(run(&spr(), 0x7C08_02A6, &mut st), Some(Register::spr(8).into()));
        // SPR 1012 (not in the table) decodes as a plain number.
        let w = (((1012 & 0x1F) << 16) | ((1012 >> 5) << 11)) as u32;
        assert_eq!(run(&spr(), w, &mut st), Some(Immediate::UInt32(1012).into()));
    }

    #[test]
    fn signed_low_half() {
        let mut st = state(Model::Ppc32);
        assert_eq!(run(&simm(), 0x3860_FFFF, &mut st), Some(Immediate::Int16(-1).into()));
        assert_eq!(run(&uimm(), 0x6060_FFFF, &mut st), Some(Immediate::Word16(0xFFFF).into()));
    }

    #[test]
    fn aligned_memory_rejects_low_bits() {
        let mut st = state(Model::Ppc32);
        let base = 0xE4C3_0010;
        assert_eq!(
            run(&mem_aligned(), base, &mut st),
            Some(Operand::Memory {
                base: Register::gpr(3),
                offset: 0x10,
                width: AccessWidth::Word32
            })
        );
        assert_eq!(run(&mem_aligned(), base | 1, &mut st), None);
    }

    #[test]
    fn ds_form_masks_selector_bits() {
        let mut st = state(Model::Ppc64);
        // ld r3,-8(r1) has displacement 0xFFF8 with selector 0 in the low bits
        let op = run(&mem_ds(16), 0xE861_FFF9, &mut st);
        assert_eq!(
            op,
            Some(Operand::Memory {
                base: Register::gpr(1),
                offset: -8,
                width: AccessWidth::Word32
            })
        );
    }

    #[test]
    fn branch_targets() {
        let mut st = state(Model::Ppc32);
        let j = target(Bitfield::new(2, 24));
        // b -4
        assert_eq!(run(&j, 0x4BFF_FFFC, &mut st), Some(Operand::Address(Address(0x7FFF_FFFC))));
        // ba 0x100
        assert_eq!(run(&j, 0x4800_0102, &mut st), Some(Operand::Address(Address(0x100))));
        // ba to a negative absolute address wraps into the 32-bit space
        assert_eq!(
            run(&j, 0x4BFF_FFFE, &mut st),
            Some(Operand::Address(Address(0xFFFF_FFFC)))
        );
    }

    #[test]
    fn vmx128_register_recombination() {
        let mut st = state(Model::Xenon);
        // VD field 1 with w[2..3] = 0b11 -> v97
        assert_eq!(run(&wd(), (1 << 21) | 0xC, &mut st), Some(Register::vr(97).into()));
        // VA field 2, bit 10 and bit 5 set -> v98
        assert_eq!(
            run(&wa(), (2 << 16) | (1 << 10) | (1 << 5), &mut st),
            Some(Register::vr(98).into())
        );
        // VB field 3 with w[0..1] = 0b10 -> v67
        assert_eq!(run(&wb(), (3 << 11) | 0x2, &mut st), Some(Register::vr(67).into()));
        assert_eq!(run(&wc(), 0x1FF << 6, &mut st), Some(Register::vr(7).into()));
    }

    #[test]
    fn scattered_shift_amount() {
        let mut st = state(Model::Ppc64);
        let sh = u_fields(&[Bitfield::new(1, 1), Bitfield::new(11, 5)]);
        assert_eq!(sh.name(), "u[1_1,11_5]");
        assert_eq!(run(&sh, (1 << 1) | (3 << 11), &mut st), Some(Immediate::Byte(35).into()));
    }

    #[test]
    fn scattered_signed_immediate() {
        let mut st = state(Model::Ppc64);
        let imm = s_fields(&[Bitfield::new(1, 1), Bitfield::new(11, 5)]);
        assert_eq!(imm.name(), "s[1_1,11_5]");
        // 0b100011 over six bits
        assert_eq!(run(&imm, (1 << 1) | (3 << 11), &mut st), Some(Immediate::Int32(-29).into()));
        assert_eq!(run(&imm, 3 << 11, &mut st), Some(Immediate::Int32(3).into()));
    }

    #[test]
    fn record_flags() {
        let mut st = state(Model::Ppc32);
        assert!(rc().apply(1, &mut st));
        assert!(st.sets_cr0);
        assert!(rc10().apply(0, &mut st));
        assert!(!st.sets_cr0);
        assert!(rc6().apply(1 << 6, &mut st));
        assert!(st.sets_cr0);
    }

    #[test]
    fn word_width_guard() {
        let mut st32 = state(Model::Ppc32);
        let mut st64 = state(Model::Ppc64);
        assert!(!is_64bit().apply(0, &mut st32));
        assert!(is_64bit().apply(0, &mut st64));
    }
}
