//! Decoder tables.
//!
//! The primary table is keyed by the opcode in bits 26..31; extended opcode
//! groups live in their own modules. Tables are rebuilt per model so that
//! Xenon-only groups exist only on Xenon.

mod ext19;
mod ext31;
mod fp;
mod vmx;
mod vmx128;

use ppcd_isa::{Bitfield, Decoder, InstrClass};

use crate::arch::Model;
use crate::disassembler::DecodeState;
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

pub(crate) type Dec = Decoder<DecodeState>;

pub(crate) const LINEAR: InstrClass = InstrClass::LINEAR;
pub(crate) const PRIVILEGED: InstrClass = InstrClass::LINEAR.union(InstrClass::PRIVILEGED);
pub(crate) const TRAP: InstrClass = InstrClass::LINEAR.union(InstrClass::CONDITIONAL);

/// A plain, sequential instruction.
pub(crate) fn op(mnemonic: M, mutators: Vec<PpcMutator>) -> Dec {
    Decoder::instr(mnemonic, LINEAR, mutators)
}

/// Supervisor-only instruction.
pub(crate) fn privileged(mnemonic: M, mutators: Vec<PpcMutator>) -> Dec {
    Decoder::instr(mnemonic, PRIVILEGED, mutators)
}

/// Single-bit key.
pub(crate) const fn bit(position: u32) -> [Bitfield; 1] {
    [Bitfield::new(position, 1)]
}

/// Key made of one contiguous field.
pub(crate) const fn field(position: u32, length: u32) -> [Bitfield; 1] {
    [Bitfield::new(position, length)]
}

pub(crate) fn primary(model: Model) -> Dec {
    let vmx128 = model.has_vmx128();
    Decoder::table(
        &field(26, 6),
        vec![
            Decoder::Invalid,
            Decoder::Invalid,
            Decoder::instr(M::tdi, TRAP, vec![is_64bit(), imm5(21), r(16), simm()]),
            Decoder::instr(M::twi, TRAP, vec![imm5(21), r(16), simm()]),
            vmx::opcode4(model),
            if vmx128 { vmx128::opcode5() } else { Decoder::Invalid },
            if vmx128 { vmx128::opcode6() } else { Decoder::Invalid },
            op(M::mulli, vec![r(21), r(16), simm()]),
            op(M::subfic, vec![r(21), r(16), simm()]),
            Decoder::Invalid,
            Decoder::table(
                &bit(21),
                vec![
                    op(M::cmplwi, vec![crf(), r(16), uimm()]),
                    op(M::cmpldi, vec![is_64bit(), crf(), r(16), uimm()]),
                ],
            ),
            Decoder::table(
                &bit(21),
                vec![
                    op(M::cmpwi, vec![crf(), r(16), simm()]),
                    op(M::cmpdi, vec![is_64bit(), crf(), r(16), simm()]),
                ],
            ),
            op(M::addic, vec![r(21), r(16), simm()]),
            op(M::addic, vec![r(21), r(16), simm(), rc_always()]),
            op(M::addi, vec![r(21), r(16), simm()]),
            op(M::addis, vec![r(21), r(16), simm()]),
            ext19::bc(),
            Decoder::instr(M::sc, LINEAR | InstrClass::CALL, vec![]),
            ext19::b(),
            ext19::table(),
            op(M::rlwimi, vec![r(16), r(21), imm5(11), imm5(6), imm5(1), rc()]),
            op(M::rlwinm, vec![r(16), r(21), imm5(11), imm5(6), imm5(1), rc()]),
            Decoder::Invalid,
            op(M::rlwnm, vec![r(16), r(21), r(11), imm5(6), imm5(1), rc()]),
            op(M::ori, vec![r(16), r(21), uimm()]),
            op(M::oris, vec![r(16), r(21), uimm()]),
            op(M::xori, vec![r(16), r(21), uimm()]),
            op(M::xoris, vec![r(16), r(21), uimm()]),
            op(M::andi, vec![r(16), r(21), uimm(), rc_always()]),
            op(M::andis, vec![r(16), r(21), uimm(), rc_always()]),
            rotate64(),
            ext31::table(),
            // 32..55: D-form loads and stores
            op(M::lwz, vec![r(21), mem(16)]),
            op(M::lwzu, vec![r(21), mem(16)]),
            op(M::lbz, vec![r(21), mem(16)]),
            op(M::lbzu, vec![r(21), mem(16)]),
            op(M::stw, vec![r(21), mem(16)]),
            op(M::stwu, vec![r(21), mem(16)]),
            op(M::stb, vec![r(21), mem(16)]),
            op(M::stbu, vec![r(21), mem(16)]),
            op(M::lhz, vec![r(21), mem(16)]),
            op(M::lhzu, vec![r(21), mem(16)]),
            op(M::lha, vec![r(21), mem(16)]),
            op(M::lhau, vec![r(21), mem(16)]),
            op(M::sth, vec![r(21), mem(16)]),
            op(M::sthu, vec![r(21), mem(16)]),
            op(M::lmw, vec![r(21), mem(16)]),
            op(M::stmw, vec![r(21), mem(16)]),
            op(M::lfs, vec![f(21), mem(16)]),
            op(M::lfsu, vec![f(21), mem(16)]),
            op(M::lfd, vec![f(21), mem(16)]),
            op(M::lfdu, vec![f(21), mem(16)]),
            op(M::stfs, vec![f(21), mem(16)]),
            op(M::stfsu, vec![f(21), mem(16)]),
            op(M::stfd, vec![f(21), mem(16)]),
            op(M::stfdu, vec![f(21), mem(16)]),
            Decoder::Invalid,
            op(M::lfdp, vec![p(21), mem_aligned()]),
            Decoder::table(
                &field(0, 2),
                vec![
                    op(M::ld, vec![is_64bit(), r(21), mem_ds(16)]),
                    op(M::ldu, vec![is_64bit(), r(21), mem_ds(16)]),
                    op(M::lwa, vec![is_64bit(), r(21), mem_ds(16)]),
                ],
            ),
            fp::opcode59(),
            Decoder::Invalid,
            op(M::stfdp, vec![p(21), mem_aligned()]),
            Decoder::table(
                &field(0, 2),
                vec![
                    op(M::std, vec![is_64bit(), r(21), mem_ds(16)]),
                    op(M::stdu, vec![is_64bit(), r(21), mem_ds(16)]),
                ],
            ),
            fp::opcode63(),
        ],
    )
}

/// Opcode 30: 64-bit rotates. MD-form keys on bits 2..4, MDS-form on bit 1.
fn rotate64() -> Dec {
    // sh and mb/me are 6-bit values whose top bit is stored apart from the rest.
    let sh = [Bitfield::new(1, 1), Bitfield::new(11, 5)];
    let mb = [Bitfield::new(5, 1), Bitfield::new(6, 5)];
    let md = |m: M| {
        op(m, vec![is_64bit(), r(16), r(21), u_fields(&sh), u_fields(&mb), rc()])
    };
    let mds = |m: M| op(m, vec![is_64bit(), r(16), r(21), r(11), u_fields(&mb), rc()]);
    Decoder::table(
        &field(2, 3),
        vec![
            md(M::rldicl),
            md(M::rldicr),
            md(M::rldic),
            md(M::rldimi),
            Decoder::table(&bit(1), vec![mds(M::rldcl), mds(M::rldcr)]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_has_one_entry_per_opcode() {
        match primary(Model::Ppc32) {
            Decoder::Table { key, entries } => {
                assert_eq!(Bitfield::total_length(&key), 6);
                assert_eq!(entries.len(), 64);
            }
            other => panic!("unexpected primary decoder {other:?}"),
        }
    }

    #[test]
    fn vmx128_groups_only_on_xenon() {
        let has_opcode5 = |model| match primary(model) {
            Decoder::Table { entries, .. } => !matches!(entries[5], Decoder::Invalid),
            _ => false,
        };
        assert!(!has_opcode5(Model::Ppc64));
        assert!(has_opcode5(Model::Xenon));
    }
}
