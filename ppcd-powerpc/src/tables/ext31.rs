//! Opcode 31: integer X/XO-form instructions, indexed loads and stores,
//! cache and system control.

use ppcd_isa::{Bitfield, Decoder};

use super::{Dec, TRAP, bit, field, op, privileged};
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

/// XO-form arithmetic. Bit 10 (OE) is part of the key, so each entry comes
/// with its overflow-enable twin at `xo + 512`.
const ARITHMETIC: &[(u32, M, M, bool)] = &[
    (8, M::subfc, M::subfco, true),
    (10, M::addc, M::addco, true),
    (40, M::subf, M::subfo, true),
    (104, M::neg, M::nego, false),
    (136, M::subfe, M::subfeo, true),
    (138, M::adde, M::addeo, true),
    (200, M::subfze, M::subfzeo, false),
    (202, M::addze, M::addzeo, false),
    (232, M::subfme, M::subfmeo, false),
    (234, M::addme, M::addmeo, false),
    (235, M::mullw, M::mullwo, true),
    (266, M::add, M::addo, true),
    (459, M::divwu, M::divwuo, true),
    (491, M::divw, M::divwo, true),
];

/// 64-bit XO-form arithmetic, same layout as [`ARITHMETIC`].
const ARITHMETIC64: &[(u32, M, M)] = &[
    (233, M::mulld, M::mulldo),
    (457, M::divdu, M::divduo),
    (489, M::divd, M::divdo),
];

pub(super) fn table() -> Dec {
    let mut entries: Vec<(u32, Dec)> = Vec::new();

    for &(xo, plain, overflow, has_rb) in ARITHMETIC {
        let form = |m: M| {
            let mut ops = vec![r(21), r(16)];
            if has_rb {
                ops.push(r(11));
            }
            ops.push(rc());
            op(m, ops)
        };
        entries.push((xo, form(plain)));
        entries.push((xo + 512, form(overflow)));
    }
    for &(xo, plain, overflow) in ARITHMETIC64 {
        let form = |m: M| op(m, vec![is_64bit(), r(21), r(16), r(11), rc()]);
        entries.push((xo, form(plain)));
        entries.push((xo + 512, form(overflow)));
    }

    // rD, rA, rB with record bit, no OE.
    let mulh = |m: M| op(m, vec![r(21), r(16), r(11), rc()]);
    let mulh64 = |m: M| op(m, vec![is_64bit(), r(21), r(16), r(11), rc()]);
    entries.extend([
        (9, mulh64(M::mulhdu)),
        (11, mulh(M::mulhwu)),
        (73, mulh64(M::mulhd)),
        (75, mulh(M::mulhw)),
    ]);

    // Logical and shift: rA, rS, rB.
    let logic = |m: M| op(m, vec![r(16), r(21), r(11), rc()]);
    let logic64 = |m: M| op(m, vec![is_64bit(), r(16), r(21), r(11), rc()]);
    let unary = |m: M| op(m, vec![r(16), r(21), rc()]);
    entries.extend([
        (24, logic(M::slw)),
        (26, unary(M::cntlzw)),
        (27, logic64(M::sld)),
        (28, logic(M::and)),
        (58, op(M::cntlzd, vec![is_64bit(), r(16), r(21), rc()])),
        (60, logic(M::andc)),
        (124, logic(M::nor)),
        (284, logic(M::eqv)),
        (316, logic(M::xor)),
        (412, logic(M::orc)),
        (444, logic(M::or)),
        (476, logic(M::nand)),
        (536, logic(M::srw)),
        (539, logic64(M::srd)),
        (792, logic(M::sraw)),
        (794, logic64(M::srad)),
        (824, op(M::srawi, vec![r(16), r(21), imm5(11), rc()])),
        (922, unary(M::extsh)),
        (954, unary(M::extsb)),
        (986, op(M::extsw, vec![is_64bit(), r(16), r(21), rc()])),
    ]);
    // sradi is XS-form: sh[5] sits in bit 1, which the key includes.
    let sh = [Bitfield::new(1, 1), Bitfield::new(11, 5)];
    let sradi = || op(M::sradi, vec![is_64bit(), r(16), r(21), u_fields(&sh), rc()]);
    entries.extend([(826, sradi()), (827, sradi())]);

    // Compares and traps.
    entries.extend([
        (
            0,
            Decoder::table(
                &bit(21),
                vec![
                    op(M::cmpw, vec![crf(), r(16), r(11)]),
                    op(M::cmpd, vec![is_64bit(), crf(), r(16), r(11)]),
                ],
            ),
        ),
        (
            32,
            Decoder::table(
                &bit(21),
                vec![
                    op(M::cmplw, vec![crf(), r(16), r(11)]),
                    op(M::cmpld, vec![is_64bit(), crf(), r(16), r(11)]),
                ],
            ),
        ),
        (4, Decoder::instr(M::tw, TRAP, vec![imm5(21), r(16), r(11)])),
        (68, Decoder::instr(M::td, TRAP, vec![is_64bit(), imm5(21), r(16), r(11)])),
    ]);

    // Indexed loads and stores: rD/rS, rA, rB.
    let x = |m: M| op(m, vec![r(21), r(16), r(11)]);
    let x64 = |m: M| op(m, vec![is_64bit(), r(21), r(16), r(11)]);
    entries.extend([
        (20, x(M::lwarx)),
        (21, x64(M::ldx)),
        (23, x(M::lwzx)),
        (53, x64(M::ldux)),
        (55, x(M::lwzux)),
        (84, x64(M::ldarx)),
        (87, x(M::lbzx)),
        (119, x(M::lbzux)),
        (149, x64(M::stdx)),
        (150, op(M::stwcx, vec![r(21), r(16), r(11), rc_always()])),
        (151, x(M::stwx)),
        (181, x64(M::stdux)),
        (183, x(M::stwux)),
        (214, op(M::stdcx, vec![is_64bit(), r(21), r(16), r(11), rc_always()])),
        (215, x(M::stbx)),
        (247, x(M::stbux)),
        (279, x(M::lhzx)),
        (311, x(M::lhzux)),
        (341, x64(M::lwax)),
        (343, x(M::lhax)),
        (375, x(M::lhaux)),
        (407, x(M::sthx)),
        (439, x(M::sthux)),
        (534, x(M::lwbrx)),
        (662, x(M::stwbrx)),
        (790, x(M::lhbrx)),
        (918, x(M::sthbrx)),
    ]);

    // Indexed floating point loads and stores: frD/frS, rA, rB.
    let fx = |m: M| op(m, vec![f(21), r(16), r(11)]);
    entries.extend([
        (535, fx(M::lfsx)),
        (567, fx(M::lfsux)),
        (599, fx(M::lfdx)),
        (631, fx(M::lfdux)),
        (663, fx(M::stfsx)),
        (695, fx(M::stfsux)),
        (727, fx(M::stfdx)),
        (759, fx(M::stfdux)),
        (983, fx(M::stfiwx)),
    ]);

    // AltiVec indexed loads and stores: vD/vS, rA, rB.
    let vx = |m: M| op(m, vec![v(21), r(16), r(11)]);
    entries.extend([
        (6, vx(M::lvsl)),
        (7, vx(M::lvebx)),
        (38, vx(M::lvsr)),
        (39, vx(M::lvehx)),
        (71, vx(M::lvewx)),
        (103, vx(M::lvx)),
        (135, vx(M::stvebx)),
        (167, vx(M::stvehx)),
        (199, vx(M::stvewx)),
        (231, vx(M::stvx)),
        (359, vx(M::lvxl)),
        (487, vx(M::stvxl)),
    ]);

    // Cache management: rA, rB.
    let cache = |m: M| op(m, vec![r(16), r(11)]);
    entries.extend([
        (54, cache(M::dcbst)),
        (86, cache(M::dcbf)),
        (246, cache(M::dcbtst)),
        (278, cache(M::dcbt)),
        (470, privileged(M::dcbi, vec![r(16), r(11)])),
        (982, cache(M::icbi)),
        (1014, cache(M::dcbz)),
    ]);

    // Condition register, special purpose registers and system control.
    entries.extend([
        (19, op(M::mfcr, vec![r(21)])),
        (83, privileged(M::mfmsr, vec![r(21)])),
        (144, op(M::mtcrf, vec![crm(), r(21)])),
        (146, privileged(M::mtmsr, vec![r(21)])),
        (210, privileged(M::mtsr, vec![u(16, 4), r(21)])),
        (306, privileged(M::tlbie, vec![r(11)])),
        (339, op(M::mfspr, vec![r(21), spr()])),
        (371, op(M::mftb, vec![r(21), spr()])),
        (467, op(M::mtspr, vec![spr(), r(21)])),
        (512, op(M::mcrxr, vec![cr(23)])),
        (566, privileged(M::tlbsync, vec![])),
        (595, privileged(M::mfsr, vec![r(21), u(16, 4)])),
        (598, op(M::sync, vec![])),
        (854, op(M::eieio, vec![])),
    ]);

    Decoder::sparse(&field(1, 10), Decoder::Invalid, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_twins_do_not_collide() {
        // Every OE twin lands on a key no other instruction uses; the sparse
        // constructor checks this in debug builds.
        let d = table();
        match d {
            Decoder::Sparse { entries, .. } => {
                assert!(entries.contains_key(&(266 + 512)));
                assert!(entries.contains_key(&(489 + 512)));
            }
            other => panic!("unexpected decoder {other:?}"),
        }
    }
}
