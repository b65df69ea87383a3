//! Floating point: opcode 59 (single precision A-form) and opcode 63
//! (double precision A-form plus X-form control instructions).

use ppcd_isa::Decoder;

use super::{Dec, bit, field, op};
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

/// frD, frA, frB
fn arith(m: M) -> Dec {
    op(m, vec![f(21), f(16), f(11), rc()])
}

/// frD, frB
fn unary(m: M) -> Dec {
    op(m, vec![f(21), f(11), rc()])
}

/// frD, frA, frC
fn mul(m: M) -> Dec {
    op(m, vec![f(21), f(16), f(6), rc()])
}

/// frD, frA, frC, frB
fn fused(m: M) -> Dec {
    op(m, vec![f(21), f(16), f(6), f(11), rc()])
}

/// A-form table keyed by bits 1..5; unlisted keys are invalid.
fn a_form(entries: Vec<(usize, Dec)>) -> Dec {
    let mut table: Vec<Dec> = (0..32).map(|_| Decoder::Invalid).collect();
    for (xo, d) in entries {
        table[xo] = d;
    }
    Decoder::table(&field(1, 5), table)
}

pub(super) fn opcode59() -> Dec {
    a_form(vec![
        (18, arith(M::fdivs)),
        (20, arith(M::fsubs)),
        (21, arith(M::fadds)),
        (22, unary(M::fsqrts)),
        (24, unary(M::fres)),
        (25, mul(M::fmuls)),
        (28, fused(M::fmsubs)),
        (29, fused(M::fmadds)),
        (30, fused(M::fnmsubs)),
        (31, fused(M::fnmadds)),
    ])
}

/// Bit 5 separates the A-form arithmetic (set) from the X-form group.
pub(super) fn opcode63() -> Dec {
    Decoder::table(&bit(5), vec![opcode63_x(), opcode63_a()])
}

fn opcode63_a() -> Dec {
    a_form(vec![
        (18, arith(M::fdiv)),
        (20, arith(M::fsub)),
        (21, arith(M::fadd)),
        (22, unary(M::fsqrt)),
        (23, fused(M::fsel)),
        (25, mul(M::fmul)),
        (26, unary(M::frsqrte)),
        (28, fused(M::fmsub)),
        (29, fused(M::fmadd)),
        (30, fused(M::fnmsub)),
        (31, fused(M::fnmadd)),
    ])
}

/// X-form, keyed by bits 1..10 with bit 5 known to be clear.
fn opcode63_x() -> Dec {
    Decoder::sparse(
        &field(1, 10),
        Decoder::Invalid,
        vec![
            (0, op(M::fcmpu, vec![cr(23), f(16), f(11)])),
            (12, unary(M::frsp)),
            (14, unary(M::fctiw)),
            (15, unary(M::fctiwz)),
            (32, op(M::fcmpo, vec![cr(23), f(16), f(11)])),
            (38, op(M::mtfsb1, vec![imm5(21), rc()])),
            (40, unary(M::fneg)),
            (64, op(M::mcrfs, vec![cr(23), cr(18)])),
            (70, op(M::mtfsb0, vec![imm5(21), rc()])),
            (72, unary(M::fmr)),
            (134, op(M::mtfsfi, vec![cr(23), u(12, 4), rc()])),
            (136, unary(M::fnabs)),
            (264, unary(M::fabs)),
            (583, op(M::mffs, vec![f(21), rc()])),
            (711, op(M::mtfsf, vec![u(17, 8), f(11), rc()])),
            (814, unary(M::fctid)),
            (815, unary(M::fctidz)),
            (846, unary(M::fcfid)),
        ],
    )
}
