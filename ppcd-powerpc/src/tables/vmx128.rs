//! Xenon VMX128 groups in opcodes 5 and 6.
//!
//! Register operands use the extended `Wd`/`Wa`/`Wb` encodings, so the keys
//! below avoid bits 0..3, 5 and 10 wherever those hold register bits.

use ppcd_isa::Decoder;

use super::{Dec, bit, field, op};
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

fn three(m: M) -> Dec {
    op(m, vec![wd(), wa(), wb()])
}

fn unary(m: M) -> Dec {
    op(m, vec![wd(), wb()])
}

/// Opcode 5: permute, pack, and the VX128 arithmetic block.
pub(super) fn opcode5() -> Dec {
    let pack = Decoder::table(
        &field(6, 3),
        vec![
            three(M::vpkshss128),
            three(M::vpkshus128),
            three(M::vpkswss128),
            three(M::vpkswus128),
            three(M::vpkuhum128),
            three(M::vpkuhus128),
            three(M::vpkuwum128),
            three(M::vpkuwus128),
        ],
    );
    let permute = Decoder::table(
        &bit(9),
        vec![op(M::vperm128, vec![wd(), wa(), wb(), wc()]), pack],
    );
    let arithmetic = Decoder::table(
        &field(6, 4),
        vec![
            three(M::vaddfp128),
            three(M::vsubfp128),
            three(M::vmulfp128),
            three(M::vmaddfp128),
            three(M::vmaddcfp128),
            three(M::vnmsubfp128),
            three(M::vmsum3fp128),
            three(M::vmsum4fp128),
            three(M::vand128),
            three(M::vandc128),
            three(M::vnor128),
            three(M::vor128),
            three(M::vxor128),
            three(M::vsel128),
            three(M::vslo128),
            three(M::vsro128),
        ],
    );
    Decoder::table(&bit(4), vec![permute, arithmetic])
}

/// Opcode 6: compares, min/max, merges, shifts and conversions.
pub(super) fn opcode6() -> Dec {
    // Bit 6 is the record bit of the compares.
    let compare = |m: M| op(m, vec![wd(), wa(), wb(), rc6()]);
    let pair = |lo: M, hi: M| Decoder::table(&bit(6), vec![three(lo), three(hi)]);
    let compares = Decoder::table(
        &field(7, 3),
        vec![
            compare(M::vcmpeqfp128),
            compare(M::vcmpgefp128),
            compare(M::vcmpgtfp128),
            compare(M::vcmpbfp128),
            compare(M::vcmpequw128),
            pair(M::vmaxfp128, M::vminfp128),
            pair(M::vmrghw128, M::vmrglw128),
            Decoder::table(
                &bit(6),
                vec![unary(M::vupkhsb128), unary(M::vupklsb128)],
            ),
        ],
    );

    let mut shifts: Vec<Dec> = (0..16).map(|_| Decoder::Invalid).collect();
    shifts[1] = three(M::vrlw128);
    shifts[3] = three(M::vslw128);
    shifts[5] = three(M::vsraw128);
    shifts[7] = three(M::vsrw128);
    shifts[8] = Decoder::Nyi("vpkd3d128");
    shifts[12] = Decoder::Nyi("vrlimi128");
    let shifts = Decoder::table(&field(6, 4), shifts);

    let with_uimm = |m: M| op(m, vec![wd(), wb(), u(16, 5)]);
    let mut convert: Vec<Dec> = (0..32).map(|_| Decoder::Invalid).collect();
    convert[8] = with_uimm(M::vcfpsxws128);
    convert[9] = with_uimm(M::vcfpuxws128);
    convert[10] = with_uimm(M::vcsxwfp128);
    convert[11] = with_uimm(M::vcuxwfp128);
    convert[12] = unary(M::vrfim128);
    convert[13] = unary(M::vrfin128);
    convert[14] = unary(M::vrfip128);
    convert[15] = unary(M::vrfiz128);
    convert[24] = unary(M::vrefp128);
    convert[25] = unary(M::vrsqrtefp128);
    convert[26] = unary(M::vexptefp128);
    convert[27] = unary(M::vlogefp128);
    convert[28] = with_uimm(M::vspltw128);
    convert[29] = op(M::vspltisw128, vec![wd(), s(16, 5)]);
    convert[31] = Decoder::Nyi("vupkd3d128");
    let convert = Decoder::table(&field(6, 5), convert);

    Decoder::table(
        &bit(4),
        vec![compares, Decoder::table(&bit(5), vec![shifts, convert])],
    )
}
