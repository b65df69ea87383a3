//! Opcode 4: AltiVec. Bit 5 splits VA-form (four operands, 6-bit opcode)
//! from VX/VC-form (11-bit opcode). On Xenon the VX space also carries the
//! VMX128 load/store group, which always has bits 0..1 set.

use ppcd_isa::{Bitfield, Decoder};

use super::{Dec, bit, field, op};
use crate::arch::Model;
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

pub(super) fn opcode4(model: Model) -> Dec {
    Decoder::table(&bit(5), vec![vx(model), va()])
}

fn va() -> Dec {
    let four = |m: M| op(m, vec![v(21), v(16), v(11), v(6)]);
    let mut table: Vec<Dec> = (0..64).map(|_| Decoder::Invalid).collect();
    for (xo, d) in [
        (32, four(M::vmhaddshs)),
        (33, four(M::vmhraddshs)),
        (34, four(M::vmladduhm)),
        (36, four(M::vmsumubm)),
        (37, four(M::vmsummbm)),
        (38, four(M::vmsumuhm)),
        (39, four(M::vmsumuhs)),
        (40, four(M::vmsumshm)),
        (41, four(M::vmsumshs)),
        (42, four(M::vsel)),
        (43, four(M::vperm)),
        (44, op(M::vsldoi, vec![v(21), v(16), v(11), u(6, 4)])),
        (46, op(M::vmaddfp, vec![v(21), v(16), v(6), v(11)])),
        (47, op(M::vnmsubfp, vec![v(21), v(16), v(6), v(11)])),
    ] {
        table[xo] = d;
    }
    Decoder::table(&field(0, 6), table)
}

/// VX and VC forms keyed by bits 0..10.
fn vx(model: Model) -> Dec {
    let three = |m: M| op(m, vec![v(21), v(16), v(11)]);
    let unary = |m: M| op(m, vec![v(21), v(11)]);
    let with_uimm = |m: M| op(m, vec![v(21), v(11), u(16, 5)]);
    let splat_imm = |m: M| op(m, vec![v(21), s(16, 5)]);

    let mut entries: Vec<(u32, Dec)> = vec![
        (0, three(M::vaddubm)),
        (2, three(M::vmaxub)),
        (4, three(M::vrlb)),
        (8, three(M::vmuloub)),
        (10, three(M::vaddfp)),
        (12, three(M::vmrghb)),
        (14, three(M::vpkuhum)),
        (64, three(M::vadduhm)),
        (66, three(M::vmaxuh)),
        (68, three(M::vrlh)),
        (72, three(M::vmulouh)),
        (74, three(M::vsubfp)),
        (76, three(M::vmrghh)),
        (78, three(M::vpkuwum)),
        (128, three(M::vadduwm)),
        (130, three(M::vmaxuw)),
        (132, three(M::vrlw)),
        (140, three(M::vmrghw)),
        (142, three(M::vpkuhus)),
        (206, three(M::vpkuwus)),
        (258, three(M::vmaxsb)),
        (260, three(M::vslb)),
        (264, three(M::vmulosb)),
        (266, unary(M::vrefp)),
        (268, three(M::vmrglb)),
        (270, three(M::vpkshus)),
        (322, three(M::vmaxsh)),
        (324, three(M::vslh)),
        (328, three(M::vmulosh)),
        (330, unary(M::vrsqrtefp)),
        (332, three(M::vmrglh)),
        (334, three(M::vpkswus)),
        (384, three(M::vaddcuw)),
        (386, three(M::vmaxsw)),
        (388, three(M::vslw)),
        (394, unary(M::vexptefp)),
        (396, three(M::vmrglw)),
        (398, three(M::vpkshss)),
        (452, three(M::vsl)),
        (458, unary(M::vlogefp)),
        (462, three(M::vpkswss)),
        (512, three(M::vaddubs)),
        (514, three(M::vminub)),
        (516, three(M::vsrb)),
        (520, three(M::vmuleub)),
        (522, unary(M::vrfin)),
        (524, with_uimm(M::vspltb)),
        (526, unary(M::vupkhsb)),
        (576, three(M::vadduhs)),
        (578, three(M::vminuh)),
        (580, three(M::vsrh)),
        (584, three(M::vmuleuh)),
        (586, unary(M::vrfiz)),
        (588, with_uimm(M::vsplth)),
        (590, unary(M::vupkhsh)),
        (640, three(M::vadduws)),
        (642, three(M::vminuw)),
        (644, three(M::vsrw)),
        (650, unary(M::vrfip)),
        (652, with_uimm(M::vspltw)),
        (654, unary(M::vupklsb)),
        (708, three(M::vsr)),
        (714, unary(M::vrfim)),
        (718, unary(M::vupklsh)),
        (768, three(M::vaddsbs)),
        (770, three(M::vminsb)),
        (772, three(M::vsrab)),
        (776, three(M::vmulesb)),
        (778, with_uimm(M::vcfux)),
        (780, splat_imm(M::vspltisb)),
        (782, three(M::vpkpx)),
        (832, three(M::vaddshs)),
        (834, three(M::vminsh)),
        (836, three(M::vsrah)),
        (840, three(M::vmulesh)),
        (842, with_uimm(M::vcfsx)),
        (844, splat_imm(M::vspltish)),
        (846, unary(M::vupkhpx)),
        (896, three(M::vaddsws)),
        (898, three(M::vminsw)),
        (900, three(M::vsraw)),
        (906, with_uimm(M::vctuxs)),
        (908, splat_imm(M::vspltisw)),
        (970, with_uimm(M::vctsxs)),
        (974, unary(M::vupklpx)),
        (1024, three(M::vsububm)),
        (1026, three(M::vavgub)),
        (1028, three(M::vand)),
        (1034, three(M::vmaxfp)),
        (1036, three(M::vslo)),
        (1088, three(M::vsubuhm)),
        (1090, three(M::vavguh)),
        (1092, three(M::vandc)),
        (1098, three(M::vminfp)),
        (1100, three(M::vsro)),
        (1152, three(M::vsubuwm)),
        (1154, three(M::vavguw)),
        (1156, three(M::vor)),
        (1220, three(M::vxor)),
        (1282, three(M::vavgsb)),
        (1284, three(M::vnor)),
        (1346, three(M::vavgsh)),
        (1408, three(M::vsubcuw)),
        (1410, three(M::vavgsw)),
        (1536, three(M::vsububs)),
        (1540, op(M::mfvscr, vec![v(21)])),
        (1544, three(M::vsum4ubs)),
        (1600, three(M::vsubuhs)),
        (1604, op(M::mtvscr, vec![v(11)])),
        (1608, three(M::vsum4shs)),
        (1664, three(M::vsubuws)),
        (1672, three(M::vsum2sws)),
        (1792, three(M::vsubsbs)),
        (1800, three(M::vsum4sbs)),
        (1856, three(M::vsubshs)),
        (1920, three(M::vsubsws)),
        (1928, three(M::vsumsws)),
    ];

    // VC-form compares: bit 10 is the record bit, so each one also lives at
    // `xo + 1024`.
    let compare = |m: M| op(m, vec![v(21), v(16), v(11), rc10()]);
    for (xo, m) in [
        (6, M::vcmpequb),
        (70, M::vcmpequh),
        (134, M::vcmpequw),
        (198, M::vcmpeqfp),
        (454, M::vcmpgefp),
        (518, M::vcmpgtub),
        (582, M::vcmpgtuh),
        (646, M::vcmpgtuw),
        (710, M::vcmpgtfp),
        (774, M::vcmpgtsb),
        (838, M::vcmpgtsh),
        (902, M::vcmpgtsw),
        (966, M::vcmpbfp),
    ] {
        entries.push((xo, compare(m)));
        entries.push((xo + 1024, compare(m)));
    }

    if model.has_vmx128() {
        entries.extend(vx128_loads_stores());
    }

    Decoder::sparse(&field(0, 11), Decoder::Invalid, entries)
}

/// VMX128 indexed loads and stores: vD128, rA, rB. The opcode is in bits
/// 4..10; bits 2..3 belong to the vD128 register number, so each opcode
/// occupies four keys of the 11-bit VX space.
fn vx128_loads_stores() -> Vec<(u32, Dec)> {
    const OPS: [(u32, M); 16] = [
        (0, M::lvsl128),
        (4, M::lvsr128),
        (8, M::lvewx128),
        (12, M::lvx128),
        (24, M::stvewx128),
        (28, M::stvx128),
        (44, M::lvxl128),
        (60, M::stvxl128),
        (64, M::lvlx128),
        (68, M::lvrx128),
        (80, M::stvlx128),
        (84, M::stvrx128),
        (96, M::lvlxl128),
        (100, M::lvrxl128),
        (112, M::stvlxl128),
        (116, M::stvrxl128),
    ];
    let opcode = Bitfield::new(4, 7);
    let vd_high = Bitfield::new(2, 2);
    let mut entries = Vec::with_capacity(OPS.len() * 4);
    for (xo, m) in OPS {
        for high in 0..4 {
            let key = Bitfield::place_fields(&[opcode, vd_high], (xo << 2) | high) | 0b11;
            entries.push((key, op(m, vec![wd(), r(16), r(11)])));
        }
    }
    entries
}
