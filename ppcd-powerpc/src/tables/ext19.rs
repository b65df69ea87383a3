//! Branches and the opcode 19 group (CR logic, branch to LR/CTR, `rfi`).

use ppcd_isa::{Bitfield, Decoder, InstrClass};

use super::{Dec, bit, field, op};
use crate::instruction::Mnemonic as M;
use crate::mutators::*;

const JUMP: InstrClass = InstrClass::TRANSFER;
const CALL: InstrClass = InstrClass::TRANSFER.union(InstrClass::CALL);
const COND: InstrClass = InstrClass::TRANSFER.union(InstrClass::CONDITIONAL);
const COND_CALL: InstrClass = COND.union(InstrClass::CALL);
const INTERRUPT_RETURN: InstrClass = InstrClass::TRANSFER
    .union(InstrClass::RETURN)
    .union(InstrClass::PRIVILEGED);

/// Opcode 18, `b` family. LK and AA select the variant.
pub(super) fn b() -> Dec {
    let li = Bitfield::new(2, 24);
    Decoder::table(
        &field(0, 2),
        vec![
            Decoder::instr(M::b, JUMP, vec![target(li)]),
            Decoder::instr(M::bl, CALL, vec![target(li)]),
            Decoder::instr(M::ba, JUMP, vec![target(li)]),
            Decoder::instr(M::bla, CALL, vec![target(li)]),
        ],
    )
}

/// Opcode 16, conditional branch with BO and BI operands.
pub(super) fn bc() -> Dec {
    let bd = Bitfield::new(2, 14);
    let form = |m: M, class: InstrClass| {
        Decoder::instr(m, class, vec![imm5(21), imm5(16), target(bd)])
    };
    Decoder::table(
        &field(0, 2),
        vec![
            form(M::bc, COND),
            form(M::bcl, COND_CALL),
            form(M::bca, COND),
            form(M::bcla, COND_CALL),
        ],
    )
}

/// Opcode 19, keyed by the extended opcode in bits 1..10.
pub(super) fn table() -> Dec {
    let cr_logic = |m: M| op(m, vec![imm5(21), imm5(16), imm5(11)]);
    let indirect = COND.union(InstrClass::INDIRECT);
    Decoder::sparse(
        &field(1, 10),
        Decoder::Invalid,
        vec![
            (0, op(M::mcrf, vec![cr(23), cr(18)])),
            (
                16,
                Decoder::table(
                    &bit(0),
                    vec![
                        Decoder::instr(
                            M::bclr,
                            indirect | InstrClass::RETURN,
                            vec![imm5(21), imm5(16)],
                        ),
                        Decoder::instr(
                            M::bclrl,
                            indirect | InstrClass::CALL,
                            vec![imm5(21), imm5(16)],
                        ),
                    ],
                ),
            ),
            (18, Decoder::instr(M::rfid, INTERRUPT_RETURN, vec![is_64bit()])),
            (33, cr_logic(M::crnor)),
            (50, Decoder::instr(M::rfi, INTERRUPT_RETURN, vec![])),
            (129, cr_logic(M::crandc)),
            (150, op(M::isync, vec![])),
            (193, cr_logic(M::crxor)),
            (225, cr_logic(M::crnand)),
            (257, cr_logic(M::crand)),
            (289, cr_logic(M::creqv)),
            (417, cr_logic(M::crorc)),
            (449, cr_logic(M::cror)),
            (
                528,
                Decoder::table(
                    &bit(0),
                    vec![
                        Decoder::instr(M::bcctr, indirect, vec![imm5(21), imm5(16)]),
                        Decoder::instr(
                            M::bcctrl,
                            indirect | InstrClass::CALL,
                            vec![imm5(21), imm5(16)],
                        ),
                    ],
                ),
            ),
        ],
    )
}
