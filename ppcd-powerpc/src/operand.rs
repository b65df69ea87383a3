use std::fmt;

use ppcd_isa::Address;

use crate::registers::Register;

/// An immediate keeps the width and signedness it was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Immediate {
    Byte(u8),
    Int16(i16),
    Word16(u16),
    Int32(i32),
    UInt32(u32),
}

impl Immediate {
    pub fn as_i64(self) -> i64 {
        match self {
            Immediate::Byte(v) => i64::from(v),
            Immediate::Int16(v) => i64::from(v),
            Immediate::Word16(v) => i64::from(v),
            Immediate::Int32(v) => i64::from(v),
            Immediate::UInt32(v) => i64::from(v),
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Immediate::Byte(v) => write!(f, "{v}"),
            Immediate::Int16(v) => write!(f, "{v}"),
            Immediate::Int32(v) => write!(f, "{v}"),
            Immediate::Word16(v) => write!(f, "0x{v:X}"),
            Immediate::UInt32(v) => write!(f, "0x{v:X}"),
        }
    }
}

/// Size of the datum a memory operand refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessWidth {
    Word32,
}

impl AccessWidth {
    pub const fn bytes(self) -> usize {
        match self {
            AccessWidth::Word32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Immediate(Immediate),
    /// `offset(base)`.
    Memory {
        base: Register,
        offset: i16,
        width: AccessWidth,
    },
    /// Resolved branch target.
    Address(Address),
}

impl Operand {
    pub fn register(&self) -> Option<Register> {
        match *self {
            Operand::Register(r) => Some(r),
            _ => None,
        }
    }

    pub fn immediate(&self) -> Option<Immediate> {
        match *self {
            Operand::Immediate(i) => Some(i),
            _ => None,
        }
    }
}

impl From<Register> for Operand {
    fn from(r: Register) -> Self {
        Operand::Register(r)
    }
}

impl From<Immediate> for Operand {
    fn from(i: Immediate) -> Self {
        Operand::Immediate(i)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => fmt::Display::fmt(r, f),
            Operand::Immediate(i) => fmt::Display::fmt(i, f),
            Operand::Memory { base, offset, .. } => write!(f, "{offset}({base})"),
            Operand::Address(a) => write!(f, "{a:#010X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_widths_keep_sign() {
        assert_eq!(Immediate::Int16(-1).as_i64(), -1);
        assert_eq!(Immediate::Word16(0xFFFF).as_i64(), 0xFFFF);
        assert_eq!(Immediate::UInt32(0xFFFF_FFFF).as_i64(), 0xFFFF_FFFF);
    }

    #[test]
    fn operand_display() {
        let m = Operand::Memory {
            base: Register::gpr(1),
            offset: -8,
            width: AccessWidth::Word32,
        };
        assert_eq!(m.to_string(), "-8(r1)");
        assert_eq!(Operand::Immediate(Immediate::Word16(0x8000)).to_string(), "0x8000");
        assert_eq!(Operand::Address(Address(0x8000_1000)).to_string(), "0x80001000");
    }
}
