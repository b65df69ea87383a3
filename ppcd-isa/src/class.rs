use bitflags::bitflags;

bitflags! {
    /// Instruction class tags attached to every decoded record.
    ///
    /// Tags combine: a conditional call is `TRANSFER | CALL | CONDITIONAL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InstrClass: u32 {
        /// Falls through to the next instruction.
        const LINEAR      = 1 << 0;
        /// Changes the program counter.
        const TRANSFER    = 1 << 1;
        /// Only takes effect when a condition holds.
        const CONDITIONAL = 1 << 2;
        /// Saves a return address.
        const CALL        = 1 << 3;
        /// Returns from a call or an interrupt.
        const RETURN      = 1 << 4;
        /// Target comes from a register.
        const INDIRECT    = 1 << 5;
        /// Requires supervisor state.
        const PRIVILEGED  = 1 << 6;
        /// The encoding is not a valid instruction.
        const INVALID     = 1 << 8;
        /// The encoding word was all zero bits.
        const ZERO        = 1 << 9;
    }
}

impl InstrClass {
    /// Whether control may continue at the next sequential instruction.
    pub fn falls_through(self) -> bool {
        self.contains(Self::LINEAR) || self.contains(Self::CONDITIONAL) || self.contains(Self::CALL)
    }

    /// Whether the class ends a basic block.
    pub fn is_terminator(self) -> bool {
        self.intersects(Self::TRANSFER | Self::INVALID)
    }
}
