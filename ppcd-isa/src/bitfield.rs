//! Bit range extraction over 32-bit encoding words.
//!
//! Bit positions count from the least significant bit, so `Bitfield::new(26, 6)`
//! is the top six bits of a word. Several fields can be read as one value: the
//! first field supplies the most significant bits, which is how immediates
//! scattered across disjoint positions of a word are reassembled.

/// A contiguous run of `length` bits starting at bit `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitfield {
    position: u32,
    length: u32,
    mask: u32,
}

impl Bitfield {
    /// Create a field. `position + length` must not exceed 32.
    pub const fn new(position: u32, length: u32) -> Self {
        assert!(length >= 1 && position + length <= 32, "bitfield out of range");
        let mask = if length == 32 { u32::MAX } else { (1u32 << length) - 1 };
        Self {
            position,
            length,
            mask,
        }
    }

    /// Index of the least significant bit of the field.
    #[inline]
    pub const fn position(self) -> u32 {
        self.position
    }

    /// Number of bits in the field.
    #[inline]
    pub const fn length(self) -> u32 {
        self.length
    }

    /// Mask of the field's bits in place within the word.
    #[inline]
    pub const fn word_mask(self) -> u32 {
        self.mask << self.position
    }

    /// Read the field as an unsigned value.
    #[inline]
    pub const fn read(self, word: u32) -> u32 {
        (word >> self.position) & self.mask
    }

    /// Read the field and sign-extend it from its top bit.
    #[inline]
    pub const fn read_signed(self, word: u32) -> i32 {
        sign_extend(self.read(word), self.length)
    }

    /// Total width of a field list.
    pub fn total_length(fields: &[Bitfield]) -> u32 {
        fields.iter().map(|f| f.length).sum()
    }

    /// Concatenate the fields, first field most significant.
    pub fn read_fields(fields: &[Bitfield], word: u32) -> u32 {
        fields
            .iter()
            .fold(0u32, |acc, f| acc.checked_shl(f.length).unwrap_or(0) | f.read(word))
    }

    /// Concatenate the fields, then sign-extend over their combined width.
    pub fn read_signed_fields(fields: &[Bitfield], word: u32) -> i32 {
        sign_extend(Self::read_fields(fields, word), Self::total_length(fields))
    }

    /// Union of the in-word masks of all fields.
    pub fn fields_mask(fields: &[Bitfield]) -> u32 {
        fields.iter().fold(0, |acc, f| acc | f.word_mask())
    }

    /// Inverse of [`read_fields`](Self::read_fields): scatter `value` back into
    /// the positions the fields occupy. Bits of `value` beyond the combined
    /// width are dropped.
    pub fn place_fields(fields: &[Bitfield], value: u32) -> u32 {
        let mut rest = value;
        let mut word = 0;
        for f in fields.iter().rev() {
            word |= (rest & f.mask) << f.position;
            rest = rest.checked_shr(f.length).unwrap_or(0);
        }
        word
    }
}

/// Sign-extend the low `bits` bits of `value`.
#[inline]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    if bits == 0 {
        return 0;
    }
    if bits >= 32 {
        return value as i32;
    }
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}
