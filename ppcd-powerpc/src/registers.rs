//! Register namespaces and the per-model register catalog.

use std::collections::BTreeMap;
use std::fmt;

/// Namespace a register number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterClass {
    General,
    FloatingPoint,
    Vector,
    /// A 4-bit field of the condition register.
    Condition,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register {
    class: RegisterClass,
    number: u16,
    /// Only special-purpose registers carry a name.
    name: Option<&'static str>,
}

impl Register {
    pub const fn new(class: RegisterClass, number: u16) -> Self {
        Self { class, number, name: None }
    }

    pub const fn gpr(number: u16) -> Self {
        Self::new(RegisterClass::General, number)
    }

    pub const fn fpr(number: u16) -> Self {
        Self::new(RegisterClass::FloatingPoint, number)
    }

    pub const fn vr(number: u16) -> Self {
        Self::new(RegisterClass::Vector, number)
    }

    pub const fn cr(number: u16) -> Self {
        Self::new(RegisterClass::Condition, number)
    }

    /// A special-purpose register named from the common PowerPC set.
    pub fn spr(number: u16) -> Self {
        Self {
            name: lookup(POWERPC_SPRS, number),
            ..Self::new(RegisterClass::Special, number)
        }
    }

    pub const fn named_spr(number: u16, name: &'static str) -> Self {
        Self { class: RegisterClass::Special, number, name: Some(name) }
    }

    pub const fn class(self) -> RegisterClass {
        self.class
    }

    pub const fn number(self) -> u16 {
        self.number
    }

    pub const fn name(self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            RegisterClass::General => write!(f, "r{}", self.number),
            RegisterClass::FloatingPoint => write!(f, "f{}", self.number),
            RegisterClass::Vector => write!(f, "v{}", self.number),
            RegisterClass::Condition => write!(f, "cr{}", self.number),
            RegisterClass::Special => match self.name {
                Some(name) => f.write_str(name),
                None => write!(f, "spr{}", self.number),
            },
        }
    }
}

/// Special-purpose registers every model names, sorted by number.
///
/// Time base numbers 268/269 are the read view, 284/285 the write view.
pub const POWERPC_SPRS: &[(u16, &str)] = &[
    (1, "xer"),
    (8, "lr"),
    (9, "ctr"),
    (18, "dsisr"),
    (19, "dar"),
    (22, "dec"),
    (25, "sdr1"),
    (26, "srr0"),
    (27, "srr1"),
    (256, "vrsave"),
    (268, "tbl"),
    (269, "tbu"),
    (272, "sprg0"),
    (273, "sprg1"),
    (274, "sprg2"),
    (275, "sprg3"),
    (282, "ear"),
    (284, "tblw"),
    (285, "tbuw"),
    (287, "pvr"),
    (528, "ibat0u"),
    (529, "ibat0l"),
    (530, "ibat1u"),
    (531, "ibat1l"),
    (532, "ibat2u"),
    (533, "ibat2l"),
    (534, "ibat3u"),
    (535, "ibat3l"),
    (536, "dbat0u"),
    (537, "dbat0l"),
    (538, "dbat1u"),
    (539, "dbat1l"),
    (540, "dbat2u"),
    (541, "dbat2l"),
    (542, "dbat3u"),
    (543, "dbat3l"),
    (1008, "hid0"),
    (1009, "hid1"),
    (1013, "dabr"),
    (1023, "pir"),
];

fn lookup(sprs: &[(u16, &'static str)], number: u16) -> Option<&'static str> {
    sprs.binary_search_by_key(&number, |&(n, _)| n)
        .ok()
        .map(|i| sprs[i].1)
}

/// Read-only register files of one processor model.
///
/// Lookups take the raw bits extracted from an encoding and mask them to the
/// width of the namespace, so they cannot go out of range.
#[derive(Debug, Clone)]
pub struct RegisterCatalog {
    general: [Register; 32],
    floating: [Register; 32],
    condition: [Register; 8],
    vector: Box<[Register]>,
    /// Sorted by number.
    sprs: Box<[(u16, &'static str)]>,
}

impl RegisterCatalog {
    /// `vector_count` must be a power of two (32, or 128 with VMX128).
    /// Special-purpose registers start out as [`POWERPC_SPRS`].
    pub fn new(vector_count: u16) -> Self {
        debug_assert!(vector_count.is_power_of_two());
        Self {
            general: std::array::from_fn(|i| Register::gpr(i as u16)),
            floating: std::array::from_fn(|i| Register::fpr(i as u16)),
            condition: std::array::from_fn(|i| Register::cr(i as u16)),
            vector: (0..vector_count).map(Register::vr).collect(),
            sprs: POWERPC_SPRS.into(),
        }
    }

    /// Add model-specific special-purpose registers. An entry whose number is
    /// already named replaces that name.
    pub fn with_sprs(mut self, extra: &[(u16, &'static str)]) -> Self {
        let mut merged: BTreeMap<u16, &'static str> = self.sprs.iter().copied().collect();
        merged.extend(extra.iter().copied());
        self.sprs = merged.into_iter().collect();
        self
    }

    #[inline]
    pub fn gpr(&self, bits: u32) -> Register {
        self.general[(bits & 0x1F) as usize]
    }

    #[inline]
    pub fn fpr(&self, bits: u32) -> Register {
        self.floating[(bits & 0x1F) as usize]
    }

    #[inline]
    pub fn cr(&self, bits: u32) -> Register {
        self.condition[(bits & 0x7) as usize]
    }

    #[inline]
    pub fn vr(&self, bits: u32) -> Register {
        self.vector[bits as usize & (self.vector.len() - 1)]
    }

    /// Name of a special-purpose register this catalog knows.
    pub fn spr_name(&self, number: u32) -> Option<&'static str> {
        lookup(&self.sprs, u16::try_from(number).ok()?)
    }

    /// A special-purpose register, if the number has a name.
    pub fn spr(&self, number: u32) -> Option<Register> {
        let name = self.spr_name(number)?;
        Some(Register::named_spr(number as u16, name))
    }

    pub fn vector_count(&self) -> usize {
        self.vector.len()
    }

    pub fn general_count(&self) -> usize {
        self.general.len()
    }

    pub fn floating_count(&self) -> usize {
        self.floating.len()
    }

    pub fn condition_count(&self) -> usize {
        self.condition.len()
    }

    pub fn spr_count(&self) -> usize {
        self.sprs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spr_table_is_sorted() {
        assert!(POWERPC_SPRS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn lookups_mask_to_namespace_width() {
        let cat = RegisterCatalog::new(32);
        assert_eq!(cat.gpr(0x23), Register::gpr(3));
        assert_eq!(cat.cr(0xF), Register::cr(7));
        assert_eq!(cat.vr(0x7F), Register::vr(31));

        let xenon = RegisterCatalog::new(128);
        assert_eq!(xenon.vr(0x7F), Register::vr(127));
    }

    #[test]
    fn display_names() {
        assert_eq!(Register::gpr(1).to_string(), "r1");
        assert_eq!(Register::fpr(31).to_string(), "f31");
        assert_eq!(Register::vr(100).to_string(), "v100");
        assert_eq!(Register::cr(6).to_string(), "cr6");
        assert_eq!(Register::spr(8).to_string(), "lr");
        assert_eq!(Register::spr(999).to_string(), "spr999");
    }

    #[test]
    fn unknown_spr_has_no_register() {
        let cat = RegisterCatalog::new(32);
        assert_eq!(cat.spr(9), Some(Register::spr(9)));
        assert_eq!(cat.spr(0x3FF - 1), None);
        assert_eq!(cat.spr(0x10000), None);
    }

    #[test]
    fn catalog_carries_its_own_sprs() {
        let base = RegisterCatalog::new(32);
        let extended = RegisterCatalog::new(32).with_sprs(&[(1012, "hid4"), (9, "count")]);
        assert_eq!(base.spr(1012), None);
        assert_eq!(extended.spr(1012), Some(Register::named_spr(1012, "hid4")));
        assert_eq!(extended.spr(1012).map(|r| r.to_string()).as_deref(), Some("hid4"));
        // A model entry overrides the shared name.
        assert_eq!(extended.spr_name(9), Some("count"));
        assert_eq!(base.spr_name(9), Some("ctr"));
        assert_eq!(extended.spr_count(), base.spr_count() + 1);
        assert!(extended.sprs.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
