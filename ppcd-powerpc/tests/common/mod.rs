#![allow(dead_code)]

use std::sync::Arc;

use ppcd_isa::{Address, Collector};
use ppcd_powerpc::*;

/// Where test words pretend to live.
pub const BASE: Address = Address(0x8000_0000);

pub fn decode(model: Model, word: u32) -> PowerPcInstruction {
    PowerPcArchitecture::new(model).decode(word, BASE)
}

/// Disassembly text of a single word.
pub fn asm(model: Model, word: u32) -> String {
    decode(model, word).to_string()
}

/// An architecture whose diagnostics end up in the returned collector.
pub fn collecting(model: Model) -> (PowerPcArchitecture, Arc<Collector>) {
    let collector = Arc::new(Collector::new());
    let arch = PowerPcArchitecture::new(model).with_diagnostics(collector.clone());
    (arch, collector)
}

/// Serialize words the way they would sit in a big-endian image.
pub fn big_endian(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}
