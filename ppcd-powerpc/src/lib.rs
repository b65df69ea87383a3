//! PowerPC instruction decoder.
//!
//! Covers the 32- and 64-bit user and supervisor instruction sets, AltiVec,
//! and the VMX128 extension of the Xbox 360 Xenon CPU. Decoding is table
//! driven: [`PowerPcArchitecture::new`] builds the dispatch tree for a
//! [`Model`] once, and any number of [`PowerPcDisassembler`]s share it.
//!
//! ```
//! use ppcd_isa::{Address, Endianness, ImageReader};
//! use ppcd_powerpc::{Mnemonic, Model, PowerPcArchitecture};
//!
//! let arch = PowerPcArchitecture::new(Model::Ppc32);
//! let code = [0x38, 0x60, 0x00, 0x2A, 0x4E, 0x80, 0x00, 0x20];
//! let reader = ImageReader::new(&code, Address(0x8000_0000), Endianness::Big);
//! let listing: Vec<String> = arch.disassembler(reader).map(|i| i.to_string()).collect();
//! assert_eq!(listing, ["addi\tr3,r0,42", "bclr\t20,0"]);
//! assert_eq!(arch.decode(0, Address(0)).mnemonic, Mnemonic::illegal);
//! ```

pub mod arch;
pub mod disassembler;
pub mod instruction;
pub mod mutators;
pub mod operand;
pub mod registers;
mod tables;

pub use arch::{DecoderStats, Model, ParseModelError, PowerPcArchitecture, WordWidth};
pub use disassembler::{DECODER_TAG, DecodeState, PowerPcDisassembler};
pub use instruction::{Mnemonic, PowerPcInstruction};
pub use operand::{AccessWidth, Immediate, Operand};
pub use registers::{POWERPC_SPRS, Register, RegisterCatalog, RegisterClass};
