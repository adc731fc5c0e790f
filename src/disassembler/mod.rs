//! CIL instruction boundary decoding.
//!
//! The boundary-alignment step of the location mapper compares sequence point offsets with
//! the offsets at which instructions of the decompiled function actually begin. This module
//! walks a raw CIL method body and reports those offsets.
//!
//! # Main Functions
//! - [`instruction_offsets`] - Start offsets of every instruction in a method body
//! - [`decode_boundaries`] - Full boundary records (offset, size, opcode)
//! - [`decode_boundary`] - Decode one instruction at the parser's position
//!
//! # Example
//! ```rust
//! use peeker::disassembler::instruction_offsets;
//!
//! let bytecode = &[0x00, 0x2A]; // nop, ret
//! assert_eq!(instruction_offsets(bytecode)?, vec![0, 1]);
//! # Ok::<(), peeker::Error>(())
//! ```

mod decoder;

pub use decoder::{
    decode_boundaries, decode_boundary, instruction_offsets, InstructionBoundary, OperandType,
};
