//! Linear CIL decoding down to instruction boundaries.
//!
//! The location mapper does not need operands or control flow, only where each
//! instruction of a method body begins. Decoding still has to understand every operand
//! form (including `switch` tables) to step from one instruction to the next.

use crate::{file::parser::Parser, Result};

/// Operand layout of a CIL instruction, as far as its encoded size is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// No operand.
    None,
    /// Fixed-size operand of the given number of bytes (immediates, tokens, branch targets).
    Fixed(u8),
    /// `switch`: a `u32` count followed by that many `u32` targets.
    Switch,
}

/// One decoded instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionBoundary {
    /// Offset of the first opcode byte within the method body.
    pub offset: u32,
    /// Encoded size in bytes, opcode and operand included.
    pub size: u32,
    /// `0xFE` for two-byte opcodes, `0` otherwise.
    pub prefix: u8,
    /// The opcode byte (second byte for `0xFE`-prefixed opcodes).
    pub opcode: u8,
}

/// Operand type of a one-byte opcode, or `None` for reserved encodings.
fn operand_type(opcode: u8) -> Option<OperandType> {
    let op = match opcode {
        // nop, break, ldarg.N, ldloc.N, stloc.N
        0x00..=0x0D => OperandType::None,
        // ldarg.s, ldarga.s, starg.s, ldloc.s, ldloca.s, stloc.s
        0x0E..=0x13 => OperandType::Fixed(1),
        // ldnull, ldc.i4.m1 .. ldc.i4.8
        0x14..=0x1E => OperandType::None,
        0x1F => OperandType::Fixed(1),
        0x20 | 0x22 => OperandType::Fixed(4),
        0x21 | 0x23 => OperandType::Fixed(8),
        0x25 | 0x26 | 0x2A => OperandType::None,
        // jmp, call, calli
        0x27..=0x29 => OperandType::Fixed(4),
        // short branches
        0x2B..=0x37 => OperandType::Fixed(1),
        // long branches
        0x38..=0x44 => OperandType::Fixed(4),
        0x45 => OperandType::Switch,
        // ldind.*, stind.*, arithmetic, conv.*
        0x46..=0x6E => OperandType::None,
        // callvirt, cpobj, ldobj, ldstr, newobj, castclass, isinst
        0x6F..=0x75 => OperandType::Fixed(4),
        0x76 | 0x7A => OperandType::None,
        0x79 => OperandType::Fixed(4),
        // ldfld .. stobj
        0x7B..=0x81 => OperandType::Fixed(4),
        // conv.ovf.*.un
        0x82..=0x8B => OperandType::None,
        0x8C | 0x8D | 0x8F => OperandType::Fixed(4),
        0x8E => OperandType::None,
        // ldelem.*, stelem.*
        0x90..=0xA2 => OperandType::None,
        // ldelem, stelem, unbox.any
        0xA3..=0xA5 => OperandType::Fixed(4),
        // conv.ovf.*
        0xB3..=0xBA => OperandType::None,
        0xC2 | 0xC6 | 0xD0 | 0xDD => OperandType::Fixed(4),
        0xC3 => OperandType::None,
        // conv.u2 .. endfinally
        0xD1..=0xDC => OperandType::None,
        0xDE => OperandType::Fixed(1),
        0xDF | 0xE0 => OperandType::None,
        _ => return None,
    };
    Some(op)
}

/// Operand type of a `0xFE`-prefixed opcode, or `None` for reserved encodings.
fn operand_type_fe(opcode: u8) -> Option<OperandType> {
    let op = match opcode {
        // arglist, ceq, cgt, cgt.un, clt, clt.un
        0x00..=0x05 => OperandType::None,
        // ldftn, ldvirtftn
        0x06 | 0x07 => OperandType::Fixed(4),
        // ldarg, ldarga, starg, ldloc, ldloca, stloc
        0x09..=0x0E => OperandType::Fixed(2),
        0x0F | 0x11 | 0x13 | 0x14 | 0x17 | 0x18 | 0x1A | 0x1D | 0x1E => OperandType::None,
        // unaligned., no.
        0x12 | 0x19 => OperandType::Fixed(1),
        // initobj, constrained., sizeof
        0x15 | 0x16 | 0x1C => OperandType::Fixed(4),
        _ => return None,
    };
    Some(op)
}

/// Decodes the instruction at the parser's current position and returns its boundary.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for reserved opcodes and [`crate::Error::OutOfBounds`]
/// if the operand is truncated.
pub fn decode_boundary(parser: &mut Parser) -> Result<InstructionBoundary> {
    let start = parser.pos();
    let first_byte = parser.read_le::<u8>()?;

    let (op_type, prefix, opcode) = match first_byte {
        0xFE => {
            let second_byte = parser.read_le::<u8>()?;
            match operand_type_fe(second_byte) {
                Some(op_type) => (op_type, 0xFE, second_byte),
                None => return Err(malformed_error!("Invalid opcode: FE {:02X}", second_byte)),
            }
        }
        _ => match operand_type(first_byte) {
            Some(op_type) => (op_type, 0, first_byte),
            None => return Err(malformed_error!("Invalid opcode: {:02X}", first_byte)),
        },
    };

    match op_type {
        OperandType::None => {}
        OperandType::Fixed(size) => parser.advance_by(usize::from(size))?,
        OperandType::Switch => {
            let case_count = parser.read_le::<u32>()? as usize;
            let table_size = case_count
                .checked_mul(4)
                .ok_or_else(|| malformed_error!("Switch table too large - {}", case_count))?;
            parser.advance_by(table_size)?;
        }
    }

    let to_u32 = |value: usize| {
        u32::try_from(value).map_err(|_| malformed_error!("Method body too large"))
    };
    Ok(InstructionBoundary {
        offset: to_u32(start)?,
        size: to_u32(parser.pos() - start)?,
        prefix,
        opcode,
    })
}

/// Decodes a whole method body linearly into instruction boundaries.
///
/// # Errors
/// Fails on the first reserved opcode or truncated operand.
pub fn decode_boundaries(code: &[u8]) -> Result<Vec<InstructionBoundary>> {
    let mut parser = Parser::new(code);
    let mut boundaries = Vec::new();

    while parser.has_more_data() {
        boundaries.push(decode_boundary(&mut parser)?);
    }

    Ok(boundaries)
}

/// Returns the start offset of every instruction in `code`, in execution-listing order.
///
/// # Errors
/// Fails on the first reserved opcode or truncated operand.
///
/// # Examples
///
/// ```rust
/// use peeker::disassembler::instruction_offsets;
///
/// // nop; ldarg.0; ldfld 0x04000001; ret
/// let code = [0x00, 0x02, 0x7B, 0x01, 0x00, 0x00, 0x04, 0x2A];
/// assert_eq!(instruction_offsets(&code)?, vec![0, 1, 2, 7]);
/// # Ok::<(), peeker::Error>(())
/// ```
pub fn instruction_offsets(code: &[u8]) -> Result<Vec<u32>> {
    Ok(decode_boundaries(code)?
        .into_iter()
        .map(|boundary| boundary.offset)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn decode_simple_body() {
        // nop; ldc.i4.s 5; stloc.0; ldloc.0; ldc.i8 1; ret
        let code = [
            0x00, 0x1F, 0x05, 0x0A, 0x06, 0x21, 1, 0, 0, 0, 0, 0, 0, 0, 0x2A,
        ];
        assert_eq!(instruction_offsets(&code).unwrap(), vec![0, 1, 3, 4, 5, 14]);
    }

    #[test]
    fn decode_two_byte_opcodes() {
        // ldarg 0x0001; ceq; constrained. 0x1B000001; callvirt 0x0A000002; ret
        let code = [
            0xFE, 0x09, 0x01, 0x00, 0xFE, 0x01, 0xFE, 0x16, 0x01, 0x00, 0x00, 0x1B, 0x6F, 0x02,
            0x00, 0x00, 0x0A, 0x2A,
        ];
        let boundaries = decode_boundaries(&code).unwrap();
        let offsets: Vec<u32> = boundaries.iter().map(|b| b.offset).collect();
        assert_eq!(offsets, vec![0, 4, 6, 12, 17]);
        assert_eq!(boundaries[0].prefix, 0xFE);
        assert_eq!(boundaries[0].opcode, 0x09);
        assert_eq!(boundaries[0].size, 4);
        assert_eq!(boundaries[4].prefix, 0);
    }

    #[test]
    fn decode_switch() {
        // ldarg.0; switch (2 targets); ret
        let code = [
            0x02, 0x45, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            0x2A,
        ];
        let boundaries = decode_boundaries(&code).unwrap();
        assert_eq!(boundaries.len(), 3);
        assert_eq!(boundaries[1].size, 13);
        assert_eq!(boundaries[2].offset, 14);
    }

    #[test]
    fn decode_reserved_opcode() {
        assert!(matches!(
            instruction_offsets(&[0x00, 0x24]),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            instruction_offsets(&[0xFE, 0x08]),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn decode_truncated_operand() {
        // call with only two token bytes
        assert!(matches!(
            instruction_offsets(&[0x28, 0x01, 0x00]),
            Err(Error::OutOfBounds)
        ));
        // switch claiming more targets than present
        assert!(matches!(
            instruction_offsets(&[0x45, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn decode_empty_body() {
        assert!(instruction_offsets(&[]).unwrap().is_empty());
    }
}
