//! Decoding of Universal Machine instruction words.
//!
//! Every instruction is encoded in 32 bits. There are two layouts:
//!
//! - Three-register
//!     - 4-bit opcode.
//!     - 22 unused bits.
//!     - 3-bit `a`, 3-bit `b`, 3-bit `c` register selectors.
//!
//! - Load-immediate (opcode 13 only)
//!     - 4-bit opcode.
//!     - 3-bit `a` register selector.
//!     - 25-bit unsigned immediate.

use std::fmt;

use thiserror::Error;
use uvm_util::Bit;

/// A general-purpose register selector, 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

impl Reg {
    fn from_bits(bits: u32) -> Self {
        Reg(bits as u8)
    }

    /// The raw index, for use as an array index into a register file.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Raised when the top 4 bits of a word don't name one of the 14 opcodes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal instruction: opcode {0} is not defined")]
pub struct DecodeError(pub u32);

/// A fully decoded instruction, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Conditional move: if `c` is nonzero, `a` <- `b`.
    CondMove { a: Reg, b: Reg, c: Reg },
    /// `a` <- segment `b`, offset `c`.
    ArrayIndex { a: Reg, b: Reg, c: Reg },
    /// Segment `a`, offset `b` <- `c`.
    ArrayAmend { a: Reg, b: Reg, c: Reg },
    /// `a` <- `b` + `c`, mod 2^32.
    Add { a: Reg, b: Reg, c: Reg },
    /// `a` <- `b` * `c`, mod 2^32.
    Mul { a: Reg, b: Reg, c: Reg },
    /// `a` <- `b` / `c`, unsigned.
    Div { a: Reg, b: Reg, c: Reg },
    /// `a` <- !(`b` & `c`).
    NotAnd { a: Reg, b: Reg, c: Reg },
    /// Stop the dispatch loop.
    Halt,
    /// `b` <- a fresh segment of `c` words.
    Alloc { b: Reg, c: Reg },
    /// Free the segment named by `c`.
    Abandon { c: Reg },
    /// Write the low byte of `c` to the host.
    Output { c: Reg },
    /// Read a byte from the host into `c`.
    Input { c: Reg },
    /// Replace segment 0 with a copy of segment `b` (unless `b` is 0), then jump to `c`.
    LoadProgram { b: Reg, c: Reg },
    /// `a` <- `imm`, a 25-bit unsigned immediate.
    LoadConst { a: Reg, imm: u32 },
}

/// A raw instruction word, decomposed lazily into its bit fields.
#[derive(Clone, Copy)]
struct Word(u32);

impl Word {
    fn opcode(self) -> u32 {
        self.0.bit_range(28, 31)
    }

    fn a(self) -> Reg {
        Reg::from_bits(self.0.bit_range(6, 8))
    }

    fn b(self) -> Reg {
        Reg::from_bits(self.0.bit_range(3, 5))
    }

    fn c(self) -> Reg {
        Reg::from_bits(self.0.bit_range(0, 2))
    }

    fn load_a(self) -> Reg {
        Reg::from_bits(self.0.bit_range(25, 27))
    }

    fn imm(self) -> u32 {
        self.0.bit_range(0, 24)
    }
}

/// Decode a raw 32-bit instruction word into its opcode and operands.
pub fn decode(word: u32) -> Result<Op, DecodeError> {
    let w = Word(word);
    Ok(match w.opcode() {
        0 => Op::CondMove { a: w.a(), b: w.b(), c: w.c() },
        1 => Op::ArrayIndex { a: w.a(), b: w.b(), c: w.c() },
        2 => Op::ArrayAmend { a: w.a(), b: w.b(), c: w.c() },
        3 => Op::Add { a: w.a(), b: w.b(), c: w.c() },
        4 => Op::Mul { a: w.a(), b: w.b(), c: w.c() },
        5 => Op::Div { a: w.a(), b: w.b(), c: w.c() },
        6 => Op::NotAnd { a: w.a(), b: w.b(), c: w.c() },
        7 => Op::Halt,
        8 => Op::Alloc { b: w.b(), c: w.c() },
        9 => Op::Abandon { c: w.c() },
        10 => Op::Output { c: w.c() },
        11 => Op::Input { c: w.c() },
        12 => Op::LoadProgram { b: w.b(), c: w.c() },
        13 => Op::LoadConst { a: w.load_a(), imm: w.imm() },
        op => return Err(DecodeError(op)),
    })
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Op::CondMove { a, b, c } => write!(f, "cmov {a} {b} {c}"),
            Op::ArrayIndex { a, b, c } => write!(f, "aidx {a} {b} {c}"),
            Op::ArrayAmend { a, b, c } => write!(f, "aamd {a} {b} {c}"),
            Op::Add { a, b, c } => write!(f, "add {a} {b} {c}"),
            Op::Mul { a, b, c } => write!(f, "mul {a} {b} {c}"),
            Op::Div { a, b, c } => write!(f, "div {a} {b} {c}"),
            Op::NotAnd { a, b, c } => write!(f, "nand {a} {b} {c}"),
            Op::Halt => write!(f, "halt"),
            Op::Alloc { b, c } => write!(f, "alloc {b} {c}"),
            Op::Abandon { c } => write!(f, "free {c}"),
            Op::Output { c } => write!(f, "out {c}"),
            Op::Input { c } => write!(f, "in {c}"),
            Op::LoadProgram { b, c } => write!(f, "ldprog {b} {c}"),
            Op::LoadConst { a, imm } => write!(f, "ldval {a} {imm:#x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_halt() {
        assert_eq!(decode(0x7000_0000).unwrap(), Op::Halt);
    }

    #[test]
    fn decodes_load_const() {
        // A' = 0, imm = 0x41.
        assert_eq!(
            decode(0xD000_0041).unwrap(),
            Op::LoadConst { a: Reg(0), imm: 0x41 },
        );
    }

    #[test]
    fn decodes_load_const_with_nonzero_register() {
        // A' = 1, imm = 4.
        assert_eq!(
            decode(0xD200_0004).unwrap(),
            Op::LoadConst { a: Reg(1), imm: 4 },
        );
    }

    #[test]
    fn decodes_three_register_operands() {
        // Add, A=0 B=1 C=1: (3 << 28) | (0 << 6) | (1 << 3) | 1.
        assert_eq!(
            decode(0x3000_0009).unwrap(),
            Op::Add { a: Reg(0), b: Reg(1), c: Reg(1) },
        );
    }

    #[test]
    fn rejects_opcode_above_thirteen() {
        let word = 14_u32 << 28;
        assert_eq!(decode(word), Err(DecodeError(14)));

        let word = 15_u32 << 28;
        assert_eq!(decode(word), Err(DecodeError(15)));
    }

    #[test]
    fn register_index_round_trips() {
        assert_eq!(Reg(5).index(), 5);
    }
}
