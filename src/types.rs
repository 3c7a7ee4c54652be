use std::{fmt, result};

use crate::error::AssembleError;

pub type Result<T> = result::Result<T, AssembleError>;

// Instruction or data address, range-checked against the 15-bit operand field
// when encoded.
pub type Address = u32;

// A source line after trimming, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub statement: Statement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Blank,
    Comment,
    Label(String),
    Instruction(Instruction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // @<symbol-or-literal>, resolved against the symbol table in the second pass
    Address(String),

    Compute { dest: Dest, comp: Comp, jump: Jump },
}

// Computation codes, a-bit followed by c1..c6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Comp {
    Zero = 0b0101010,
    One = 0b0111111,
    MinusOne = 0b0111010,
    D = 0b0001100,
    A = 0b0110000,
    M = 0b1110000,
    NotD = 0b0001101,
    NotA = 0b0110001,
    NotM = 0b1110001,
    NegD = 0b0001111,
    NegA = 0b0110011,
    NegM = 0b1110011,
    DPlusOne = 0b0011111,
    APlusOne = 0b0110111,
    MPlusOne = 0b1110111,
    DMinusOne = 0b0001110,
    AMinusOne = 0b0110010,
    MMinusOne = 0b1110010,
    DPlusA = 0b0000010,
    DPlusM = 0b1000010,
    DMinusA = 0b0010011,
    DMinusM = 0b1010011,
    AMinusD = 0b0000111,
    MMinusD = 0b1000111,
    DAndA = 0b0000000,
    DAndM = 0b1000000,
    DOrA = 0b0010101,
    DOrM = 0b1010101,
}

// Destination bits, one per register: A, D, M (high to low).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Dest {
    Null = 0b000,
    M = 0b001,
    D = 0b010,
    MD = 0b011,
    A = 0b100,
    AM = 0b101,
    AD = 0b110,
    AMD = 0b111,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Jump {
    Null = 0b000,
    JGT = 0b001,
    JEQ = 0b010,
    JGE = 0b011,
    JLT = 0b100,
    JNE = 0b101,
    JLE = 0b110,
    JMP = 0b111,
}

impl Comp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::MinusOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::NegM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
        }
    }
}

impl Dest {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Dest::Null => "",
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        }
    }
}

impl Jump {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Jump::Null => "",
            Jump::JGT => "JGT",
            Jump::JEQ => "JEQ",
            Jump::JGE => "JGE",
            Jump::JLT => "JLT",
            Jump::JNE => "JNE",
            Jump::JLE => "JLE",
            Jump::JMP => "JMP",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Address(operand) => write!(f, "@{}", operand),
            Instruction::Compute { dest, comp, jump } => {
                if *dest != Dest::Null {
                    write!(f, "{}=", dest.mnemonic())?;
                }
                write!(f, "{}", comp.mnemonic())?;
                if *jump != Jump::Null {
                    write!(f, ";{}", jump.mnemonic())?;
                }
                Ok(())
            }
        }
    }
}
