use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("line {line}: malformed label declaration `{text}`")]
    MalformedLabel { line: usize, text: String },

    #[error("line {line}: malformed address instruction `{text}`")]
    MalformedAddress { line: usize, text: String },

    #[error("line {line}: expected `dest=comp` or `comp;jump`, found `{text}`")]
    InvalidSyntax { line: usize, text: String },

    #[error("line {line}: unknown {field} mnemonic `{mnemonic}`")]
    UnknownMnemonic {
        line: usize,
        field: &'static str,
        mnemonic: String,
    },

    #[error("line {line}: invalid numeric literal `{literal}`")]
    InvalidLiteral { line: usize, literal: String },

    #[error("line {line}: address {value} does not fit in 15 bits")]
    AddressOutOfRange { line: usize, value: u32 },

    #[error("first pass counted {counted} instructions but second pass emitted {emitted}")]
    InstructionCountMismatch { counted: usize, emitted: usize },
}
