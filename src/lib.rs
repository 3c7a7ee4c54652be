pub mod assemble;
pub mod constants;
pub mod error;
pub mod parse;
pub mod types;
