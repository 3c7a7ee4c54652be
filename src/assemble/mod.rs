mod encode;
mod parse;
mod symbols;

use std::{
    fs,
    io::{BufWriter, Write},
};

use tracing::{debug, trace, warn};

pub use parse::parse_line;
pub use symbols::SymbolTable;

use super::{constants::*, error::AssembleError, types::*};

pub fn run<W: Write>(input_filename: &str, output: W) -> Result<usize> {
    let raw = fs::read_to_string(input_filename)?;

    let mut writer = BufWriter::new(output);
    let count = assemble(&raw, &mut writer)?;
    writer.flush()?;

    Ok(count)
}

// Assembles source text and writes one 16-character binary line per
// instruction. Returns the number of instructions written.
pub fn assemble<W: Write>(source: &str, writer: &mut W) -> Result<usize> {
    let words = assemble_source(source)?;
    for word in &words {
        writeln!(writer, "{}", encode::to_binary(*word))?;
    }
    Ok(words.len())
}

pub fn assemble_source(source: &str) -> Result<Vec<u16>> {
    let lines = source
        .lines()
        .enumerate()
        .map(|(i, raw)| parse_line(i + 1, raw))
        .collect::<Result<Vec<_>>>()?;

    let mut symbol_table = SymbolTable::new();

    // First pass - bind labels to instruction addresses
    let counted = resolve_labels(&lines, &mut symbol_table);

    // Second pass - resolve operands and encode
    let words = encode_instructions(&lines, &mut symbol_table)?;

    if words.len() != counted {
        return Err(AssembleError::InstructionCountMismatch {
            counted,
            emitted: words.len(),
        });
    }

    debug!(
        instructions = counted,
        labels = symbol_table.labels().count(),
        variables = symbol_table.variables().count(),
        "assembled"
    );

    Ok(words)
}

// Walks the classified lines, binding each label to the address of the next
// instruction. Returns the number of instructions seen.
pub fn resolve_labels(lines: &[Line], symbol_table: &mut SymbolTable) -> usize {
    let mut address = 0;

    for line in lines {
        match &line.statement {
            Statement::Label(name) => {
                if symbol_table.resolve_predefined(name).is_some() {
                    warn!(
                        line = line.number,
                        name = name.as_str(),
                        "label shadowed by predefined symbol"
                    );
                }
                if let Some(previous) = symbol_table.define_label(name, address as Address) {
                    warn!(
                        line = line.number,
                        name = name.as_str(),
                        previous,
                        address,
                        "label redefined"
                    );
                }
                debug!(name = name.as_str(), address, "bound label");
            }
            Statement::Instruction(_) => address += 1,
            Statement::Blank | Statement::Comment => {}
        }
    }

    address
}

pub fn encode_instructions(lines: &[Line], symbol_table: &mut SymbolTable) -> Result<Vec<u16>> {
    let mut words = Vec::new();

    for line in lines {
        let instr = match &line.statement {
            Statement::Instruction(instr) => instr,
            _ => continue,
        };

        let word = match instr {
            Instruction::Address(operand) => {
                encode::encode_address(resolve_operand(operand, line.number, symbol_table)?)
            }
            Instruction::Compute { dest, comp, jump } => {
                encode::encode_compute(*dest, *comp, *jump)
            }
        };

        trace!(line = line.number, "{} => {:016b}", instr, word);
        words.push(word);
    }

    Ok(words)
}

// Resolves an address-load operand in priority order: predefined symbol,
// label, decimal literal, then variable (allocated on first use).
fn resolve_operand(operand: &str, line: usize, symbol_table: &mut SymbolTable) -> Result<u16> {
    let address = if let Some(address) = symbol_table.resolve_predefined(operand) {
        address
    } else if let Some(address) = symbol_table.label(operand) {
        address
    } else if operand.starts_with(|c: char| c.is_ascii_digit()) {
        parse::parse_literal(operand)
            .map_err(|_| AssembleError::InvalidLiteral {
                line,
                literal: operand.to_owned(),
            })?
            .1
    } else {
        symbol_table.resolve_or_allocate_variable(operand)
    };

    if address > Address::from(MAX_ADDRESS) {
        return Err(AssembleError::AddressOutOfRange {
            line,
            value: address,
        });
    }

    Ok(address as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<Line> {
        source
            .lines()
            .enumerate()
            .map(|(i, raw)| parse_line(i + 1, raw))
            .collect::<Result<Vec<_>>>()
            .expect("parse failed")
    }

    #[test]
    fn test_resolve_labels_skips_non_instructions() {
        let source = "// comment\n\n(START)\n@0\nD=A\n(LOOP)\n\n@LOOP\n0;JMP\n(END)\n";
        let mut st = SymbolTable::new();
        let counted = resolve_labels(&lines(source), &mut st);
        assert_eq!(counted, 4);
        assert_eq!(st.label("START"), Some(0));
        assert_eq!(st.label("LOOP"), Some(2));
        assert_eq!(st.label("END"), Some(4));
    }

    #[test]
    fn test_resolve_labels_later_definition_wins() {
        let source = "(X)\n@1\n(X)\n@2\n";
        let mut st = SymbolTable::new();
        resolve_labels(&lines(source), &mut st);
        assert_eq!(st.label("X"), Some(1));
    }

    #[test]
    fn test_forward_reference() {
        let words = assemble_source("@LOOP\nD=A\n(LOOP)\nM=D\n@LOOP\n").expect("assemble failed");
        assert_eq!(words[0], 2);
        assert_eq!(words[3], 2);
    }

    #[test]
    fn test_resolve_operand_priority() {
        let mut st = SymbolTable::new();
        st.define_label("R2", 40);
        st.define_label("LOOP", 7);
        assert_eq!(resolve_operand("R2", 1, &mut st).expect("resolve failed"), 2);
        assert_eq!(resolve_operand("LOOP", 1, &mut st).expect("resolve failed"), 7);
        assert_eq!(resolve_operand("123", 1, &mut st).expect("resolve failed"), 123);
        assert_eq!(resolve_operand("i", 1, &mut st).expect("resolve failed"), 16);
        assert_eq!(resolve_operand("j", 1, &mut st).expect("resolve failed"), 17);
        assert_eq!(resolve_operand("i", 1, &mut st).expect("resolve failed"), 16);
        assert_eq!(st.variable("LOOP"), None);
    }

    #[test]
    fn test_resolve_operand_out_of_range() {
        let mut st = SymbolTable::new();
        assert_eq!(resolve_operand("32767", 1, &mut st).expect("resolve failed"), 32767);
        assert!(matches!(
            resolve_operand("32768", 9, &mut st),
            Err(AssembleError::AddressOutOfRange {
                line: 9,
                value: 32768
            })
        ));
        st.define_label("FAR", 40000);
        assert!(matches!(
            resolve_operand("FAR", 2, &mut st),
            Err(AssembleError::AddressOutOfRange { line: 2, .. })
        ));
    }

    #[test]
    fn test_resolve_operand_invalid_literal() {
        let mut st = SymbolTable::new();
        assert!(matches!(
            resolve_operand("12ab", 5, &mut st),
            Err(AssembleError::InvalidLiteral { line: 5, .. })
        ));
    }

    #[test]
    fn test_word_count_matches_instruction_count() {
        let source = "// header\n@2\nD=A\n\n(L)\n@3\nD=D+A\n@0\nM=D\n";
        let words = assemble_source(source).expect("assemble failed");
        let mut st = SymbolTable::new();
        assert_eq!(words.len(), resolve_labels(&lines(source), &mut st));
        assert_eq!(words.len(), 6);
    }

    #[test]
    fn test_assemble_writes_lines() {
        let mut out = Vec::new();
        let count = assemble("@5\nD=D+1\n0;JMP\n", &mut out).expect("assemble failed");
        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(out).expect("output is not utf-8"),
            "0000000000000101\n1110011111010000\n1110101010000111\n"
        );
    }

    #[test]
    fn test_assemble_unknown_mnemonic_is_fatal() {
        let mut out = Vec::new();
        assert!(matches!(
            assemble("@1\nD=X\n", &mut out),
            Err(AssembleError::UnknownMnemonic { line: 2, .. })
        ));
        assert!(out.is_empty());
    }
}
