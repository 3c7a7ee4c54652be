use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, value},
    error::context,
    sequence::{delimited, preceded, separated_pair},
};

use crate::{error::AssembleError, parse::*, types::*};

// Classifies a single source line. Leading and trailing whitespace is not
// significant. Only full lines starting with "//" are comments; a comment
// trailing an instruction on the same line is a syntax error.
//
// assert_eq!(parse_line(1, "  (LOOP)").unwrap().statement, Statement::Label("LOOP".to_owned()));
//
pub fn parse_line(number: usize, raw: &str) -> Result<Line> {
    let text = raw.trim();

    let statement = if text.is_empty() {
        Statement::Blank
    } else if text.starts_with("//") {
        Statement::Comment
    } else if text.starts_with('(') {
        let (_, label) =
            all_consuming(parse_label)(text).map_err(|_| AssembleError::MalformedLabel {
                line: number,
                text: text.to_owned(),
            })?;
        Statement::Label(label.to_owned())
    } else if text.starts_with('@') {
        let (_, operand) =
            all_consuming(parse_address)(text).map_err(|_| AssembleError::MalformedAddress {
                line: number,
                text: text.to_owned(),
            })?;
        Statement::Instruction(Instruction::Address(operand.to_owned()))
    } else {
        let (_, instr) = parse_compute(text).map_err(|e| compute_error(number, text, e))?;
        Statement::Instruction(instr)
    };

    Ok(Line { number, statement })
}

fn compute_error(line: usize, text: &str, err: nom::Err<HackNomError<&str>>) -> AssembleError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.kind {
            HackNomErrorKind::Mnemonic(mnemonic, field) => AssembleError::UnknownMnemonic {
                line,
                field,
                mnemonic: mnemonic.to_owned(),
            },
            _ => AssembleError::InvalidSyntax {
                line,
                text: text.to_owned(),
            },
        },
        nom::Err::Incomplete(_) => AssembleError::InvalidSyntax {
            line,
            text: text.to_owned(),
        },
    }
}

// Parses a decimal address literal. Every character must be a digit.
//
// assert_eq!(parse_literal("16384"), Ok(("", 16384)));
//
pub fn parse_literal(input: &str) -> NomResult<&str, Address> {
    let (rest, out) = context("parsing decimal literal", all_consuming(digit1))(input)?;

    Ok((
        rest,
        out.parse::<Address>()
            .map_err(|_| HackNomError::new(HackNomErrorKind::DecimalValue))?,
    ))
}

// Parses a symbol: one or more characters that are neither whitespace nor
// reserved syntax.
fn parse_symbol(input: &str) -> NomResult<&str, &str> {
    context(
        "parsing symbol",
        take_till1(|c: char| c.is_whitespace() || "@()=;/".contains(c)),
    )(input)
}

// Parses a label declaration, i.e. (SYMBOL)
fn parse_label(input: &str) -> NomResult<&str, &str> {
    context(
        "parsing label declaration",
        delimited(char('('), parse_symbol, char(')')),
    )(input)
}

// Parses an address-load instruction, i.e. @SYMBOL or @digits. The operand is
// left unresolved.
fn parse_address(input: &str) -> NomResult<&str, &str> {
    context("parsing address instruction", preceded(char('@'), parse_symbol))(input)
}

// Parses a compute instruction. Exactly one of two forms is accepted:
//
// 1. dest=comp, with no jump
// 2. comp;jump, with no destination
//
// The grammar is matched first, and each field is then looked up in its
// mnemonic table, so that an unknown mnemonic is reported as such rather
// than as a syntax error.
//
fn parse_compute(input: &str) -> NomResult<&str, Instruction> {
    let (rest, (dest, comp, jump)) = context(
        "parsing compute instruction",
        alt((
            all_consuming(map(
                separated_pair(compute_field, char('='), compute_field),
                |(dest, comp)| (Some(dest), comp, None::<&str>),
            )),
            all_consuming(map(
                separated_pair(compute_field, char(';'), compute_field),
                |(comp, jump)| (None::<&str>, comp, Some(jump)),
            )),
        )),
    )(input)?;

    let dest = match dest {
        Some(field) => mnemonic("dest", parse_dest)(field)?.1,
        None => Dest::Null,
    };
    let comp = mnemonic("comp", parse_comp)(comp)?.1;
    let jump = match jump {
        Some(field) => mnemonic("jump", parse_jump)(field)?.1,
        None => Jump::Null,
    };

    Ok((rest, Instruction::Compute { dest, comp, jump }))
}

// Matches the raw text of one compute instruction field.
fn compute_field(input: &str) -> NomResult<&str, &str> {
    take_till1(|c: char| c == '=' || c == ';' || c.is_whitespace())(input)
}

// Wraps a mnemonic table so that it must match the whole field. Any miss is
// a failure naming the field, which stops further alternatives from being
// tried.
fn mnemonic<'a, T>(
    field: &'static str,
    table: impl FnMut(&'a str) -> NomResult<&'a str, T>,
) -> impl FnMut(&'a str) -> NomResult<&'a str, T> {
    let mut parser = all_consuming(table);
    move |input: &'a str| {
        parser(input).map_err(|_| {
            nom::Err::Failure(HackNomError::new(HackNomErrorKind::Mnemonic(input, field)))
        })
    }
}

// Parses computation mnemonics into values of Comp. Longer mnemonics are tried
// first, since several share a prefix with a shorter one (e.g. "D" and "D+1").
fn parse_comp(input: &str) -> NomResult<&str, Comp> {
    context(
        "parsing computation",
        alt((
            alt((
                value(Comp::DPlusOne, tag("D+1")),
                value(Comp::APlusOne, tag("A+1")),
                value(Comp::MPlusOne, tag("M+1")),
                value(Comp::DMinusOne, tag("D-1")),
                value(Comp::AMinusOne, tag("A-1")),
                value(Comp::MMinusOne, tag("M-1")),
                value(Comp::DPlusA, tag("D+A")),
                value(Comp::DPlusM, tag("D+M")),
                value(Comp::DMinusA, tag("D-A")),
                value(Comp::DMinusM, tag("D-M")),
                value(Comp::AMinusD, tag("A-D")),
                value(Comp::MMinusD, tag("M-D")),
                value(Comp::DAndA, tag("D&A")),
                value(Comp::DAndM, tag("D&M")),
                value(Comp::DOrA, tag("D|A")),
                value(Comp::DOrM, tag("D|M")),
            )),
            alt((
                value(Comp::MinusOne, tag("-1")),
                value(Comp::NotD, tag("!D")),
                value(Comp::NotA, tag("!A")),
                value(Comp::NotM, tag("!M")),
                value(Comp::NegD, tag("-D")),
                value(Comp::NegA, tag("-A")),
                value(Comp::NegM, tag("-M")),
            )),
            alt((
                value(Comp::Zero, tag("0")),
                value(Comp::One, tag("1")),
                value(Comp::D, tag("D")),
                value(Comp::A, tag("A")),
                value(Comp::M, tag("M")),
            )),
        )),
    )(input)
}

// Parses destination mnemonics into values of Dest.
fn parse_dest(input: &str) -> NomResult<&str, Dest> {
    context(
        "parsing destination",
        alt((
            value(Dest::AMD, tag("AMD")),
            value(Dest::AM, tag("AM")),
            value(Dest::AD, tag("AD")),
            value(Dest::MD, tag("MD")),
            value(Dest::M, tag("M")),
            value(Dest::D, tag("D")),
            value(Dest::A, tag("A")),
        )),
    )(input)
}

// Parses jump mnemonics into values of Jump.
fn parse_jump(input: &str) -> NomResult<&str, Jump> {
    context(
        "parsing jump",
        alt((
            value(Jump::JGT, tag("JGT")),
            value(Jump::JEQ, tag("JEQ")),
            value(Jump::JGE, tag("JGE")),
            value(Jump::JLT, tag("JLT")),
            value(Jump::JNE, tag("JNE")),
            value(Jump::JLE, tag("JLE")),
            value(Jump::JMP, tag("JMP")),
        )),
    )(input)
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////
