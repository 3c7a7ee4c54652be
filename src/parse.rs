use nom::error::{ContextError, ErrorKind, ParseError};
use nom::IResult;

#[derive(Debug)]
pub struct HackNomError<I> {
    pub kind: HackNomErrorKind<I>,
    backtrace: Vec<HackNomErrorKind<I>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HackNomErrorKind<I> {
    Nom(I, ErrorKind),
    Context(I, &'static str),
    // A field of a compute instruction that is not in its mnemonic table.
    // Holds the field text and the field name ("comp", "dest" or "jump").
    Mnemonic(I, &'static str),
    DecimalValue,
}

impl<I> HackNomError<I> {
    pub fn new(kind: HackNomErrorKind<I>) -> Self {
        HackNomError {
            kind,
            backtrace: Vec::new(),
        }
    }

    pub fn backtrace(&self) -> &[HackNomErrorKind<I>] {
        &self.backtrace
    }
}

impl<I> ParseError<I> for HackNomError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> HackNomError<I> {
        HackNomError::new(HackNomErrorKind::Nom(input, kind))
    }

    fn append(input: I, kind: ErrorKind, mut other: Self) -> Self {
        other.backtrace.push(HackNomErrorKind::Nom(input, kind));
        other
    }
}

impl<I> From<HackNomError<I>> for nom::Err<HackNomError<I>> {
    fn from(err: HackNomError<I>) -> Self {
        nom::Err::Error(err)
    }
}

impl<I> ContextError<I> for HackNomError<I> {
    fn add_context(input: I, ctx: &'static str, mut other: Self) -> Self {
        other.backtrace.push(HackNomErrorKind::Context(input, ctx));
        other
    }
}

pub type NomResult<I, T> = IResult<I, T, HackNomError<I>>;

#[cfg(test)]
mod tests {
    use super::*;
    use nom::{bytes::complete::tag, error::context};

    #[test]
    fn test_context_is_recorded() {
        let err = context("parsing at sign", tag::<_, _, HackNomError<&str>>("@"))("D=M")
            .expect_err("tag should not match");
        match err {
            nom::Err::Error(e) => {
                assert_eq!(e.kind, HackNomErrorKind::Nom("D=M", ErrorKind::Tag));
                assert_eq!(
                    e.backtrace(),
                    &[HackNomErrorKind::Context("D=M", "parsing at sign")][..]
                );
            }
            _ => panic!("expected a recoverable error"),
        }
    }
}
