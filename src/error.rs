/*!
Error types for the OpenDDL parser.

Recognizers are ordinary `nom` parsers, so failures inside them travel as
[`RawError`], a borrowing error type that records the unconsumed input at the
point of failure (the standard `nom` idiom for allowing the caller to recover
the failing position without dragging a lifetime-tied span type through every
parser signature). The [driver][crate::parser] converts a `RawError` into an
owned [`ParseError`] once it knows the full source buffer, by comparing the
remaining length against the original length.
*/

use std::fmt;

use nom::error::{ErrorKind as NomErrorKind, ParseError as NomParseError};
use nom_supreme::{context::ContextError, tag::TagError};
use thiserror::Error;

/// The kind of error that occurred during parsing. Corresponds to the error
/// kinds enumerated in the language grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The input ended in the middle of a construct that required more data.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A character was encountered that isn't legal in the current state.
    #[error("unexpected character")]
    UnexpectedCharacter,

    /// A reserved primitive-type keyword was misspelled or unrecognized.
    #[error("unknown primitive type")]
    UnknownType,

    /// A literal didn't match the syntax or declared type it was expected to.
    #[error("malformed literal")]
    MalformedLiteral,

    /// A `{`/`}` pair didn't balance.
    #[error("unbalanced braces")]
    UnbalancedBraces,

    /// A `"..."` string literal was never closed.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A `/* ... */` comment was never closed.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// The same key appeared twice in one `( ... )` property list.
    #[error("duplicate property key")]
    DuplicatePropertyKey,

    /// A specific token was expected but not found.
    #[error("expected {0:?}")]
    ExpectedTag(&'static str),

    /// Catch-all for failures raised by a low-level `nom` combinator that
    /// don't map onto one of the above; kept so this type can always be
    /// constructed from `nom::error::ErrorKind`.
    #[error("parse error ({0:?})")]
    Nom(NomErrorKind),
}

/// A borrowing error used while recognizers are running. Carries the
/// remaining (unconsumed) input at the point of failure, from which the
/// driver recovers an absolute byte position once the original buffer length
/// is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawError<'i> {
    /// The input that remained when this error was raised.
    pub remaining: &'i str,

    /// What went wrong.
    pub kind: ErrorKind,

    /// Optional extra context describing what was being parsed, innermost
    /// first (pushed by `.context(...)`).
    pub context: Vec<&'static str>,
}

impl<'i> RawError<'i> {
    /// Construct a new raw error with no context.
    pub fn new(remaining: &'i str, kind: ErrorKind) -> Self {
        Self {
            remaining,
            kind,
            context: Vec::new(),
        }
    }
}

impl<'i> NomParseError<&'i str> for RawError<'i> {
    fn from_error_kind(input: &'i str, kind: NomErrorKind) -> Self {
        Self::new(input, ErrorKind::Nom(kind))
    }

    fn append(_input: &'i str, _kind: NomErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'i str, _c: char) -> Self {
        Self::new(input, ErrorKind::UnexpectedCharacter)
    }
}

impl<'i> TagError<&'i str, &'static str> for RawError<'i> {
    fn from_tag(input: &'i str, tag: &'static str) -> Self {
        Self::new(input, ErrorKind::ExpectedTag(tag))
    }
}

impl<'i> ContextError<&'i str, &'static str> for RawError<'i> {
    fn add_context(_input: &'i str, ctx: &'static str, mut other: Self) -> Self {
        other.context.push(ctx);
        other
    }
}

/// An owned, user-facing parse error: a position, a kind, and a rendered
/// message. Returned from [`Parser::parse`][crate::parser::Parser::parse].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {position}: {message}")]
pub struct ParseError {
    /// The byte offset into the original input where the error occurred.
    pub position: usize,

    /// The kind of error.
    pub kind: ErrorKind,

    /// A human-readable message, usually derived from `kind` and any
    /// recognizer context that was attached along the way.
    pub message: String,
}

impl ParseError {
    /// Build an owned [`ParseError`] from a [`RawError`] and the total
    /// length of the original input buffer.
    pub fn from_raw(source_len: usize, error: RawError<'_>) -> Self {
        let position = source_len.saturating_sub(error.remaining.len());
        let message = if error.context.is_empty() {
            error.kind.to_string()
        } else {
            format!("{} (while parsing {})", error.kind, error.context.join(" > "))
        };

        Self {
            position,
            kind: error.kind,
            message,
        }
    }

    /// Construct a [`ParseError`] directly, without going through a
    /// [`RawError`]. Used by the driver for errors it detects itself (for
    /// example unbalanced braces found during recovery).
    pub fn at(position: usize, kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            position,
            kind,
            message,
        }
    }
}
