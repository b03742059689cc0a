/*!
Character classifiers and token/comment skipping.

These are the lowest-level recognizers in the parser: pure functions over a
`&str` cursor that never allocate and never look past the slice they're
handed. Everything above this module dispatches through `nom` combinators
built on top of these primitives, the same layering `kaydle-primitives`
uses for its own whitespace module, simplified down to the handful of
separator characters and comment forms OpenDDL actually recognizes (ASCII
space/tab/CR/LF, `//` and non-nesting `/* */`, no Unicode whitespace table,
no escaped line continuations).
*/

use nom::{branch::alt, bytes::complete::tag, Err as NomErr, IResult, Parser};

use crate::error::{ErrorKind, RawError};

/// True for ASCII uppercase letters `A..Z`.
#[inline]
pub fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// True for ASCII lowercase letters `a..z`.
#[inline]
pub fn is_lower(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// True for ASCII decimal digits `0..9`.
#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

/// True for ASCII hex digits (`0-9`, `a-f`, `A-F`).
#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// True for the four OpenDDL separator characters: space, tab, CR, LF.
#[inline]
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// True for characters that may start or continue an identifier.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    is_upper(c) || is_lower(c) || c == '_'
}

/// True for characters that may continue an identifier after its first.
#[inline]
pub fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || is_numeric(c)
}

/// Parse a single run of one or more separator characters.
pub fn parse_whitespace(input: &str) -> IResult<&str, (), RawError<'_>> {
    let tail = input.trim_start_matches(is_separator);
    if tail.len() == input.len() {
        Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::UnexpectedCharacter,
        )))
    } else {
        Ok((tail, ()))
    }
}

/// Parse a `//` line comment, up to but not including the terminating
/// newline (or end of input, if the comment is the last thing in the
/// buffer).
pub fn parse_line_comment(input: &str) -> IResult<&str, (), RawError<'_>> {
    let (input, _) = tag("//").parse(input)?;
    match input.find(['\n', '\r']) {
        Some(i) => Ok((&input[i..], ())),
        None => Ok(("", ())),
    }
}

/// Parse a `/* ... */` block comment. Block comments do not nest: the first
/// `*/` encountered closes the comment. An unterminated comment is a hard
/// error.
pub fn parse_block_comment(input: &str) -> IResult<&str, (), RawError<'_>> {
    let (rest, _) = tag("/*").parse(input)?;
    match rest.find("*/") {
        Some(i) => Ok((&rest[i + 2..], ())),
        None => Err(NomErr::Failure(RawError::new(
            rest,
            ErrorKind::UnterminatedComment,
        ))),
    }
}

/// Parse any one comment form (line or block).
pub fn parse_comment(input: &str) -> IResult<&str, (), RawError<'_>> {
    alt((parse_line_comment, parse_block_comment)).parse(input)
}

/// Advance past any run of separators and comments, interleaved in any
/// order. Returns the input unchanged (not an error) if there was nothing
/// to skip; this is the "get next significant token" operation used before
/// every recognizer in the driver.
pub fn get_next_token(mut input: &str) -> &str {
    loop {
        if let Ok((tail, ())) = parse_whitespace(input) {
            input = tail;
            continue;
        }
        if let Ok((tail, ())) = parse_comment(input) {
            input = tail;
            continue;
        }
        return input;
    }
}

/// Advance until a separator character or one of the punctuation
/// boundaries OpenDDL tokens end on (`{`, `}`, `(`, `)`, `,`, `=`). Used by
/// error recovery to re-synchronize on the next recognizable boundary.
pub fn get_next_separator(input: &str) -> &str {
    input.trim_start_matches(|c| {
        !is_separator(c) && !matches!(c, '{' | '}' | '(' | ')' | ',' | '=')
    })
}

/// Require a single punctuation character with no leading whitespace
/// skip (callers that want that call [`get_next_token`] first). Raises
/// `kind` as a hard error if the character isn't there, or
/// [`ErrorKind::UnexpectedEof`] if input ran out before the character
/// could appear at all (§7: "range ended inside a construct", distinct
/// from a wrong character actually being present).
pub fn expect_char(input: &str, c: char, kind: ErrorKind) -> IResult<&str, (), RawError<'_>> {
    match input.strip_prefix(c) {
        Some(tail) => Ok((tail, ())),
        None if input.is_empty() => Err(NomErr::Failure(RawError::new(
            input,
            ErrorKind::UnexpectedEof,
        ))),
        None => Err(NomErr::Failure(RawError::new(input, kind))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_separators() {
        assert_eq!(get_next_token("   \t\nabc"), "abc");
    }

    #[test]
    fn skips_line_comment() {
        assert_eq!(get_next_token("// hello\nabc"), "abc");
    }

    #[test]
    fn skips_block_comment() {
        assert_eq!(get_next_token("/* hello */abc"), "abc");
    }

    #[test]
    fn skips_interleaved() {
        assert_eq!(get_next_token(" /* a */ // b\n  abc"), "abc");
    }

    #[test]
    fn empty_range_returns_end() {
        assert_eq!(get_next_token(""), "");
    }

    #[test]
    fn unterminated_block_comment_is_hard_error() {
        let err = parse_block_comment("/* never closed").unwrap_err();
        match err {
            NomErr::Failure(e) => assert_eq!(e.kind, ErrorKind::UnterminatedComment),
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn next_separator_stops_at_comma() {
        assert_eq!(get_next_separator("abc, \na"), ", \na");
    }

    #[test]
    fn expect_char_on_wrong_character_uses_given_kind() {
        let err = expect_char("]", '}', ErrorKind::UnbalancedBraces).unwrap_err();
        match err {
            NomErr::Failure(e) => assert_eq!(e.kind, ErrorKind::UnbalancedBraces),
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn expect_char_on_empty_input_is_unexpected_eof() {
        let err = expect_char("", '}', ErrorKind::UnbalancedBraces).unwrap_err();
        match err {
            NomErr::Failure(e) => assert_eq!(e.kind, ErrorKind::UnexpectedEof),
            other => panic!("expected Failure, got {other:?}"),
        }
    }
}
