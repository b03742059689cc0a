/*!
Identifier and quoted-string-literal recognizers.

Grounded on `kaydle-primitives::string`'s `parse_bare_identifier` and
`parse_escaped_string`, adapted to OpenDDL's stricter identifier grammar
(`[A-Za-z_][A-Za-z0-9_]*`, not KDL's near-universal bare-identifier
charset) and its smaller escape set (`\\ \" \n \t \r \xHH`, no `\u{...}`
and no raw strings — OpenDDL has neither).
*/

use memchr::memchr2;
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::success,
    Err as NomErr, IResult, Parser,
};
use nom_supreme::{multi::parse_separated_terminated, tag::complete::tag, ParserExt};

use crate::{
    error::{ErrorKind, RawError},
    scanner::{get_next_token, is_identifier_continue, is_identifier_start},
};

/// Parse a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`. Does not skip leading
/// separators; callers that need that (matching the original parser's
/// tolerance of leading whitespace, confirmed by `parseIdentifierTest`) use
/// [`parse_identifier_skipping_space`].
pub fn parse_bare_identifier(input: &str) -> IResult<&str, &str, RawError<'_>> {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => {
            let rest = chars.as_str();
            let split = rest.find(|c: char| !is_identifier_continue(c)).unwrap_or(rest.len());
            let (ident, tail) = input.split_at(c.len_utf8() + split);
            Ok((tail, ident))
        }
        _ => Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::UnexpectedCharacter,
        ))),
    }
}

/// Parse a bare identifier, first skipping leading separators and
/// comments. Matches the original parser's behavior on `" testname "`.
pub fn parse_identifier_skipping_space(input: &str) -> IResult<&str, &str, RawError<'_>> {
    parse_bare_identifier(get_next_token(input))
}

fn parse_hex_byte_escape(input: &str) -> IResult<&str, char, RawError<'_>> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit())
        .map_res(|s| u8::from_str_radix(s, 16))
        .map(|b| b as char)
        .cut()
        .preceded_by(char('x'))
        .parse(input)
}

fn parse_escape(input: &str) -> IResult<&str, char, RawError<'_>> {
    alt((
        char('\\').value('\\'),
        char('"').value('"'),
        char('n').value('\n'),
        char('t').value('\t'),
        char('r').value('\r'),
        parse_hex_byte_escape,
    ))
    .preceded_by(char('\\'))
    .parse(input)
}

enum Chunk<'i> {
    Verbatim(&'i str),
    Escaped(char),
}

fn parse_unescaped_chunk(input: &str) -> IResult<&str, &str, RawError<'_>> {
    match memchr2(b'"', b'\\', input.as_bytes()) {
        None => Err(NomErr::Failure(RawError::new(
            "",
            ErrorKind::UnterminatedString,
        ))),
        Some(0) => Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::UnexpectedCharacter,
        ))),
        Some(n) => Ok((&input[n..], &input[..n])),
    }
}

fn parse_chunk(input: &str) -> IResult<&str, Chunk<'_>, RawError<'_>> {
    alt((
        parse_unescaped_chunk.map(Chunk::Verbatim),
        parse_escape.map(Chunk::Escaped),
    ))
    .parse(input)
}

/// Parse a `"..."` string literal, decoding `\\ \" \n \t \r \xHH` escapes.
/// An unterminated string is a hard error.
pub fn parse_string_literal(input: &str) -> IResult<&str, String, RawError<'_>> {
    parse_separated_terminated(
        parse_chunk,
        success(()),
        char('"'),
        String::new,
        |mut s, chunk| {
            match chunk {
                Chunk::Verbatim(text) => s.push_str(text),
                Chunk::Escaped(c) => s.push(c),
            }
            s
        },
    )
    .or(char('"').map(|_| String::new()))
    .cut()
    .preceded_by(char('"'))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;

    #[test]
    fn identifier_basic() {
        let (tail, id) = parse_bare_identifier("testname").unwrap();
        assert_eq!(id, "testname");
        assert_eq!(tail, "");
    }

    #[test]
    fn identifier_skips_leading_and_trailing_space() {
        let (tail, id) = parse_identifier_skipping_space(" testname ").unwrap();
        assert_eq!(id, "testname");
        assert_eq!(tail, " ");
    }

    #[test]
    fn identifier_rejects_leading_digit() {
        assert_matches!(parse_bare_identifier("123"), Err(NomErr::Error(_)));
    }

    #[test]
    fn identifier_allows_underscore_and_digits_after_first() {
        let (tail, id) = parse_bare_identifier("a_1b2 rest").unwrap();
        assert_eq!(id, "a_1b2");
        assert_eq!(tail, " rest");
    }

    #[test]
    fn string_literal_basic() {
        let (tail, s) = parse_string_literal("\"hello\" abc").unwrap();
        assert_eq!(s, "hello");
        assert_eq!(tail, " abc");
    }

    #[test]
    fn string_literal_with_escapes() {
        let (tail, s) = parse_string_literal("\"hello\\tworld\\n\" x").unwrap();
        assert_eq!(s, "hello\tworld\n");
        assert_eq!(tail, " x");
    }

    #[test]
    fn string_literal_with_hex_escape() {
        let (_, s) = parse_string_literal("\"\\x41\\x42\"").unwrap();
        assert_eq!(s, "AB");
    }

    #[test]
    fn string_literal_unterminated_is_hard_error() {
        assert_matches!(
            parse_string_literal("\"abc"),
            Err(NomErr::Failure(_))
        );
    }

    #[test]
    fn empty_string_literal() {
        let (tail, s) = parse_string_literal("\"\" x").unwrap();
        assert_eq!(s, "");
        assert_eq!(tail, " x");
    }
}
