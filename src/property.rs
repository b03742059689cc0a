/*!
Property-list parsing: `(key = literal, key = literal, ...)`.

Grounded on `kaydle-primitives::property`'s `key '=' value` shape,
extended with `DuplicatePropertyKey` detection: §9 notes the source
doesn't check for repeated keys within one list, and this port elevates
that to a hard error.
*/

use nom::{branch::alt, Err as NomErr, IResult, Parser};

use crate::{
    error::{ErrorKind, RawError},
    number::{parse_boolean_literal, parse_float_literal, parse_integer_literal},
    primdata::{PrimData, PrimitiveType},
    reference::parse_reference,
    scanner::{expect_char, get_next_token},
    string::{parse_identifier_skipping_space, parse_string_literal},
};

/// One `key = value` pair from a property list.
pub type Property = (String, PrimData);

/// Parse a single literal of any kind, trying in grammar order: bool,
/// int, float, string, ref. Used where no declared type narrows the
/// choice (property values; a `ref` value inside a proplist).
pub fn parse_any_literal(input: &str) -> IResult<&str, PrimData, RawError<'_>> {
    alt((
        parse_boolean_literal,
        |i| parse_integer_literal(i, PrimitiveType::Int32),
        |i| parse_float_literal(i, PrimitiveType::Float),
        |i| parse_string_literal(i).map(|(t, s)| (t, PrimData::String(s))),
        |i| parse_reference(i).map(|(t, names)| (t, PrimData::Ref(names))),
    ))
    .parse(input)
}

/// Parse a `(key = literal, ...)` property list. An empty `()` is valid
/// and yields an empty list. Soft-fails, cursor unchanged, if `input`
/// doesn't open with `(` at all — a node's property list is optional,
/// and callers try this before falling back to the opening brace.
pub fn parse_property_list(input: &str) -> IResult<&str, Vec<Property>, RawError<'_>> {
    let tail = match input.strip_prefix('(') {
        Some(tail) => tail,
        None => {
            return Err(NomErr::Error(RawError::new(
                input,
                ErrorKind::UnexpectedCharacter,
            )))
        }
    };
    let mut cursor = get_next_token(tail);

    if let Ok((after, ())) = expect_char(cursor, ')', ErrorKind::UnbalancedBraces) {
        return Ok((after, Vec::new()));
    }

    let mut props: Vec<Property> = Vec::new();

    loop {
        let (after_key, key) = match parse_identifier_skipping_space(cursor) {
            Ok(ok) => ok,
            Err(NomErr::Error(_)) => {
                return Err(NomErr::Failure(RawError::new(
                    cursor,
                    ErrorKind::MalformedLiteral,
                )))
            }
            Err(failure) => return Err(failure),
        };
        let after_key = get_next_token(after_key);

        let (after_eq, ()) = expect_char(after_key, '=', ErrorKind::UnexpectedCharacter)?;
        let after_eq = get_next_token(after_eq);

        let (after_val, value) = match parse_any_literal(after_eq) {
            Ok(ok) => ok,
            Err(NomErr::Error(_)) => {
                return Err(NomErr::Failure(RawError::new(
                    after_eq,
                    ErrorKind::MalformedLiteral,
                )))
            }
            Err(failure) => return Err(failure),
        };

        if props.iter().any(|(existing, _)| existing == key) {
            return Err(NomErr::Failure(RawError::new(
                cursor,
                ErrorKind::DuplicatePropertyKey,
            )));
        }
        props.push((key.to_owned(), value));

        cursor = get_next_token(after_val);
        match expect_char(cursor, ',', ErrorKind::UnbalancedBraces) {
            Ok((after_comma, ())) => cursor = get_next_token(after_comma),
            Err(_) => break,
        }
    }

    let (tail, ()) = expect_char(cursor, ')', ErrorKind::UnbalancedBraces)?;
    Ok((tail, props))
}
