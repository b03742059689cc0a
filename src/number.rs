/*!
Integer and floating-point literal recognizers.

Grounded on `kaydle-primitives::number`'s sign/base/digit-accumulation
machinery, but generalized from KDL's single "pick i64, u64, or f64 by
shape" model to OpenDDL's "the caller declares the exact width and
signedness up front" model: the enclosing `PrimitiveType` fixes the
target type before the literal is parsed (§4.2.5–§4.2.6), rather than the
literal's own shape picking the type. An expected type that doesn't match
the literal's family (integer vs. float) is a soft failure that leaves
the cursor unchanged, matching `parseInvalidIntegerLiteralTest` in the
original test suite.
*/

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    sequence::{pair, preceded, tuple},
    Err as NomErr, IResult, Parser,
};
use nom_supreme::{tag::complete::tag, ParserExt};

use crate::{
    error::{ErrorKind, RawError},
    primdata::{PrimData, PrimitiveType},
    scanner::{is_hex_digit, is_identifier_continue},
};

/// Parse the exact tokens `true` or `false` at a word boundary. Any other
/// spelling (including a near-miss like `fallse`) soft-fails with no
/// value produced (§4.2.4).
pub fn parse_boolean_literal(input: &str) -> IResult<&str, PrimData, RawError<'_>> {
    let (tail, value) = alt((tag("true").value(true), tag("false").value(false))).parse(input)?;

    if tail.chars().next().is_some_and(is_identifier_continue) {
        return Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        )));
    }

    Ok((tail, PrimData::Bool(value)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Positive,
    Negative,
}

fn parse_sign(input: &str) -> IResult<&str, Sign, RawError<'_>> {
    alt((
        char('+').value(Sign::Positive),
        char('-').value(Sign::Negative),
    ))
    .parse(input)
}

fn parse_optional_sign(input: &str) -> IResult<&str, Sign, RawError<'_>> {
    opt(parse_sign)
        .map(|s| s.unwrap_or(Sign::Positive))
        .parse(input)
}

fn to_i128(negative: bool, magnitude: u128) -> Option<i128> {
    let magnitude = i128::try_from(magnitude).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn build_integer(ty: PrimitiveType, negative: bool, magnitude: u128) -> Option<PrimData> {
    match ty {
        PrimitiveType::Int8 => i8::try_from(to_i128(negative, magnitude)?)
            .ok()
            .map(PrimData::Int8),
        PrimitiveType::Int16 => i16::try_from(to_i128(negative, magnitude)?)
            .ok()
            .map(PrimData::Int16),
        PrimitiveType::Int32 => i32::try_from(to_i128(negative, magnitude)?)
            .ok()
            .map(PrimData::Int32),
        PrimitiveType::Int64 => i64::try_from(to_i128(negative, magnitude)?)
            .ok()
            .map(PrimData::Int64),
        PrimitiveType::UInt8 if !negative => u8::try_from(magnitude).ok().map(PrimData::UInt8),
        PrimitiveType::UInt16 if !negative => u16::try_from(magnitude).ok().map(PrimData::UInt16),
        PrimitiveType::UInt32 if !negative => u32::try_from(magnitude).ok().map(PrimData::UInt32),
        PrimitiveType::UInt64 if !negative => u64::try_from(magnitude).ok().map(PrimData::UInt64),
        _ => None,
    }
}

fn parse_dec_magnitude(input: &str) -> IResult<&str, u128, RawError<'_>> {
    let (tail, digits) = digit1.parse(input)?;
    digits
        .parse::<u128>()
        .map(|v| (tail, v))
        .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))
}

fn parse_hex_magnitude(input: &str) -> IResult<&str, u128, RawError<'_>> {
    let (tail, digits) = take_while1(is_hex_digit)
        .preceded_by(alt((tag("0x"), tag("0X"))))
        .parse(input)?;
    u128::from_str_radix(digits, 16)
        .map(|v| (tail, v))
        .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))
}

fn parse_bin_magnitude(input: &str) -> IResult<&str, u128, RawError<'_>> {
    let (tail, digits) = take_while1(|c| c == '0' || c == '1')
        .preceded_by(alt((tag("0b"), tag("0B"))))
        .parse(input)?;
    u128::from_str_radix(digits, 2)
        .map(|v| (tail, v))
        .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))
}

fn parse_char_escape(input: &str) -> IResult<&str, char, RawError<'_>> {
    alt((
        char('\\').value('\\'),
        char('\'').value('\''),
        char('n').value('\n'),
        char('t').value('\t'),
        char('r').value('\r'),
    ))
    .preceded_by(char('\\'))
    .parse(input)
}

fn parse_char_magnitude(input: &str) -> IResult<&str, u128, RawError<'_>> {
    alt((parse_char_escape, nom::character::complete::anychar))
        .terminated(char('\''))
        .cut()
        .preceded_by(char('\''))
        .map(|c| c as u128)
        .parse(input)
}

/// Fails if `input` continues with `.` or `e`/`E`, meaning the digits just
/// parsed are actually the lead-in of a float literal rather than a whole
/// integer. Consumes nothing either way.
fn reject_float_continuation(input: &str) -> IResult<&str, (), RawError<'_>> {
    if input.starts_with(['.', 'e', 'E']) {
        Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        )))
    } else {
        Ok((input, ()))
    }
}

/// Parse the magnitude of an integer literal (any of the dec/hex/bin/char
/// forms), together with whether it carried a leading `-`. Hex, binary,
/// and char forms never carry a sign of their own.
fn parse_integer_magnitude(input: &str) -> IResult<&str, (bool, u128), RawError<'_>> {
    alt((
        parse_hex_magnitude.map(|v| (false, v)),
        parse_bin_magnitude.map(|v| (false, v)),
        parse_char_magnitude.map(|v| (false, v)),
        parse_optional_sign
            .and(parse_dec_magnitude)
            .terminated(reject_float_continuation)
            .map(|(sign, v)| (sign == Sign::Negative, v)),
    ))
    .parse(input)
}

/// Parse an integer literal with an explicit expected type. If `expected`
/// isn't one of the eight integer tags, this soft-fails, returning the
/// cursor unchanged (§4.2.5, `parseInvalidIntegerLiteralTest`). A value
/// that doesn't fit the declared width is a hard error.
pub fn parse_integer_literal(
    input: &str,
    expected: PrimitiveType,
) -> IResult<&str, PrimData, RawError<'_>> {
    if !expected.is_integer() {
        return Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        )));
    }

    let (tail, (negative, magnitude)) = parse_integer_magnitude(input)?;
    build_integer(expected, negative, magnitude)
        .map(|data| (tail, data))
        .ok_or_else(|| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))
}

/// Parse an integer literal with the default expected type, `Int32`.
pub fn parse_integer_literal_default(input: &str) -> IResult<&str, PrimData, RawError<'_>> {
    parse_integer_literal(input, PrimitiveType::Int32)
}

fn parse_decimal_float_span(input: &str) -> IResult<&str, &str, RawError<'_>> {
    recognize(tuple((
        parse_optional_sign,
        alt((
            recognize(pair(digit1, opt(preceded(char('.'), digit1)))),
            recognize(preceded(char('.'), digit1)),
        )),
        opt(preceded(alt((char('e'), char('E'))), pair(parse_optional_sign, digit1))),
    )))
    .parse(input)
}

fn parse_hex_float(input: &str) -> IResult<&str, f64, RawError<'_>> {
    let (input, _) = alt((tag("0x"), tag("0X"))).parse(input)?;
    let (input, int_part) = take_while(is_hex_digit).parse(input)?;
    let (input, frac_part) =
        opt(preceded(char('.'), take_while1(is_hex_digit))).parse(input)?;

    if int_part.is_empty() && frac_part.is_none() {
        return Err(NomErr::Failure(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        )));
    }

    let (input, exponent) = opt(preceded(
        alt((char('p'), char('P'))),
        pair(parse_optional_sign, digit1).cut(),
    ))
    .parse(input)?;

    let int_value = if int_part.is_empty() {
        0u64
    } else {
        u64::from_str_radix(int_part, 16)
            .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))?
    };

    let mut value = int_value as f64;
    if let Some(frac) = frac_part {
        let frac_value = u64::from_str_radix(frac, 16)
            .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))?;
        value += frac_value as f64 / 16f64.powi(frac.len() as i32);
    }

    let exponent = match exponent {
        Some((Sign::Negative, digits)) => -digits
            .parse::<i32>()
            .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))?,
        Some((Sign::Positive, digits)) => digits
            .parse::<i32>()
            .map_err(|_| NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral)))?,
        None => 0,
    };

    Ok((input, value * 2f64.powi(exponent)))
}

/// Parse a float literal (decimal or hex-float form) with an explicit
/// expected type. Produces `Float` unless `expected` is `Double`. If
/// `expected` is neither, this soft-fails with the cursor unchanged.
pub fn parse_float_literal(
    input: &str,
    expected: PrimitiveType,
) -> IResult<&str, PrimData, RawError<'_>> {
    if !expected.is_float() {
        return Err(NomErr::Error(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        )));
    }

    let hex_attempt = parse_hex_float(input);
    let (tail, value) = match hex_attempt {
        Ok(ok) => ok,
        Err(NomErr::Error(_)) => {
            let (tail, span) = parse_decimal_float_span(input)?;
            let value = span.parse::<f64>().map_err(|_| {
                NomErr::Failure(RawError::new(input, ErrorKind::MalformedLiteral))
            })?;
            (tail, value)
        }
        Err(err) => return Err(err),
    };

    let data = if expected == PrimitiveType::Double {
        PrimData::Double(value)
    } else {
        PrimData::Float(value as f32)
    };

    Ok((tail, data))
}

/// Parse a float literal with the default expected type, `Float`.
pub fn parse_float_literal_default(input: &str) -> IResult<&str, PrimData, RawError<'_>> {
    parse_float_literal(input, PrimitiveType::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;

    #[test]
    fn decimal_integer() {
        let (tail, data) = parse_integer_literal("1", PrimitiveType::Int32).unwrap();
        assert_eq!(data, PrimData::Int32(1));
        assert_eq!(tail, "");
    }

    #[test]
    fn non_integer_token_soft_fails() {
        assert_matches!(
            parse_integer_literal("aaa", PrimitiveType::Int32),
            Err(NomErr::Error(_))
        );
    }

    #[test]
    fn wrong_expected_type_leaves_cursor_unchanged() {
        let input = "1";
        let err = parse_integer_literal(input, PrimitiveType::Float).unwrap_err();
        match err {
            NomErr::Error(e) => assert_eq!(e.remaining, input),
            other => panic!("expected soft Error, got {other:?}"),
        }
    }

    #[test]
    fn negative_decimal() {
        let (_, data) = parse_integer_literal("-42", PrimitiveType::Int8).unwrap();
        assert_eq!(data, PrimData::Int8(-42));
    }

    #[test]
    fn hex_literal() {
        let (_, data) = parse_integer_literal("0xFF", PrimitiveType::UInt8).unwrap();
        assert_eq!(data, PrimData::UInt8(0xFF));
    }

    #[test]
    fn binary_literal() {
        let (_, data) = parse_integer_literal("0b1010", PrimitiveType::Int32).unwrap();
        assert_eq!(data, PrimData::Int32(10));
    }

    #[test]
    fn char_literal() {
        let (_, data) = parse_integer_literal("'A'", PrimitiveType::Int32).unwrap();
        assert_eq!(data, PrimData::Int32('A' as i32));
    }

    #[test]
    fn overflow_is_hard_error() {
        assert_matches!(
            parse_integer_literal("1000", PrimitiveType::Int8),
            Err(NomErr::Failure(_))
        );
    }

    #[test]
    fn unsigned_rejects_negative() {
        assert_matches!(
            parse_integer_literal("-1", PrimitiveType::UInt32),
            Err(NomErr::Failure(_))
        );
    }

    #[test]
    fn simple_float() {
        let (tail, data) = parse_float_literal("1.0", PrimitiveType::Float).unwrap();
        assert_eq!(data, PrimData::Float(1.0));
        assert_eq!(tail, "");
    }

    #[test]
    fn double_with_exponent() {
        let (_, data) = parse_float_literal("1.5e2", PrimitiveType::Double).unwrap();
        assert_eq!(data, PrimData::Double(150.0));
    }

    #[test]
    fn negative_float() {
        let (_, data) = parse_float_literal("-0.5", PrimitiveType::Float).unwrap();
        assert_eq!(data, PrimData::Float(-0.5));
    }

    #[test]
    fn hex_float() {
        let (_, data) = parse_float_literal("0x1.8p1", PrimitiveType::Double).unwrap();
        assert_eq!(data, PrimData::Double(3.0));
    }

    #[test]
    fn float_with_non_float_expected_soft_fails() {
        assert_matches!(
            parse_float_literal("1.0", PrimitiveType::Int32),
            Err(NomErr::Error(_))
        );
    }
}
