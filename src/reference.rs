/*!
Reference lists: `ref { name, name, ... }`.

§4.2.8: produces an ordered [`Name`] vector, preserving declaration order
and each name's scope, exactly as `parseReferenceTest` in the original
test suite exercises it. Empty lists and trailing commas are rejected.
*/

use nom::{Err as NomErr, IResult, Parser};
use nom_supreme::tag::complete::tag;

use crate::{
    error::{ErrorKind, RawError},
    name::{parse_name, Name},
    scanner::{expect_char, get_next_token},
};

/// Parse `ref { $name1, %name2 }`.
pub fn parse_reference(input: &str) -> IResult<&str, Vec<Name>, RawError<'_>> {
    let (tail, _) = tag("ref").parse(input)?;
    let tail = get_next_token(tail);
    let (tail, ()) = expect_char(tail, '{', ErrorKind::UnbalancedBraces)?;

    let mut names = Vec::new();
    let mut cursor = get_next_token(tail);

    loop {
        let (after, name) = parse_name(cursor)
            .map_err(|_| NomErr::Failure(RawError::new(cursor, ErrorKind::MalformedLiteral)))?;
        names.push(name);
        cursor = get_next_token(after);

        match expect_char(cursor, ',', ErrorKind::UnbalancedBraces) {
            Ok((after_comma, ())) => cursor = get_next_token(after_comma),
            Err(_) => break,
        }
    }

    let (tail, ()) = expect_char(cursor, '}', ErrorKind::UnbalancedBraces)?;
    Ok((tail, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameScope;

    #[test]
    fn two_names() {
        let (tail, names) = parse_reference("ref { $name1, %name2 }").unwrap();
        assert_eq!(tail, "");
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].scope(), NameScope::Global);
        assert_eq!(names[0].identifier(), "name1");
        assert_eq!(names[1].scope(), NameScope::Local);
        assert_eq!(names[1].identifier(), "name2");
    }

    #[test]
    fn empty_list_rejected() {
        assert!(parse_reference("ref {}").is_err());
    }

    #[test]
    fn trailing_comma_rejected() {
        assert!(parse_reference("ref { $a, }").is_err());
    }

    #[test]
    fn unbalanced_braces_rejected() {
        assert!(parse_reference("ref { $a").is_err());
    }
}
