/*!
Names: an identifier prefixed with a scope sigil, `$` (global) or `%`
(local). Grounded on `kaydle-primitives::annotation`'s
"sigil-then-identifier" shape, generalized from an optional parenthesized
annotation to OpenDDL's mandatory-sigil name.
*/

use nom::{branch::alt, character::complete::char, Err as NomErr, IResult, Parser};
use nom_supreme::ParserExt;

use crate::{
    error::{ErrorKind, RawError},
    string::parse_bare_identifier,
};

/// The scope a [`Name`] was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScope {
    /// Introduced by `$`.
    Global,
    /// Introduced by `%`.
    Local,
}

/// A sigil-prefixed name, as used for node instance names and reference
/// targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    scope: NameScope,
    identifier: String,
}

impl Name {
    /// This name's scope.
    pub fn scope(&self) -> NameScope {
        self.scope
    }

    /// The identifier following the sigil (without the sigil itself).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

fn parse_scope(input: &str) -> IResult<&str, NameScope, RawError<'_>> {
    alt((
        char('$').value(NameScope::Global),
        char('%').value(NameScope::Local),
    ))
    .parse(input)
}

/// Parse a `$identifier` or `%identifier` name. If the sigil isn't
/// present this soft-fails (cursor unchanged) since a name is always
/// optional at its call sites; once a sigil has matched, though, a name
/// is mandatory, so a missing identifier after it is a hard failure
/// (§4.2.2: "if no valid identifier follows the sigil, emits failure").
pub fn parse_name(input: &str) -> IResult<&str, Name, RawError<'_>> {
    let (tail, scope) = parse_scope(input)?;
    match parse_bare_identifier(tail) {
        Ok((tail, identifier)) => Ok((
            tail,
            Name {
                scope,
                identifier: identifier.to_owned(),
            },
        )),
        Err(NomErr::Error(_)) => Err(NomErr::Failure(RawError::new(
            input,
            ErrorKind::MalformedLiteral,
        ))),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_name() {
        let (tail, name) = parse_name("$alpha").unwrap();
        assert_eq!(name.scope(), NameScope::Global);
        assert_eq!(name.identifier(), "alpha");
        assert_eq!(tail, "");
    }

    #[test]
    fn local_name() {
        let (tail, name) = parse_name("%beta rest").unwrap();
        assert_eq!(name.scope(), NameScope::Local);
        assert_eq!(name.identifier(), "beta");
        assert_eq!(tail, " rest");
    }

    #[test]
    fn missing_sigil_soft_fails() {
        assert!(parse_name("alpha").is_err());
    }

    #[test]
    fn sigil_without_identifier_fails() {
        assert!(parse_name("$").is_err());
    }
}
