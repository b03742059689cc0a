/*!
The recursive-descent driver: `Parser`, its per-node state machine, and
error recovery.

Grounded on `kaydle-primitives::node`'s recursive structural/value
dispatch, but driven imperatively rather than through nom combinators
the whole way down — the driver needs to thread a mutable `Document`
arena and an accumulating error list through recursion, which reads far
more plainly as ordinary recursive functions than as a combinator chain.
Each node still goes through the state machine described in §4.5:
`Start → GotType → GotName? → GotProps? → OpenBrace → Body → CloseBrace
→ Done`, with any unexpected token driving to `Error`.
*/

use nom::Err as NomErr;

use crate::{
    error::{ErrorKind, ParseError, RawError},
    name::parse_name,
    node::{DDLNode, Document, Identifier, NodeId, NodeRef},
    number::{parse_boolean_literal, parse_float_literal, parse_integer_literal},
    primdata::{PrimData, PrimitiveType},
    property::parse_property_list,
    reference::parse_reference,
    scanner::{expect_char, get_next_token, is_separator},
    string::{parse_bare_identifier, parse_string_literal},
};

type NodeResult<'i, T> = Result<(&'i str, T), NomErr<RawError<'i>>>;

/// Drives a single `parse()` call: owns the [`Document`] under
/// construction and the list of errors recovered from along the way.
#[derive(Debug)]
pub struct Parser {
    document: Document,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a parser with an empty document.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            errors: Vec::new(),
        }
    }

    /// Parse `buffer`, replacing any document from a previous call.
    ///
    /// On success, or on a recovered error, `Ok(())` or `Err` reflects
    /// only whether a *fatal* error occurred (one recovery couldn't
    /// resynchronize from, i.e. unbalanced braces with no enclosing
    /// `}` left to find). Recovered errors are always available via
    /// [`Parser::errors`] regardless of the return value; on a fatal
    /// error the first recorded error is also returned directly, and
    /// [`Parser::root`] exposes whatever tree was completed first.
    pub fn parse(&mut self, buffer: &str) -> Result<(), ParseError> {
        self.document = Document::new();
        self.errors.clear();

        let root = Document::root_id();
        self.parse_node_sequence(buffer, root, get_next_token(buffer), true);

        match self.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// The document's top-level root, or `None` if `parse()` hasn't run
    /// yet or the source had no top-level nodes.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.document.root()
    }

    /// Every error recorded during the most recent `parse()` call, in
    /// source order, including ones recovered from.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Parse sibling nodes, attaching each to `parent`, until `}` (a
    /// nested body) or end of input (the top-level document). A
    /// node-level error is recorded and recovered from by skipping to
    /// the next brace that balances back to this call's own depth;
    /// parsing then resumes for the next sibling.
    fn parse_node_sequence<'i>(
        &mut self,
        buffer: &'i str,
        parent: NodeId,
        mut cursor: &'i str,
        top_level: bool,
    ) -> &'i str {
        loop {
            cursor = get_next_token(cursor);

            if cursor.is_empty() {
                return cursor;
            }
            if !top_level && cursor.starts_with('}') {
                return cursor;
            }

            match self.parse_node(buffer, parent, cursor) {
                Ok((rest, ())) => cursor = rest,
                Err(err) => {
                    let raw = unwrap_nom_err(err);
                    let failing_position = raw.remaining;
                    self.errors.push(ParseError::from_raw(buffer.len(), raw));
                    match recover_to_closing_brace(failing_position) {
                        Some(rest) => cursor = rest,
                        None => return "",
                    }
                }
            }
        }
    }

    /// Parse one complete node — header through closing `}` — and
    /// attach it to `parent`.
    fn parse_node<'i>(
        &mut self,
        buffer: &'i str,
        parent: NodeId,
        input: &'i str,
    ) -> NodeResult<'i, ()> {
        let (after_ident, ident) = parse_bare_identifier(input).map_err(|err| {
            let remaining = err_remaining(err, input);
            let kind = if remaining.is_empty() {
                ErrorKind::UnexpectedEof
            } else {
                ErrorKind::UnexpectedCharacter
            };
            NomErr::Failure(RawError::new(remaining, kind))
        })?;

        let declared_type = PrimitiveType::from_keyword(ident);
        let node_id = self
            .document
            .insert(DDLNode::new(Identifier::new(ident), Some(parent)));

        let (after_array, array_width) = match declared_type {
            Some(_) => parse_array_dim(after_ident)?,
            None => (after_ident, None),
        };

        let name_cursor = get_next_token(after_array);
        let (after_name, name) = match parse_name(name_cursor) {
            Ok((rest, name)) => (rest, Some(name)),
            Err(NomErr::Error(_)) => (after_array, None),
            Err(failure) => return Err(failure),
        };
        if let Some(name) = name {
            self.document.set_name(node_id, name);
        }

        let props_cursor = get_next_token(after_name);
        let (after_props, properties) = match parse_property_list(props_cursor) {
            Ok((rest, properties)) => (rest, properties),
            Err(NomErr::Error(_)) => (after_name, Vec::new()),
            Err(failure) => return Err(failure),
        };
        if !properties.is_empty() {
            let properties = properties
                .into_iter()
                .map(|(key, value)| (Identifier::new(key), value))
                .collect();
            self.document.set_properties(node_id, properties);
        }

        let brace_cursor = get_next_token(after_props);
        let (body_cursor, ()) = expect_char(brace_cursor, '{', ErrorKind::UnbalancedBraces)?;

        let after_body = match declared_type {
            Some(ty) => {
                let (rest, values) = parse_data_list_body(body_cursor, ty, array_width)?;
                self.document.set_data_list(node_id, ty, array_width, values);
                rest
            }
            None => self.parse_node_sequence(buffer, node_id, body_cursor, false),
        };

        let after_close = get_next_token(after_body);
        let (tail, ()) = expect_char(after_close, '}', ErrorKind::UnbalancedBraces)?;

        self.document.attach(parent, node_id);
        Ok((tail, ()))
    }
}

fn unwrap_nom_err(err: NomErr<RawError<'_>>) -> RawError<'_> {
    match err {
        NomErr::Error(e) | NomErr::Failure(e) => e,
        NomErr::Incomplete(_) => unreachable!("this crate only uses complete combinators"),
    }
}

fn err_remaining<'i>(err: NomErr<RawError<'i>>, fallback: &'i str) -> &'i str {
    match err {
        NomErr::Error(e) | NomErr::Failure(e) => e.remaining,
        NomErr::Incomplete(_) => fallback,
    }
}

/// Skip forward from a failure position to the next `}` that closes at
/// this call's own nesting depth, treating nested `{ }` pairs and quoted
/// strings as opaque. Returns the input just past that brace, or `None`
/// if none is found before the end of input (an unrecoverable unbalanced
/// document).
fn recover_to_closing_brace(input: &str) -> Option<&str> {
    let mut depth = 0i32;
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                while let Some((_, sc)) = chars.next() {
                    if sc == '\\' {
                        chars.next();
                    } else if sc == '"' {
                        break;
                    }
                }
            }
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Some(&input[i + 1..]);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

/// Parse an optional `[N]` array-dimension clause immediately following a
/// primitive type keyword (no separator between the keyword and `[`). A
/// missing `]` before the next separator, or a width of zero, is a hard
/// error; a missing `[` entirely means no array dimension (`Ok` with
/// `None`).
fn parse_array_dim(input: &str) -> NodeResult<'_, Option<usize>> {
    let tail = match input.strip_prefix('[') {
        Some(tail) => tail,
        None => return Ok((input, None)),
    };

    if tail.is_empty() {
        return Err(NomErr::Failure(RawError::new(
            tail,
            ErrorKind::UnexpectedEof,
        )));
    }

    let boundary = tail.find(is_separator).unwrap_or(tail.len());
    let scope = &tail[..boundary];

    let close = scope
        .find(']')
        .ok_or_else(|| NomErr::Failure(RawError::new(tail, ErrorKind::UnbalancedBraces)))?;
    let digits = &scope[..close];

    let width: usize = digits
        .parse()
        .map_err(|_| NomErr::Failure(RawError::new(tail, ErrorKind::MalformedLiteral)))?;

    if width == 0 {
        return Err(NomErr::Failure(RawError::new(
            tail,
            ErrorKind::MalformedLiteral,
        )));
    }

    Ok((&tail[close + 1..], Some(width)))
}

/// Parse one literal already narrowed to the node's declared type.
fn parse_literal_of_type(input: &str, ty: PrimitiveType) -> NodeResult<'_, PrimData> {
    match ty {
        PrimitiveType::Bool => parse_boolean_literal(input),
        PrimitiveType::String => {
            parse_string_literal(input).map(|(rest, s)| (rest, PrimData::String(s)))
        }
        PrimitiveType::Ref => {
            parse_reference(input).map(|(rest, names)| (rest, PrimData::Ref(names)))
        }
        PrimitiveType::Type => parse_type_literal(input),
        ty if ty.is_integer() => parse_integer_literal(input, ty),
        ty if ty.is_float() => parse_float_literal(input, ty),
        _ => unreachable!("every PrimitiveType variant is handled above"),
    }
}

/// A type keyword used as a value, for a node whose declared type is
/// `type` itself (e.g. `type { bool, int32 }`). Not part of the general
/// literal grammar (§6 lists only bool/int/float/string/ref there); this
/// is `type`-typed data lists' own element form.
fn parse_type_literal(input: &str) -> NodeResult<'_, PrimData> {
    let (tail, ident) = parse_bare_identifier(input)?;
    match PrimitiveType::from_keyword(ident) {
        Some(ty) => Ok((tail, PrimData::Type(ty))),
        None => Err(NomErr::Error(RawError::new(input, ErrorKind::UnknownType))),
    }
}

/// Turn a literal recognizer's soft failure into the data-list body's
/// hard failure. A `type`-typed element that names an unrecognized
/// keyword (`parse_type_literal`) raises `ErrorKind::UnknownType`, and
/// that distinction (§7: "reserved-type keyword misspelled", separate
/// from a literal that's merely malformed) is preserved rather than
/// papered over; every other soft failure collapses to
/// `MalformedLiteral`, same as before, since a non-matching literal of
/// any other kind *is* what that error kind means here.
fn escalate_literal_error<'i>(cursor: &'i str, err: NomErr<RawError<'i>>) -> NomErr<RawError<'i>> {
    match err {
        NomErr::Error(e) if e.kind == ErrorKind::UnknownType => {
            NomErr::Failure(RawError::new(cursor, ErrorKind::UnknownType))
        }
        NomErr::Error(_) => NomErr::Failure(RawError::new(cursor, ErrorKind::MalformedLiteral)),
        failure => failure,
    }
}

/// Parse one `{ v, v, ..., v }` element group of an array-typed
/// declaration, requiring exactly `width` elements.
fn parse_array_element_group(input: &str, ty: PrimitiveType, width: usize) -> NodeResult<'_, PrimData> {
    let (tail, ()) = expect_char(input, '{', ErrorKind::UnbalancedBraces)?;
    let mut cursor = get_next_token(tail);
    let mut elements = Vec::with_capacity(width);

    for i in 0..width {
        let (after, value) =
            parse_literal_of_type(cursor, ty).map_err(|err| escalate_literal_error(cursor, err))?;
        elements.push(value);
        cursor = get_next_token(after);

        if i + 1 < width {
            let (after_comma, ()) = expect_char(cursor, ',', ErrorKind::MalformedLiteral)?;
            cursor = get_next_token(after_comma);
        }
    }

    let (tail, ()) = expect_char(cursor, '}', ErrorKind::UnbalancedBraces)?;
    Ok((tail, PrimData::Array(ty, elements)))
}

/// Parse a data-list node's body: comma-separated literals (scalar
/// declarations) or comma-separated `{ ... }` element groups (array
/// declarations), stopping at (but not consuming) the node's closing
/// `}`.
fn parse_data_list_body(
    input: &str,
    ty: PrimitiveType,
    array_width: Option<usize>,
) -> NodeResult<'_, Vec<PrimData>> {
    let mut cursor = get_next_token(input);
    let mut values = Vec::new();

    if cursor.starts_with('}') {
        return Ok((cursor, values));
    }

    loop {
        let (after_value, value) = match array_width {
            Some(width) => parse_array_element_group(cursor, ty, width)?,
            None => parse_literal_of_type(cursor, ty)
                .map_err(|err| escalate_literal_error(cursor, err))?,
        };
        values.push(value);
        cursor = get_next_token(after_value);

        match cursor.strip_prefix(',') {
            Some(rest) => cursor = get_next_token(rest),
            None => break,
        }
    }

    Ok((cursor, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameScope;

    #[test]
    fn empty_buffer_has_no_root() {
        let mut parser = Parser::new();
        assert_eq!(parser.parse(""), Ok(()));
        assert!(parser.root().is_none());
    }

    #[test]
    fn whitespace_and_comments_only_has_no_root() {
        let mut parser = Parser::new();
        assert_eq!(parser.parse("  // just a comment\n/* and a block */ "), Ok(()));
        assert!(parser.root().is_none());
    }

    #[test]
    fn simple_structural_node() {
        let mut parser = Parser::new();
        parser.parse("Metric {}").unwrap();
        let root = parser.root().unwrap();
        let metric = root.children().next().unwrap();
        assert_eq!(metric.kind().as_str(), "Metric");
        assert!(!metric.is_data_list());
        assert_eq!(metric.children().count(), 0);
    }

    #[test]
    fn scalar_data_list_node() {
        let mut parser = Parser::new();
        parser.parse("int32 { 1, 2, 3 }").unwrap();
        let root = parser.root().unwrap();
        let node = root.children().next().unwrap();
        assert!(node.is_data_list());
        assert_eq!(node.declared_type(), Some(PrimitiveType::Int32));
        assert_eq!(
            node.values().unwrap(),
            &[PrimData::Int32(1), PrimData::Int32(2), PrimData::Int32(3)]
        );
    }

    #[test]
    fn array_data_list_node() {
        let mut parser = Parser::new();
        parser.parse("float[3] { {1.0, 2.0, 3.0} }").unwrap();
        let root = parser.root().unwrap();
        let node = root.children().next().unwrap();
        assert_eq!(node.array_width(), Some(3));
        let values = node.values().unwrap();
        assert_eq!(values.len(), 1);
        match &values[0] {
            PrimData::Array(ty, elems) => {
                assert_eq!(*ty, PrimitiveType::Float);
                assert_eq!(elems.len(), 3);
            }
            other => panic!("expected array element group, got {other:?}"),
        }
    }

    #[test]
    fn zero_width_array_is_hard_error() {
        let mut parser = Parser::new();
        let err = parser.parse("float[0] { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedLiteral);
    }

    #[test]
    fn name_and_properties_are_attached() {
        let mut parser = Parser::new();
        parser
            .parse(r#"Metric $distance (key = "value") {}"#)
            .unwrap();
        let root = parser.root().unwrap();
        let node = root.children().next().unwrap();
        let name = node.name().unwrap();
        assert_eq!(name.scope(), NameScope::Global);
        assert_eq!(name.identifier(), "distance");
        assert_eq!(node.properties().len(), 1);
        assert_eq!(node.properties()[0].0.as_str(), "key");
    }

    #[test]
    fn nested_structural_nodes() {
        let mut parser = Parser::new();
        parser
            .parse("GeometryNode { Mesh { float { 1.0 } } }")
            .unwrap();
        let root = parser.root().unwrap();
        let geometry = root.children().next().unwrap();
        let mesh = geometry.children().next().unwrap();
        let values = mesh.children().next().unwrap();
        assert_eq!(values.declared_type(), Some(PrimitiveType::Float));
        assert_eq!(values.parent().unwrap().kind().as_str(), "Mesh");
    }

    #[test]
    fn unbalanced_braces_is_fatal() {
        let mut parser = Parser::new();
        let err = parser.parse("Metric ? {}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnbalancedBraces);
    }

    #[test]
    fn truncated_node_is_unexpected_eof() {
        let mut parser = Parser::new();
        let err = parser.parse("Metric { float { 1.0 }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn bare_type_keyword_with_no_body_is_unexpected_eof() {
        let mut parser = Parser::new();
        let err = parser.parse("float").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut parser = Parser::new();
        let err = parser.parse(r#"string { "unterminated }"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
    }

    #[test]
    fn malformed_node_is_recovered_and_parsing_continues() {
        let mut parser = Parser::new();
        parser
            .parse("int32 { 1, 2 } BadNode { int32 { not_a_number } } Metric {}")
            .unwrap_err();

        assert_eq!(parser.errors().len(), 1);

        let root = parser.root().unwrap();
        let kinds: Vec<_> = root.children().map(|n| n.kind().as_str().to_owned()).collect();
        assert_eq!(kinds, vec!["int32", "BadNode", "Metric"]);
    }

    #[test]
    fn unrecognized_type_keyword_in_type_data_list_is_unknown_type() {
        let mut parser = Parser::new();
        let err = parser.parse("type { bool, bogus }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
    }

    #[test]
    fn unrecognized_type_keyword_in_array_element_group_is_unknown_type() {
        let mut parser = Parser::new();
        let err = parser.parse("type[2] { { bool, bogus } }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
    }

    #[test]
    fn duplicate_property_key_is_recorded() {
        let mut parser = Parser::new();
        let err = parser.parse("Metric (a = 1, a = 2) {}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicatePropertyKey);
    }

    #[test]
    fn reference_value_in_data_list() {
        let mut parser = Parser::new();
        parser.parse("ref { ref { $a, $b } }").unwrap();
        let root = parser.root().unwrap();
        let node = root.children().next().unwrap();
        assert_eq!(node.declared_type(), Some(PrimitiveType::Ref));
        let values = node.values().unwrap();
        match &values[0] {
            PrimData::Ref(names) => assert_eq!(names.len(), 2),
            other => panic!("expected Ref, got {other:?}"),
        }
    }
}
