/*!
Primitive type tags and the typed value cell that holds literals decoded
from OpenDDL source.

Per the redesign note in `spec.md` §9, this replaces the source's
"tag + raw byte buffer" `PrimData` with a tagged sum whose variants carry
their natively sized payload directly; `size` becomes a derived quantity
and the C `next` linked list becomes an ordinary `Vec` (used both for
comma-separated data lists and for the fixed-width element groups of an
array declaration like `float[3]`).
*/

use crate::name::Name;

/// The primitive type tags recognized by the grammar's type keywords.
///
/// There is no `None` tag here, unlike the source's `PrimitiveType`: the
/// absence of a declared type is represented by `Option<PrimitiveType>`
/// at each call site instead of a sentinel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `bool`
    Bool,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `unsigned_int8`
    UInt8,
    /// `unsigned_int16`
    UInt16,
    /// `unsigned_int32`
    UInt32,
    /// `unsigned_int64`
    UInt64,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `string`
    String,
    /// `ref`
    Ref,
    /// `type`
    Type,
}

impl PrimitiveType {
    /// All reserved type keywords, longest spellings first so a caller
    /// doing manual prefix matching doesn't stop early; `parse_primitive_type`
    /// in `parser.rs` instead matches a whole identifier span, so ordering
    /// here only matters for documentation purposes.
    pub const KEYWORDS: &'static [&'static str] = &[
        "bool",
        "int8",
        "int16",
        "int32",
        "int64",
        "unsigned_int8",
        "unsigned_int16",
        "unsigned_int32",
        "unsigned_int64",
        "float",
        "double",
        "string",
        "ref",
        "type",
    ];

    /// Resolve a reserved type keyword spelling to its tag. Returns `None`
    /// for any other identifier (a user type name, or a misspelling).
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "unsigned_int8" => Self::UInt8,
            "unsigned_int16" => Self::UInt16,
            "unsigned_int32" => Self::UInt32,
            "unsigned_int64" => Self::UInt64,
            "float" => Self::Float,
            "double" => Self::Double,
            "string" => Self::String,
            "ref" => Self::Ref,
            "type" => Self::Type,
            _ => return None,
        })
    }

    /// The fixed byte width of a scalar value of this type. `None` for the
    /// variable-width types (`String`, `Ref`, `Type`).
    pub fn byte_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double => Some(8),
            Self::String | Self::Ref | Self::Type => None,
        }
    }

    /// True for the eight signed/unsigned integer tags.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// True for `Float`/`Double`.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

/// A decoded literal value, tagged by the primitive type it was parsed as.
///
/// `Array` stands in for the source's `next`-chained fixed-size array
/// slots (`float[3]`'s `{ v, v, v }` groups): it carries the element type
/// and an owned vector of same-typed scalar values.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimData {
    /// `bool`
    Bool(bool),
    /// `int8`
    Int8(i8),
    /// `int16`
    Int16(i16),
    /// `int32`
    Int32(i32),
    /// `int64`
    Int64(i64),
    /// `unsigned_int8`
    UInt8(u8),
    /// `unsigned_int16`
    UInt16(u16),
    /// `unsigned_int32`
    UInt32(u32),
    /// `unsigned_int64`
    UInt64(u64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `string`
    String(String),
    /// `ref { name, ... }`
    Ref(Vec<Name>),
    /// a type keyword used as a value, e.g. in a property's literal
    Type(PrimitiveType),
    /// a fixed-width array element group, e.g. one `{ 1.0, 2.0, 3.0 }` of
    /// a `float[3]` declaration
    Array(PrimitiveType, Vec<PrimData>),
}

impl PrimData {
    /// This value's primitive type tag.
    pub fn kind(&self) -> PrimitiveType {
        match self {
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Int8(_) => PrimitiveType::Int8,
            Self::Int16(_) => PrimitiveType::Int16,
            Self::Int32(_) => PrimitiveType::Int32,
            Self::Int64(_) => PrimitiveType::Int64,
            Self::UInt8(_) => PrimitiveType::UInt8,
            Self::UInt16(_) => PrimitiveType::UInt16,
            Self::UInt32(_) => PrimitiveType::UInt32,
            Self::UInt64(_) => PrimitiveType::UInt64,
            Self::Float(_) => PrimitiveType::Float,
            Self::Double(_) => PrimitiveType::Double,
            Self::String(_) => PrimitiveType::String,
            Self::Ref(_) => PrimitiveType::Ref,
            Self::Type(_) => PrimitiveType::Type,
            Self::Array(elem, _) => *elem,
        }
    }

    /// The payload size in bytes, per §3: the type's fixed width for
    /// scalars, width × element count for arrays, and the stored length
    /// for the variable-width types (a reference list's size is its
    /// name count, since it has no natural byte representation here).
    pub fn size(&self) -> usize {
        match self {
            Self::String(s) => s.len(),
            Self::Ref(names) => names.len(),
            Self::Type(_) => 0,
            Self::Array(elem, items) => elem.byte_width().unwrap_or(0) * items.len(),
            other => other.kind().byte_width().unwrap_or(0),
        }
    }

    /// Get the bool payload, or `None` if this isn't a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the string payload, or `None` if this isn't a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the reference-list payload, or `None` if this isn't a `Ref`.
    pub fn as_ref_list(&self) -> Option<&[Name]> {
        match self {
            Self::Ref(v) => Some(v),
            _ => None,
        }
    }

    /// Get this value as an `i64`, widening any signed integer variant.
    /// Returns `None` for non-integer or unsigned variants.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(v as i64),
            Self::Int16(v) => Some(v as i64),
            Self::Int32(v) => Some(v as i64),
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Get this value as a `u64`, widening any unsigned integer variant.
    /// Returns `None` for non-integer or signed variants.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::UInt8(v) => Some(v as u64),
            Self::UInt16(v) => Some(v as u64),
            Self::UInt32(v) => Some(v as u64),
            Self::UInt64(v) => Some(v),
            _ => None,
        }
    }

    /// Get this value as an `f64`, widening a `Float`. Returns `None` for
    /// non-float variants.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v as f64),
            Self::Double(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_size_is_element_width_times_count() {
        let data = PrimData::Array(
            PrimitiveType::Float,
            vec![
                PrimData::Float(1.0),
                PrimData::Float(2.0),
                PrimData::Float(3.0),
            ],
        );
        assert_eq!(data.kind(), PrimitiveType::Float);
        assert_eq!(data.size(), 12);
    }

    #[test]
    fn scalar_size_matches_byte_width() {
        assert_eq!(PrimData::Int64(1).size(), 8);
        assert_eq!(PrimData::Bool(true).size(), 1);
        assert_eq!(PrimData::Double(1.0).size(), 8);
    }

    #[test]
    fn keyword_round_trip() {
        for &kw in PrimitiveType::KEYWORDS {
            let ty = PrimitiveType::from_keyword(kw).expect("keyword should resolve");
            assert!(PrimitiveType::KEYWORDS.contains(&kw));
            let _ = ty.byte_width();
        }
        assert_eq!(PrimitiveType::from_keyword("bogus"), None);
    }
}
