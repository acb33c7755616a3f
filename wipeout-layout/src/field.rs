//! Field descriptors
//!
//! A [`Field`] is either a (possibly anonymous) value of some [`FieldKind`]
//! or a run of skipped bytes. Every kind has a fixed byte width, so a layout's
//! width is known as soon as it is built.

use crate::layout::Layout;
use crate::value::Value;

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Most significant byte first (mesh and track files)
    #[default]
    Big,
    /// Least significant byte first (images and archive headers)
    Little,
}

/// Numeric primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl Scalar {
    /// Width in bytes
    pub const fn width(self) -> usize {
        match self {
            Scalar::I8 | Scalar::U8 => 1,
            Scalar::I16 | Scalar::U16 => 2,
            Scalar::I32 | Scalar::U32 | Scalar::F32 => 4,
            Scalar::F64 => 8,
        }
    }

    fn default_value(self) -> Value<'static> {
        match self {
            Scalar::I8 => Value::I8(0),
            Scalar::U8 => Value::U8(0),
            Scalar::I16 => Value::I16(0),
            Scalar::U16 => Value::U16(0),
            Scalar::I32 => Value::I32(0),
            Scalar::U32 => Value::U32(0),
            Scalar::F32 => Value::F32(0.0),
            Scalar::F64 => Value::F64(0.0),
        }
    }
}

/// What a data field decodes to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A number of the given width and byte order
    Scalar(Scalar, Endian),
    /// Fixed-length single-byte string; always consumes the full length
    String(usize),
    /// `count` consecutive elements of one kind
    Array {
        element: Box<FieldKind>,
        count: usize,
    },
    /// An inlined sub-record
    Nested(Layout),
}

impl FieldKind {
    /// Fixed-length array of `count` elements
    pub fn array(element: FieldKind, count: usize) -> Self {
        FieldKind::Array {
            element: Box::new(element),
            count,
        }
    }

    /// Width in bytes
    pub fn byte_length(&self) -> usize {
        match self {
            FieldKind::Scalar(scalar, _) => scalar.width(),
            FieldKind::String(len) => *len,
            FieldKind::Array { element, count } => element.byte_length() * count,
            FieldKind::Nested(layout) => layout.byte_length(),
        }
    }

    /// The value a record holds for this field before anything is read:
    /// zero, an empty string, an array of element defaults or a default sub-record.
    pub fn default_value(&self) -> Value<'_> {
        match self {
            FieldKind::Scalar(scalar, _) => scalar.default_value(),
            FieldKind::String(_) => Value::String(String::new()),
            FieldKind::Array { element, count } => {
                Value::Array((0..*count).map(|_| element.default_value()).collect())
            }
            FieldKind::Nested(layout) => Value::Record(layout.default_record()),
        }
    }
}

/// One entry of a [`Layout`]
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A value; anonymous values are stepped over without being read
    Data {
        name: Option<&'static str>,
        kind: FieldKind,
    },
    /// Padding bytes that contribute no value
    Skip(usize),
}

macro_rules! scalar_constructors {
    ($($ctor:ident => $scalar:ident),* $(,)?) => {
        impl FieldKind {
            $(
                #[doc = concat!("Anonymous `", stringify!($ctor), "` element")]
                pub const fn $ctor(endian: Endian) -> Self {
                    FieldKind::Scalar(Scalar::$scalar, endian)
                }
            )*
        }

        impl Field {
            $(
                #[doc = concat!("Named `", stringify!($ctor), "` field")]
                pub fn $ctor(name: &'static str, endian: Endian) -> Self {
                    Field::named(name, FieldKind::$ctor(endian))
                }
            )*
        }
    };
}

scalar_constructors! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    f32 => F32,
    f64 => F64,
}

impl Field {
    pub fn named(name: &'static str, kind: FieldKind) -> Self {
        Field::Data {
            name: Some(name),
            kind,
        }
    }

    /// Fixed-length string of `len` bytes
    pub fn string(name: &'static str, len: usize) -> Self {
        Field::named(name, FieldKind::String(len))
    }

    /// Fixed-length array of `count` elements
    pub fn array(name: &'static str, element: FieldKind, count: usize) -> Self {
        Field::named(name, FieldKind::array(element, count))
    }

    /// Sub-record decoded with a copy of `layout`
    pub fn nested(name: &'static str, layout: &Layout) -> Self {
        Field::named(name, FieldKind::Nested(layout.clone()))
    }

    pub fn skip(len: usize) -> Self {
        Field::Skip(len)
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            Field::Data { name, .. } => *name,
            Field::Skip(_) => None,
        }
    }

    /// Width in bytes
    pub fn byte_length(&self) -> usize {
        match self {
            Field::Data { kind, .. } => kind.byte_length(),
            Field::Skip(len) => *len,
        }
    }
}
