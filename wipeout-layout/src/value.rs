//! Decoded values and records

use std::fmt;

use crate::error::LayoutError;
use crate::layout::Layout;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'l> {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
    String(String),
    Array(Vec<Value<'l>>),
    Record(Record<'l>),
}

impl<'l> Value<'l> {
    /// Integer value widened to `i64`, `None` for non-integers
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::U8(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Numeric value as `f64`, `None` for strings and composites
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'l>]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record<'l>> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// A decoded record: named values in layout order, tagged with the layout
/// that produced them.
#[derive(Clone, PartialEq)]
pub struct Record<'l> {
    layout: &'l Layout,
    values: Vec<(&'static str, Value<'l>)>,
}

impl<'l> Record<'l> {
    pub(crate) fn new(layout: &'l Layout, values: Vec<(&'static str, Value<'l>)>) -> Self {
        Self { layout, values }
    }

    /// The layout this record was decoded with
    pub fn layout(&self) -> &'l Layout {
        self.layout
    }

    pub fn get(&self, name: &str) -> Option<&Value<'l>> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Named values in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value<'l>)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Value<'l>, LayoutError> {
        self.get(name).ok_or_else(|| LayoutError::MissingField {
            layout: self.layout.name(),
            field: name.to_string(),
        })
    }

    /// Integer field converted to `T`
    pub fn int<T: TryFrom<i64>>(&self, name: &str) -> Result<T, LayoutError> {
        to_int(name, self.require(name)?)
    }

    /// Integer array field converted element-wise to `T`
    pub fn ints<T: TryFrom<i64>>(&self, name: &str) -> Result<Vec<T>, LayoutError> {
        self.array(name)?
            .iter()
            .map(|value| to_int(name, value))
            .collect()
    }

    /// Integer array field of exactly `N` elements
    pub fn int_array<T: TryFrom<i64>, const N: usize>(
        &self,
        name: &str,
    ) -> Result<[T; N], LayoutError> {
        self.ints(name)?
            .try_into()
            .map_err(|_| mismatch(name, "an array of the requested length"))
    }

    pub fn string(&self, name: &str) -> Result<&str, LayoutError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| mismatch(name, "a string"))
    }

    pub fn array(&self, name: &str) -> Result<&[Value<'l>], LayoutError> {
        self.require(name)?
            .as_array()
            .ok_or_else(|| mismatch(name, "an array"))
    }

    pub fn record(&self, name: &str) -> Result<&Record<'l>, LayoutError> {
        self.require(name)?
            .as_record()
            .ok_or_else(|| mismatch(name, "a record"))
    }
}

fn to_int<T: TryFrom<i64>>(name: &str, value: &Value<'_>) -> Result<T, LayoutError> {
    let raw = value.as_i64().ok_or_else(|| mismatch(name, "an integer"))?;
    T::try_from(raw).map_err(|_| LayoutError::ValueOutOfRange {
        field: name.to_string(),
        value: raw,
    })
}

fn mismatch(name: &str, expected: &'static str) -> LayoutError {
    LayoutError::TypeMismatch {
        field: name.to_string(),
        expected,
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.layout.name());
        for (name, value) in &self.values {
            s.field(name, value);
        }
        s.finish()
    }
}
