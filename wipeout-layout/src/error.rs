//! Layout decoding error types

/// Errors that can occur when decoding records or reading their fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A read would cross the end of the buffer
    #[error("read of {width} bytes at offset {offset} is out of range (buffer is {len} bytes)")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// The record's layout has no field with this name
    #[error("record `{layout}` has no field `{field}`")]
    MissingField { layout: &'static str, field: String },

    /// The field holds a different kind of value than requested
    #[error("field `{field}` is not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// The field's integer value does not fit the requested integer type
    #[error("field `{field}` value {value} does not fit the requested type")]
    ValueOutOfRange { field: String, value: i64 },
}
