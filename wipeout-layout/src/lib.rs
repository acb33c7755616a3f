//! Wipeout-Layout: declarative binary record layouts
//!
//! Describes fixed-size binary records as an ordered list of fields and
//! decodes them from a byte buffer with a small data-driven interpreter.
//! There is no code generation: a [`Layout`] is plain data, built once and
//! shared by every decode call.
//!
//! # Field kinds
//!
//! | Kind | Width | Decodes to |
//! |------|-------|------------|
//! | `i8`/`u8`/`i16`/`u16`/`i32`/`u32`/`f32`/`f64` | 1-8 | [`Value`] scalar, per-field [`Endian`] |
//! | fixed string | N | [`Value::String`], truncated at the first zero byte |
//! | fixed array | element × N | [`Value::Array`] |
//! | nested layout | layout width | [`Value::Record`] |
//! | skip | N | nothing |
//!
//! # Usage
//!
//! ```
//! use wipeout_layout::{Endian, Field, Layout};
//!
//! let vertex = Layout::new("Vertex", [
//!     Field::i16("x", Endian::Big),
//!     Field::i16("y", Endian::Big),
//!     Field::i16("z", Endian::Big),
//!     Field::skip(2),
//! ]);
//! assert_eq!(vertex.byte_length(), 8);
//!
//! let data = [0x00, 0x01, 0xFF, 0xFF, 0x00, 0x10, 0xAA, 0xAA];
//! let (record, len) = vertex.decode_one(&data, 0).unwrap();
//! assert_eq!(len, 8);
//! assert_eq!(record.int::<i16>("y").unwrap(), -1);
//! ```
//!
//! Bounds are not pre-validated. A read that would cross the end of the
//! buffer fails in the byte-read primitive with [`LayoutError::OutOfRange`].

mod error;
mod field;
mod layout;
mod read;
mod value;

pub use error::LayoutError;
pub use field::{Endian, Field, FieldKind, Scalar};
pub use layout::{Decoded, Layout};
pub use read::{read_u16, read_u32};
pub use value::{Record, Value};
