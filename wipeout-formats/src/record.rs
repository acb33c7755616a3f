//! Typed views over decoded records
//!
//! Every fixed-width record type pairs a catalog [`Layout`] with a conversion
//! from the generic [`Record`] it decodes to. Generic code (track loading,
//! object walking) reads through this trait so each type only describes its
//! own fields.

use glam::{I16Vec3, IVec3};
use wipeout_layout::{Layout, Record};

use crate::FormatError;

/// A record type decoded through a catalog layout
pub trait FromRecord: Sized {
    /// Layout describing one record on disk
    fn layout() -> &'static Layout;

    /// Build the typed value from a record decoded with [`Self::layout`]
    fn from_record(record: &Record<'_>) -> Result<Self, FormatError>;

    /// Decode one record at `offset`
    fn read(data: &[u8], offset: usize) -> Result<Self, FormatError> {
        let (record, _) = Self::layout().decode_one(data, offset)?;
        Self::from_record(&record)
    }

    /// Decode every whole record in `data`; trailing partial bytes are ignored
    fn read_all(data: &[u8]) -> Result<Vec<Self>, FormatError> {
        Self::layout()
            .decode_all(data)?
            .iter()
            .map(Self::from_record)
            .collect()
    }
}

/// `x`/`y`/`z` integer fields as a vector
pub(crate) fn ivec3(record: &Record<'_>) -> Result<IVec3, FormatError> {
    Ok(IVec3::new(
        record.int("x")?,
        record.int("y")?,
        record.int("z")?,
    ))
}

/// `x`/`y`/`z` 16-bit fields as a vector
pub(crate) fn i16vec3(record: &Record<'_>) -> Result<I16Vec3, FormatError> {
    Ok(I16Vec3::new(
        record.int("x")?,
        record.int("y")?,
        record.int("z")?,
    ))
}
