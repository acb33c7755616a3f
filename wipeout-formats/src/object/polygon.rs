//! Polygon records
//!
//! Every variant starts with a 4-byte `type`/`subtype` header. The header is
//! read first without advancing, then `type` picks the layout that decodes
//! the whole polygon from the same offset.

use serde::Serialize;
use wipeout_layout::{LayoutError, Record, Value};

use crate::FormatError;
use crate::catalog::{POLYGON_HEADER, PolygonType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Uv {
    pub u: u8,
    pub v: u8,
}

/// Texture page and per-corner coordinates of a textured face
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Texturing {
    pub texture: u16,
    pub uvs: Vec<Uv>,
}

/// Triangle or quad, flat or textured.
///
/// `colors` holds one packed color for face-colored variants and one per
/// corner for vertex-colored ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Face {
    pub indices: Vec<u16>,
    pub texture: Option<Texturing>,
    pub colors: Vec<u32>,
}

/// Camera-facing billboard anchored at one vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sprite {
    pub index: u16,
    pub width: u16,
    pub height: u16,
    pub texture: u16,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Type 0x00; contents not understood
    Unknown { words: [u16; 7] },
    Face(Face),
    Sprite(Sprite),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Polygon {
    pub kind: PolygonType,
    pub subtype: u16,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Polygon {
    /// Vertex indices this polygon draws from
    pub fn indices(&self) -> Vec<u16> {
        match &self.shape {
            Shape::Unknown { .. } => Vec::new(),
            Shape::Face(face) => face.indices.clone(),
            Shape::Sprite(sprite) => vec![sprite.index],
        }
    }
}

/// Decode the polygon at `offset`, returning it with its byte length
pub fn decode_polygon(data: &[u8], offset: usize) -> Result<(Polygon, usize), FormatError> {
    let (header, _) = POLYGON_HEADER.decode_one(data, offset)?;
    let kind = PolygonType::try_from(header.int::<u16>("type")?)?;
    let subtype = header.int("subtype")?;

    let (record, len) = kind.layout().decode_one(data, offset)?;
    let shape = if kind == PolygonType::Unknown00 {
        Shape::Unknown {
            words: record.int_array("unknown")?,
        }
    } else if kind.is_sprite() {
        Shape::Sprite(Sprite {
            index: record.int("index")?,
            width: record.int("width")?,
            height: record.int("height")?,
            texture: record.int("texture")?,
            color: record.int("color")?,
        })
    } else {
        Shape::Face(face(&record)?)
    };

    Ok((
        Polygon {
            kind,
            subtype,
            shape,
        },
        len,
    ))
}

fn uv(value: &Value<'_>) -> Result<Uv, FormatError> {
    let record = value.as_record().ok_or_else(|| LayoutError::TypeMismatch {
        field: "uv".to_string(),
        expected: "a record",
    })?;
    Ok(Uv {
        u: record.int("u")?,
        v: record.int("v")?,
    })
}

fn face(record: &Record<'_>) -> Result<Face, FormatError> {
    let texture = match record.get("uv") {
        Some(_) => Some(Texturing {
            texture: record.int("texture")?,
            uvs: record
                .array("uv")?
                .iter()
                .map(uv)
                .collect::<Result<_, _>>()?,
        }),
        None => None,
    };

    let colors = match record.get("colors") {
        Some(_) => record.ints("colors")?,
        None => vec![record.int("color")?],
    };

    Ok(Face {
        indices: record.ints("indices")?,
        texture,
        colors,
    })
}
