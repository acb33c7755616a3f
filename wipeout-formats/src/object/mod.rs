//! PRM object decoding
//!
//! A PRM file is a run of objects with no framing between them. Each object
//! is a 144-byte header, `vertexCount` mesh vertices and `polygonCount`
//! variable-length polygons; its byte length is only known once every
//! polygon has been read, so one bad polygon makes the rest of the file
//! unreadable.

mod polygon;


use glam::{I16Vec3, IVec3};
use serde::Serialize;
use wipeout_layout::{Layout, Record};

pub use polygon::{Face, Polygon, Shape, Sprite, Texturing, Uv, decode_polygon};

use crate::FormatError;
use crate::catalog::{MESH_VERTEX, OBJECT_HEADER};
use crate::record::{FromRecord, i16vec3, ivec3};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectHeader {
    pub name: String,
    pub vertex_count: u16,
    pub polygon_count: u16,
    pub index1: u16,
    pub origin: IVec3,
    pub position: IVec3,
}

impl FromRecord for ObjectHeader {
    fn layout() -> &'static Layout {
        &OBJECT_HEADER
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            name: record.string("name")?.to_string(),
            vertex_count: record.int("vertexCount")?,
            polygon_count: record.int("polygonCount")?,
            index1: record.int("index1")?,
            origin: ivec3(record.record("origin")?)?,
            position: ivec3(record.record("position")?)?,
        })
    }
}

/// Object-space vertex; the fourth word is padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MeshVertex(pub I16Vec3);

impl FromRecord for MeshVertex {
    fn layout() -> &'static Layout {
        &MESH_VERTEX
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        i16vec3(record).map(MeshVertex)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Object {
    pub header: ObjectHeader,
    pub vertices: Vec<MeshVertex>,
    pub polygons: Vec<Polygon>,
    /// Bytes this object occupies in the file
    pub byte_length: usize,
}

/// Decode one object starting at `offset`
pub fn read_object(data: &[u8], offset: usize) -> Result<Object, FormatError> {
    let header = ObjectHeader::read(data, offset)?;
    let mut cursor = offset + OBJECT_HEADER.byte_length();

    let vertices = MESH_VERTEX
        .decode_many(data, cursor, usize::from(header.vertex_count))?
        .iter()
        .map(|decoded| MeshVertex::from_record(&decoded.record))
        .collect::<Result<Vec<_>, _>>()?;
    cursor += MESH_VERTEX.byte_length() * vertices.len();

    let mut polygons = Vec::with_capacity(usize::from(header.polygon_count));
    for _ in 0..header.polygon_count {
        let (polygon, len) = decode_polygon(data, cursor)?;
        cursor += len;
        polygons.push(polygon);
    }

    Ok(Object {
        header,
        vertices,
        polygons,
        byte_length: cursor - offset,
    })
}

/// Decode every object in a PRM file
pub fn read_objects(data: &[u8]) -> Result<Vec<Object>, FormatError> {
    let mut objects = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let object = read_object(data, offset).map_err(|source| FormatError::InvalidObject {
            index: objects.len(),
            offset,
            source: Box::new(source),
        })?;
        tracing::trace!(
            name = %object.header.name,
            offset,
            len = object.byte_length,
            "decoded object"
        );
        offset += object.byte_length;
        objects.push(object);
    }

    tracing::debug!(count = objects.len(), "decoded objects");
    Ok(objects)
}
