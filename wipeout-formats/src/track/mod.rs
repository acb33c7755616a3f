//! Track decoding
//!
//! A track is spread over several flat record files:
//!
//! | File | Contents |
//! |------|----------|
//! | `TRACK.TRV` | vertices |
//! | `TRACK.TRF` | faces (quads over the vertices) |
//! | `TRACK.TRS` | sections (runs of faces linked into a graph) |
//! | `LIBRARY.TTF` | texture index (library tiles per track texture) |
//! | `TRACK.TEX` | optional per-face tile/flags override |
//!
//! Record counts are the file length divided by the record width; trailing
//! partial records are ignored.

mod path;
mod texture;


use glam::{I16Vec3, IVec3};
use serde::{Serialize, Serializer};
use wipeout_layout::{Layout, Record};

pub use path::{
    CameraPath, DEFAULT_BIAS, DEFAULT_TENSION, PathPoint, build_path, section_center,
};
pub use texture::{TILE_SIZE, TrackTexture, TrackTextureIndex, apply_track_textures};

use crate::FormatError;
use crate::catalog::{TRACK_FACE, TRACK_SECTION, TRACK_VERTEX};
use crate::record::{FromRecord, ivec3};

bitflags::bitflags! {
    /// Face attributes. A face with no flags set is a wall.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FaceFlags: u8 {
        /// Drivable surface; used for section centers
        const TRACK = 1;
        const WEAPON = 2;
        /// Mirror the texture horizontally
        const FLIP = 4;
        const WEAPON_2 = 8;
        const UNKNOWN = 16;
        const BOOST = 32;
    }
}

bitflags::bitflags! {
    /// Section attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SectionFlags: u16 {
        /// Gap in the geometry (ramp); the camera path is smoothed here
        const JUMP = 1;
        const JUNCTION_END = 8;
        /// First section of a branch reached through `next_junction`
        const JUNCTION_START = 16;
        const JUNCTION = 32;
    }
}

impl FaceFlags {
    pub const WALL: FaceFlags = FaceFlags::empty();
}

// Flag sets serialize as their raw bits
impl Serialize for FaceFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl Serialize for SectionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

/// Track vertex in file space; the fourth word is padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackVertex(pub IVec3);

impl FromRecord for TrackVertex {
    fn layout() -> &'static Layout {
        &TRACK_VERTEX
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        ivec3(record).map(TrackVertex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackFace {
    pub indices: [u16; 4],
    pub normal: I16Vec3,
    /// Index into the texture index
    pub tile: u8,
    pub flags: FaceFlags,
    pub color: u32,
}

impl FromRecord for TrackFace {
    fn layout() -> &'static Layout {
        &TRACK_FACE
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            indices: record.int_array("indices")?,
            normal: I16Vec3::new(
                record.int("normalx")?,
                record.int("normaly")?,
                record.int("normalz")?,
            ),
            tile: record.int("tile")?,
            flags: FaceFlags::from_bits_retain(record.int("flags")?),
            color: record.int("color")?,
        })
    }
}

/// Node of the section graph. Links are indices into the section list;
/// anything negative or past the end means "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackSection {
    pub next_junction: i32,
    pub previous: i32,
    pub next: i32,
    pub position: IVec3,
    pub first_face: u32,
    pub num_faces: u16,
    pub flags: SectionFlags,
}

impl FromRecord for TrackSection {
    fn layout() -> &'static Layout {
        &TRACK_SECTION
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            next_junction: record.int("nextJunction")?,
            previous: record.int("previous")?,
            next: record.int("next")?,
            position: ivec3(record)?,
            first_face: record.int("firstFace")?,
            num_faces: record.int("numFaces")?,
            flags: SectionFlags::from_bits_retain(record.int("flags")?),
        })
    }
}

/// Raw contents of the files making up one track
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackFiles<'a> {
    pub vertices: &'a [u8],
    pub faces: &'a [u8],
    pub sections: &'a [u8],
    pub texture_index: &'a [u8],
    pub track_texture: Option<&'a [u8]>,
}

/// Decoded track geometry and topology
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub vertices: Vec<TrackVertex>,
    /// Faces with any `.TEX` override already applied
    pub faces: Vec<TrackFace>,
    pub sections: Vec<TrackSection>,
    pub texture_index: Vec<TrackTextureIndex>,
}

impl Track {
    /// Decode every track file and merge the `.TEX` override into the faces
    pub fn decode(files: &TrackFiles<'_>) -> Result<Self, FormatError> {
        let vertices = TrackVertex::read_all(files.vertices)?;
        let mut faces = TrackFace::read_all(files.faces)?;
        let sections = TrackSection::read_all(files.sections)?;
        let texture_index = TrackTextureIndex::read_all(files.texture_index)?;

        if let Some(data) = files.track_texture {
            let textures = TrackTexture::read_all(data)?;
            apply_track_textures(&mut faces, &textures)?;
        }

        tracing::debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            sections = sections.len(),
            textures = texture_index.len(),
            "decoded track"
        );

        Ok(Self {
            vertices,
            faces,
            sections,
            texture_index,
        })
    }

    /// Camera path through the section graph
    pub fn camera_path(&self) -> Result<CameraPath, FormatError> {
        build_path(&self.sections, &self.faces, &self.vertices)
    }
}
