//! Track texturing: the tile index (`.TTF`) and the face override file (`.TEX`)

use serde::Serialize;
use wipeout_layout::{Layout, Record};

use super::{FaceFlags, TrackFace};
use crate::FormatError;
use crate::catalog::{TRACK_TEXTURE, TRACK_TEXTURE_INDEX};
use crate::image::Image;
use crate::record::FromRecord;

/// Edge length of one library tile in pixels
pub const TILE_SIZE: u32 = 32;

/// Tiles per side of a near texture
const NEAR_TILES: u32 = 4;

/// Library tiles that make up one track texture at each level of detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackTextureIndex {
    /// 4x4 tiles, row-major
    pub near: [u16; 16],
    /// 2x2 tiles, row-major
    pub med: [u16; 4],
    pub far: u16,
}

impl FromRecord for TrackTextureIndex {
    fn layout() -> &'static Layout {
        &TRACK_TEXTURE_INDEX
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        let [far] = record.int_array::<u16, 1>("far")?;
        Ok(Self {
            near: record.int_array("near")?,
            med: record.int_array("med")?,
            far,
        })
    }
}

impl TrackTextureIndex {
    /// Assemble the full-detail texture from library tiles
    pub fn compose_near(&self, tiles: &[Image]) -> Result<Image, FormatError> {
        let size = TILE_SIZE * NEAR_TILES;
        let mut pixels = vec![[0u8; 4]; (size * size) as usize];

        for (slot, &tile) in self.near.iter().enumerate() {
            let image = tiles
                .get(usize::from(tile))
                .ok_or(FormatError::TileOutOfRange {
                    tile: tile.into(),
                    count: tiles.len(),
                })?;
            let left = (slot as u32 % NEAR_TILES) * TILE_SIZE;
            let top = (slot as u32 / NEAR_TILES) * TILE_SIZE;

            for y in 0..image.height.min(size - top) {
                for x in 0..image.width.min(size - left) {
                    let src = (y * image.width + x) as usize;
                    let dst = ((top + y) * size + left + x) as usize;
                    pixels[dst] = image.pixels[src];
                }
            }
        }

        Ok(Image {
            width: size,
            height: size,
            pixels,
        })
    }
}

/// Per-face tile and flags from a `.TEX` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackTexture {
    pub tile: u8,
    pub flags: FaceFlags,
}

impl FromRecord for TrackTexture {
    fn layout() -> &'static Layout {
        &TRACK_TEXTURE
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            tile: record.int("tile")?,
            flags: FaceFlags::from_bits_retain(record.int("flags")?),
        })
    }
}

/// Replace each face's tile and flags with the matching `.TEX` record.
///
/// Records past the last face are ignored.
pub fn apply_track_textures(
    faces: &mut [TrackFace],
    textures: &[TrackTexture],
) -> Result<(), FormatError> {
    if textures.len() < faces.len() {
        return Err(FormatError::TrackTextureMismatch {
            textures: textures.len(),
            faces: faces.len(),
        });
    }

    for (face, texture) in faces.iter_mut().zip(textures) {
        face.tile = texture.tile;
        face.flags = texture.flags;
    }
    Ok(())
}
