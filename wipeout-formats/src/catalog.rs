//! Record layouts for every Wipeout file type
//!
//! Each layout is built once on first use and shared for the life of the
//! process. Mesh and track data is big-endian; image headers are
//! little-endian.
//!
//! | File | Layout | Bytes |
//! |------|--------|-------|
//! | `.TRV` | [`TRACK_VERTEX`] | 16 |
//! | `.TRF` | [`TRACK_FACE`] | 20 |
//! | `.TTF` | [`TRACK_TEXTURE_INDEX`] | 42 |
//! | `.TRS` | [`TRACK_SECTION`] | 156 |
//! | `.TEX` | [`TRACK_TEXTURE`] | 2 |
//! | `.PRM` | [`OBJECT_HEADER`], [`MESH_VERTEX`], polygons | 144, 8, 16-44 |
//! | `.TIM` | [`IMAGE_FILE_HEADER`], [`IMAGE_PIXEL_HEADER`] | 20, 8 |

use std::sync::LazyLock;

use serde::Serialize;
use wipeout_layout::{Endian, Field, FieldKind, Layout};

use crate::FormatError;

const BE: Endian = Endian::Big;
const LE: Endian = Endian::Little;

// =============================================================================
// Track files
// =============================================================================

pub static TRACK_VERTEX: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "TrackVertex",
        [
            Field::i32("x", BE),
            Field::i32("y", BE),
            Field::i32("z", BE),
            Field::i32("padding", BE),
        ],
    )
});

pub static TRACK_FACE: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "TrackFace",
        [
            Field::array("indices", FieldKind::u16(BE), 4),
            Field::i16("normalx", BE),
            Field::i16("normaly", BE),
            Field::i16("normalz", BE),
            Field::u8("tile", BE),
            Field::u8("flags", BE),
            Field::u32("color", BE),
        ],
    )
});

/// Tile indices for one track texture at three levels of detail
pub static TRACK_TEXTURE_INDEX: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "TrackTextureIndex",
        [
            Field::array("near", FieldKind::u16(BE), 16), // 4x4 tiles
            Field::array("med", FieldKind::u16(BE), 4),   // 2x2 tiles
            Field::array("far", FieldKind::u16(BE), 1),
        ],
    )
});

pub static TRACK_SECTION: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "TrackSection",
        [
            Field::i32("nextJunction", BE),
            Field::i32("previous", BE),
            Field::i32("next", BE),
            Field::i32("x", BE),
            Field::i32("y", BE),
            Field::i32("z", BE),
            Field::skip(116),
            Field::u32("firstFace", BE),
            Field::u16("numFaces", BE),
            Field::skip(4),
            Field::u16("flags", BE),
            Field::skip(4),
        ],
    )
});

/// Per-face tile/flags override (Wipeout 2097 and later)
pub static TRACK_TEXTURE: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "TrackTexture",
        [Field::u8("tile", BE), Field::u8("flags", BE)],
    )
});

// =============================================================================
// Object files
// =============================================================================

pub static VECTOR3: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "Vector3",
        [
            Field::i32("x", BE),
            Field::i32("y", BE),
            Field::i32("z", BE),
        ],
    )
});

pub static MESH_VERTEX: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "Vertex",
        [
            Field::i16("x", BE),
            Field::i16("y", BE),
            Field::i16("z", BE),
            Field::i16("padding", BE),
        ],
    )
});

pub static UV: LazyLock<Layout> =
    LazyLock::new(|| Layout::new("Uv", [Field::u8("u", BE), Field::u8("v", BE)]));

pub static OBJECT_HEADER: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "ObjectHeader",
        [
            Field::string("name", 15),
            Field::skip(1),
            Field::u16("vertexCount", BE),
            Field::skip(14),
            Field::u16("polygonCount", BE),
            Field::skip(20),
            Field::u16("index1", BE),
            Field::skip(28),
            Field::nested("origin", &VECTOR3),
            Field::skip(20),
            Field::nested("position", &VECTOR3),
            Field::skip(16),
        ],
    )
});

/// Leading 4 bytes of every polygon variant
pub static POLYGON_HEADER: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "PolygonHeader",
        [Field::u16("type", BE), Field::u16("subtype", BE)],
    )
});

fn polygon(name: &'static str, body: impl IntoIterator<Item = Field>) -> Layout {
    let header = Field::nested("header", &POLYGON_HEADER);
    Layout::new(name, std::iter::once(header).chain(body))
}

static POLYGON_UNKNOWN_00: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "Unknown00",
        [Field::array("unknown", FieldKind::u16(BE), 7)],
    )
});

static FLAT_TRIS_FACE_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "FlatTrisFaceColor",
        [
            Field::array("indices", FieldKind::u16(BE), 3),
            Field::u16("unknown", BE),
            Field::u32("color", BE),
        ],
    )
});

static TEXTURED_TRIS_FACE_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "TexturedTrisFaceColor",
        [
            Field::array("indices", FieldKind::u16(BE), 3),
            Field::u16("texture", BE),
            Field::array("unknown", FieldKind::u16(BE), 2),
            Field::array("uv", FieldKind::Nested(UV.clone()), 3),
            Field::array("unknown2", FieldKind::u16(BE), 1),
            Field::u32("color", BE),
        ],
    )
});

static FLAT_QUAD_FACE_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "FlatQuadFaceColor",
        [
            Field::array("indices", FieldKind::u16(BE), 4),
            Field::u32("color", BE),
        ],
    )
});

static TEXTURED_QUAD_FACE_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "TexturedQuadFaceColor",
        [
            Field::array("indices", FieldKind::u16(BE), 4),
            Field::u16("texture", BE),
            Field::array("unknown", FieldKind::u16(BE), 2),
            Field::array("uv", FieldKind::Nested(UV.clone()), 4),
            Field::array("unknown2", FieldKind::u16(BE), 1),
            Field::u32("color", BE),
        ],
    )
});

static FLAT_TRIS_VERTEX_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "FlatTrisVertexColor",
        [
            Field::array("indices", FieldKind::u16(BE), 3),
            Field::u16("unknown", BE),
            Field::array("colors", FieldKind::u32(BE), 3),
        ],
    )
});

static TEXTURED_TRIS_VERTEX_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "TexturedTrisVertexColor",
        [
            Field::array("indices", FieldKind::u16(BE), 3),
            Field::u16("texture", BE),
            Field::array("unknown", FieldKind::u16(BE), 2),
            Field::array("uv", FieldKind::Nested(UV.clone()), 3),
            Field::array("unknown2", FieldKind::u16(BE), 1),
            Field::array("colors", FieldKind::u32(BE), 3),
        ],
    )
});

static FLAT_QUAD_VERTEX_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "FlatQuadVertexColor",
        [
            Field::array("indices", FieldKind::u16(BE), 4),
            Field::array("colors", FieldKind::u32(BE), 4),
        ],
    )
});

static TEXTURED_QUAD_VERTEX_COLOR: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "TexturedQuadVertexColor",
        [
            Field::array("indices", FieldKind::u16(BE), 4),
            Field::u16("texture", BE),
            Field::array("unknown", FieldKind::u16(BE), 2),
            Field::array("uv", FieldKind::Nested(UV.clone()), 4),
            Field::array("unknown2", FieldKind::u8(BE), 2),
            Field::array("colors", FieldKind::u32(BE), 4),
        ],
    )
});

/// Shared by top- and bottom-anchored sprites
static SPRITE: LazyLock<Layout> = LazyLock::new(|| {
    polygon(
        "Sprite",
        [
            Field::u16("index", BE),
            Field::u16("width", BE),
            Field::u16("height", BE),
            Field::u16("texture", BE),
            Field::u32("color", BE),
        ],
    )
});

/// Polygon discriminant, read from the first field of [`POLYGON_HEADER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum PolygonType {
    Unknown00 = 0x00,
    FlatTrisFaceColor = 0x01,
    TexturedTrisFaceColor = 0x02,
    FlatQuadFaceColor = 0x03,
    TexturedQuadFaceColor = 0x04,
    FlatTrisVertexColor = 0x05,
    TexturedTrisVertexColor = 0x06,
    FlatQuadVertexColor = 0x07,
    TexturedQuadVertexColor = 0x08,
    SpriteTopAnchor = 0x0A,
    SpriteBottomAnchor = 0x0B,
}

impl PolygonType {
    /// Every recognised discriminant
    pub const ALL: [PolygonType; 11] = [
        PolygonType::Unknown00,
        PolygonType::FlatTrisFaceColor,
        PolygonType::TexturedTrisFaceColor,
        PolygonType::FlatQuadFaceColor,
        PolygonType::TexturedQuadFaceColor,
        PolygonType::FlatTrisVertexColor,
        PolygonType::TexturedTrisVertexColor,
        PolygonType::FlatQuadVertexColor,
        PolygonType::TexturedQuadVertexColor,
        PolygonType::SpriteTopAnchor,
        PolygonType::SpriteBottomAnchor,
    ];

    /// Layout that decodes the whole polygon, header included
    pub fn layout(self) -> &'static Layout {
        match self {
            PolygonType::Unknown00 => &POLYGON_UNKNOWN_00,
            PolygonType::FlatTrisFaceColor => &FLAT_TRIS_FACE_COLOR,
            PolygonType::TexturedTrisFaceColor => &TEXTURED_TRIS_FACE_COLOR,
            PolygonType::FlatQuadFaceColor => &FLAT_QUAD_FACE_COLOR,
            PolygonType::TexturedQuadFaceColor => &TEXTURED_QUAD_FACE_COLOR,
            PolygonType::FlatTrisVertexColor => &FLAT_TRIS_VERTEX_COLOR,
            PolygonType::TexturedTrisVertexColor => &TEXTURED_TRIS_VERTEX_COLOR,
            PolygonType::FlatQuadVertexColor => &FLAT_QUAD_VERTEX_COLOR,
            PolygonType::TexturedQuadVertexColor => &TEXTURED_QUAD_VERTEX_COLOR,
            PolygonType::SpriteTopAnchor | PolygonType::SpriteBottomAnchor => &SPRITE,
        }
    }

    pub fn is_sprite(self) -> bool {
        matches!(
            self,
            PolygonType::SpriteTopAnchor | PolygonType::SpriteBottomAnchor
        )
    }
}

impl TryFrom<u16> for PolygonType {
    type Error = FormatError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        PolygonType::ALL
            .into_iter()
            .find(|kind| *kind as u16 == value)
            .ok_or(FormatError::UnknownPolygonType(value))
    }
}

// =============================================================================
// Image files (little-endian)
// =============================================================================

pub static IMAGE_FILE_HEADER: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "ImageFileHeader",
        [
            Field::u32("magic", LE),
            Field::u32("type", LE),
            Field::u32("headerLength", LE),
            Field::u16("paletteX", LE),
            Field::u16("paletteY", LE),
            Field::u16("paletteColors", LE),
            Field::u16("palettes", LE),
        ],
    )
});

pub static IMAGE_PIXEL_HEADER: LazyLock<Layout> = LazyLock::new(|| {
    Layout::new(
        "ImagePixelHeader",
        [
            Field::u16("skipX", LE),
            Field::u16("skipY", LE),
            Field::u16("width", LE),
            Field::u16("height", LE),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout_sizes() {
        assert_eq!(TRACK_VERTEX.byte_length(), 16);
        assert_eq!(TRACK_FACE.byte_length(), 20);
        assert_eq!(TRACK_TEXTURE_INDEX.byte_length(), 42);
        assert_eq!(TRACK_SECTION.byte_length(), 156);
        assert_eq!(TRACK_TEXTURE.byte_length(), 2);
        assert_eq!(MESH_VERTEX.byte_length(), 8);
        assert_eq!(OBJECT_HEADER.byte_length(), 144);
        assert_eq!(POLYGON_HEADER.byte_length(), 4);
        assert_eq!(IMAGE_FILE_HEADER.byte_length(), 20);
        assert_eq!(IMAGE_PIXEL_HEADER.byte_length(), 8);
    }

    #[test]
    fn test_polygon_layout_sizes() {
        let sizes: Vec<(PolygonType, usize)> = PolygonType::ALL
            .iter()
            .map(|&kind| (kind, kind.layout().byte_length()))
            .collect();
        assert_eq!(
            sizes,
            vec![
                (PolygonType::Unknown00, 18),
                (PolygonType::FlatTrisFaceColor, 16),
                (PolygonType::TexturedTrisFaceColor, 28),
                (PolygonType::FlatQuadFaceColor, 16),
                (PolygonType::TexturedQuadFaceColor, 32),
                (PolygonType::FlatTrisVertexColor, 24),
                (PolygonType::TexturedTrisVertexColor, 36),
                (PolygonType::FlatQuadVertexColor, 28),
                (PolygonType::TexturedQuadVertexColor, 44),
                (PolygonType::SpriteTopAnchor, 16),
                (PolygonType::SpriteBottomAnchor, 16),
            ]
        );
    }

    #[test]
    fn test_every_polygon_layout_starts_with_header() {
        for kind in PolygonType::ALL {
            let first = &kind.layout().fields()[0];
            assert_eq!(first.name(), Some("header"));
            assert_eq!(first.byte_length(), POLYGON_HEADER.byte_length());
        }
    }

    #[test]
    fn test_sprites_share_a_layout() {
        assert!(std::ptr::eq(
            PolygonType::SpriteTopAnchor.layout(),
            PolygonType::SpriteBottomAnchor.layout()
        ));
        let distinct: std::collections::HashSet<*const Layout> = PolygonType::ALL
            .iter()
            .map(|kind| kind.layout() as *const Layout)
            .collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_polygon_type_from_discriminant() {
        assert_eq!(
            PolygonType::try_from(0x0Au16).unwrap(),
            PolygonType::SpriteTopAnchor
        );
        assert_eq!(
            PolygonType::try_from(0x09u16),
            Err(FormatError::UnknownPolygonType(0x09))
        );
        assert_eq!(
            PolygonType::try_from(0xFFu16),
            Err(FormatError::UnknownPolygonType(0xFF))
        );
    }
}
