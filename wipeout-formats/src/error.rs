//! Error types for Wipeout file decoding

use wipeout_layout::LayoutError;
use wipeout_lz::LzError;

/// Errors that can occur when decoding Wipeout files
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// A record could not be read
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A CMP archive could not be unpacked
    #[error(transparent)]
    Archive(#[from] LzError),

    /// Polygon discriminant with no known layout
    #[error("unknown polygon type 0x{0:02X}")]
    UnknownPolygonType(u16),

    /// Image type that is neither true-color nor paletted
    #[error("unknown image type 0x{0:02X}")]
    UnknownImageType(u32),

    /// An object in a PRM file failed; offsets after it are unrecoverable
    #[error("object {index} at offset 0x{offset:X}: {source}")]
    InvalidObject {
        index: usize,
        offset: usize,
        source: Box<FormatError>,
    },

    /// An image in a CMP archive failed to decode
    #[error("image {index}: {source}")]
    InvalidImage {
        index: usize,
        source: Box<FormatError>,
    },

    /// A section's face range runs past the face list
    #[error("section {section} references faces {first}..{end} but the track has {count}")]
    FaceOutOfRange {
        section: usize,
        first: usize,
        end: usize,
        count: usize,
    },

    /// A face references a vertex past the vertex list
    #[error("face {face} references vertex {vertex} but the track has {count}")]
    VertexOutOfRange {
        face: usize,
        vertex: usize,
        count: usize,
    },

    /// The TEX override file has fewer records than the face file
    #[error("track has {textures} texture records for {faces} faces")]
    TrackTextureMismatch { textures: usize, faces: usize },

    /// A texture index entry names a tile the texture library lacks
    #[error("texture index references tile {tile} but the library has {count}")]
    TileOutOfRange { tile: usize, count: usize },

    /// The section file holds no sections
    #[error("track has no sections")]
    NoSections,

    /// A section walk did not return to section 0 or leave the list
    #[error("section walk did not terminate within {0} steps")]
    TopologyCycle(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FormatError::UnknownPolygonType(0xFF).to_string(),
            "unknown polygon type 0xFF"
        );
        assert_eq!(
            FormatError::UnknownImageType(3).to_string(),
            "unknown image type 0x03"
        );
        assert_eq!(
            FormatError::InvalidObject {
                index: 2,
                offset: 0x1A0,
                source: Box::new(FormatError::UnknownPolygonType(0x0C)),
            }
            .to_string(),
            "object 2 at offset 0x1A0: unknown polygon type 0x0C"
        );
    }

    #[test]
    fn test_layout_errors_pass_through() {
        let err = FormatError::from(LayoutError::OutOfRange {
            offset: 0,
            width: 4,
            len: 2,
        });
        assert_eq!(
            err.to_string(),
            "read of 4 bytes at offset 0 is out of range (buffer is 2 bytes)"
        );
    }
}
