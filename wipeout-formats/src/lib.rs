//! Wipeout asset decoders
//!
//! Typed decoding for the file families of the original PlayStation game:
//!
//! - `.CMP` texture archives ([`decode_archive_images`], via `wipeout-lz`)
//! - `.TIM` images ([`decode_image`])
//! - `.PRM` object meshes ([`read_objects`])
//! - `.TRV`/`.TRF`/`.TRS`/`.TTF`/`.TEX` track files ([`Track`]) and the camera
//!   path through the track's section graph ([`build_path`])
//!
//! Every record is read through a layout from [`catalog`]. Mesh and track
//! files are big-endian, image headers little-endian. Values are returned in
//! file space; axis flips for rendering are left to the caller.
//!
//! # Example
//!
//! ```
//! use wipeout_formats::{FormatError, PolygonType, decode_polygon};
//!
//! // Flat face-colored triangle with a zeroed body
//! let mut data = vec![0u8; 16];
//! data[1] = 0x01;
//! let (polygon, len) = decode_polygon(&data, 0).unwrap();
//! assert_eq!(polygon.kind, PolygonType::FlatTrisFaceColor);
//! assert_eq!(len, 16);
//!
//! data[1] = 0xFF;
//! assert_eq!(decode_polygon(&data, 0), Err(FormatError::UnknownPolygonType(0xFF)));
//! ```

pub mod catalog;
mod error;
pub mod image;
pub mod object;
mod record;
pub mod track;

pub use catalog::PolygonType;
pub use error::FormatError;
pub use image::{Image, ImageType, decode_archive_images, decode_image, rgb555_to_rgba};
pub use object::{Object, ObjectHeader, Polygon, Shape, decode_polygon, read_object, read_objects};
pub use record::FromRecord;
pub use track::{
    CameraPath, FaceFlags, PathPoint, SectionFlags, Track, TrackFace, TrackFiles, TrackSection,
    TrackVertex, build_path,
};
