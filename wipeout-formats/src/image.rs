//! TIM image decoding
//!
//! An image file is a little-endian header, an optional RGB555 palette, a
//! 4-byte data size, a pixel header and the pixel words. Paletted images
//! pack two (8bpp) or four (4bpp) palette indices into each 16-bit word, so
//! the stored width is a word count, not a pixel count.

use serde::Serialize;
use wipeout_layout::{Endian, Record, read_u16};

use crate::FormatError;
use crate::catalog::{IMAGE_FILE_HEADER, IMAGE_PIXEL_HEADER};
use crate::record::FromRecord;

/// Bytes between the palette and the pixel header
const DATA_SIZE_LEN: usize = 4;

/// Pixel storage kind, from the file header's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum ImageType {
    TrueColor16 = 0x02,
    Paletted4 = 0x08,
    Paletted8 = 0x09,
}

impl ImageType {
    /// Pixels packed into each 16-bit source word
    pub fn pixels_per_word(self) -> usize {
        match self {
            ImageType::TrueColor16 => 1,
            ImageType::Paletted8 => 2,
            ImageType::Paletted4 => 4,
        }
    }

    pub fn is_paletted(self) -> bool {
        self != ImageType::TrueColor16
    }
}

impl TryFrom<u32> for ImageType {
    type Error = FormatError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x02 => Ok(ImageType::TrueColor16),
            0x08 => Ok(ImageType::Paletted4),
            0x09 => Ok(ImageType::Paletted8),
            other => Err(FormatError::UnknownImageType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageFileHeader {
    pub magic: u32,
    pub kind: ImageType,
    pub header_length: u32,
    pub palette_x: u16,
    pub palette_y: u16,
    pub palette_colors: u16,
    pub palettes: u16,
}

impl FromRecord for ImageFileHeader {
    fn layout() -> &'static wipeout_layout::Layout {
        &IMAGE_FILE_HEADER
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            magic: record.int("magic")?,
            kind: ImageType::try_from(record.int::<u32>("type")?)?,
            header_length: record.int("headerLength")?,
            palette_x: record.int("paletteX")?,
            palette_y: record.int("paletteY")?,
            palette_colors: record.int("paletteColors")?,
            palettes: record.int("palettes")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImagePixelHeader {
    pub skip_x: u16,
    pub skip_y: u16,
    /// Width in 16-bit words
    pub width: u16,
    pub height: u16,
}

impl FromRecord for ImagePixelHeader {
    fn layout() -> &'static wipeout_layout::Layout {
        &IMAGE_PIXEL_HEADER
    }

    fn from_record(record: &Record<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            skip_x: record.int("skipX")?,
            skip_y: record.int("skipY")?,
            width: record.int("width")?,
            height: record.int("height")?,
        })
    }
}

/// A decoded RGBA8 image, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Image {
    /// Pixels as a flat RGBA byte slice
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Expand a 15-bit color to RGBA8. Only the all-zero word is transparent.
pub fn rgb555_to_rgba(color: u16) -> [u8; 4] {
    let channel = |shift: u16| (((color >> shift) & 0x1F) << 3) as u8;
    let alpha = if color == 0 { 0 } else { 0xFF };
    [channel(0), channel(5), channel(10), alpha]
}

/// Palette of one image; warns on the first out-of-range index it sees
struct Palette {
    colors: Vec<u16>,
    warned: bool,
}

impl Palette {
    fn new(colors: Vec<u16>) -> Self {
        Self {
            colors,
            warned: false,
        }
    }

    fn lookup(&mut self, index: u16) -> [u8; 4] {
        match self.colors.get(usize::from(index)) {
            Some(&color) => rgb555_to_rgba(color),
            None => {
                if !self.warned {
                    self.warned = true;
                    tracing::warn!(
                        index,
                        colors = self.colors.len(),
                        "palette index out of range, using opaque black"
                    );
                }
                [0, 0, 0, 0xFF]
            }
        }
    }
}

fn read_words(data: &[u8], offset: usize, count: usize) -> Result<Vec<u16>, FormatError> {
    (0..count)
        .map(|i| read_u16(data, offset + i * 2, Endian::Little).map_err(FormatError::from))
        .collect()
}

/// Decode one TIM image
pub fn decode_image(data: &[u8]) -> Result<Image, FormatError> {
    let file = ImageFileHeader::read(data, 0)?;
    let mut offset = IMAGE_FILE_HEADER.byte_length();

    let mut palette = if file.kind.is_paletted() {
        let colors = usize::from(file.palette_colors);
        let words = read_words(data, offset, colors)?;
        offset += colors * 2;
        Palette::new(words)
    } else {
        Palette::new(Vec::new())
    };
    offset += DATA_SIZE_LEN;

    let dim = ImagePixelHeader::read(data, offset)?;
    offset += IMAGE_PIXEL_HEADER.byte_length();

    let entries = usize::from(dim.width) * usize::from(dim.height);
    let words = read_words(data, offset, entries)?;

    let per_word = file.kind.pixels_per_word();
    let mut pixels = Vec::with_capacity(entries * per_word);
    for word in words {
        match file.kind {
            ImageType::TrueColor16 => pixels.push(rgb555_to_rgba(word)),
            ImageType::Paletted8 => {
                pixels.push(palette.lookup(word & 0xFF));
                pixels.push(palette.lookup(word >> 8));
            }
            ImageType::Paletted4 => {
                for shift in [0, 4, 8, 12] {
                    pixels.push(palette.lookup((word >> shift) & 0x0F));
                }
            }
        }
    }

    let image = Image {
        width: u32::from(dim.width) * per_word as u32,
        height: u32::from(dim.height),
        pixels,
    };
    tracing::debug!(
        kind = ?file.kind,
        width = image.width,
        height = image.height,
        "decoded image"
    );
    Ok(image)
}

/// Unpack a CMP archive and decode every embedded image
pub fn decode_archive_images(archive: &[u8]) -> Result<Vec<Image>, FormatError> {
    wipeout_lz::unpack(archive)?
        .iter()
        .enumerate()
        .map(|(index, file)| {
            decode_image(file).map_err(|source| FormatError::InvalidImage {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(kind: u32, palette_colors: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0x10u32.to_le_bytes()); // magic
        data.extend_from_slice(&kind.to_le_bytes());
        data.extend_from_slice(&0x0Cu32.to_le_bytes()); // header length
        data.extend_from_slice(&0u16.to_le_bytes()); // palette x
        data.extend_from_slice(&0u16.to_le_bytes()); // palette y
        data.extend_from_slice(&palette_colors.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes()); // palettes
        data
    }

    fn words(data: &mut Vec<u8>, words: &[u16]) {
        for w in words {
            data.extend_from_slice(&w.to_le_bytes());
        }
    }

    fn pixel_header(data: &mut Vec<u8>, width: u16, height: u16) {
        data.extend_from_slice(&[0; DATA_SIZE_LEN]);
        words(data, &[0, 0, width, height]);
    }

    #[test]
    fn test_rgb555_expansion() {
        assert_eq!(rgb555_to_rgba(0), [0, 0, 0, 0]);
        assert_eq!(rgb555_to_rgba(0x001F), [0xF8, 0, 0, 0xFF]);
        assert_eq!(rgb555_to_rgba(0x03E0), [0, 0xF8, 0, 0xFF]);
        assert_eq!(rgb555_to_rgba(0x7C00), [0, 0, 0xF8, 0xFF]);
        // Bit 15 is ignored but still makes the pixel opaque
        assert_eq!(rgb555_to_rgba(0x8000), [0, 0, 0, 0xFF]);
    }

    #[test]
    fn test_image_type_discriminants() {
        assert_eq!(ImageType::try_from(0x02u32).unwrap(), ImageType::TrueColor16);
        assert_eq!(ImageType::try_from(0x08u32).unwrap(), ImageType::Paletted4);
        assert_eq!(ImageType::try_from(0x09u32).unwrap(), ImageType::Paletted8);
        assert_eq!(
            ImageType::try_from(0x03u32),
            Err(FormatError::UnknownImageType(0x03))
        );
    }

    #[test]
    fn test_decode_true_color() {
        let mut data = header(0x02, 0);
        pixel_header(&mut data, 2, 1);
        words(&mut data, &[0x001F, 0x0000]);

        let image = decode_image(&data).unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.pixels, vec![[0xF8, 0, 0, 0xFF], [0, 0, 0, 0]]);
        assert_eq!(image.as_bytes().len(), 8);
    }

    #[test]
    fn test_decode_paletted_4bpp_nibble_order() {
        let palette = [0x0000, 0x0001, 0x0002, 0x0003, 0x0004];
        let mut data = header(0x08, palette.len() as u16);
        words(&mut data, &palette);
        pixel_header(&mut data, 1, 1);
        words(&mut data, &[0x1234]);

        let image = decode_image(&data).unwrap();
        assert_eq!((image.width, image.height), (4, 1));
        assert_eq!(
            image.pixels,
            vec![
                rgb555_to_rgba(0x0004),
                rgb555_to_rgba(0x0003),
                rgb555_to_rgba(0x0002),
                rgb555_to_rgba(0x0001),
            ]
        );
        assert_eq!(image.pixels[0], [4 << 3, 0, 0, 0xFF]);
    }

    #[test]
    fn test_decode_paletted_8bpp_low_byte_first() {
        let mut palette = vec![0u16; 256];
        palette[0x12] = 0x7C00;
        palette[0x34] = 0x03E0;
        let mut data = header(0x09, 256);
        words(&mut data, &palette);
        pixel_header(&mut data, 1, 2);
        words(&mut data, &[0x1234, 0x3412]);

        let image = decode_image(&data).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(
            image.pixels,
            vec![
                [0, 0xF8, 0, 0xFF],
                [0, 0, 0xF8, 0xFF],
                [0, 0, 0xF8, 0xFF],
                [0, 0xF8, 0, 0xFF],
            ]
        );
    }

    #[test]
    fn test_palette_index_past_palette_is_opaque_black() {
        let mut data = header(0x08, 1);
        words(&mut data, &[0x001F]);
        pixel_header(&mut data, 1, 1);
        words(&mut data, &[0x0010]);

        let image = decode_image(&data).unwrap();
        assert_eq!(
            image.pixels,
            vec![
                [0xF8, 0, 0, 0xFF],
                [0, 0, 0, 0xFF],
                [0xF8, 0, 0, 0xFF],
                [0xF8, 0, 0, 0xFF],
            ]
        );
    }

    #[test]
    fn test_palette_warning_state_is_per_image() {
        let mut palette = Palette::new(vec![0x001F]);
        assert_eq!(palette.lookup(0), [0xF8, 0, 0, 0xFF]);
        assert!(!palette.warned);
        assert_eq!(palette.lookup(5), [0, 0, 0, 0xFF]);
        assert!(palette.warned);

        // A second image starts without the latch set
        let mut palette = Palette::new(vec![0x001F]);
        assert!(!palette.warned);
        assert_eq!(palette.lookup(9), [0, 0, 0, 0xFF]);
        assert!(palette.warned);
    }

    #[test]
    fn test_unknown_type_fails() {
        let mut data = header(0x03, 0);
        pixel_header(&mut data, 1, 1);
        words(&mut data, &[0]);
        assert_eq!(decode_image(&data), Err(FormatError::UnknownImageType(3)));
    }

    #[test]
    fn test_truncated_pixels_fail() {
        let mut data = header(0x02, 0);
        pixel_header(&mut data, 2, 2);
        words(&mut data, &[1, 2, 3]);
        assert!(matches!(
            decode_image(&data),
            Err(FormatError::Layout(wipeout_layout::LayoutError::OutOfRange { .. }))
        ));
    }
}
