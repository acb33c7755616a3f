//! Bitstream decoder
//!
//! The decoder state (current byte, bit mask, positions, window) lives in one
//! struct so the literal and back-reference paths share the same bit cursor.

use crate::{LzError, MIN_MATCH, WINDOW_MASK, WINDOW_SIZE, WINDOW_START};

/// Starting bitfield size for a literal byte (8 bits)
const LITERAL_FIELD: u32 = 0x80;

/// Starting bitfield size for a window position (13 bits)
const POSITION_FIELD: u32 = 0x1000;

/// Starting bitfield size for a back-reference length (4 bits)
const LENGTH_FIELD: u32 = 0x08;

/// Window position that marks the end of the stream
const END_OF_STREAM: usize = 0;

/// Most bytes a single back-reference writes
const MAX_COPY: usize = LENGTH_FIELD as usize * 2 - 1 + MIN_MATCH + 1;

/// Largest output a packed stream of `packed_len` bytes can produce.
///
/// A literal is 9 bits for one byte and a back-reference 18 bits for at most
/// 18 bytes, so no token writes more than one byte per bit. The token that
/// runs past the end of the source adds at most one more copy.
pub fn max_output(packed_len: usize) -> usize {
    packed_len.saturating_mul(8).saturating_add(MAX_COPY)
}

/// Reject a declared size the stream cannot reach
pub(crate) fn check_total(packed_len: usize, total: usize) -> Result<(), LzError> {
    let max = max_output(packed_len);
    if total > max {
        return Err(LzError::DeclaredTooLarge {
            declared: total,
            max,
        });
    }
    Ok(())
}

pub(crate) struct Decoder<'a> {
    src: &'a [u8],
    src_pos: usize,
    cur_byte: u8,
    bit_mask: u8,
    window: Box<[u8; WINDOW_SIZE]>,
    window_pos: usize,
}

/// Decoder output: the full-size buffer and how much of it was written
pub(crate) struct Output {
    pub data: Vec<u8>,
    pub produced: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            src_pos: 0,
            cur_byte: 0,
            bit_mask: 0x80,
            window: Box::new([0; WINDOW_SIZE]),
            window_pos: WINDOW_START,
        }
    }

    /// Read one bit, fetching a new source byte when the mask wraps.
    /// Bytes past the end of the source read as zero.
    fn read_bit(&mut self) -> bool {
        if self.bit_mask == 0x80 {
            self.cur_byte = self.src.get(self.src_pos).copied().unwrap_or(0);
            self.src_pos += 1;
        }

        let bit = self.cur_byte & self.bit_mask != 0;

        self.bit_mask >>= 1;
        if self.bit_mask == 0 {
            self.bit_mask = 0x80;
        }

        bit
    }

    /// Read a field MSB-first; `size` is the value of its top bit
    fn read_bitfield(&mut self, mut size: u32) -> u32 {
        let mut value = 0;
        while size > 0 {
            if self.read_bit() {
                value |= size;
            }
            size >>= 1;
        }
        value
    }

    fn emit(&mut self, dst: &mut [u8], dst_pos: &mut usize, byte: u8) {
        self.window[self.window_pos & WINDOW_MASK] = byte;
        if let Some(slot) = dst.get_mut(*dst_pos) {
            *slot = byte;
        }
        self.window_pos += 1;
        *dst_pos += 1;
    }

    /// Decode until the end marker, the end of the source, or `total` bytes
    pub fn run(mut self, total: usize) -> Output {
        let mut dst = vec![0u8; total];
        let mut dst_pos = 0;

        while self.src_pos <= self.src.len() && dst_pos < total {
            if self.read_bit() {
                let byte = self.read_bitfield(LITERAL_FIELD) as u8;
                self.emit(&mut dst, &mut dst_pos, byte);
                continue;
            }

            let position = self.read_bitfield(POSITION_FIELD) as usize;
            if position == END_OF_STREAM {
                break;
            }

            let length = self.read_bitfield(LENGTH_FIELD) as usize + MIN_MATCH;
            for i in 0..=length {
                let byte = self.window[(i + position) & WINDOW_MASK];
                self.emit(&mut dst, &mut dst_pos, byte);
            }
        }

        Output {
            data: dst,
            produced: dst_pos.min(total),
        }
    }
}

/// Decompress a raw packed stream (no archive header) into `total` bytes.
///
/// Bytes the stream does not reach are left zero. A `total` larger than
/// [`max_output`] allows for `packed` is an error.
pub fn decompress(packed: &[u8], total: usize) -> Result<Vec<u8>, LzError> {
    check_total(packed.len(), total)?;
    Ok(Decoder::new(packed).run(total).data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitWriter;

    #[test]
    fn test_bitfield_reads_msb_first() {
        let data = [0b1010_0000, 0b0000_0001];
        let mut decoder = Decoder::new(&data);
        assert!(decoder.read_bit());
        assert_eq!(decoder.read_bitfield(0x04), 0b010);
        assert_eq!(decoder.read_bitfield(0x800), 0b0000_0000_0001);
        assert_eq!(decoder.src_pos, 2);
    }

    #[test]
    fn test_bit_cursor_is_shared_across_fields() {
        // A literal straddles two source bytes
        let mut w = BitWriter::new();
        w.literal(0xA5);
        w.literal(0x5A);
        let data = w.finish();
        assert_eq!(data.len(), 3);
        assert_eq!(decompress(&data, 2).unwrap(), vec![0xA5, 0x5A]);
    }

    #[test]
    fn test_literals_then_end_marker() {
        let mut w = BitWriter::new();
        w.literal(0x41);
        w.literal(0x42);
        w.literal(0x43);
        w.end();
        assert_eq!(decompress(&w.finish(), 3).unwrap(), vec![0x41, 0x42, 0x43]);
    }

    #[test]
    fn test_end_marker_stops_before_total() {
        let mut w = BitWriter::new();
        w.literal(7);
        w.end();
        w.literal(8);
        let output = Decoder::new(&w.finish()).run(4);
        assert_eq!(output.produced, 1);
        assert_eq!(output.data, vec![7, 0, 0, 0]);
    }

    #[test]
    fn test_exhausted_source_ends_stream() {
        // No explicit end marker; zero padding past the source reads as one
        let mut w = BitWriter::new();
        w.literal(1);
        w.literal(2);
        let output = Decoder::new(&w.finish()).run(10);
        assert_eq!(output.produced, 2);
        assert_eq!(&output.data[..2], &[1, 2]);
    }

    #[test]
    fn test_back_reference_copies_length_plus_three() {
        // Length field 0 means length 2, and the inclusive copy loop runs 3 times
        let mut w = BitWriter::new();
        w.literal(0x41);
        w.back_ref(1, 0);
        w.end();
        let data = w.finish();

        let output = Decoder::new(&data).run(8);
        assert_eq!(output.produced, 4);
        assert_eq!(&output.data[..4], &[0x41; 4]);

        assert_eq!(decompress(&data, 3).unwrap(), vec![0x41; 3]);
    }

    #[test]
    fn test_back_reference_overlapping_copy() {
        let mut w = BitWriter::new();
        w.literal(b'A');
        w.literal(b'B');
        w.back_ref(1, 1);
        w.end();
        assert_eq!(decompress(&w.finish(), 6).unwrap(), b"ABABAB".to_vec());
    }

    #[test]
    fn test_longest_back_reference() {
        let mut w = BitWriter::new();
        w.literal(0x33);
        w.back_ref(1, 0x0F);
        w.end();
        let output = Decoder::new(&w.finish()).run(64);
        assert_eq!(output.produced, 1 + 0x0F + MIN_MATCH + 1);
    }

    #[test]
    fn test_window_wraps_by_mask() {
        let value = |k: usize| (k % 251) as u8;
        let literals = WINDOW_SIZE + 1;

        let mut w = BitWriter::new();
        for k in 0..literals {
            w.literal(value(k));
        }
        // Reads 0x1FFF, 0 and 1: the last three literals, the final two of
        // which were written after the window position wrapped.
        w.back_ref(WINDOW_MASK as u16, 0);
        w.end();

        let out = decompress(&w.finish(), literals + 3).unwrap();
        assert_eq!(out[literals - 1], value(WINDOW_SIZE));
        assert_eq!(
            &out[literals..],
            &[
                value(WINDOW_SIZE - 2),
                value(WINDOW_SIZE - 1),
                value(WINDOW_SIZE)
            ]
        );
    }

    #[test]
    fn test_max_output_bounds_longest_copies() {
        // Every token a longest back-reference to position 1
        let mut w = BitWriter::new();
        w.literal(0x11);
        for _ in 0..100 {
            w.back_ref(1, 0x0F);
        }
        let data = w.finish();
        let output = Decoder::new(&data).run(4096);
        assert_eq!(output.produced, 1 + 100 * MAX_COPY);
        assert!(output.produced <= max_output(data.len()));
    }

    #[test]
    fn test_decompress_rejects_unreachable_total() {
        assert_eq!(
            decompress(&[0xFF; 2], 1 << 29),
            Err(LzError::DeclaredTooLarge {
                declared: 1 << 29,
                max: max_output(2)
            })
        );
        assert_eq!(max_output(0), MAX_COPY);
        assert_eq!(max_output(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_output_is_capped_at_total() {
        let mut w = BitWriter::new();
        w.literal(1);
        w.back_ref(1, 0x0F);
        let out = decompress(&w.finish(), 5).unwrap();
        assert_eq!(out, vec![1; 5]);
    }
}
