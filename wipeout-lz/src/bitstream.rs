//! Test-only bitstream builder
//!
//! Writes tokens with the same MSB-first convention the decoder reads.

pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    mask: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            mask: 0x80,
        }
    }

    fn bit(&mut self, set: bool) {
        if self.mask == 0x80 {
            self.bytes.push(0);
        }
        if set {
            if let Some(last) = self.bytes.last_mut() {
                *last |= self.mask;
            }
        }
        self.mask >>= 1;
        if self.mask == 0 {
            self.mask = 0x80;
        }
    }

    /// Write `value` as a field whose top bit is worth `size`
    fn field(&mut self, value: u32, mut size: u32) {
        while size > 0 {
            self.bit(value & size != 0);
            size >>= 1;
        }
    }

    pub fn literal(&mut self, byte: u8) {
        self.bit(true);
        self.field(byte.into(), 0x80);
    }

    pub fn back_ref(&mut self, position: u16, length_field: u8) {
        self.bit(false);
        self.field(position.into(), 0x1000);
        self.field(length_field.into(), 0x08);
    }

    pub fn end(&mut self) {
        self.bit(false);
        self.field(0, 0x1000);
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Prefix a packed stream with an archive header
pub(crate) fn archive(lengths: &[u32], stream: &[u8]) -> Vec<u8> {
    let mut data = (lengths.len() as u32).to_le_bytes().to_vec();
    for len in lengths {
        data.extend_from_slice(&len.to_le_bytes());
    }
    data.extend_from_slice(stream);
    data
}
