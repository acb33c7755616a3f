//! CMP archive header

use crate::LzError;

/// File count and per-file lengths that precede the packed stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Unpacked length of each embedded file, in order
    pub lengths: Vec<usize>,
}

impl ArchiveHeader {
    /// Read the header from the start of `buffer`
    pub fn parse(buffer: &[u8]) -> Result<Self, LzError> {
        let count = read_u32_le(buffer, 0).ok_or(LzError::TooSmall(buffer.len()))? as usize;

        count
            .checked_add(1)
            .and_then(|n| n.checked_mul(4))
            .filter(|&len| len <= buffer.len())
            .ok_or(LzError::TruncatedHeader {
                count,
                len: buffer.len(),
            })?;

        let lengths = (1..=count)
            .map(|i| read_u32_le(buffer, i * 4).map(|len| len as usize))
            .collect::<Option<Vec<_>>>()
            .ok_or(LzError::TruncatedHeader {
                count,
                len: buffer.len(),
            })?;

        Ok(Self { lengths })
    }

    /// Header size in bytes; the packed stream starts here
    pub fn byte_length(&self) -> usize {
        (self.lengths.len() + 1) * 4
    }

    /// Sum of all declared file lengths
    pub fn total_length(&self) -> Result<usize, LzError> {
        self.lengths
            .iter()
            .try_fold(0usize, |acc, &len| acc.checked_add(len))
            .ok_or(LzError::LengthOverflow)
    }
}

fn read_u32_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}
