//! Record layouts and the decode interpreter

use crate::error::LayoutError;
use crate::field::{Field, FieldKind};
use crate::read;
use crate::value::{Record, Value};

/// An ordered list of fields with a fixed total width.
///
/// Build each layout once and reuse it for every read; a layout is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    name: &'static str,
    fields: Vec<Field>,
    byte_length: usize,
}

/// A record together with the absolute offset it was decoded from
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<'l> {
    pub offset: usize,
    pub record: Record<'l>,
}

impl Layout {
    /// Define a layout from its fields, in order
    pub fn new(name: &'static str, fields: impl IntoIterator<Item = Field>) -> Self {
        let fields: Vec<Field> = fields.into_iter().collect();
        let byte_length = fields.iter().map(Field::byte_length).sum();
        Self {
            name,
            fields,
            byte_length,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Total width in bytes (sum of all field widths)
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Number of whole records that fit in `len` bytes
    pub fn count_in(&self, len: usize) -> usize {
        len.checked_div(self.byte_length).unwrap_or(0)
    }

    /// A record holding every named field's default value
    pub fn default_record(&self) -> Record<'_> {
        let values = self
            .fields
            .iter()
            .filter_map(|field| match field {
                Field::Data {
                    name: Some(name),
                    kind,
                } => Some((*name, kind.default_value())),
                _ => None,
            })
            .collect();
        Record::new(self, values)
    }

    /// Decode one record at `offset`, returning it with its byte length
    pub fn decode_one<'l>(
        &'l self,
        data: &[u8],
        offset: usize,
    ) -> Result<(Record<'l>, usize), LayoutError> {
        Ok((read_record(self, data, offset)?, self.byte_length))
    }

    /// Decode `count` consecutive records starting at `offset`
    pub fn decode_many<'l>(
        &'l self,
        data: &[u8],
        offset: usize,
        count: usize,
    ) -> Result<Vec<Decoded<'l>>, LayoutError> {
        (0..count)
            .map(|i| {
                let offset = i
                    .checked_mul(self.byte_length)
                    .and_then(|skip| offset.checked_add(skip))
                    .ok_or(LayoutError::OutOfRange {
                        offset,
                        width: self.byte_length,
                        len: data.len(),
                    })?;
                read_record(self, data, offset).map(|record| Decoded { offset, record })
            })
            .collect()
    }

    /// Decode as many whole records as the buffer holds, from offset 0
    pub fn decode_all<'l>(&'l self, data: &[u8]) -> Result<Vec<Record<'l>>, LayoutError> {
        (0..self.count_in(data.len()))
            .map(|i| read_record(self, data, i * self.byte_length))
            .collect()
    }
}

fn read_record<'l>(
    layout: &'l Layout,
    data: &[u8],
    offset: usize,
) -> Result<Record<'l>, LayoutError> {
    let mut values = Vec::with_capacity(layout.fields.len());
    let mut cursor = offset;

    for field in &layout.fields {
        if let Field::Data {
            name: Some(name),
            kind,
        } = field
        {
            values.push((*name, read_field(kind, data, cursor)?));
        }
        cursor = advance(data, cursor, field.byte_length())?;
    }

    Ok(Record::new(layout, values))
}

/// `cursor + width`, or out of range when the sum overflows
fn advance(data: &[u8], cursor: usize, width: usize) -> Result<usize, LayoutError> {
    cursor.checked_add(width).ok_or(LayoutError::OutOfRange {
        offset: cursor,
        width,
        len: data.len(),
    })
}

fn read_field<'l>(
    kind: &'l FieldKind,
    data: &[u8],
    cursor: usize,
) -> Result<Value<'l>, LayoutError> {
    match kind {
        FieldKind::Scalar(scalar, endian) => read::scalar(data, cursor, *scalar, *endian),
        FieldKind::String(len) => read::string(data, cursor, *len).map(Value::String),
        FieldKind::Array { element, count } => {
            let width = element.byte_length();
            (0..*count)
                .map(|i| read_field(element, data, advance(data, cursor, i * width)?))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::Nested(layout) => read_record(layout, data, cursor).map(Value::Record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Endian;

    fn vector3() -> Layout {
        Layout::new(
            "Vector3",
            [
                Field::i32("x", Endian::Big),
                Field::i32("y", Endian::Big),
                Field::i32("z", Endian::Big),
            ],
        )
    }

    #[test]
    fn test_byte_length_is_sum_of_fields() {
        let layout = Layout::new(
            "Mixed",
            [
                Field::string("name", 15),
                Field::skip(1),
                Field::u16("count", Endian::Big),
                Field::nested("origin", &vector3()),
                Field::array("uv", FieldKind::u8(Endian::Big), 6),
            ],
        );
        let sum: usize = layout.fields().iter().map(Field::byte_length).sum();
        assert_eq!(layout.byte_length(), sum);
        assert_eq!(layout.byte_length(), 15 + 1 + 2 + 12 + 6);
    }

    #[test]
    fn test_decode_many_advances_by_byte_length() {
        let layout = Layout::new(
            "Pair",
            [Field::u8("a", Endian::Big), Field::skip(1), Field::u16("b", Endian::Big)],
        );
        let data = [1, 0xEE, 0, 2, 3, 0xEE, 0, 4, 5, 0xEE, 0, 6];
        let decoded = layout.decode_many(&data, 0, 3).unwrap();

        assert_eq!(decoded.len(), 3);
        for (i, d) in decoded.iter().enumerate() {
            assert_eq!(d.offset, i * layout.byte_length());
            assert_eq!(d.record.int::<u8>("a").unwrap() as usize, i * 2 + 1);
            assert_eq!(d.record.int::<u16>("b").unwrap() as usize, i * 2 + 2);
        }
    }

    #[test]
    fn test_decode_at_offset() {
        let layout = vector3();
        let mut data = vec![0xAA; 3];
        data.extend_from_slice(&1i32.to_be_bytes());
        data.extend_from_slice(&(-2i32).to_be_bytes());
        data.extend_from_slice(&3i32.to_be_bytes());

        let (record, len) = layout.decode_one(&data, 3).unwrap();
        assert_eq!(len, 12);
        assert_eq!(record.int::<i32>("x").unwrap(), 1);
        assert_eq!(record.int::<i32>("y").unwrap(), -2);
        assert_eq!(record.int::<i32>("z").unwrap(), 3);
    }

    #[test]
    fn test_string_consumes_declared_length() {
        let layout = Layout::new(
            "Named",
            [Field::string("name", 8), Field::u16("after", Endian::Big)],
        );
        let data = [b'S', b'K', b'Y', 0, b'X', b'X', b'X', b'X', 0x12, 0x34];
        let (record, _) = layout.decode_one(&data, 0).unwrap();

        assert_eq!(record.string("name").unwrap(), "SKY");
        assert_eq!(record.int::<u16>("after").unwrap(), 0x1234);
    }

    #[test]
    fn test_nested_and_array_of_records() {
        let uv = Layout::new("Uv", [Field::u8("u", Endian::Big), Field::u8("v", Endian::Big)]);
        let layout = Layout::new(
            "Textured",
            [
                Field::nested("origin", &vector3()),
                Field::array("uv", FieldKind::Nested(uv), 2),
            ],
        );
        let mut data = Vec::new();
        for v in [10i32, 20, 30] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(&[1, 2, 3, 4]);

        let (record, len) = layout.decode_one(&data, 0).unwrap();
        assert_eq!(len, 16);

        let origin = record.record("origin").unwrap();
        assert_eq!(origin.layout().name(), "Vector3");
        assert_eq!(origin.int::<i32>("z").unwrap(), 30);

        let uvs = record.array("uv").unwrap();
        assert_eq!(uvs.len(), 2);
        let second = uvs[1].as_record().unwrap();
        assert_eq!(second.int::<u8>("u").unwrap(), 3);
        assert_eq!(second.int::<u8>("v").unwrap(), 4);
    }

    #[test]
    fn test_anonymous_fields_are_stepped_over() {
        let layout = Layout::new(
            "Anon",
            [
                Field::Data {
                    name: None,
                    kind: FieldKind::u32(Endian::Big),
                },
                Field::u8("tail", Endian::Big),
            ],
        );
        let (record, _) = layout.decode_one(&[0, 0, 0, 0, 9], 0).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.int::<u8>("tail").unwrap(), 9);
    }

    #[test]
    fn test_past_end_is_error() {
        let layout = vector3();
        let data = [0u8; 20];
        assert!(layout.decode_one(&data, 0).is_ok());
        assert!(matches!(
            layout.decode_one(&data, 12),
            Err(LayoutError::OutOfRange { offset: 20, .. })
        ));
        assert!(layout.decode_many(&data, 0, 2).is_err());
    }

    #[test]
    fn test_offset_overflow_is_out_of_range() {
        let layout = Layout::new("Padded", [Field::skip(4), Field::u8("a", Endian::Big)]);
        let data = [0u8; 8];
        assert!(matches!(
            layout.decode_one(&data, usize::MAX - 1),
            Err(LayoutError::OutOfRange {
                offset,
                width: 4,
                len: 8
            }) if offset == usize::MAX - 1
        ));
        assert!(matches!(
            layout.decode_many(&data, usize::MAX - 8, 3),
            Err(LayoutError::OutOfRange { .. })
        ));

        // A padding-only layout reads nothing, so only the offsets can fail
        let gap = Layout::new("Gap", [Field::skip(1 << 62)]);
        assert_eq!(gap.decode_many(&data, 0, 3).unwrap().len(), 3);
        assert!(matches!(
            gap.decode_many(&data, 0, 5),
            Err(LayoutError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_decode_all_and_count() {
        let layout = vector3();
        let data = [0u8; 30];
        assert_eq!(layout.count_in(data.len()), 2);
        assert_eq!(layout.decode_all(&data).unwrap().len(), 2);

        let empty = Layout::new("Empty", []);
        assert_eq!(empty.count_in(100), 0);
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let layout = vector3();
        let data: Vec<u8> = (0..12).collect();
        let first = layout.decode_one(&data, 0).unwrap();
        let second = layout.decode_one(&data, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_record() {
        let layout = Layout::new(
            "Header",
            [
                Field::string("name", 15),
                Field::skip(1),
                Field::u16("count", Endian::Big),
                Field::nested("origin", &vector3()),
            ],
        );
        let record = layout.default_record();
        assert_eq!(record.len(), 3);
        assert_eq!(record.string("name").unwrap(), "");
        assert_eq!(record.int::<u16>("count").unwrap(), 0);
        assert_eq!(record.record("origin").unwrap().int::<i32>("x").unwrap(), 0);
    }
}
