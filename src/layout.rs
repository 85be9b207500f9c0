//! Layout Encoder
//!
//! Projects a record sequence onto the absolute byte addresses it would occupy
//! in a sequential file, for hex visualizers.
//!
//! ## File Layout
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ Header (12)                                    │
//! │ ┌──────────────────┬─────────────────────────┐ │
//! │ │ Active count (4) │ Last id (8)             │ │
//! │ └──────────────────┴─────────────────────────┘ │
//! ├────────────────────────────────────────────────┤
//! │ Record slot (size bytes)                       │
//! │ ┌─────┬──────┬────┬──────┬──────┬──────┬─────┐ │
//! │ │Tomb │Size  │ Id │GTIN  │ Name │ Desc │slack│ │
//! │ │ (1) │ (2)  │(8) │(13)  │ (N)  │ (M)  │     │ │
//! │ └─────┴──────┴────┴──────┴──────┴──────┴─────┘ │
//! │ ... (repeated for each slot, storage order)    │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Integers are big-endian. The tombstone byte is `0x20` for an active record
//! and `0x2A` for a deleted one. Slack left over in a reused slot is addressed
//! but has no bytes in the image.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, SlotError};
use crate::header::Header;
use crate::record::{Record, GTIN_LEN, MAX_RECORD_SIZE};

/// Header size: active count (4) + last id (8)
pub const HEADER_SIZE: u64 = 12;

/// Tombstone byte of an active record (ASCII space)
pub const TOMBSTONE_ACTIVE: u8 = 0x20;

/// Tombstone byte of a deleted record (ASCII `*`)
pub const TOMBSTONE_DELETED: u8 = 0x2A;

/// What a byte range holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ActiveCount,
    LastId,
    Tombstone,
    Size,
    Id,
    Gtin,
    Name,
    Description,
}

impl Field {
    /// Display label for visualizers
    pub fn label(&self) -> &'static str {
        match self {
            Field::ActiveCount => "active count",
            Field::LastId => "last id",
            Field::Tombstone => "tombstone",
            Field::Size => "size",
            Field::Id => "id",
            Field::Gtin => "gtin",
            Field::Name => "name",
            Field::Description => "description",
        }
    }
}

/// A field's bytes and where they start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRange {
    pub field: Field,

    /// Absolute address of the first byte
    pub offset: u64,

    pub bytes: Bytes,
}

impl FieldRange {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Address one past the last byte
    pub fn end(&self) -> u64 {
        self.offset + self.len()
    }
}

/// The fixed 12-byte prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub active_count: u32,
    pub last_id: u64,
    pub fields: Vec<FieldRange>,
}

/// One slot of the sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    /// Position in storage order
    pub index: usize,

    /// Absolute address of the tombstone byte
    pub offset: u64,

    /// Persisted slot size
    pub capacity: u32,

    pub active: bool,

    pub fields: Vec<FieldRange>,
}

impl RecordLayout {
    /// Bytes covered by fields
    pub fn payload_len(&self) -> u64 {
        self.fields.iter().map(FieldRange::len).sum()
    }

    /// Bytes of the slot after the payload
    pub fn slack(&self) -> u64 {
        self.capacity as u64 - self.payload_len()
    }

    /// Address one past the slot
    pub fn end(&self) -> u64 {
        self.offset + self.capacity as u64
    }

    pub fn field(&self, field: Field) -> Option<&FieldRange> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// One byte of the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutByte {
    pub address: u64,
    pub value: u8,
    pub field: Field,

    /// `None` for header bytes
    pub record_index: Option<usize>,

    pub deleted: bool,
}

/// Byte projection of a record sequence and its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    header: HeaderLayout,
    records: Vec<RecordLayout>,
}

impl Layout {
    pub fn header(&self) -> &HeaderLayout {
        &self.header
    }

    pub fn records(&self) -> &[RecordLayout] {
        &self.records
    }

    /// Address just past the last slot
    pub fn total_len(&self) -> u64 {
        self.records
            .last()
            .map(RecordLayout::end)
            .unwrap_or(HEADER_SIZE)
    }

    /// Slot containing `address`, slack included
    pub fn record_at(&self, address: u64) -> Option<&RecordLayout> {
        self.records
            .iter()
            .find(|r| address >= r.offset && address < r.end())
    }

    /// Every emitted byte in address order, header first
    pub fn bytes(&self) -> Vec<LayoutByte> {
        let mut image = Vec::with_capacity(self.total_len() as usize);

        for range in &self.header.fields {
            push_range(&mut image, range, None, false);
        }
        for record in &self.records {
            for range in &record.fields {
                push_range(&mut image, range, Some(record.index), !record.active);
            }
        }

        image
    }
}

/// Lay out `records` in storage order behind the header
///
/// Each slot starts where the previous one's capacity ends. Fails on a record
/// whose capacity cannot hold its own payload, whose size does not fit the
/// 2-byte size field, or whose gtin is not 13 bytes.
pub fn layout(records: &[Record], header: &Header) -> Result<Layout> {
    let active = records.iter().filter(|r| r.active).count();
    let active_count = u32::try_from(active).unwrap_or(u32::MAX);

    let mut buf = BytesMut::with_capacity(HEADER_SIZE as usize);
    buf.put_u32(active_count);
    let count_bytes = buf.split().freeze();
    buf.put_u64(header.last_id);
    let last_id_bytes = buf.split().freeze();

    let header_layout = HeaderLayout {
        active_count,
        last_id: header.last_id,
        fields: vec![
            FieldRange {
                field: Field::ActiveCount,
                offset: 0,
                bytes: count_bytes,
            },
            FieldRange {
                field: Field::LastId,
                offset: 4,
                bytes: last_id_bytes,
            },
        ],
    };

    let mut address = HEADER_SIZE;
    let mut record_layouts = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let natural = record.natural_size();
        if record.size < natural {
            return Err(SlotError::Malformed(format!(
                "record {} at index {}: size {} smaller than payload {}",
                record.id, index, record.size, natural
            )));
        }
        if record.gtin.len() != GTIN_LEN as usize {
            return Err(SlotError::Malformed(format!(
                "record {} at index {}: gtin is {} bytes, expected {}",
                record.id,
                index,
                record.gtin.len(),
                GTIN_LEN
            )));
        }
        if record.size > MAX_RECORD_SIZE {
            return Err(SlotError::Malformed(format!(
                "record {} at index {}: size {} exceeds {}",
                record.id, index, record.size, MAX_RECORD_SIZE
            )));
        }

        record_layouts.push(RecordLayout {
            index,
            offset: address,
            capacity: record.size,
            active: record.active,
            fields: record_fields(record, address),
        });

        address += record.size as u64;
    }

    Ok(Layout {
        header: header_layout,
        records: record_layouts,
    })
}

fn record_fields(record: &Record, offset: u64) -> Vec<FieldRange> {
    let mut buf = BytesMut::with_capacity(record.natural_size() as usize);
    let mut fields = Vec::with_capacity(6);
    let mut cursor = offset;

    let mut emit = |field: Field, buf: &mut BytesMut| {
        let bytes = buf.split().freeze();
        let len = bytes.len() as u64;
        fields.push(FieldRange {
            field,
            offset: cursor,
            bytes,
        });
        cursor += len;
    };

    buf.put_u8(if record.active {
        TOMBSTONE_ACTIVE
    } else {
        TOMBSTONE_DELETED
    });
    emit(Field::Tombstone, &mut buf);

    // size was range-checked by the caller
    buf.put_u16(record.size as u16);
    emit(Field::Size, &mut buf);

    buf.put_u64(record.id);
    emit(Field::Id, &mut buf);

    buf.put_slice(record.gtin.as_bytes());
    emit(Field::Gtin, &mut buf);

    buf.put_slice(record.name.as_bytes());
    emit(Field::Name, &mut buf);

    buf.put_slice(record.description.as_bytes());
    emit(Field::Description, &mut buf);

    fields
}

fn push_range(image: &mut Vec<LayoutByte>, range: &FieldRange, record_index: Option<usize>, deleted: bool) {
    for (i, value) in range.bytes.iter().enumerate() {
        image.push(LayoutByte {
            address: range.offset + i as u64,
            value: *value,
            field: range.field,
            record_index,
            deleted,
        });
    }
}
