//! Typed property records.
//!
//! A property on the wire is a `!` marker, a one-byte name length, the name,
//! a discriminator character and a payload:
//!
//! | discriminator | payload |
//! |---|---|
//! | `i` | `u32` count, then `count` little-endian `i32` |
//! | `f` | `u32` count, then `count` little-endian `f32` |
//! | `s` | `u32` string count, `u32` byte count, null-terminated string |
//!
//! Short binary names are mapped to descriptive names on decode (`p` becomes
//! `vertices`, `tri` becomes `faces`, ...) and mapped back on encode.
//!
//! ```rust
//! use clausewitz_mesh::{decode_property, write_property, ByteCursor, MeshOptions, PropertyRecord};
//!
//! let record = PropertyRecord::floats("vertices", vec![0.0, 1.0, 2.0]);
//!
//! let mut bytes = Vec::new();
//! write_property(&mut bytes, &record).unwrap();
//! assert_eq!(&bytes[..4], b"!\x01pf");
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! assert_eq!(cursor.next_char().unwrap(), '!');
//! let decoded = decode_property(&mut cursor, &MeshOptions::default()).unwrap();
//! assert_eq!(decoded, record);
//! ```

use crate::{ByteCursor, Error, MeshOptions, Result};
use byteorder::{WriteBytesExt, LE};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Name of the top-level property that marks a `.mesh` file.
pub const ASSET_NAME: &str = "pdxasset";

const ALIASES: [(&str, &str); 5] = [
    ("p", "vertices"),
    ("n", "normals"),
    ("ta", "tangents"),
    ("u0", "uv_map"),
    ("tri", "faces"),
];

/// Maps a binary property name to its descriptive name.
///
/// Names outside the alias table map to themselves.
///
/// ```rust
/// use clausewitz_mesh::normalize_name;
///
/// assert_eq!(normalize_name("tri"), "faces");
/// assert_eq!(normalize_name("shader"), "shader");
/// ```
pub fn normalize_name(raw: &str) -> &str {
    ALIASES
        .iter()
        .find(|(short, _)| *short == raw)
        .map_or(raw, |&(_, long)| long)
}

/// Inverse of [`normalize_name`]: the name as it is written to disk.
pub fn wire_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(_, long)| *long == name)
        .map_or(name, |&(short, _)| short)
}

/// Payload of a property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    String(String),
}

impl PropertyValue {
    /// The discriminator character written before the payload.
    pub const fn discriminator(&self) -> char {
        match self {
            PropertyValue::Ints(_) => 'i',
            PropertyValue::Floats(_) => 'f',
            PropertyValue::String(_) => 's',
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Ints(_) => "int",
            PropertyValue::Floats(_) => "float",
            PropertyValue::String(_) => "string",
        }
    }

    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            PropertyValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            PropertyValue::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A decoded property: normalized name, payload and the bytes it came from.
///
/// `span` covers the name length byte through the end of the payload and
/// `raw_name` holds the name exactly as it was on disk. Both are unset for
/// records built in memory. Equality compares `name` and `value` only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    pub value: PropertyValue,
    #[serde(default)]
    pub span: Range<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<String>,
}

impl PartialEq for PropertyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl PropertyRecord {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        PropertyRecord {
            name: name.into(),
            value,
            span: 0..0,
            raw_name: None,
        }
    }

    /// The name this record is written under.
    ///
    /// A decoded record keeps the name it was read under, as long as that
    /// name still normalizes to `name`. Otherwise the alias table is used.
    ///
    /// ```rust
    /// use clausewitz_mesh::PropertyRecord;
    ///
    /// assert_eq!(PropertyRecord::floats("vertices", vec![]).disk_name(), "p");
    ///
    /// let mut record = PropertyRecord::floats("vertices", vec![]);
    /// record.raw_name = Some("vertices".to_string());
    /// assert_eq!(record.disk_name(), "vertices");
    /// ```
    pub fn disk_name(&self) -> &str {
        match self.raw_name.as_deref() {
            Some(raw) if normalize_name(raw) == self.name => raw,
            _ => wire_name(&self.name),
        }
    }

    pub fn ints(name: impl Into<String>, values: Vec<i32>) -> Self {
        Self::new(name, PropertyValue::Ints(values))
    }

    pub fn floats(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self::new(name, PropertyValue::Floats(values))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::String(value.into()))
    }
}

/// A property as read from the wire, before its name is normalized.
///
/// The tree builder inspects `raw_name` to recognise the `pdxasset` marker
/// before turning anything else into a [`PropertyRecord`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawProperty {
    pub raw_name: String,
    pub value: PropertyValue,
    pub span: Range<usize>,
}

impl RawProperty {
    pub fn into_record(self) -> PropertyRecord {
        let name = normalize_name(&self.raw_name).to_string();
        PropertyRecord {
            name,
            value: self.value,
            span: self.span,
            raw_name: Some(self.raw_name),
        }
    }
}

/// Reads one property. The `!` marker must already have been consumed.
pub fn read_property(cursor: &mut ByteCursor<'_>, options: &MeshOptions) -> Result<RawProperty> {
    let start = cursor.position();

    let name_len = cursor.next_u8()?;
    let mut raw_name = String::with_capacity(usize::from(name_len));
    for _ in 0..name_len {
        raw_name.push(cursor.next_char()?);
    }

    let type_offset = cursor.position();
    let value = match cursor.next_char()? {
        'i' => {
            let count = cursor.next_u32()?;
            let mut values = Vec::with_capacity(element_capacity(count, cursor));
            for _ in 0..count {
                values.push(cursor.next_i32()?);
            }
            PropertyValue::Ints(values)
        }
        'f' => {
            let count = cursor.next_u32()?;
            let mut values = Vec::with_capacity(element_capacity(count, cursor));
            for _ in 0..count {
                values.push(cursor.next_f32()?);
            }
            PropertyValue::Floats(values)
        }
        's' => {
            let header_offset = cursor.position();
            let _string_count = cursor.next_u32()?;
            let declared = cursor.next_u32()?;
            let string_start = cursor.position();
            let value = cursor.read_null_terminated_string()?;

            if options.strict_strings {
                let actual = u32::try_from(cursor.position() - string_start).unwrap_or(u32::MAX);
                if declared != actual {
                    return Err(Error::StringLengthMismatch {
                        offset: header_offset,
                        declared,
                        actual,
                    });
                }
            }
            PropertyValue::String(value)
        }
        other => return Err(Error::unknown_property_type(type_offset, other)),
    };

    let span = start..cursor.position();
    tracing::trace!(
        name = %raw_name,
        kind = value.kind_name(),
        start = span.start,
        end = span.end,
        "read property"
    );

    Ok(RawProperty {
        raw_name,
        value,
        span,
    })
}

/// Reads one property and normalizes its name.
pub fn decode_property(cursor: &mut ByteCursor<'_>, options: &MeshOptions) -> Result<PropertyRecord> {
    read_property(cursor, options).map(RawProperty::into_record)
}

// Untrusted counts must not drive allocation past what the buffer could hold.
fn element_capacity(count: u32, cursor: &ByteCursor<'_>) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(cursor.remaining() / 4)
}

/// Writes a property, marker included, under [`PropertyRecord::disk_name`].
///
/// Nothing is appended to `out` if the record cannot be encoded.
pub fn write_property(out: &mut Vec<u8>, record: &PropertyRecord) -> Result<()> {
    write_named(out, record.disk_name(), &record.value)
}

pub(crate) fn write_named(out: &mut Vec<u8>, name: &str, value: &PropertyValue) -> Result<()> {
    let name = latin1_bytes(name)?;
    let name_len = u8::try_from(name.len())
        .map_err(|_| Error::unencodable(format!("property name longer than 255 bytes ({})", name.len())))?;

    // Everything fallible happens before the first byte is written.
    let text = match value {
        PropertyValue::String(s) => Some(latin1_bytes(s)?),
        _ => None,
    };
    let count = match (value, &text) {
        (PropertyValue::Ints(values), _) => element_count(values.len())?,
        (PropertyValue::Floats(values), _) => element_count(values.len())?,
        (PropertyValue::String(_), Some(bytes)) => element_count(bytes.len() + 1)?,
        (PropertyValue::String(_), None) => 0,
    };

    out.push(b'!');
    out.push(name_len);
    out.extend_from_slice(&name);
    out.push(value.discriminator() as u8);

    match value {
        PropertyValue::Ints(values) => {
            out.write_u32::<LE>(count)?;
            for &v in values {
                out.write_i32::<LE>(v)?;
            }
        }
        PropertyValue::Floats(values) => {
            out.write_u32::<LE>(count)?;
            for &v in values {
                out.write_f32::<LE>(v)?;
            }
        }
        PropertyValue::String(_) => {
            out.write_u32::<LE>(1)?;
            out.write_u32::<LE>(count)?;
            out.extend_from_slice(text.as_deref().unwrap_or_default());
            out.push(0);
        }
    }
    Ok(())
}

fn element_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::unencodable(format!("{} elements do not fit a u32 count", len)))
}

/// Converts a string to the single-byte encoding used on disk.
///
/// Fails on characters above U+00FF and on embedded NUL, which would end the
/// string early.
pub(crate) fn latin1_bytes(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(0) => Err(Error::unencodable(format!("embedded NUL in {:?}", s))),
            Ok(byte) => Ok(byte),
            Err(_) => Err(Error::unencodable(format!(
                "character {:?} in {:?} is outside Latin-1",
                ch, s
            ))),
        })
        .collect()
}
