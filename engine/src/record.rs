//! Contact record types.

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte budget of one record field, including the terminator slot of the
/// fixed-width C layout. The usable length is one less.
pub const FIELD_CAPACITY: usize = 50;

/// One of the three fields of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Email,
}

impl Field {
    /// All fields in CSV column order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Phone, Field::Email];

    /// Decode the wire code used by the C API (1 = name, 2 = phone, 3 = email).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Field::Name),
            2 => Ok(Field::Phone),
            3 => Ok(Field::Email),
            other => Err(Error::UnknownField(other)),
        }
    }

    /// Wire code of this field.
    pub fn code(self) -> i32 {
        match self {
            Field::Name => 1,
            Field::Phone => 2,
            Field::Email => 3,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Phone => write!(f, "phone"),
            Field::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "phone" | "number" => Ok(Field::Phone),
            "email" => Ok(Field::Email),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// A single contact.
///
/// Records are plain values: the store copies them in and hands out copies,
/// so nothing outside a backend ever aliases its storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactRecord {
    /// Create a record without validating or truncating the fields.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Get the value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }

    /// Cut every field down to `max_len` bytes.
    pub fn truncate_fields(&mut self, max_len: usize) {
        truncate_in_place(&mut self.name, max_len);
        truncate_in_place(&mut self.phone, max_len);
        truncate_in_place(&mut self.email, max_len);
    }
}

impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.phone)
    }
}

/// Truncate to at most `max_len` bytes without splitting a UTF-8 sequence.
pub(crate) fn truncate_in_place(value: &mut String, max_len: usize) {
    if value.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}
