//! Storage backends.
//!
//! A [`Backend`] owns the records of one store and knows how to find, remove
//! and sort them. The two implementations trade complexity differently:
//!
//! | Backend         | Append | Delete | Sort                  |
//! |-----------------|--------|--------|-----------------------|
//! | [`ArrayBackend`] | O(1)*  | O(n) shift | bubble sort, O(n²) |
//! | [`ListBackend`]  | O(n)   | O(n) relink | merge sort, O(n log n) |
//!
//! \* amortized; capacity doubles when full.

mod array;
mod list;

pub use array::ArrayBackend;
pub use list::ListBackend;

use crate::{error::Result, ContactRecord, Error, Field};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate used to select a record.
pub type Matcher<'a> = &'a dyn Fn(&ContactRecord) -> bool;

/// Storage contract shared by both backends.
pub trait Backend: fmt::Debug + Send {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// Number of records held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a record at the end.
    fn push(&mut self, record: ContactRecord);

    /// Append a batch of records, keeping their order.
    fn extend(&mut self, records: Vec<ContactRecord>);

    /// Iterate records in storage order.
    fn iter(&self) -> Box<dyn Iterator<Item = &ContactRecord> + '_>;

    /// First record in storage order accepted by `matcher`.
    fn find_first_mut(&mut self, matcher: Matcher<'_>) -> Option<&mut ContactRecord>;

    /// Unlink and return the first record accepted by `matcher`.
    fn remove_first(&mut self, matcher: Matcher<'_>) -> Option<ContactRecord>;

    /// Drop every record.
    fn clear(&mut self);

    /// Drop every record and give back any reserved storage.
    fn release(&mut self) {
        self.clear();
    }

    /// Sort ascending by `field` with the backend's own algorithm.
    fn sort_by(&mut self, field: Field) -> Result<()>;

    /// Verify the structure agrees with its bookkeeping.
    fn check_integrity(&self) -> Result<()>;
}

/// Backend selector, fixed when a store is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Contiguous array with bubble sort.
    #[default]
    Array,
    /// Singly linked list with merge sort.
    List,
}

impl BackendKind {
    /// Decode the wire code used by the C API (1 = array, 2 = list).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(BackendKind::Array),
            2 => Ok(BackendKind::List),
            other => Err(Error::UnknownBackend(other)),
        }
    }

    /// Create an empty backend of this kind.
    pub fn create(self) -> Box<dyn Backend> {
        match self {
            BackendKind::Array => Box::new(ArrayBackend::new()),
            BackendKind::List => Box::new(ListBackend::new()),
        }
    }

    /// Name of the sorting algorithm the backend uses.
    pub fn sort_algorithm(self) -> &'static str {
        match self {
            BackendKind::Array => "bubble sort",
            BackendKind::List => "merge sort",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Array => write!(f, "array"),
            BackendKind::List => write!(f, "list"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "array" | "v1" => Ok(BackendKind::Array),
            "list" | "linkedlist" | "linked-list" | "v2" => Ok(BackendKind::List),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}
