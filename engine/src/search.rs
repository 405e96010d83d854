//! Linear field search.

use crate::{ContactRecord, Field};
use serde::{Deserialize, Serialize};

/// How a query is compared with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Whole-field, case-sensitive equality.
    Exact,
}

/// Prepared query, lower-cased once for the whole scan.
#[derive(Debug, Clone)]
pub struct Query<'q> {
    raw: &'q str,
    folded: String,
    field: Field,
    mode: MatchMode,
}

impl<'q> Query<'q> {
    pub fn new(raw: &'q str, field: Field, mode: MatchMode) -> Self {
        let folded = match mode {
            MatchMode::Substring => raw.to_lowercase(),
            MatchMode::Exact => String::new(),
        };
        Self {
            raw,
            folded,
            field,
            mode,
        }
    }

    /// An empty query matches nothing.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn matches(&self, record: &ContactRecord) -> bool {
        if self.is_empty() {
            return false;
        }
        let value = record.get(self.field);
        match self.mode {
            MatchMode::Substring => value.to_lowercase().contains(self.folded.as_str()),
            MatchMode::Exact => value == self.raw,
        }
    }
}

/// Copy every record accepted by `query`, keeping the input order.
pub fn scan<'a, I>(records: I, query: &Query<'_>) -> Vec<ContactRecord>
where
    I: IntoIterator<Item = &'a ContactRecord>,
{
    if query.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect()
}
