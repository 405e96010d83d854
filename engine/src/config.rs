//! Store configuration.

use crate::{codec::RowPolicy, validate::Validator, FIELD_CAPACITY};
use serde::{Deserialize, Serialize};

/// Tunables for a [`Store`](crate::Store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Bytes per field, terminator slot included.
    pub field_capacity: usize,
    /// Handling of malformed CSV rows on load.
    pub row_policy: RowPolicy,
    /// Reject an add or edit that would repeat an existing email.
    pub unique_emails: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            field_capacity: FIELD_CAPACITY,
            row_policy: RowPolicy::Skip,
            unique_emails: false,
        }
    }
}

impl StoreConfig {
    pub fn with_field_capacity(mut self, capacity: usize) -> Self {
        self.field_capacity = capacity;
        self
    }

    pub fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }

    pub fn with_unique_emails(mut self, unique: bool) -> Self {
        self.unique_emails = unique;
        self
    }

    /// Longest usable field, in bytes.
    pub fn max_field_len(&self) -> usize {
        self.field_capacity.saturating_sub(1)
    }

    /// Validator enforcing this configuration's length bound.
    pub fn validator(&self) -> Validator {
        Validator::for_capacity(self.field_capacity)
    }
}
