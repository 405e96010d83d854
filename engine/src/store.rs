//! Store - the contact collection handle.
//!
//! A Store owns one backend, chosen when it is built, and routes every
//! operation through the validator and CSV codec. Failed operations leave the
//! records untouched.

use crate::{
    backend::{Backend, BackendKind},
    codec::{self, ReadError},
    error::Result,
    search::{self, MatchMode, Query},
    validate::Validator,
    ContactRecord, Error, Field, StoreConfig,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of loading a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Records now held by the store.
    pub loaded: usize,
    /// Malformed rows that were dropped.
    pub skipped: usize,
}

/// What a successful write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Updated,
}

/// A successful add or edit, carrying the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub kind: ChangeKind,
    pub record: ContactRecord,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChangeKind::Added => write!(f, "Contact '{}' added successfully", self.record.name),
            ChangeKind::Updated => {
                write!(f, "Contact '{}' updated successfully", self.record.name)
            }
        }
    }
}

/// The contact collection.
#[derive(Debug)]
pub struct Store {
    backend: Box<dyn Backend>,
    config: StoreConfig,
    validator: Validator,
}

impl Store {
    /// Create an empty store with the default configuration.
    pub fn new(kind: BackendKind) -> Self {
        Self::with_config(kind, StoreConfig::default())
    }

    /// Create an empty store with an explicit configuration.
    pub fn with_config(kind: BackendKind, config: StoreConfig) -> Self {
        Self {
            backend: kind.create(),
            validator: config.validator(),
            config,
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Iterate records in storage order without copying.
    pub fn iter(&self) -> impl Iterator<Item = &ContactRecord> + '_ {
        self.backend.iter()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replace the contents with the records in the CSV file at `path`.
    ///
    /// A missing or empty file leaves the store empty. On error the previous
    /// contents are kept.
    pub fn initialize(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no contacts file, starting empty");
                self.backend = self.kind().create();
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        let decoded = codec::read_records(
            BufReader::new(file),
            self.config.max_field_len(),
            self.config.row_policy,
        )
        .map_err(|e| match e {
            ReadError::Io(err) => Error::io(path, err),
            ReadError::Malformed { line, reason } => {
                warn!(path = %path.display(), line, %reason, "aborting load on malformed row");
                Error::MalformedRow { line, reason }
            }
        })?;

        for line in &decoded.skipped_lines {
            warn!(path = %path.display(), line, "skipped malformed row");
        }

        let report = LoadReport {
            loaded: decoded.records.len(),
            skipped: decoded.skipped_lines.len(),
        };

        let mut backend = self.kind().create();
        backend.extend(decoded.records);
        self.backend = backend;

        info!(
            path = %path.display(),
            backend = %self.kind(),
            loaded = report.loaded,
            skipped = report.skipped,
            "loaded contacts"
        );
        Ok(report)
    }

    /// Drop every record and release the backing storage.
    pub fn cleanup(&mut self) {
        self.backend.release();
        debug!(backend = %self.kind(), "store released");
    }

    /// Write every record, in current order, to `path`.
    ///
    /// The rows go to `<path>.tmp` first, which is synced and then renamed
    /// over the destination.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let tmp = temp_path(path);

        match write_atomically(path, &tmp, self.backend.iter()) {
            Ok(written) => {
                info!(path = %path.display(), rows = written, "saved contacts");
                Ok(written)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(Error::io(path, e))
            }
        }
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Validate and append a contact.
    pub fn add(&mut self, name: &str, phone: &str, email: &str) -> Result<Change> {
        let record = ContactRecord::new(name, phone, email);
        self.validator.check_record(&record)?;

        if self.config.unique_emails && self.contains(Field::Email, email) {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        debug!(email, "adding contact");
        self.backend.push(record.clone());
        Ok(Change {
            kind: ChangeKind::Added,
            record,
        })
    }

    /// Overwrite the first contact whose email is `old_email`.
    pub fn edit(
        &mut self,
        old_email: &str,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<Change> {
        if !self.contains(Field::Email, old_email) {
            return Err(Error::NotFound(old_email.to_string()));
        }

        let updated = ContactRecord::new(name, phone, email);
        self.validator.check_record(&updated)?;

        // The target is the first holder of old_email, so any holder of a
        // different new email is another record.
        if self.config.unique_emails && email != old_email && self.contains(Field::Email, email)
        {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let target = self
            .backend
            .find_first_mut(&|r| r.email == old_email)
            .ok_or_else(|| Error::NotFound(old_email.to_string()))?;
        *target = updated.clone();

        debug!(old_email, email, "edited contact");
        Ok(Change {
            kind: ChangeKind::Updated,
            record: updated,
        })
    }

    /// Owned copy of every record in storage order.
    pub fn get_all(&self) -> Vec<ContactRecord> {
        self.backend.iter().cloned().collect()
    }

    /// Whether some record's `field` equals `value` exactly.
    pub fn contains(&self, field: Field, value: &str) -> bool {
        self.backend.iter().any(|r| r.get(field) == value)
    }

    /// Remove the first record with this email. Returns whether one was found.
    pub fn delete_by_email(&mut self, email: &str) -> bool {
        self.delete_first_by(Field::Email, email).is_some()
    }

    /// Remove and return the first record whose `field` equals `value`.
    pub fn delete_first_by(&mut self, field: Field, value: &str) -> Option<ContactRecord> {
        let removed = self.backend.remove_first(&|r| r.get(field) == value);
        match &removed {
            Some(record) => debug!(%field, value, email = %record.email, "deleted contact"),
            None => debug!(%field, value, "no contact to delete"),
        }
        removed
    }

    /// Drop every record.
    pub fn delete_all(&mut self) -> Result<()> {
        if let Err(e) = self.backend.check_integrity() {
            error!(error = %e, backend = %self.kind(), "refusing to clear corrupted store");
            return Err(e);
        }
        let dropped = self.backend.len();
        self.backend.clear();
        debug!(dropped, "deleted all contacts");
        Ok(())
    }

    // =========================================================================
    // Search & sort
    // =========================================================================

    /// Case-insensitive substring search on one field.
    pub fn search(&self, query: &str, field: Field) -> Vec<ContactRecord> {
        self.search_with(query, field, MatchMode::Substring)
    }

    /// Search on one field with an explicit match mode.
    pub fn search_with(&self, query: &str, field: Field, mode: MatchMode) -> Vec<ContactRecord> {
        let found = search::scan(self.backend.iter(), &Query::new(query, field, mode));
        debug!(query, %field, ?mode, matches = found.len(), "searched contacts");
        found
    }

    /// Sort ascending by `field` using the backend's algorithm.
    pub fn sort(&mut self, field: Field) -> Result<()> {
        if let Err(e) = self.backend.sort_by(field) {
            error!(error = %e, backend = %self.kind(), %field, "sort failed");
            return Err(e);
        }
        debug!(
            %field,
            algorithm = self.kind().sort_algorithm(),
            count = self.len(),
            "sorted contacts"
        );
        Ok(())
    }
}

/// `<path>.tmp` next to the destination.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomically<'a, I>(path: &Path, tmp: &Path, records: I) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a ContactRecord>,
{
    let mut writer = BufWriter::new(File::create(tmp)?);
    let written = codec::write_records(&mut writer, records)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    fs::rename(tmp, path)?;
    Ok(written)
}
