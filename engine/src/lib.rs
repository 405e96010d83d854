//! # Contacts Engine
//!
//! A small contact book: name, phone and email records kept in memory and
//! persisted as CSV.
//!
//! ## Design Principles
//!
//! - **Two backends, one API**: a contiguous array or a singly linked list,
//!   chosen when the store is created
//! - **Validated writes**: add and edit reject malformed fields and leave the
//!   store unchanged
//! - **Lenient loads**: malformed CSV rows are skipped (or fail the load when
//!   configured), over-long fields are truncated
//! - **Atomic saves**: rows are written to a temporary file and renamed into
//!   place
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`ContactRecord`] is a `(name, phone, email)` triple. Each field is bounded
//! by [`FIELD_CAPACITY`], which [`StoreConfig`] can override.
//!
//! ### Backends
//!
//! [`BackendKind::Array`] stores records contiguously and sorts with bubble
//! sort. [`BackendKind::List`] chains owned nodes and sorts with merge sort.
//! Both are stable, so they agree on every ordering.
//!
//! ### Identity
//!
//! Contacts are addressed by email. Duplicate emails are accepted unless
//! [`StoreConfig::unique_emails`] is set; edit and delete touch only the first
//! match in storage order.
//!
//! ## Quick Start
//!
//! ```rust
//! use contacts_engine::{BackendKind, Field, Store};
//!
//! let mut store = Store::new(BackendKind::List);
//!
//! store.add("Bo Kim", "9876543210", "bo@y.org").unwrap();
//! let change = store.add("Ann Lee", "1234567890", "ann@x.com").unwrap();
//! assert_eq!(change.to_string(), "Contact 'Ann Lee' added successfully");
//!
//! store.sort(Field::Name).unwrap();
//! let names: Vec<_> = store.get_all().into_iter().map(|r| r.name).collect();
//! assert_eq!(names, ["Ann Lee", "Bo Kim"]);
//!
//! assert_eq!(store.search("kim", Field::Name).len(), 1);
//! assert!(store.delete_by_email("ann@x.com"));
//! assert_eq!(store.len(), 1);
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for use from other
//! languages. Results are exchanged as JSON strings.
//!
//! ## Persistence
//!
//! Use [`Store::initialize`] and [`Store::save`]. The file format is described
//! in [`codec`].

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod ffi;
pub mod record;
pub mod search;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use backend::{ArrayBackend, Backend, BackendKind, ListBackend};
pub use codec::RowPolicy;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use record::{ContactRecord, Field, FIELD_CAPACITY};
pub use search::MatchMode;
pub use store::{Change, ChangeKind, LoadReport, Store};
pub use validate::{is_valid_email, is_valid_name, is_valid_number, Validator};
