//! Command execution.
//!
//! Every invocation loads the contacts file, runs one command, and saves the
//! file back when the command changed something.

use crate::cli::{Command, ValidateArgs};
use crate::config::Config;
use crate::error::AppError;
use contacts_engine::{
    BackendKind, ContactRecord, Error, Field, MatchMode, Store, StoreConfig, Validator,
};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Settings for one invocation, after flags override the environment.
#[derive(Debug, Clone)]
pub struct Session {
    pub file: PathBuf,
    pub backend: BackendKind,
    pub store: StoreConfig,
    pub json: bool,
}

impl Session {
    pub fn new(
        config: Config,
        file: Option<PathBuf>,
        backend: Option<BackendKind>,
        json: bool,
    ) -> Self {
        Self {
            file: file.unwrap_or(config.file),
            backend: backend.unwrap_or(config.backend),
            store: config.store,
            json,
        }
    }

    fn open(&self) -> Result<Store, AppError> {
        let mut store = Store::with_config(self.backend, self.store);
        store.initialize(&self.file)?;
        Ok(store)
    }
}

/// Run `command`, writing its output to `out`.
pub fn run<W: Write>(session: &Session, command: Command, out: &mut W) -> Result<(), AppError> {
    debug!(?command, file = %session.file.display(), backend = %session.backend, "running");

    if let Command::Validate(args) = command {
        return validate(&session.store.validator(), args, session.json, out);
    }

    let mutates = command.mutates();
    let mut store = session.open()?;
    let changed = execute(&mut store, command, session.json, out)?;

    if mutates && changed {
        store.save(&session.file)?;
    }
    Ok(())
}

/// Returns whether the store changed.
fn execute<W: Write>(
    store: &mut Store,
    command: Command,
    json: bool,
    out: &mut W,
) -> Result<bool, AppError> {
    match command {
        Command::List => {
            write_records(out, &store.get_all(), json)?;
            Ok(false)
        }

        Command::Add { name, phone, email } => {
            let change = store.add(&name, &phone, &email)?;
            if json {
                write_json(out, &change)?;
            } else {
                writeln!(out, "{change}")?;
            }
            Ok(true)
        }

        Command::Edit {
            email,
            name,
            phone,
            new_email,
        } => {
            let current = store
                .search_with(&email, Field::Email, MatchMode::Exact)
                .into_iter()
                .next()
                .ok_or_else(|| Error::NotFound(email.clone()))?;

            let change = store.edit(
                &email,
                name.as_deref().unwrap_or(&current.name),
                phone.as_deref().unwrap_or(&current.phone),
                new_email.as_deref().unwrap_or(&current.email),
            )?;
            if json {
                write_json(out, &change)?;
            } else {
                writeln!(out, "{change}")?;
            }
            Ok(true)
        }

        Command::Delete { value, by } => {
            let removed = store.delete_first_by(by, &value);
            if json {
                write_json(out, &json!({ "deleted": removed }))?;
            } else {
                match &removed {
                    Some(record) => writeln!(out, "Deleted {record}")?,
                    None => writeln!(out, "No contact with {by} '{value}'")?,
                }
            }
            Ok(removed.is_some())
        }

        Command::Clear => {
            let count = store.len();
            store.delete_all()?;
            if json {
                write_json(out, &json!({ "cleared": count }))?;
            } else {
                writeln!(out, "Deleted {count} contact(s)")?;
            }
            Ok(count > 0)
        }

        Command::Search {
            query,
            field,
            exact,
        } => {
            let mode = if exact {
                MatchMode::Exact
            } else {
                MatchMode::Substring
            };
            write_records(out, &store.search_with(&query, field, mode), json)?;
            Ok(false)
        }

        Command::Sort { field } => {
            let had_records = !store.is_empty();
            store.sort(field)?;
            let algorithm = store.kind().sort_algorithm();
            if json {
                write_json(
                    out,
                    &json!({ "sorted": store.len(), "field": field, "algorithm": algorithm }),
                )?;
            } else {
                writeln!(
                    out,
                    "Sorted {} contact(s) by {field} using {algorithm}",
                    store.len()
                )?;
            }
            Ok(had_records)
        }

        Command::Count => {
            if json {
                write_json(out, &json!({ "count": store.len() }))?;
            } else {
                writeln!(out, "{}", store.len())?;
            }
            Ok(false)
        }

        Command::Validate(_) => Ok(false),
    }
}

fn validate<W: Write>(
    validator: &Validator,
    args: ValidateArgs,
    json: bool,
    out: &mut W,
) -> Result<(), AppError> {
    let checks = [
        (Field::Name, args.name),
        (Field::Phone, args.phone),
        (Field::Email, args.email),
    ];

    let mut report = serde_json::Map::new();
    let mut failed = 0;

    for (field, value) in checks {
        let Some(value) = value else { continue };
        let result = match field {
            Field::Name => validator.check_name(&value),
            Field::Phone => validator.check_phone(&value),
            Field::Email => validator.check_email(&value),
        };
        let reason = result.err().map(|e| match e {
            Error::InvalidFormat { reason, .. } => reason,
            other => other.to_string(),
        });

        if reason.is_some() {
            failed += 1;
        }
        if !json {
            match &reason {
                None => writeln!(out, "{field}: valid")?,
                Some(reason) => writeln!(out, "{field}: invalid ({reason})")?,
            }
        }
        report.insert(
            field.to_string(),
            json!({ "valid": reason.is_none(), "reason": reason }),
        );
    }

    if json {
        write_json(out, &report)?;
    }
    if failed > 0 {
        return Err(AppError::ValidationFailed(failed));
    }
    Ok(())
}

fn write_records<W: Write>(
    out: &mut W,
    records: &[ContactRecord],
    json: bool,
) -> Result<(), AppError> {
    if json {
        return write_json(out, &records);
    }
    if records.is_empty() {
        writeln!(out, "No contacts found")?;
    }
    for record in records {
        writeln!(out, "{record}")?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
