//! CLI argument parsing for contacts

use clap::{Args, Parser, Subcommand};
use contacts_engine::{BackendKind, Field};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contacts")]
#[command(author, version, about = "Manage a CSV contact book", long_about = None)]
pub struct Cli {
    /// CSV file holding the contacts (overrides CONTACTS_FILE)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Storage backend: array or list (overrides CONTACTS_BACKEND)
    #[arg(short, long, global = true)]
    pub backend: Option<BackendKind>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every contact
    List,

    /// Add a contact
    Add {
        #[arg(required = true)]
        name: String,

        #[arg(required = true)]
        phone: String,

        #[arg(required = true)]
        email: String,
    },

    /// Edit the first contact with this email; omitted fields keep their value
    Edit {
        /// Current email of the contact
        #[arg(required = true)]
        email: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// New email
        #[arg(long = "new-email")]
        new_email: Option<String>,
    },

    /// Delete the first contact whose field matches exactly
    Delete {
        #[arg(required = true)]
        value: String,

        /// Field to match (default: email)
        #[arg(long, default_value = "email")]
        by: Field,
    },

    /// Delete every contact
    Clear,

    /// Search one field
    Search {
        #[arg(required = true)]
        query: String,

        /// Field to search (default: name)
        #[arg(long, default_value = "name")]
        field: Field,

        /// Whole-field, case-sensitive match
        #[arg(long)]
        exact: bool,
    },

    /// Sort contacts by a field and save the new order
    Sort {
        /// Field to sort by (default: name)
        #[arg(long, default_value = "name")]
        field: Field,
    },

    /// Check values against the contact field rules
    Validate(ValidateArgs),

    /// Print the number of contacts
    Count,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
pub struct ValidateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

impl Command {
    /// Whether the command changes the stored contacts.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Edit { .. }
                | Command::Delete { .. }
                | Command::Clear
                | Command::Sort { .. }
        )
    }
}
