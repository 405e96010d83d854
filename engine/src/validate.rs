//! Field validation rules.
//!
//! The free functions apply the rules with the default field capacity and are
//! meant for callers that want to check input before submitting it. The
//! [`Validator`] carries a configurable length bound and reports which rule
//! failed.

use crate::{error::Result, ContactRecord, Error, Field, FIELD_CAPACITY};

/// Number of digits in a valid phone number.
pub const PHONE_DIGITS: usize = 10;

/// Minimum length of the label after the last dot of an email domain.
const MIN_TLD_LEN: usize = 2;

/// Check a name with the default field capacity.
pub fn is_valid_name(name: &str) -> bool {
    Validator::default().check_name(name).is_ok()
}

/// Check a phone number with the default field capacity.
pub fn is_valid_number(number: &str) -> bool {
    Validator::default().check_phone(number).is_ok()
}

/// Check an email address with the default field capacity.
pub fn is_valid_email(email: &str) -> bool {
    Validator::default().check_email(email).is_ok()
}

/// Validation rules bound to a maximum field length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_len: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::for_capacity(FIELD_CAPACITY)
    }
}

impl Validator {
    /// Build a validator for fields of `capacity` bytes, terminator included.
    pub fn for_capacity(capacity: usize) -> Self {
        Self {
            max_len: capacity.saturating_sub(1),
        }
    }

    /// Longest accepted field, in bytes.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Names are non-empty and made of ASCII letters and spaces.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(invalid(Field::Name, "must not be empty"));
        }
        self.check_len(Field::Name, name)?;
        if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            return Err(invalid(Field::Name, "only letters and spaces are allowed"));
        }
        Ok(())
    }

    /// Phone numbers are exactly ten ASCII digits.
    pub fn check_phone(&self, phone: &str) -> Result<()> {
        self.check_len(Field::Phone, phone)?;
        if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(Field::Phone, "must be exactly 10 digits"));
        }
        Ok(())
    }

    /// Emails have one `@`, a local part, and a dotted domain with a
    /// top-level label of at least two characters.
    pub fn check_email(&self, email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(invalid(Field::Email, "must not be empty"));
        }
        self.check_len(Field::Email, email)?;
        if email.chars().any(char::is_whitespace) {
            return Err(invalid(Field::Email, "must not contain whitespace"));
        }
        if email.contains(',') {
            return Err(invalid(Field::Email, "must not contain commas"));
        }

        let (local, domain) = match email.split_once('@') {
            Some(parts) => parts,
            None => return Err(invalid(Field::Email, "missing '@'")),
        };
        if domain.contains('@') {
            return Err(invalid(Field::Email, "more than one '@'"));
        }
        if local.is_empty() {
            return Err(invalid(Field::Email, "missing local part before '@'"));
        }

        let dot = match domain.rfind('.') {
            Some(dot) => dot,
            None => return Err(invalid(Field::Email, "domain must contain a '.'")),
        };
        if dot == 0 {
            return Err(invalid(Field::Email, "domain must not start with '.'"));
        }
        if domain[dot + 1..].chars().count() < MIN_TLD_LEN {
            return Err(invalid(
                Field::Email,
                "top-level domain must have at least 2 characters",
            ));
        }
        Ok(())
    }

    /// Check all three fields, stopping at the first failure.
    pub fn check_record(&self, record: &ContactRecord) -> Result<()> {
        self.check_name(&record.name)?;
        self.check_phone(&record.phone)?;
        self.check_email(&record.email)
    }

    fn check_len(&self, field: Field, value: &str) -> Result<()> {
        if value.len() > self.max_len {
            return Err(Error::InvalidFormat {
                field,
                reason: format!("longer than {} characters", self.max_len),
            });
        }
        Ok(())
    }
}

fn invalid(field: Field, reason: &str) -> Error {
    Error::InvalidFormat {
        field,
        reason: reason.to_string(),
    }
}
