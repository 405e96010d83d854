//! CSV row encoding and decoding.
//!
//! The format is deliberately plain: a `name,phone,email` header, then one
//! comma-separated row per contact. Fields are assumed to be comma-free; the
//! email validator rejects commas so write paths cannot produce a row that
//! fails to load.

use crate::ContactRecord;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Header row written by [`write_records`].
pub const HEADER: &str = "name,phone,email";

const SEPARATOR: char = ',';
const COLUMNS: usize = 3;
const BOM: char = '\u{FEFF}';

/// What to do with a row that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Drop the row and count it.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

/// A row that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub reason: String,
}

/// Failure while reading a CSV stream.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed row at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Records decoded from a CSV stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub records: Vec<ContactRecord>,
    /// 1-based line numbers of rows that were dropped.
    pub skipped_lines: Vec<usize>,
}

/// Serialize one record as a CSV row, without the line terminator.
pub fn encode_row(record: &ContactRecord) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        record.name, record.phone, record.email
    )
}

/// Parse one CSV row, truncating each field to `max_len` bytes.
pub fn decode_row(line: &str, max_len: usize) -> Result<ContactRecord, RowError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != COLUMNS {
        return Err(RowError {
            reason: format!("expected {COLUMNS} fields, got {}", fields.len()),
        });
    }

    let mut record = ContactRecord::new(fields[0], fields[1], fields[2]);
    record.truncate_fields(max_len);
    Ok(record)
}

fn is_header(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(HEADER)
}

/// Record a bad row, or fail the load under [`RowPolicy::Abort`].
fn reject(
    decoded: &mut Decoded,
    policy: RowPolicy,
    line: usize,
    reason: String,
) -> Result<(), ReadError> {
    match policy {
        RowPolicy::Skip => {
            decoded.skipped_lines.push(line);
            Ok(())
        }
        RowPolicy::Abort => Err(ReadError::Malformed { line, reason }),
    }
}

/// Read every record from `reader`.
///
/// Blank lines are ignored, as is a header on the first non-blank line.
/// A byte-order mark at the start of the stream is dropped. Rows that are
/// malformed or not valid UTF-8 are handled according to `policy`.
pub fn read_records<R: BufRead>(
    mut reader: R,
    max_len: usize,
    policy: RowPolicy,
) -> Result<Decoded, ReadError> {
    let mut decoded = Decoded::default();
    let mut seen_content = false;
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let Ok(text) = std::str::from_utf8(&buf) else {
            seen_content = true;
            reject(&mut decoded, policy, line_no, "row is not valid UTF-8".into())?;
            continue;
        };
        let mut line = text.strip_suffix('\n').unwrap_or(text);
        if line_no == 1 {
            line = line.strip_prefix(BOM).unwrap_or(line);
        }

        if line.trim().is_empty() {
            continue;
        }
        if !seen_content {
            seen_content = true;
            if is_header(line) {
                continue;
            }
        }

        match decode_row(line, max_len) {
            Ok(record) => decoded.records.push(record),
            Err(e) => reject(&mut decoded, policy, line_no, e.reason)?,
        }
    }

    Ok(decoded)
}

/// Write the header followed by one row per record.
pub fn write_records<'a, W, I>(mut writer: W, records: I) -> std::io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ContactRecord>,
{
    writeln!(writer, "{HEADER}")?;
    let mut written = 0;
    for record in records {
        writeln!(writer, "{}", encode_row(record))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
