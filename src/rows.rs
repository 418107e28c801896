//! Delimited row files
//!
//! Thin helpers over the `csv` crate. Rows are read without header handling so
//! the first row is returned like any other; column lookups treat it as the
//! header.

use crate::error::{Error, Result};
use crate::fs::is_dir;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::path::Path;

fn reader(path: &Path) -> Result<csv::Reader<File>> {
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?)
}

/// Read every row of a file
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let mut rdr = reader(path.as_ref())?;
    rdr.records()
        .map(|record| -> Result<Vec<String>> { Ok(to_row(&record?)) })
        .collect()
}

/// Stream rows to `each`; an error from `each` stops the read and is returned
pub fn read_by_record<F>(path: impl AsRef<Path>, mut each: F) -> Result<()>
where
    F: FnMut(Vec<String>) -> Result<()>,
{
    let mut rdr = reader(path.as_ref())?;
    for record in rdr.records() {
        each(to_row(&record?))?;
    }
    Ok(())
}

fn to_row(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
        if !is_dir(parent) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Other(format!("cannot create dir [{}]: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

/// Open `path` for writing, creating missing parent directories
pub fn create_writer(path: impl AsRef<Path>) -> Result<Writer<File>> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    Ok(Writer::from_path(path)?)
}

/// Write one row
pub fn write_record<W, I, T>(writer: &mut Writer<W>, fields: I) -> Result<()>
where
    W: std::io::Write,
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    writer.write_record(fields)?;
    Ok(())
}

/// Index of `key` in the header row
pub fn find_column_index(rows: &[Vec<String>], key: &str) -> Option<usize> {
    rows.first()?.iter().position(|column| column == key)
}

/// Index of `key` in the header row, or an error naming the header
pub fn column_index(rows: &[Vec<String>], key: &str) -> Result<usize> {
    find_column_index(rows, key).ok_or_else(|| {
        let header = rows.first().map(|r| r.join(",")).unwrap_or_default();
        Error::Other(format!("cannot find the key [{key}] from [{header}]"))
    })
}
