//! Line-oriented persistence for the store files
//!
//! Every store file holds one pipe-delimited record per line with no header.
//! This module offers the three primitives the repositories build on:
//!
//! - [`load`] reads and converts every record, tolerating a missing file
//! - [`rewrite_all`] replaces a file's contents through an atomic rename
//! - [`append`] adds a single record at the end of a file
//!
//! # Error Handling
//!
//! - A missing file loads as an empty sequence
//! - A record with the wrong field count, or one that fails conversion,
//!   aborts the load of that file with a [`CanteenError::ParseError`]
//!   carrying the line number
//! - Any other I/O failure is reported as [`CanteenError::StoreUnavailable`]
//!
//! # Serialization
//!
//! Nothing here locks the files themselves. Repositories hold a [`WriteLock`]
//! across each load-mutate-rewrite cycle so that two mutations inside one
//! process cannot interleave. Writers in other processes are not excluded.

use crate::io::record_format::{Record, DELIMITER};
use crate::types::{CanteenError, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tracing::debug;

/// Single-writer serialization point for one store file
#[derive(Debug, Default)]
pub struct WriteLock(Mutex<()>);

impl WriteLock {
    /// Hold the lock for the rest of the caller's scope
    ///
    /// The guarded value is `()`, so a poisoned lock carries no broken state
    /// and is simply taken over.
    pub fn hold(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load every record of a file, converting rows of type `R` into `T`
///
/// Blank lines are skipped. Records are returned in file order.
pub fn load<R, T>(path: &Path) -> Result<Vec<T>>
where
    R: Record,
    T: TryFrom<R, Error = String>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file missing, loading as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(CanteenError::store_unavailable(path, e)),
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let raw = result.map_err(|e| {
            let line = e.position().map(|pos| pos.line());
            CanteenError::parse_error(path, line, e.to_string())
        })?;

        if is_blank(&raw) {
            continue;
        }

        let line = raw.position().map(|pos| pos.line());
        if raw.len() != R::FIELD_COUNT {
            return Err(CanteenError::parse_error(
                path,
                line,
                format!("expected {} fields, found {}", R::FIELD_COUNT, raw.len()),
            ));
        }

        let row: R = raw
            .deserialize(None)
            .map_err(|e| CanteenError::parse_error(path, line, e.to_string()))?;
        let record = T::try_from(row).map_err(|e| CanteenError::parse_error(path, line, e))?;
        records.push(record);
    }

    debug!(path = %path.display(), count = records.len(), "loaded store file");
    Ok(records)
}

/// Replace the whole file with `records`
///
/// The new contents are written to a temporary file next to the target and
/// renamed over it, so a reader never observes a half-written file.
pub fn rewrite_all<'a, R, T>(path: &Path, records: &'a [T]) -> Result<()>
where
    R: Record + From<&'a T>,
{
    let rows: Vec<R> = records.iter().map(R::from).collect();
    let bytes = encode(path, &rows)?;
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| CanteenError::store_unavailable(path, e))?;

    let mut staged =
        NamedTempFile::new_in(dir).map_err(|e| CanteenError::store_unavailable(path, e))?;
    staged
        .write_all(&bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| CanteenError::store_unavailable(path, e))?;
    staged
        .persist(path)
        .map_err(|e| CanteenError::store_unavailable(path, e.error))?;

    debug!(path = %path.display(), count = rows.len(), "rewrote store file");
    Ok(())
}

/// Append one record without disturbing existing ones
pub fn append<'a, R, T>(path: &Path, record: &'a T) -> Result<()>
where
    R: Record + From<&'a T>,
{
    let row = R::from(record);
    let mut bytes = Vec::new();
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| CanteenError::store_unavailable(path, e))?;

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| CanteenError::store_unavailable(path, e))?;

    if !ends_with_newline(&mut file).map_err(|e| CanteenError::store_unavailable(path, e))? {
        bytes.push(b'\n');
    }
    bytes.extend(encode(path, std::slice::from_ref(&row))?);

    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|e| CanteenError::store_unavailable(path, e))?;

    debug!(path = %path.display(), "appended record");
    Ok(())
}

fn encode<R: Record>(path: &Path, rows: &[R]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CanteenError::store_unavailable(path, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| CanteenError::store_unavailable(path, e.error()))
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// True for an empty file or one whose last byte is a newline
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::record_format::{FoodItemRow, WalletRow};
    use crate::types::{FoodItem, WalletBalance};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let records: Vec<WalletBalance> =
            load::<WalletRow, _>(&dir.path().join("wallet.txt")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wallet.txt", "STD101|500.0\n\n   \nSTD102|20\n");

        let records: Vec<WalletBalance> = load::<WalletRow, _>(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student_id, "STD101");
        assert_eq!(records[0].balance, dec!(500.0));
        assert_eq!(records[1].balance, dec!(20));
    }

    #[test]
    fn test_load_reports_wrong_field_count_with_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wallet.txt", "STD101|500.0\nSTD102\n");

        let error = load::<WalletRow, WalletBalance>(&path).unwrap_err();

        match error {
            CanteenError::ParseError { line, message, .. } => {
                assert_eq!(line, Some(2));
                assert!(message.contains("expected 2 fields, found 1"));
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_conversion_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wallet.txt", "STD101|lots\n");

        let error = load::<WalletRow, WalletBalance>(&path).unwrap_err();
        assert!(error.to_string().contains("Invalid amount 'lots'"));
    }

    #[test]
    fn test_rewrite_all_then_load_preserves_order_and_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("food_items.txt");
        let mut soup = FoodItem::new(3, "Soup", "Tomato \"classic\"", dec!(45.50));
        soup.available = false;
        let items = vec![
            FoodItem::new(7, "Burger", "Delicious burger", dec!(100)),
            soup,
            FoodItem::new(1, "Tea", "", dec!(10)),
        ];

        rewrite_all::<FoodItemRow, _>(&path, &items).unwrap();
        let loaded: Vec<FoodItem> = load::<FoodItemRow, _>(&path).unwrap();

        assert_eq!(loaded, items);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("3|Soup|Tomato \"classic\"|45.50|False\n"));
    }

    #[test]
    fn test_append_keeps_existing_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wallet.txt", "STD101|500.0\n");

        append::<WalletRow, _>(&path, &WalletBalance::new("STD102")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "STD101|500.0\nSTD102|0\n");
    }

    #[test]
    fn test_append_repairs_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wallet.txt", "STD101|500.0");

        append::<WalletRow, _>(&path, &WalletBalance::new("STD102")).unwrap();

        let loaded: Vec<WalletBalance> = load::<WalletRow, _>(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_append_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("wallet.txt");

        append::<WalletRow, _>(&path, &WalletBalance::new("STD101")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "STD101|0\n");
    }
}
