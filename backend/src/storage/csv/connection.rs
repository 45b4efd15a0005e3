//! File-path management for the CSV backend.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Wire format of dates inside the CSV files.
const CSV_DATE_FORMAT: &str = "%Y-%m-%d";

/// Manages the data directory and hands out file paths to the
/// repositories.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open a connection rooted at `base_directory`, creating it if
    /// missing.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Open the default data directory: `$CASHFLOW_DATA_DIR`, falling back
    /// to `./data`.
    pub fn new_default() -> Result<Self> {
        let dir = std::env::var("CASHFLOW_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        info!("Using data directory: {}", dir);
        Self::new(dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Create the file with its header row when it does not exist yet.
    pub fn ensure_file_exists(&self, file_name: &str, header: &str) -> Result<()> {
        let path = self.file_path(file_name);
        if !path.exists() {
            let file = File::create(&path)?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "{}", header)?;
            writer.flush()?;
            info!("Created {}", path.display());
        }
        Ok(())
    }

    /// Open a file truncated for a full rewrite.
    pub fn open_for_rewrite(&self, file_name: &str) -> Result<File> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.file_path(file_name))?;
        Ok(file)
    }
}

/// Parse a CSV date field.
pub fn parse_csv_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, CSV_DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", s, e))
}

/// Parse an optional CSV date field; the empty string means absent.
pub fn parse_csv_date_opt(s: &str) -> Result<Option<NaiveDate>> {
    if s.is_empty() {
        Ok(None)
    } else {
        parse_csv_date(s).map(Some)
    }
}

pub fn format_csv_date(date: NaiveDate) -> String {
    date.format(CSV_DATE_FORMAT).to_string()
}

pub fn format_csv_date_opt(date: Option<NaiveDate>) -> String {
    date.map(format_csv_date).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_base_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("books");
        let conn = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());

        conn.ensure_file_exists("transactions.csv", "id,date").unwrap();
        let content = fs::read_to_string(conn.file_path("transactions.csv")).unwrap();
        assert_eq!(content, "id,date\n");

        // A second call leaves existing content alone.
        conn.ensure_file_exists("transactions.csv", "id,date").unwrap();
        let content = fs::read_to_string(conn.file_path("transactions.csv")).unwrap();
        assert_eq!(content, "id,date\n");
    }

    #[test]
    fn date_helpers_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_csv_date(&format_csv_date(date)).unwrap(), date);
        assert_eq!(parse_csv_date_opt("").unwrap(), None);
        assert_eq!(format_csv_date_opt(None), "");
        assert!(parse_csv_date("29.02.2024").is_err());
    }
}
