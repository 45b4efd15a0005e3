//! CSV-backed repository for the shared account balance and its snapshot
//! history.
//!
//! `balance.csv` holds at most one row (last write wins);
//! `balance_history.csv` collects one snapshot per calendar day so the
//! balance trajectory can be plotted later.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{format_csv_date, parse_csv_date, CsvConnection};
use super::fields::parse_amount;
use crate::domain::models::balance::{BalanceSnapshot, CurrentBalance};
use crate::storage::traits::BalanceStorage;

const BALANCE_FILE: &str = "balance.csv";
const BALANCE_HEADER: &str = "balance,effective_date,updated_at";
const HISTORY_FILE: &str = "balance_history.csv";
const HISTORY_HEADER: &str = "day,balance";

#[derive(Clone)]
pub struct BalanceRepository {
    connection: CsvConnection,
}

impl BalanceRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_current(&self) -> Result<Option<CurrentBalance>> {
        self.connection
            .ensure_file_exists(BALANCE_FILE, BALANCE_HEADER)?;

        let file = File::open(self.connection.file_path(BALANCE_FILE))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut current = None;
        for result in reader.records() {
            let record = result.context("reading balance.csv")?;
            let updated_at = record
                .get(2)
                .unwrap_or("")
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now());
            current = Some(CurrentBalance {
                balance: parse_amount(record.get(0).unwrap_or("0"))?,
                effective_date: parse_csv_date(record.get(1).unwrap_or(""))?,
                updated_at,
            });
        }
        Ok(current)
    }

    fn write_current(&self, balance: &CurrentBalance) -> Result<()> {
        let file = self.connection.open_for_rewrite(BALANCE_FILE)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(BALANCE_HEADER.split(','))?;
        writer.write_record(&[
            balance.balance.to_string(),
            format_csv_date(balance.effective_date),
            balance.updated_at.to_rfc3339(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn read_snapshots(&self) -> Result<Vec<BalanceSnapshot>> {
        self.connection
            .ensure_file_exists(HISTORY_FILE, HISTORY_HEADER)?;

        let file = File::open(self.connection.file_path(HISTORY_FILE))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut snapshots = Vec::new();
        for result in reader.records() {
            let record = result.context("reading balance_history.csv")?;
            snapshots.push(BalanceSnapshot {
                day: parse_csv_date(record.get(0).unwrap_or(""))?,
                balance: parse_amount(record.get(1).unwrap_or("0"))?,
            });
        }
        Ok(snapshots)
    }

    fn write_snapshots(&self, snapshots: &[BalanceSnapshot]) -> Result<()> {
        let file = self.connection.open_for_rewrite(HISTORY_FILE)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(HISTORY_HEADER.split(','))?;
        for snapshot in snapshots {
            writer.write_record(&[
                format_csv_date(snapshot.day),
                snapshot.balance.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn record_snapshot(&self, day: NaiveDate, balance: f64) -> Result<()> {
        let mut snapshots = self.read_snapshots()?;
        if snapshots.iter().any(|s| s.day == day) {
            return Ok(());
        }
        snapshots.push(BalanceSnapshot { day, balance });
        self.write_snapshots(&snapshots)
    }
}

impl BalanceStorage for BalanceRepository {
    fn get_current(&self) -> Result<Option<CurrentBalance>> {
        self.read_current()
    }

    fn set_current(&self, balance: &CurrentBalance) -> Result<()> {
        self.write_current(balance)?;
        self.record_snapshot(balance.effective_date, balance.balance)
    }

    fn list_snapshots(&self) -> Result<Vec<BalanceSnapshot>> {
        let mut snapshots = self.read_snapshots()?;
        snapshots.sort_by_key(|s| s.day);
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn balance(amount: f64, day: NaiveDate) -> CurrentBalance {
        CurrentBalance {
            balance: amount,
            effective_date: day,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_store_has_no_balance() {
        let dir = tempfile::tempdir().unwrap();
        let repo = BalanceRepository::new(CsvConnection::new(dir.path()).unwrap());
        assert!(repo.get_current().unwrap().is_none());
        assert!(repo.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let repo = BalanceRepository::new(CsvConnection::new(dir.path()).unwrap());

        repo.set_current(&balance(10_000.0, date(2024, 5, 1))).unwrap();
        repo.set_current(&balance(12_500.0, date(2024, 5, 2))).unwrap();

        let current = repo.get_current().unwrap().unwrap();
        assert_eq!(current.balance, 12_500.0);
        assert_eq!(current.effective_date, date(2024, 5, 2));
    }

    #[test]
    fn one_snapshot_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let repo = BalanceRepository::new(CsvConnection::new(dir.path()).unwrap());

        repo.set_current(&balance(10_000.0, date(2024, 5, 1))).unwrap();
        // A correction on the same day keeps the first snapshot.
        repo.set_current(&balance(9_800.0, date(2024, 5, 1))).unwrap();
        repo.set_current(&balance(11_200.0, date(2024, 5, 2))).unwrap();

        let snapshots = repo.list_snapshots().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].day, date(2024, 5, 1));
        assert_eq!(snapshots[0].balance, 10_000.0);
        assert_eq!(snapshots[1].balance, 11_200.0);
    }
}
