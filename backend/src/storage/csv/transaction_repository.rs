//! CSV-backed repository for persisted one-off transactions.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{format_csv_date, parse_csv_date, CsvConnection};
use super::fields::{
    format_bool, format_category_opt, format_direction, parse_amount, parse_bool,
    parse_category_opt, parse_direction,
};
use crate::domain::models::transaction::OneOffTransaction;
use crate::storage::traits::TransactionStorage;

const FILE_NAME: &str = "transactions.csv";
const HEADER: &str = "id,date,details,amount,direction,category,modified,is_simulation";

#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<OneOffTransaction>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut transactions = Vec::new();
        for result in reader.records() {
            let record = result.context("reading transactions.csv")?;
            transactions.push(OneOffTransaction {
                id: record.get(0).unwrap_or("").to_string(),
                date: parse_csv_date(record.get(1).unwrap_or(""))?,
                details: record.get(2).unwrap_or("").to_string(),
                amount: parse_amount(record.get(3).unwrap_or("0"))?,
                direction: parse_direction(record.get(4).unwrap_or(""))?,
                category: parse_category_opt(record.get(5).unwrap_or(""))?,
                modified: parse_bool(record.get(6).unwrap_or("")),
                is_simulation: parse_bool(record.get(7).unwrap_or("")),
            });
        }
        Ok(transactions)
    }

    fn write_all(&self, transactions: &[OneOffTransaction]) -> Result<()> {
        let file = self.connection.open_for_rewrite(FILE_NAME)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(HEADER.split(','))?;
        for tx in transactions {
            writer.write_record(&[
                tx.id.as_str(),
                &format_csv_date(tx.date),
                tx.details.as_str(),
                &tx.amount.to_string(),
                format_direction(tx.direction),
                format_category_opt(tx.category),
                format_bool(tx.modified),
                format_bool(tx.is_simulation),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TransactionStorage for TransactionRepository {
    fn store_transaction(&self, transaction: &OneOffTransaction) -> Result<()> {
        let mut transactions = self.read_all()?;
        transactions.push(transaction.clone());
        self.write_all(&transactions)
    }

    fn store_transactions(&self, new: &[OneOffTransaction]) -> Result<usize> {
        let mut transactions = self.read_all()?;
        transactions.extend_from_slice(new);
        self.write_all(&transactions)?;
        Ok(new.len())
    }

    fn get_transaction(&self, id: &str) -> Result<Option<OneOffTransaction>> {
        Ok(self.read_all()?.into_iter().find(|tx| tx.id == id))
    }

    fn list_transactions(&self) -> Result<Vec<OneOffTransaction>> {
        let mut transactions = self.read_all()?;
        transactions.sort_by_key(|tx| tx.date);
        Ok(transactions)
    }

    fn list_transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OneOffTransaction>> {
        let mut transactions: Vec<OneOffTransaction> = self
            .read_all()?
            .into_iter()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .collect();
        transactions.sort_by_key(|tx| tx.date);
        Ok(transactions)
    }

    fn update_transaction(&self, transaction: &OneOffTransaction) -> Result<()> {
        let mut transactions = self.read_all()?;
        match transactions.iter_mut().find(|tx| tx.id == transaction.id) {
            Some(existing) => {
                *existing = transaction.clone();
                self.write_all(&transactions)
            }
            None => anyhow::bail!("transaction not found: {}", transaction.id),
        }
    }

    fn delete_transaction(&self, id: &str) -> Result<bool> {
        let mut transactions = self.read_all()?;
        let before = transactions.len();
        transactions.retain(|tx| tx.id != id);
        if transactions.len() == before {
            return Ok(false);
        }
        self.write_all(&transactions)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Category, Direction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo() -> (tempfile::TempDir, TransactionRepository) {
        let dir = tempfile::tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (dir, TransactionRepository::new(conn))
    }

    fn sample(id: &str, day: u32) -> OneOffTransaction {
        OneOffTransaction {
            id: id.to_string(),
            date: date(2024, 5, day),
            details: "Büromaterial, inkl. \"Toner\"".to_string(),
            amount: 89.9,
            direction: Direction::Outgoing,
            category: None,
            modified: false,
            is_simulation: false,
        }
    }

    #[test]
    fn store_and_reload_roundtrip() {
        let (_dir, repo) = repo();
        let tx = sample("tx-out-1-a", 3);
        repo.store_transaction(&tx).unwrap();

        let loaded = repo.get_transaction("tx-out-1-a").unwrap().unwrap();
        assert_eq!(loaded, tx);
    }

    #[test]
    fn list_between_filters_and_sorts() {
        let (_dir, repo) = repo();
        repo.store_transaction(&sample("b", 20)).unwrap();
        repo.store_transaction(&sample("a", 5)).unwrap();
        repo.store_transaction(&sample("c", 28)).unwrap();

        let listed = repo
            .list_transactions_between(date(2024, 5, 1), date(2024, 5, 25))
            .unwrap();
        let ids: Vec<&str> = listed.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn update_replaces_record() {
        let (_dir, repo) = repo();
        repo.store_transaction(&sample("a", 5)).unwrap();

        let mut edited = sample("a", 6);
        edited.amount = 120.0;
        edited.modified = true;
        edited.category = Some(Category::Standard);
        repo.update_transaction(&edited).unwrap();

        let loaded = repo.get_transaction("a").unwrap().unwrap();
        assert_eq!(loaded.amount, 120.0);
        assert!(loaded.modified);

        let missing = sample("zzz", 1);
        assert!(repo.update_transaction(&missing).is_err());
    }

    #[test]
    fn delete_reports_existence() {
        let (_dir, repo) = repo();
        repo.store_transaction(&sample("a", 5)).unwrap();
        assert!(repo.delete_transaction("a").unwrap());
        assert!(!repo.delete_transaction("a").unwrap());
        assert!(repo.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn bulk_store_appends() {
        let (_dir, repo) = repo();
        repo.store_transaction(&sample("a", 5)).unwrap();
        let imported = repo
            .store_transactions(&[sample("b", 6), sample("c", 7)])
            .unwrap();
        assert_eq!(imported, 2);
        assert_eq!(repo.list_transactions().unwrap().len(), 3);
    }
}
