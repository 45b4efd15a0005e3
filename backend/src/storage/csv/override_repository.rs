//! CSV-backed repository for per-occurrence overrides.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{
    format_csv_date, format_csv_date_opt, parse_csv_date, parse_csv_date_opt, CsvConnection,
};
use super::fields::{format_bool, parse_bool};
use crate::domain::models::recurring::OccurrenceOverride;
use crate::storage::traits::OverrideStorage;

const FILE_NAME: &str = "overrides.csv";
const HEADER: &str = "definition_id,original_date,new_date,new_amount,skipped,notes";

#[derive(Clone)]
pub struct OverrideRepository {
    connection: CsvConnection,
}

impl OverrideRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<OccurrenceOverride>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut overrides = Vec::new();
        for result in reader.records() {
            let record = result.context("reading overrides.csv")?;
            let new_amount = record.get(3).unwrap_or("");
            overrides.push(OccurrenceOverride {
                definition_id: record.get(0).unwrap_or("").to_string(),
                original_date: parse_csv_date(record.get(1).unwrap_or(""))?,
                new_date: parse_csv_date_opt(record.get(2).unwrap_or(""))?,
                new_amount: if new_amount.is_empty() {
                    None
                } else {
                    Some(super::fields::parse_amount(new_amount)?)
                },
                skipped: parse_bool(record.get(4).unwrap_or("")),
                notes: record.get(5).unwrap_or("").to_string(),
            });
        }
        Ok(overrides)
    }

    fn write_all(&self, overrides: &[OccurrenceOverride]) -> Result<()> {
        let file = self.connection.open_for_rewrite(FILE_NAME)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(HEADER.split(','))?;
        for ov in overrides {
            writer.write_record(&[
                ov.definition_id.as_str(),
                &format_csv_date(ov.original_date),
                &format_csv_date_opt(ov.new_date),
                &ov.new_amount.map(|a| a.to_string()).unwrap_or_default(),
                format_bool(ov.skipped),
                ov.notes.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl OverrideStorage for OverrideRepository {
    fn upsert_override(&self, ov: &OccurrenceOverride) -> Result<()> {
        let mut overrides = self.read_all()?;
        match overrides.iter_mut().find(|existing| {
            existing.definition_id == ov.definition_id
                && existing.original_date == ov.original_date
        }) {
            Some(existing) => *existing = ov.clone(),
            None => overrides.push(ov.clone()),
        }
        self.write_all(&overrides)
    }

    fn get_override(
        &self,
        definition_id: &str,
        original_date: NaiveDate,
    ) -> Result<Option<OccurrenceOverride>> {
        Ok(self.read_all()?.into_iter().find(|ov| {
            ov.definition_id == definition_id && ov.original_date == original_date
        }))
    }

    fn list_overrides(&self) -> Result<Vec<OccurrenceOverride>> {
        self.read_all()
    }

    fn list_overrides_for(&self, definition_id: &str) -> Result<Vec<OccurrenceOverride>> {
        let mut overrides: Vec<OccurrenceOverride> = self
            .read_all()?
            .into_iter()
            .filter(|ov| ov.definition_id == definition_id)
            .collect();
        overrides.sort_by_key(|ov| ov.original_date);
        Ok(overrides)
    }

    fn delete_override(&self, definition_id: &str, original_date: NaiveDate) -> Result<bool> {
        let mut overrides = self.read_all()?;
        let before = overrides.len();
        overrides.retain(|ov| {
            !(ov.definition_id == definition_id && ov.original_date == original_date)
        });
        if overrides.len() == before {
            return Ok(false);
        }
        self.write_all(&overrides)?;
        Ok(true)
    }
}
