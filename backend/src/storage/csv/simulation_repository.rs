//! CSV-backed repository for simulation entries and saved scenarios.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{
    format_csv_date, format_csv_date_opt, parse_csv_date, parse_csv_date_opt, CsvConnection,
};
use super::fields::{
    format_direction, format_rhythm_opt, parse_amount, parse_direction, parse_rhythm_opt,
};
use crate::domain::models::recurring::{Scenario, SimulationEntry};
use crate::storage::traits::SimulationStorage;

const ENTRIES_FILE: &str = "simulations.csv";
const ENTRIES_HEADER: &str = "id,label,amount,direction,anchor_date,end_date,rhythm,scenario_id";
const SCENARIOS_FILE: &str = "scenarios.csv";
const SCENARIOS_HEADER: &str = "id,name,created_at";

#[derive(Clone)]
pub struct SimulationRepository {
    connection: CsvConnection,
}

impl SimulationRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_entries(&self) -> Result<Vec<SimulationEntry>> {
        self.connection
            .ensure_file_exists(ENTRIES_FILE, ENTRIES_HEADER)?;

        let file = File::open(self.connection.file_path(ENTRIES_FILE))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result.context("reading simulations.csv")?;
            let scenario_id = record.get(7).unwrap_or("");
            entries.push(SimulationEntry {
                id: record.get(0).unwrap_or("").to_string(),
                label: record.get(1).unwrap_or("").to_string(),
                amount: parse_amount(record.get(2).unwrap_or("0"))?,
                direction: parse_direction(record.get(3).unwrap_or(""))?,
                anchor_date: parse_csv_date(record.get(4).unwrap_or(""))?,
                end_date: parse_csv_date_opt(record.get(5).unwrap_or(""))?,
                rhythm: parse_rhythm_opt(record.get(6).unwrap_or(""))?,
                scenario_id: (!scenario_id.is_empty()).then(|| scenario_id.to_string()),
            });
        }
        Ok(entries)
    }

    fn write_entries(&self, entries: &[SimulationEntry]) -> Result<()> {
        let file = self.connection.open_for_rewrite(ENTRIES_FILE)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(ENTRIES_HEADER.split(','))?;
        for entry in entries {
            writer.write_record(&[
                entry.id.as_str(),
                entry.label.as_str(),
                &entry.amount.to_string(),
                format_direction(entry.direction),
                &format_csv_date(entry.anchor_date),
                &format_csv_date_opt(entry.end_date),
                format_rhythm_opt(entry.rhythm),
                entry.scenario_id.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_scenarios(&self) -> Result<Vec<Scenario>> {
        self.connection
            .ensure_file_exists(SCENARIOS_FILE, SCENARIOS_HEADER)?;

        let file = File::open(self.connection.file_path(SCENARIOS_FILE))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut scenarios = Vec::new();
        for result in reader.records() {
            let record = result.context("reading scenarios.csv")?;
            let created_at = record
                .get(2)
                .unwrap_or("")
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now());
            scenarios.push(Scenario {
                id: record.get(0).unwrap_or("").to_string(),
                name: record.get(1).unwrap_or("").to_string(),
                created_at,
            });
        }
        Ok(scenarios)
    }

    fn write_scenarios(&self, scenarios: &[Scenario]) -> Result<()> {
        let file = self.connection.open_for_rewrite(SCENARIOS_FILE)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(SCENARIOS_HEADER.split(','))?;
        for scenario in scenarios {
            writer.write_record(&[
                scenario.id.as_str(),
                scenario.name.as_str(),
                &scenario.created_at.to_rfc3339(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl SimulationStorage for SimulationRepository {
    fn store_entry(&self, entry: &SimulationEntry) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)
    }

    fn get_entry(&self, id: &str) -> Result<Option<SimulationEntry>> {
        Ok(self.read_entries()?.into_iter().find(|e| e.id == id))
    }

    fn list_entries(&self) -> Result<Vec<SimulationEntry>> {
        let mut entries = self.read_entries()?;
        entries.sort_by_key(|e| e.anchor_date);
        Ok(entries)
    }

    fn update_entry(&self, entry: &SimulationEntry) -> Result<()> {
        let mut entries = self.read_entries()?;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                *existing = entry.clone();
                self.write_entries(&entries)
            }
            None => anyhow::bail!("simulation entry not found: {}", entry.id),
        }
    }

    fn delete_entry(&self, id: &str) -> Result<bool> {
        let mut entries = self.read_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_entries(&entries)?;
        Ok(true)
    }

    fn store_scenario(&self, scenario: &Scenario) -> Result<()> {
        let mut scenarios = self.read_scenarios()?;
        scenarios.push(scenario.clone());
        self.write_scenarios(&scenarios)
    }

    fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        let mut scenarios = self.read_scenarios()?;
        scenarios.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(scenarios)
    }

    fn get_scenario(&self, id: &str) -> Result<Option<Scenario>> {
        Ok(self.read_scenarios()?.into_iter().find(|s| s.id == id))
    }

    fn delete_scenario(&self, id: &str) -> Result<bool> {
        let mut scenarios = self.read_scenarios()?;
        let before = scenarios.len();
        scenarios.retain(|s| s.id != id);
        if scenarios.len() == before {
            return Ok(false);
        }
        self.write_scenarios(&scenarios)?;

        // Entries of the deleted scenario become unscoped what-ifs.
        let mut entries = self.read_entries()?;
        let mut changed = false;
        for entry in entries.iter_mut() {
            if entry.scenario_id.as_deref() == Some(id) {
                entry.scenario_id = None;
                changed = true;
            }
        }
        if changed {
            self.write_entries(&entries)?;
        }
        Ok(true)
    }
}
