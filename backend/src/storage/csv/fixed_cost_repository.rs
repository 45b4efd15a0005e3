//! CSV-backed repository for fixed-cost definitions.

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{
    format_csv_date, format_csv_date_opt, parse_csv_date, parse_csv_date_opt, CsvConnection,
};
use super::fields::{format_direction, format_rhythm, parse_amount, parse_direction, parse_rhythm};
use crate::domain::models::recurring::FixedCost;
use crate::storage::traits::FixedCostStorage;

const FILE_NAME: &str = "fixed_costs.csv";
const HEADER: &str = "id,label,amount,direction,anchor_date,end_date,rhythm";

#[derive(Clone)]
pub struct FixedCostRepository {
    connection: CsvConnection,
}

impl FixedCostRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<FixedCost>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut fixed_costs = Vec::new();
        for result in reader.records() {
            let record = result.context("reading fixed_costs.csv")?;
            fixed_costs.push(FixedCost {
                id: record.get(0).unwrap_or("").to_string(),
                label: record.get(1).unwrap_or("").to_string(),
                amount: parse_amount(record.get(2).unwrap_or("0"))?,
                direction: parse_direction(record.get(3).unwrap_or(""))?,
                anchor_date: parse_csv_date(record.get(4).unwrap_or(""))?,
                end_date: parse_csv_date_opt(record.get(5).unwrap_or(""))?,
                rhythm: parse_rhythm(record.get(6).unwrap_or(""))?,
            });
        }
        Ok(fixed_costs)
    }

    fn write_all(&self, fixed_costs: &[FixedCost]) -> Result<()> {
        let file = self.connection.open_for_rewrite(FILE_NAME)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(HEADER.split(','))?;
        for fc in fixed_costs {
            writer.write_record(&[
                fc.id.as_str(),
                fc.label.as_str(),
                &fc.amount.to_string(),
                format_direction(fc.direction),
                &format_csv_date(fc.anchor_date),
                &format_csv_date_opt(fc.end_date),
                format_rhythm(fc.rhythm),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl FixedCostStorage for FixedCostRepository {
    fn store_fixed_cost(&self, fixed_cost: &FixedCost) -> Result<()> {
        let mut fixed_costs = self.read_all()?;
        fixed_costs.push(fixed_cost.clone());
        self.write_all(&fixed_costs)
    }

    fn get_fixed_cost(&self, id: &str) -> Result<Option<FixedCost>> {
        Ok(self.read_all()?.into_iter().find(|fc| fc.id == id))
    }

    fn list_fixed_costs(&self) -> Result<Vec<FixedCost>> {
        let mut fixed_costs = self.read_all()?;
        fixed_costs.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(fixed_costs)
    }

    fn update_fixed_cost(&self, fixed_cost: &FixedCost) -> Result<()> {
        let mut fixed_costs = self.read_all()?;
        match fixed_costs.iter_mut().find(|fc| fc.id == fixed_cost.id) {
            Some(existing) => {
                *existing = fixed_cost.clone();
                self.write_all(&fixed_costs)
            }
            None => anyhow::bail!("fixed cost not found: {}", fixed_cost.id),
        }
    }

    fn delete_fixed_cost(&self, id: &str) -> Result<bool> {
        let mut fixed_costs = self.read_all()?;
        let before = fixed_costs.len();
        fixed_costs.retain(|fc| fc.id != id);
        if fixed_costs.len() == before {
            return Ok(false);
        }
        self.write_all(&fixed_costs)?;
        Ok(true)
    }
}
