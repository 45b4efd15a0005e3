//! CSV-backed repository for payroll records.

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::connection::{
    format_csv_date, format_csv_date_opt, parse_csv_date, parse_csv_date_opt, CsvConnection,
};
use super::fields::parse_amount;
use crate::domain::models::recurring::SalaryRecord;
use crate::storage::traits::PayrollStorage;

const FILE_NAME: &str = "payroll.csv";
const HEADER: &str = "id,employee,amount,start_date,end_date";

#[derive(Clone)]
pub struct PayrollRepository {
    connection: CsvConnection,
}

impl PayrollRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<SalaryRecord>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut salaries = Vec::new();
        for result in reader.records() {
            let record = result.context("reading payroll.csv")?;
            salaries.push(SalaryRecord {
                id: record.get(0).unwrap_or("").to_string(),
                employee: record.get(1).unwrap_or("").to_string(),
                amount: parse_amount(record.get(2).unwrap_or("0"))?,
                start_date: parse_csv_date(record.get(3).unwrap_or(""))?,
                end_date: parse_csv_date_opt(record.get(4).unwrap_or(""))?,
            });
        }
        Ok(salaries)
    }

    fn write_all(&self, salaries: &[SalaryRecord]) -> Result<()> {
        let file = self.connection.open_for_rewrite(FILE_NAME)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(HEADER.split(','))?;
        for salary in salaries {
            writer.write_record(&[
                salary.id.as_str(),
                salary.employee.as_str(),
                &salary.amount.to_string(),
                &format_csv_date(salary.start_date),
                &format_csv_date_opt(salary.end_date),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl PayrollStorage for PayrollRepository {
    fn store_salary(&self, salary: &SalaryRecord) -> Result<()> {
        let mut salaries = self.read_all()?;
        salaries.push(salary.clone());
        self.write_all(&salaries)
    }

    fn get_salary(&self, id: &str) -> Result<Option<SalaryRecord>> {
        Ok(self.read_all()?.into_iter().find(|s| s.id == id))
    }

    fn list_salaries(&self) -> Result<Vec<SalaryRecord>> {
        let mut salaries = self.read_all()?;
        salaries.sort_by(|a, b| a.employee.cmp(&b.employee));
        Ok(salaries)
    }

    fn update_salary(&self, salary: &SalaryRecord) -> Result<()> {
        let mut salaries = self.read_all()?;
        match salaries.iter_mut().find(|s| s.id == salary.id) {
            Some(existing) => {
                *existing = salary.clone();
                self.write_all(&salaries)
            }
            None => anyhow::bail!("salary record not found: {}", salary.id),
        }
    }

    fn delete_salary(&self, id: &str) -> Result<bool> {
        let mut salaries = self.read_all()?;
        let before = salaries.len();
        salaries.retain(|s| s.id != id);
        if salaries.len() == before {
            return Ok(false);
        }
        self.write_all(&salaries)?;
        Ok(true)
    }
}
