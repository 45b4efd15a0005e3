//! Service for payroll records.

use anyhow::Result;
use tracing::info;

use crate::domain::commands::payroll::{CreateSalaryCommand, UpdateSalaryCommand};
use crate::domain::errors::DomainError;
use crate::domain::models::recurring::SalaryRecord;
use crate::storage::csv::{CsvConnection, PayrollRepository};
use crate::storage::PayrollStorage;

#[derive(Clone)]
pub struct PayrollService {
    payroll_repository: PayrollRepository,
}

impl PayrollService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            payroll_repository: PayrollRepository::new(connection),
        }
    }

    pub fn create_salary(&self, command: CreateSalaryCommand) -> Result<SalaryRecord> {
        if command.employee.trim().is_empty() {
            return Err(DomainError::Validation("Employee name must not be empty".to_string()).into());
        }
        if !command.amount.is_finite() || command.amount <= 0.0 {
            return Err(DomainError::Validation("Salary must be a positive number".to_string()).into());
        }
        if let Some(end) = command.end_date {
            if end < command.start_date {
                return Err(DomainError::Validation(
                    "End date must not precede the start date".to_string(),
                )
                .into());
            }
        }

        let salary = SalaryRecord {
            id: SalaryRecord::generate_id(),
            employee: command.employee,
            amount: command.amount,
            start_date: command.start_date,
            end_date: command.end_date,
        };
        self.payroll_repository.store_salary(&salary)?;
        info!("Created salary record for {} ({})", salary.employee, salary.id);
        Ok(salary)
    }

    pub fn get_salary(&self, id: &str) -> Result<SalaryRecord> {
        self.payroll_repository
            .get_salary(id)?
            .ok_or_else(|| DomainError::not_found("Salary record", id).into())
    }

    pub fn list_salaries(&self) -> Result<Vec<SalaryRecord>> {
        self.payroll_repository.list_salaries()
    }

    pub fn update_salary(&self, id: &str, command: UpdateSalaryCommand) -> Result<SalaryRecord> {
        let mut salary = self.get_salary(id)?;

        if let Some(employee) = command.employee {
            if employee.trim().is_empty() {
                return Err(
                    DomainError::Validation("Employee name must not be empty".to_string()).into(),
                );
            }
            salary.employee = employee;
        }
        if let Some(amount) = command.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(
                    DomainError::Validation("Salary must be a positive number".to_string()).into(),
                );
            }
            salary.amount = amount;
        }
        if let Some(start) = command.start_date {
            salary.start_date = start;
        }
        if let Some(end) = command.end_date {
            if end < salary.start_date {
                return Err(DomainError::Validation(
                    "End date must not precede the start date".to_string(),
                )
                .into());
            }
            salary.end_date = Some(end);
        }

        self.payroll_repository.update_salary(&salary)?;
        info!("Updated salary record {}", salary.id);
        Ok(salary)
    }

    pub fn delete_salary(&self, id: &str) -> Result<()> {
        if !self.payroll_repository.delete_salary(id)? {
            return Err(DomainError::not_found("Salary record", id).into());
        }
        info!("Deleted salary record {}", id);
        Ok(())
    }
}
