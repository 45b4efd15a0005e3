//! Service for one-off transactions and the cashflow projection.
//!
//! The projection gathers persisted one-offs and expanded occurrences of
//! every recurring source over the requested window, normalizes them into
//! one shape and annotates future rows with running balances.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::balance::enhance;
use crate::domain::balance_service::BalanceService;
use crate::domain::commands::transactions::{
    CreateTransactionCommand, DeleteTransactionsResult, ImportRowCommand,
    ImportTransactionsResult, ProjectionQuery, ProjectionResult, UpdateTransactionCommand,
};
use crate::domain::errors::DomainError;
use crate::domain::expansion::{
    build_override_index, expand_definition, expand_salaries, expand_simulation,
};
use crate::domain::models::transaction::{NormalizedTransaction, OneOffTransaction, SourceKind};
use crate::domain::normalize::{normalize_occurrence, normalize_one_off};
use crate::domain::simulation_service::SimulationService;
use crate::storage::csv::{
    CsvConnection, FixedCostRepository, OverrideRepository, PayrollRepository,
    TransactionRepository,
};
use crate::storage::{FixedCostStorage, OverrideStorage, PayrollStorage, TransactionStorage};

#[derive(Clone)]
pub struct TransactionService {
    transaction_repository: TransactionRepository,
    fixed_cost_repository: FixedCostRepository,
    payroll_repository: PayrollRepository,
    override_repository: OverrideRepository,
    simulation_service: SimulationService,
    balance_service: BalanceService,
}

impl TransactionService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            transaction_repository: TransactionRepository::new(connection.clone()),
            fixed_cost_repository: FixedCostRepository::new(connection.clone()),
            payroll_repository: PayrollRepository::new(connection.clone()),
            override_repository: OverrideRepository::new(connection.clone()),
            simulation_service: SimulationService::new(connection.clone()),
            balance_service: BalanceService::new(connection),
        }
    }

    pub fn create_transaction(&self, command: CreateTransactionCommand) -> Result<OneOffTransaction> {
        validate_details(&command.details)?;
        validate_amount(command.amount)?;

        let transaction = OneOffTransaction {
            id: OneOffTransaction::generate_id(command.direction, OneOffTransaction::now_millis()),
            date: command.date,
            details: command.details,
            amount: command.amount.abs(),
            direction: command.direction,
            category: command.category,
            modified: false,
            is_simulation: command.is_simulation,
        };
        self.transaction_repository.store_transaction(&transaction)?;
        info!("Created transaction {} on {}", transaction.id, transaction.date);
        Ok(transaction)
    }

    pub fn get_transaction(&self, id: &str) -> Result<OneOffTransaction> {
        self.transaction_repository
            .get_transaction(id)?
            .ok_or_else(|| DomainError::not_found("Transaction", id).into())
    }

    pub fn list_transactions(&self) -> Result<Vec<OneOffTransaction>> {
        self.transaction_repository.list_transactions()
    }

    /// Edit a transaction. Any edit marks the record as modified, which
    /// reclassifies it as a manual entry from then on.
    pub fn update_transaction(
        &self,
        id: &str,
        command: UpdateTransactionCommand,
    ) -> Result<OneOffTransaction> {
        let mut transaction = self.get_transaction(id)?;

        if let Some(date) = command.date {
            transaction.date = date;
        }
        if let Some(details) = command.details {
            validate_details(&details)?;
            transaction.details = details;
        }
        if let Some(amount) = command.amount {
            validate_amount(amount)?;
            transaction.amount = amount.abs();
        }
        if let Some(direction) = command.direction {
            transaction.direction = direction;
        }
        transaction.modified = true;

        self.transaction_repository.update_transaction(&transaction)?;
        info!("Updated transaction {}", transaction.id);
        Ok(transaction)
    }

    /// Delete many transactions at once; unknown ids are reported, not
    /// fatal.
    pub fn delete_transactions(&self, ids: &[String]) -> Result<DeleteTransactionsResult> {
        let mut deleted_count = 0;
        let mut not_found_ids = Vec::new();

        for id in ids {
            if self.transaction_repository.delete_transaction(id)? {
                deleted_count += 1;
            } else {
                not_found_ids.push(id.clone());
            }
        }

        if !not_found_ids.is_empty() {
            warn!("Delete skipped {} unknown transaction ids", not_found_ids.len());
        }
        info!("Deleted {} transactions", deleted_count);
        Ok(DeleteTransactionsResult {
            deleted_count,
            not_found_ids,
        })
    }

    /// Bulk import of already-parsed rows, e.g. from a bank statement
    /// export. Rows arrive with unsigned or pre-signed amounts; only the
    /// magnitude is kept.
    pub fn import_transactions(&self, rows: Vec<ImportRowCommand>) -> Result<ImportTransactionsResult> {
        let mut transactions = Vec::with_capacity(rows.len());
        let base = OneOffTransaction::now_millis();
        for (index, row) in rows.into_iter().enumerate() {
            validate_details(&row.details)?;
            validate_amount(row.amount)?;
            transactions.push(OneOffTransaction {
                id: OneOffTransaction::generate_id(row.direction, base + index as u64),
                date: row.date,
                details: row.details,
                amount: row.amount.abs(),
                direction: row.direction,
                category: row.category,
                modified: false,
                is_simulation: false,
            });
        }

        let imported_count = self.transaction_repository.store_transactions(&transactions)?;
        info!("Imported {} transactions", imported_count);
        Ok(ImportTransactionsResult {
            imported_count,
            success_message: format!("{} Transaktionen importiert", imported_count),
        })
    }

    /// Gather and normalize everything falling inside the query window:
    /// persisted one-offs, fixed costs, salaries and (when requested)
    /// simulation entries, with overrides applied during expansion.
    pub fn collect_normalized(&self, query: &ProjectionQuery) -> Result<Vec<NormalizedTransaction>> {
        if query.start > query.end {
            return Err(DomainError::Validation(
                "Window start must not be after window end".to_string(),
            )
            .into());
        }

        let overrides = build_override_index(&self.override_repository.list_overrides()?);
        let mut normalized = Vec::new();

        for tx in self
            .transaction_repository
            .list_transactions_between(query.start, query.end)?
        {
            if tx.is_simulation && !query.include_simulations {
                continue;
            }
            normalized.push(normalize_one_off(&tx));
        }

        for fixed_cost in self.fixed_cost_repository.list_fixed_costs()? {
            for occurrence in expand_definition(
                &fixed_cost.as_definition(),
                query.start,
                query.end,
                &overrides,
            ) {
                normalized.push(normalize_occurrence(&occurrence, SourceKind::FixedCost));
            }
        }

        let salaries = self.payroll_repository.list_salaries()?;
        for occurrence in expand_salaries(&salaries, query.start, query.end, &overrides) {
            normalized.push(normalize_occurrence(&occurrence, SourceKind::Salary));
        }

        if query.include_simulations {
            for entry in self
                .simulation_service
                .entries_for_projection(query.scenario_id.as_deref())?
            {
                for occurrence in expand_simulation(&entry, query.start, query.end, &overrides) {
                    normalized.push(normalize_occurrence(&occurrence, SourceKind::Simulation));
                }
            }
        }

        normalized.sort_by_key(|tx| tx.date);
        Ok(normalized)
    }

    pub fn project_cashflow(&self, query: ProjectionQuery) -> Result<ProjectionResult> {
        self.project_cashflow_as_of(query, chrono::Local::now().date_naive())
    }

    pub fn project_cashflow_as_of(
        &self,
        query: ProjectionQuery,
        today: NaiveDate,
    ) -> Result<ProjectionResult> {
        let normalized = self.collect_normalized(&query)?;
        let starting_balance = self.balance_service.current_balance_or_zero();

        info!(
            "Projecting {} transactions over {} - {}",
            normalized.len(),
            query.start,
            query.end
        );
        Ok(ProjectionResult {
            transactions: enhance(normalized, starting_balance, today),
            starting_balance,
        })
    }
}

fn validate_details(details: &str) -> Result<()> {
    if details.trim().is_empty() {
        return Err(DomainError::Validation("Details must not be empty".to_string()).into());
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount == 0.0 {
        return Err(DomainError::Validation("Amount must be a non-zero number".to_string()).into());
    }
    Ok(())
}
