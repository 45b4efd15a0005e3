//! Translation between wire DTOs and domain types.
//!
//! Pure functions only; date strings are parsed here so every malformed
//! date fails the same way before reaching a service.

use anyhow::Result;
use chrono::NaiveDate;
use shared::{
    BalanceSnapshotDto, BalancedTransactionDto, CategoryTotalDto, CreateFixedCostRequest,
    CreateSalaryRequest, CreateSimulationRequest, CreateTransactionRequest, CurrentBalanceDto,
    DailyBalanceDto, FixedCostDto, ImportRow, MonthlySummaryDto, OverrideDto, RunwayDto,
    SalaryDto, ScenarioDto, SimulationEntryDto, TransactionDto, UpdateFixedCostRequest,
    UpdateSalaryRequest, UpdateSimulationRequest, UpdateTransactionRequest,
    UpsertOverrideRequest,
};

use crate::domain::commands::fixed_costs::{
    CreateFixedCostCommand, UpdateFixedCostCommand, UpsertOverrideCommand,
};
use crate::domain::commands::payroll::{CreateSalaryCommand, UpdateSalaryCommand};
use crate::domain::commands::reports::RunwayResult;
use crate::domain::commands::simulations::{CreateSimulationCommand, UpdateSimulationCommand};
use crate::domain::commands::transactions::{
    CreateTransactionCommand, ImportRowCommand, UpdateTransactionCommand,
};
use crate::domain::errors::DomainError;
use crate::domain::models::balance::{BalanceSnapshot, CurrentBalance};
use crate::domain::models::recurring::{
    FixedCost, OccurrenceOverride, SalaryRecord, Scenario, SimulationEntry,
};
use crate::domain::models::transaction::{BalancedTransaction, OneOffTransaction};
use crate::domain::normalize::classify_one_off;
use crate::domain::reporting::{CategoryTotal, DailyBalancePoint, MonthlySummary};

/// Parse a wire date or fail with a validation error naming the field.
pub fn wire_date(field: &str, s: &str) -> Result<NaiveDate> {
    shared::parse_date(s).ok_or_else(|| {
        DomainError::Validation(format!("Invalid date for '{}': '{}'", field, s)).into()
    })
}

fn wire_date_opt(field: &str, s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(|s| wire_date(field, s)).transpose()
}

// --- transactions ---

pub fn create_transaction_command(request: CreateTransactionRequest) -> Result<CreateTransactionCommand> {
    Ok(CreateTransactionCommand {
        date: wire_date("date", &request.date)?,
        details: request.details,
        amount: request.amount,
        direction: request.direction,
        category: request.category,
        is_simulation: request.is_simulation,
    })
}

pub fn update_transaction_command(request: UpdateTransactionRequest) -> Result<UpdateTransactionCommand> {
    Ok(UpdateTransactionCommand {
        date: wire_date_opt("date", request.date.as_deref())?,
        details: request.details,
        amount: request.amount,
        direction: request.direction,
    })
}

pub fn import_row_command(row: ImportRow) -> Result<ImportRowCommand> {
    Ok(ImportRowCommand {
        date: wire_date("date", &row.date)?,
        details: row.details,
        amount: row.amount,
        direction: row.direction,
        category: row.category,
    })
}

pub fn transaction_to_dto(tx: &OneOffTransaction) -> TransactionDto {
    TransactionDto {
        id: tx.id.clone(),
        date: shared::format_date(tx.date),
        details: tx.details.clone(),
        amount: tx.amount,
        direction: tx.direction,
        category: classify_one_off(tx),
        modified: tx.modified,
        is_simulation: tx.is_simulation,
    }
}

pub fn balanced_to_dto(balanced: &BalancedTransaction) -> BalancedTransactionDto {
    let tx = &balanced.transaction;
    BalancedTransactionDto {
        date: shared::format_date(tx.date),
        details: tx.details.clone(),
        amount: tx.amount,
        signed_amount: tx.signed_amount,
        direction: tx.direction,
        category: tx.category,
        running_balance: balanced.running_balance,
        was_date_shifted: tx.was_date_shifted,
        projected: balanced.projected,
    }
}

// --- fixed costs & overrides ---

pub fn create_fixed_cost_command(request: CreateFixedCostRequest) -> Result<CreateFixedCostCommand> {
    Ok(CreateFixedCostCommand {
        label: request.label,
        amount: request.amount,
        direction: request.direction,
        anchor_date: wire_date("anchor_date", &request.anchor_date)?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
        rhythm: request.rhythm,
    })
}

pub fn update_fixed_cost_command(request: UpdateFixedCostRequest) -> Result<UpdateFixedCostCommand> {
    Ok(UpdateFixedCostCommand {
        label: request.label,
        amount: request.amount,
        anchor_date: wire_date_opt("anchor_date", request.anchor_date.as_deref())?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
        rhythm: request.rhythm,
    })
}

pub fn upsert_override_command(
    definition_id: String,
    request: UpsertOverrideRequest,
) -> Result<UpsertOverrideCommand> {
    Ok(UpsertOverrideCommand {
        definition_id,
        original_date: wire_date("original_date", &request.original_date)?,
        new_date: wire_date_opt("new_date", request.new_date.as_deref())?,
        new_amount: request.new_amount,
        skipped: request.skipped,
        notes: request.notes,
    })
}

pub fn fixed_cost_to_dto(fixed_cost: &FixedCost) -> FixedCostDto {
    FixedCostDto {
        id: fixed_cost.id.clone(),
        label: fixed_cost.label.clone(),
        amount: fixed_cost.amount,
        direction: fixed_cost.direction,
        anchor_date: shared::format_date(fixed_cost.anchor_date),
        end_date: fixed_cost.end_date.map(shared::format_date),
        rhythm: fixed_cost.rhythm,
    }
}

pub fn override_to_dto(ov: &OccurrenceOverride) -> OverrideDto {
    OverrideDto {
        definition_id: ov.definition_id.clone(),
        original_date: shared::format_date(ov.original_date),
        new_date: ov.new_date.map(shared::format_date),
        new_amount: ov.new_amount,
        skipped: ov.skipped,
        notes: ov.notes.clone(),
    }
}

// --- payroll ---

pub fn create_salary_command(request: CreateSalaryRequest) -> Result<CreateSalaryCommand> {
    Ok(CreateSalaryCommand {
        employee: request.employee,
        amount: request.amount,
        start_date: wire_date("start_date", &request.start_date)?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
    })
}

pub fn update_salary_command(request: UpdateSalaryRequest) -> Result<UpdateSalaryCommand> {
    Ok(UpdateSalaryCommand {
        employee: request.employee,
        amount: request.amount,
        start_date: wire_date_opt("start_date", request.start_date.as_deref())?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
    })
}

pub fn salary_to_dto(salary: &SalaryRecord) -> SalaryDto {
    SalaryDto {
        id: salary.id.clone(),
        employee: salary.employee.clone(),
        amount: salary.amount,
        start_date: shared::format_date(salary.start_date),
        end_date: salary.end_date.map(shared::format_date),
    }
}

// --- simulations & scenarios ---

pub fn create_simulation_command(request: CreateSimulationRequest) -> Result<CreateSimulationCommand> {
    Ok(CreateSimulationCommand {
        label: request.label,
        amount: request.amount,
        direction: request.direction,
        anchor_date: wire_date("anchor_date", &request.anchor_date)?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
        rhythm: request.rhythm,
        scenario_id: request.scenario_id,
    })
}

pub fn update_simulation_command(request: UpdateSimulationRequest) -> Result<UpdateSimulationCommand> {
    Ok(UpdateSimulationCommand {
        label: request.label,
        amount: request.amount,
        anchor_date: wire_date_opt("anchor_date", request.anchor_date.as_deref())?,
        end_date: wire_date_opt("end_date", request.end_date.as_deref())?,
        rhythm: request.rhythm,
    })
}

pub fn simulation_to_dto(entry: &SimulationEntry) -> SimulationEntryDto {
    SimulationEntryDto {
        id: entry.id.clone(),
        label: entry.label.clone(),
        amount: entry.amount,
        direction: entry.direction,
        anchor_date: shared::format_date(entry.anchor_date),
        end_date: entry.end_date.map(shared::format_date),
        rhythm: entry.rhythm,
        scenario_id: entry.scenario_id.clone(),
    }
}

pub fn scenario_to_dto(scenario: &Scenario) -> ScenarioDto {
    ScenarioDto {
        id: scenario.id.clone(),
        name: scenario.name.clone(),
        created_at: scenario.created_at.to_rfc3339(),
    }
}

// --- balance ---

pub fn balance_to_dto(balance: &CurrentBalance) -> CurrentBalanceDto {
    CurrentBalanceDto {
        balance: balance.balance,
        effective_date: shared::format_date(balance.effective_date),
        updated_at: balance.updated_at.to_rfc3339(),
    }
}

pub fn snapshot_to_dto(snapshot: &BalanceSnapshot) -> BalanceSnapshotDto {
    BalanceSnapshotDto {
        day: shared::format_date(snapshot.day),
        balance: snapshot.balance,
    }
}

// --- reports ---

pub fn monthly_to_dto(summary: &MonthlySummary) -> MonthlySummaryDto {
    MonthlySummaryDto {
        month: summary.month.clone(),
        income: summary.income,
        expenses: summary.expenses,
        net: summary.net,
    }
}

pub fn category_total_to_dto(total: &CategoryTotal) -> CategoryTotalDto {
    CategoryTotalDto {
        category: total.category,
        total: total.total,
    }
}

pub fn daily_point_to_dto(point: &DailyBalancePoint) -> DailyBalanceDto {
    DailyBalanceDto {
        date: shared::format_date(point.date),
        balance: point.balance,
    }
}

/// JSON has no Infinity; unbounded runway goes out as `null`.
pub fn runway_to_dto(result: &RunwayResult) -> RunwayDto {
    RunwayDto {
        current_balance: result.current_balance,
        monthly_burn_rate: result.monthly_burn_rate,
        months_of_runway: result
            .months_of_runway
            .is_finite()
            .then_some(result.months_of_runway),
    }
}
