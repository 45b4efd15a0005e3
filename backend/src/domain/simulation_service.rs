//! Service for what-if simulation entries and saved scenarios.

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::domain::commands::simulations::{CreateSimulationCommand, UpdateSimulationCommand};
use crate::domain::errors::DomainError;
use crate::domain::models::recurring::{Scenario, SimulationEntry};
use crate::storage::csv::{CsvConnection, SimulationRepository};
use crate::storage::SimulationStorage;

#[derive(Clone)]
pub struct SimulationService {
    simulation_repository: SimulationRepository,
}

impl SimulationService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            simulation_repository: SimulationRepository::new(connection),
        }
    }

    pub fn create_entry(&self, command: CreateSimulationCommand) -> Result<SimulationEntry> {
        if command.label.trim().is_empty() {
            return Err(DomainError::Validation("Label must not be empty".to_string()).into());
        }
        if !command.amount.is_finite() || command.amount <= 0.0 {
            return Err(DomainError::Validation("Amount must be a positive number".to_string()).into());
        }
        if command.rhythm.is_none() && command.end_date.is_some() {
            return Err(DomainError::Validation(
                "A one-off entry has no end date".to_string(),
            )
            .into());
        }
        if let Some(end) = command.end_date {
            if end < command.anchor_date {
                return Err(DomainError::Validation(
                    "End date must not precede the anchor date".to_string(),
                )
                .into());
            }
        }
        if let Some(scenario_id) = &command.scenario_id {
            if self.simulation_repository.get_scenario(scenario_id)?.is_none() {
                return Err(DomainError::not_found("Scenario", scenario_id.clone()).into());
            }
        }

        let entry = SimulationEntry {
            id: SimulationEntry::generate_id(),
            label: command.label,
            amount: command.amount,
            direction: command.direction,
            anchor_date: command.anchor_date,
            end_date: command.end_date,
            rhythm: command.rhythm,
            scenario_id: command.scenario_id,
        };
        self.simulation_repository.store_entry(&entry)?;
        info!("Created simulation entry '{}' ({})", entry.label, entry.id);
        Ok(entry)
    }

    pub fn get_entry(&self, id: &str) -> Result<SimulationEntry> {
        self.simulation_repository
            .get_entry(id)?
            .ok_or_else(|| DomainError::not_found("Simulation entry", id).into())
    }

    pub fn list_entries(&self) -> Result<Vec<SimulationEntry>> {
        self.simulation_repository.list_entries()
    }

    /// Entries participating in a projection: unscoped ones always, plus
    /// the requested scenario's own entries.
    pub fn entries_for_projection(&self, scenario_id: Option<&str>) -> Result<Vec<SimulationEntry>> {
        if let Some(id) = scenario_id {
            if self.simulation_repository.get_scenario(id)?.is_none() {
                return Err(DomainError::not_found("Scenario", id).into());
            }
        }
        Ok(self
            .simulation_repository
            .list_entries()?
            .into_iter()
            .filter(|entry| match &entry.scenario_id {
                None => true,
                Some(owner) => scenario_id == Some(owner.as_str()),
            })
            .collect())
    }

    pub fn update_entry(&self, id: &str, command: UpdateSimulationCommand) -> Result<SimulationEntry> {
        let mut entry = self.get_entry(id)?;

        if let Some(label) = command.label {
            if label.trim().is_empty() {
                return Err(DomainError::Validation("Label must not be empty".to_string()).into());
            }
            entry.label = label;
        }
        if let Some(amount) = command.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(
                    DomainError::Validation("Amount must be a positive number".to_string()).into(),
                );
            }
            entry.amount = amount;
        }
        if let Some(anchor) = command.anchor_date {
            entry.anchor_date = anchor;
        }
        if let Some(rhythm) = command.rhythm {
            entry.rhythm = Some(rhythm);
        }
        if let Some(end) = command.end_date {
            if entry.rhythm.is_none() {
                return Err(DomainError::Validation(
                    "A one-off entry has no end date".to_string(),
                )
                .into());
            }
            if end < entry.anchor_date {
                return Err(DomainError::Validation(
                    "End date must not precede the anchor date".to_string(),
                )
                .into());
            }
            entry.end_date = Some(end);
        }

        self.simulation_repository.update_entry(&entry)?;
        info!("Updated simulation entry {}", entry.id);
        Ok(entry)
    }

    pub fn delete_entry(&self, id: &str) -> Result<()> {
        if !self.simulation_repository.delete_entry(id)? {
            return Err(DomainError::not_found("Simulation entry", id).into());
        }
        Ok(())
    }

    pub fn create_scenario(&self, name: String) -> Result<Scenario> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("Scenario name must not be empty".to_string()).into());
        }

        let scenario = Scenario {
            id: Scenario::generate_id(),
            name,
            created_at: Utc::now(),
        };
        self.simulation_repository.store_scenario(&scenario)?;
        info!("Created scenario '{}' ({})", scenario.name, scenario.id);
        Ok(scenario)
    }

    pub fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        self.simulation_repository.list_scenarios()
    }

    /// Deletes the scenario; its entries survive as unscoped entries.
    pub fn delete_scenario(&self, id: &str) -> Result<()> {
        if !self.simulation_repository.delete_scenario(id)? {
            return Err(DomainError::not_found("Scenario", id).into());
        }
        info!("Deleted scenario {}", id);
        Ok(())
    }
}
