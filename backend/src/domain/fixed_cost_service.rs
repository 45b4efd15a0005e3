//! Service for fixed-cost definitions and their per-occurrence overrides.

use anyhow::Result;
use tracing::info;

use crate::domain::commands::fixed_costs::{
    CreateFixedCostCommand, UpdateFixedCostCommand, UpsertOverrideCommand,
};
use crate::domain::errors::DomainError;
use crate::domain::models::recurring::{FixedCost, OccurrenceOverride};
use crate::storage::csv::{CsvConnection, FixedCostRepository, OverrideRepository};
use crate::storage::{FixedCostStorage, OverrideStorage};

#[derive(Clone)]
pub struct FixedCostService {
    fixed_cost_repository: FixedCostRepository,
    override_repository: OverrideRepository,
}

impl FixedCostService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            fixed_cost_repository: FixedCostRepository::new(connection.clone()),
            override_repository: OverrideRepository::new(connection),
        }
    }

    pub fn create_fixed_cost(&self, command: CreateFixedCostCommand) -> Result<FixedCost> {
        validate_label(&command.label)?;
        validate_amount(command.amount)?;
        if let Some(end) = command.end_date {
            if end < command.anchor_date {
                return Err(DomainError::Validation(
                    "End date must not precede the anchor date".to_string(),
                )
                .into());
            }
        }

        let fixed_cost = FixedCost {
            id: FixedCost::generate_id(),
            label: command.label,
            amount: command.amount,
            direction: command.direction,
            anchor_date: command.anchor_date,
            end_date: command.end_date,
            rhythm: command.rhythm,
        };
        self.fixed_cost_repository.store_fixed_cost(&fixed_cost)?;
        info!("Created fixed cost '{}' ({})", fixed_cost.label, fixed_cost.id);
        Ok(fixed_cost)
    }

    pub fn get_fixed_cost(&self, id: &str) -> Result<FixedCost> {
        self.fixed_cost_repository
            .get_fixed_cost(id)?
            .ok_or_else(|| DomainError::not_found("Fixed cost", id).into())
    }

    pub fn list_fixed_costs(&self) -> Result<Vec<FixedCost>> {
        self.fixed_cost_repository.list_fixed_costs()
    }

    pub fn update_fixed_cost(
        &self,
        id: &str,
        command: UpdateFixedCostCommand,
    ) -> Result<FixedCost> {
        let mut fixed_cost = self.get_fixed_cost(id)?;

        if let Some(label) = command.label {
            validate_label(&label)?;
            fixed_cost.label = label;
        }
        if let Some(amount) = command.amount {
            validate_amount(amount)?;
            fixed_cost.amount = amount;
        }
        if let Some(anchor) = command.anchor_date {
            fixed_cost.anchor_date = anchor;
        }
        if let Some(end) = command.end_date {
            // Soft-ending a definition: occurrences after this date stop.
            if end < fixed_cost.anchor_date {
                return Err(DomainError::Validation(
                    "End date must not precede the anchor date".to_string(),
                )
                .into());
            }
            fixed_cost.end_date = Some(end);
        }
        if let Some(rhythm) = command.rhythm {
            fixed_cost.rhythm = rhythm;
        }

        self.fixed_cost_repository.update_fixed_cost(&fixed_cost)?;
        info!("Updated fixed cost {}", fixed_cost.id);
        Ok(fixed_cost)
    }

    pub fn delete_fixed_cost(&self, id: &str) -> Result<()> {
        if !self.fixed_cost_repository.delete_fixed_cost(id)? {
            return Err(DomainError::not_found("Fixed cost", id).into());
        }
        // Orphaned overrides would silently match nothing; drop them along.
        for ov in self.override_repository.list_overrides_for(id)? {
            self.override_repository
                .delete_override(&ov.definition_id, ov.original_date)?;
        }
        info!("Deleted fixed cost {}", id);
        Ok(())
    }

    /// Insert or replace the override for one occurrence of a fixed cost.
    pub fn upsert_override(&self, command: UpsertOverrideCommand) -> Result<OccurrenceOverride> {
        // The definition must exist; 404 on the definition, not the key.
        self.get_fixed_cost(&command.definition_id)?;

        if let Some(amount) = command.new_amount {
            validate_amount(amount)?;
        }

        let ov = OccurrenceOverride {
            definition_id: command.definition_id,
            original_date: command.original_date,
            new_date: command.new_date,
            new_amount: command.new_amount,
            skipped: command.skipped,
            notes: command.notes,
        };
        if !ov.has_effect() {
            return Err(DomainError::Validation(
                "Override must skip, redate or reamount the occurrence".to_string(),
            )
            .into());
        }

        self.override_repository.upsert_override(&ov)?;
        info!(
            "Override stored for {} @ {}",
            ov.definition_id, ov.original_date
        );
        Ok(ov)
    }

    pub fn list_overrides(&self, definition_id: &str) -> Result<Vec<OccurrenceOverride>> {
        self.get_fixed_cost(definition_id)?;
        self.override_repository.list_overrides_for(definition_id)
    }

    pub fn delete_override(
        &self,
        definition_id: &str,
        original_date: chrono::NaiveDate,
    ) -> Result<()> {
        if !self
            .override_repository
            .delete_override(definition_id, original_date)?
        {
            return Err(DomainError::not_found("Override", definition_id).into());
        }
        Ok(())
    }
}

fn validate_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(DomainError::Validation("Label must not be empty".to_string()).into());
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::Validation("Amount must be a positive number".to_string()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{Direction, Rhythm};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> (tempfile::TempDir, FixedCostService) {
        let dir = tempfile::tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (dir, FixedCostService::new(conn))
    }

    fn create_command() -> CreateFixedCostCommand {
        CreateFixedCostCommand {
            label: "Miete".to_string(),
            amount: 1200.0,
            direction: Direction::Outgoing,
            anchor_date: date(2024, 1, 31),
            end_date: None,
            rhythm: Rhythm::Monthly,
        }
    }

    #[test]
    fn create_rejects_bad_input() {
        let (_dir, service) = service();

        let empty_label = CreateFixedCostCommand {
            label: "  ".to_string(),
            ..create_command()
        };
        assert!(service.create_fixed_cost(empty_label).is_err());

        let negative = CreateFixedCostCommand {
            amount: -5.0,
            ..create_command()
        };
        assert!(service.create_fixed_cost(negative).is_err());

        let ends_before_start = CreateFixedCostCommand {
            end_date: Some(date(2023, 12, 1)),
            ..create_command()
        };
        assert!(service.create_fixed_cost(ends_before_start).is_err());
    }

    #[test]
    fn soft_end_via_update() {
        let (_dir, service) = service();
        let fc = service.create_fixed_cost(create_command()).unwrap();

        let updated = service
            .update_fixed_cost(
                &fc.id,
                UpdateFixedCostCommand {
                    end_date: Some(date(2024, 6, 30)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.end_date, Some(date(2024, 6, 30)));
        // Everything else untouched.
        assert_eq!(updated.label, fc.label);
        assert_eq!(updated.amount, fc.amount);
    }

    #[test]
    fn missing_fixed_cost_maps_to_not_found() {
        let (_dir, service) = service();
        let err = service.get_fixed_cost("fc::missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn override_without_effect_is_rejected() {
        let (_dir, service) = service();
        let fc = service.create_fixed_cost(create_command()).unwrap();

        let inert = UpsertOverrideCommand {
            definition_id: fc.id.clone(),
            original_date: date(2024, 2, 29),
            new_date: None,
            new_amount: None,
            skipped: false,
            notes: String::new(),
        };
        let err = service.upsert_override(inert).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }

    #[test]
    fn override_lifecycle() {
        let (_dir, service) = service();
        let fc = service.create_fixed_cost(create_command()).unwrap();

        service
            .upsert_override(UpsertOverrideCommand {
                definition_id: fc.id.clone(),
                original_date: date(2024, 2, 29),
                new_date: None,
                new_amount: Some(1350.0),
                skipped: false,
                notes: "Nebenkosten".to_string(),
            })
            .unwrap();

        let overrides = service.list_overrides(&fc.id).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].new_amount, Some(1350.0));

        service.delete_override(&fc.id, date(2024, 2, 29)).unwrap();
        assert!(service.list_overrides(&fc.id).unwrap().is_empty());
    }

    #[test]
    fn deleting_fixed_cost_drops_its_overrides() {
        let (_dir, service) = service();
        let fc = service.create_fixed_cost(create_command()).unwrap();
        service
            .upsert_override(UpsertOverrideCommand {
                definition_id: fc.id.clone(),
                original_date: date(2024, 3, 31),
                new_date: None,
                new_amount: None,
                skipped: true,
                notes: String::new(),
            })
            .unwrap();

        service.delete_fixed_cost(&fc.id).unwrap();
        assert!(matches!(
            service
                .list_overrides(&fc.id)
                .unwrap_err()
                .downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));
    }
}
