//! Occurrence expansion: turns recurring definitions into the dated
//! occurrences falling inside a projection window.
//!
//! Expansion is pure and regenerates occurrences fresh on every call;
//! expanded occurrences have no persisted identity. Overrides address them
//! structurally through `(definition_id, original_date)` where the original
//! date is the undisturbed schedule date before any adjustment.

use chrono::{Datelike, Months, NaiveDate};
use shared::Direction;
use std::collections::HashMap;

use crate::domain::models::recurring::{
    OccurrenceOverride, RecurringDefinition, SalaryRecord, SimulationEntry, SALARY_PAY_DAY,
};
use crate::domain::recurrence::{adjust_payment_date, is_month_end_anchor, next_occurrence};

/// One expanded, dated occurrence of a recurring definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub definition_id: String,
    pub label: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub direction: Direction,
    /// True when the emitted date differs from the undisturbed schedule
    /// date (weekend shift, month-end clamp or an override relocation).
    pub shifted: bool,
}

/// Override lookup keyed by `(definition_id, original_date)`.
pub type OverrideIndex = HashMap<(String, NaiveDate), OccurrenceOverride>;

pub fn build_override_index(overrides: &[OccurrenceOverride]) -> OverrideIndex {
    overrides
        .iter()
        .map(|ov| ((ov.definition_id.clone(), ov.original_date), ov.clone()))
        .collect()
}

/// Expand a recurring definition over `[window_start, window_end]`.
///
/// Walks the undisturbed schedule chain from the anchor date, emitting
/// nothing before `window_start`, so the first emitted schedule date is
/// `max(anchor_date, first chain date >= window_start)`. Stepping from the
/// anchor rather than from the window start keeps override keys identical
/// across windows. Month-end anchoring is judged once from the original
/// anchor date, not from the advancing cursor (day clamping in the chain
/// is compensated by the month-end clamp in [`adjust_payment_date`]).
/// Terminates because [`next_occurrence`] is strictly increasing.
pub fn expand_definition(
    definition: &RecurringDefinition,
    window_start: NaiveDate,
    window_end: NaiveDate,
    overrides: &OverrideIndex,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    let month_end_anchor = is_month_end_anchor(definition.anchor_date);

    let mut current = definition.anchor_date;
    while current < window_start {
        current = next_occurrence(current, definition.rhythm);
    }

    while current <= window_end {
        if definition.end_date.map_or(false, |end| current > end) {
            break;
        }

        let adjusted = adjust_payment_date(current, month_end_anchor, true);

        match overrides.get(&(definition.id.clone(), current)) {
            Some(ov) if ov.skipped => {}
            Some(ov) => {
                let date = ov.new_date.unwrap_or(adjusted);
                let amount = ov.new_amount.unwrap_or(definition.amount);
                occurrences.push(Occurrence {
                    definition_id: definition.id.clone(),
                    label: definition.label.clone(),
                    date,
                    amount,
                    direction: definition.direction,
                    shifted: date != current,
                });
            }
            None => occurrences.push(Occurrence {
                definition_id: definition.id.clone(),
                label: definition.label.clone(),
                date: adjusted,
                amount: definition.amount,
                direction: definition.direction,
                shifted: adjusted != current,
            }),
        }

        current = next_occurrence(current, definition.rhythm);
    }

    occurrences
}

/// Expand payroll records over a window: one payment per calendar month per
/// active record, on the 25th, weekend-shifted but never month-end
/// anchored.
pub fn expand_salaries(
    salaries: &[SalaryRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
    overrides: &OverrideIndex,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for salary in salaries {
        let mut month = first_of_month(window_start);
        while month <= window_end {
            let payday = NaiveDate::from_ymd_opt(month.year(), month.month(), SALARY_PAY_DAY)
                .unwrap_or(month);

            if payday >= window_start && payday <= window_end && salary.is_active_on(payday) {
                let adjusted = adjust_payment_date(payday, false, true);
                match overrides.get(&(salary.id.clone(), payday)) {
                    Some(ov) if ov.skipped => {}
                    Some(ov) => {
                        let date = ov.new_date.unwrap_or(adjusted);
                        let amount = ov.new_amount.unwrap_or(salary.amount);
                        occurrences.push(salary_occurrence(salary, date, amount, date != payday));
                    }
                    None => occurrences.push(salary_occurrence(
                        salary,
                        adjusted,
                        salary.amount,
                        adjusted != payday,
                    )),
                }
            }

            month = month
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX);
        }
    }

    occurrences
}

fn salary_occurrence(
    salary: &SalaryRecord,
    date: NaiveDate,
    amount: f64,
    shifted: bool,
) -> Occurrence {
    Occurrence {
        definition_id: salary.id.clone(),
        label: format!("Lohn {}", salary.employee),
        date,
        amount,
        direction: Direction::Outgoing,
        shifted,
    }
}

/// Expand a simulation entry. Recurring entries walk the schedule like a
/// fixed cost; one-off entries emit at most a single adjusted occurrence.
pub fn expand_simulation(
    entry: &SimulationEntry,
    window_start: NaiveDate,
    window_end: NaiveDate,
    overrides: &OverrideIndex,
) -> Vec<Occurrence> {
    if let Some(definition) = entry.as_definition() {
        return expand_definition(&definition, window_start, window_end, overrides);
    }

    if entry.anchor_date < window_start || entry.anchor_date > window_end {
        return Vec::new();
    }

    let adjusted = adjust_payment_date(
        entry.anchor_date,
        is_month_end_anchor(entry.anchor_date),
        true,
    );
    vec![Occurrence {
        definition_id: entry.id.clone(),
        label: entry.label.clone(),
        date: adjusted,
        amount: entry.amount,
        direction: entry.direction,
        shifted: adjusted != entry.anchor_date,
    }]
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use shared::Rhythm;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_cost(anchor: NaiveDate) -> RecurringDefinition {
        RecurringDefinition {
            id: "fc::rent".to_string(),
            label: "Miete".to_string(),
            amount: 1200.0,
            direction: Direction::Outgoing,
            anchor_date: anchor,
            end_date: None,
            rhythm: Rhythm::Monthly,
        }
    }

    fn no_overrides() -> OverrideIndex {
        OverrideIndex::new()
    }

    #[test]
    fn month_end_anchored_cost_clamps_and_shifts() {
        // The reference scenario: monthly cost anchored Jan 31 2024,
        // window Feb 1 - Apr 30. Expected: Feb 29 (leap clamp), Mar 29
        // (Mar 31 is a Sunday), Apr 30 (a Tuesday).
        let occurrences = expand_definition(
            &monthly_cost(date(2024, 1, 31)),
            date(2024, 2, 1),
            date(2024, 4, 30),
            &no_overrides(),
        );

        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 2, 29), date(2024, 3, 29), date(2024, 4, 30)]
        );
        assert!(occurrences.iter().all(|o| o.amount == 1200.0));
        assert!(occurrences
            .iter()
            .all(|o| o.direction == Direction::Outgoing));
    }

    #[test]
    fn expansion_is_idempotent() {
        let definition = monthly_cost(date(2024, 1, 15));
        let a = expand_definition(
            &definition,
            date(2024, 1, 1),
            date(2024, 12, 31),
            &no_overrides(),
        );
        let b = expand_definition(
            &definition,
            date(2024, 1, 1),
            date(2024, 12, 31),
            &no_overrides(),
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn occurrences_never_land_on_weekends() {
        for rhythm in [
            Rhythm::Monthly,
            Rhythm::Quarterly,
            Rhythm::Semiannual,
            Rhythm::Annual,
        ] {
            let definition = RecurringDefinition {
                rhythm,
                ..monthly_cost(date(2024, 1, 31))
            };
            let occurrences = expand_definition(
                &definition,
                date(2024, 1, 1),
                date(2026, 12, 31),
                &no_overrides(),
            );
            for occurrence in &occurrences {
                let weekday = occurrence.date.weekday();
                assert!(
                    weekday != Weekday::Sat && weekday != Weekday::Sun,
                    "{} fell on {}",
                    occurrence.date,
                    weekday
                );
            }
        }
    }

    #[test]
    fn end_date_stops_expansion() {
        let definition = RecurringDefinition {
            end_date: Some(date(2024, 6, 30)),
            ..monthly_cost(date(2024, 1, 15))
        };
        let occurrences = expand_definition(
            &definition,
            date(2024, 1, 1),
            date(2024, 12, 31),
            &no_overrides(),
        );
        assert_eq!(occurrences.len(), 6);
        assert!(occurrences.iter().all(|o| o.date <= date(2024, 6, 30)));
    }

    #[test]
    fn skip_override_removes_occurrence_regardless_of_other_fields() {
        let definition = monthly_cost(date(2024, 1, 15));
        let ov = OccurrenceOverride {
            definition_id: definition.id.clone(),
            original_date: date(2024, 3, 15),
            new_date: Some(date(2024, 3, 20)),
            new_amount: Some(999.0),
            skipped: true,
            notes: "ausgesetzt".to_string(),
        };
        let occurrences = expand_definition(
            &definition,
            date(2024, 1, 1),
            date(2024, 4, 30),
            &build_override_index(&[ov]),
        );
        assert_eq!(occurrences.len(), 3);
        assert!(occurrences.iter().all(|o| o.date != date(2024, 3, 15)));
        assert!(occurrences.iter().all(|o| o.date != date(2024, 3, 20)));
    }

    #[test]
    fn override_substitutes_date_and_amount() {
        let definition = monthly_cost(date(2024, 1, 15));
        let ov = OccurrenceOverride {
            definition_id: definition.id.clone(),
            original_date: date(2024, 2, 15),
            new_date: Some(date(2024, 5, 2)),
            new_amount: Some(600.0),
            skipped: false,
            notes: String::new(),
        };
        let occurrences = expand_definition(
            &definition,
            date(2024, 2, 1),
            date(2024, 2, 29),
            &build_override_index(&[ov]),
        );

        // The relocated occurrence may leave the window: the override takes
        // precedence over containment.
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, date(2024, 5, 2));
        assert_eq!(occurrences[0].amount, 600.0);
        assert!(occurrences[0].shifted);
    }

    #[test]
    fn override_key_uses_pre_adjustment_date() {
        // Anchored Jan 31, the schedule chain runs Feb 29 -> Mar 29 ->
        // Apr 29, while the emitted April date is the clamped Apr 30. An
        // override keyed on the emitted date must not match; one keyed on
        // the schedule date must.
        let definition = monthly_cost(date(2024, 1, 31));
        let window = (date(2024, 4, 1), date(2024, 4, 30));

        let wrong_key = OccurrenceOverride {
            definition_id: definition.id.clone(),
            original_date: date(2024, 4, 30),
            new_date: None,
            new_amount: Some(1.0),
            skipped: false,
            notes: String::new(),
        };
        let occurrences = expand_definition(
            &definition,
            window.0,
            window.1,
            &build_override_index(&[wrong_key.clone()]),
        );
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, date(2024, 4, 30));
        assert_eq!(occurrences[0].amount, 1200.0);

        let right_key = OccurrenceOverride {
            original_date: date(2024, 4, 29),
            ..wrong_key
        };
        let occurrences = expand_definition(
            &definition,
            window.0,
            window.1,
            &build_override_index(&[right_key]),
        );
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].amount, 1.0);
    }

    #[test]
    fn salary_paid_on_25th_with_weekend_shift() {
        let salary = SalaryRecord {
            id: "sal::a".to_string(),
            employee: "Muster".to_string(),
            amount: 6500.0,
            start_date: date(2024, 1, 1),
            end_date: None,
        };
        let occurrences = expand_salaries(
            &[salary],
            date(2024, 5, 1),
            date(2024, 8, 31),
            &no_overrides(),
        );

        // 2024-05-25 is a Saturday, 2024-08-25 a Sunday.
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 5, 24),
                date(2024, 6, 25),
                date(2024, 7, 25),
                date(2024, 8, 23),
            ]
        );
        assert!(occurrences[0].shifted);
        assert!(!occurrences[1].shifted);
        assert!(occurrences.iter().all(|o| o.label == "Lohn Muster"));
    }

    #[test]
    fn salary_respects_active_range() {
        let salary = SalaryRecord {
            id: "sal::b".to_string(),
            employee: "Beispiel".to_string(),
            amount: 5000.0,
            start_date: date(2024, 3, 1),
            end_date: Some(date(2024, 5, 31)),
        };
        let occurrences = expand_salaries(
            &[salary],
            date(2024, 1, 1),
            date(2024, 12, 31),
            &no_overrides(),
        );
        assert_eq!(occurrences.len(), 3); // Mar, Apr, May
    }

    #[test]
    fn one_off_simulation_emits_once_inside_window() {
        let entry = SimulationEntry {
            id: "sim::x".to_string(),
            label: "Investition".to_string(),
            amount: 10_000.0,
            direction: Direction::Outgoing,
            // 2024-06-15 is a Saturday.
            anchor_date: date(2024, 6, 15),
            end_date: None,
            rhythm: None,
            scenario_id: None,
        };

        let inside = expand_simulation(&entry, date(2024, 6, 1), date(2024, 6, 30), &no_overrides());
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].date, date(2024, 6, 14));
        assert!(inside[0].shifted);

        let outside =
            expand_simulation(&entry, date(2024, 7, 1), date(2024, 7, 31), &no_overrides());
        assert!(outside.is_empty());
    }

    #[test]
    fn adjusted_dates_stay_inside_month_aligned_windows() {
        let definition = monthly_cost(date(2023, 11, 30));
        let start = date(2024, 1, 1);
        let end = date(2024, 12, 31);
        let occurrences = expand_definition(&definition, start, end, &no_overrides());
        assert!(!occurrences.is_empty());
        for occurrence in occurrences {
            assert!(occurrence.date >= start && occurrence.date <= end);
        }
    }
}
