//! Transaction normalization: converts heterogeneous source records into
//! the one uniform transaction shape the balance reconstructor and the
//! reports consume.

use shared::{Category, Direction};

use crate::domain::expansion::Occurrence;
use crate::domain::models::transaction::{NormalizedTransaction, OneOffTransaction, SourceKind};

/// Signed amount from magnitude and direction: incoming is positive,
/// outgoing negative.
pub fn signed_amount(amount: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Incoming => amount,
        Direction::Outgoing => -amount,
    }
}

/// Classify a persisted one-off transaction.
///
/// Precedence for the whole system is
/// Fixkosten > Lohn > Simulation > Manual-if-modified > Standard-default;
/// the first three are fixed by the source kind during expansion, so for
/// persisted records only the tail applies: the simulation flag wins over
/// the modified flag, the modified flag over any imported category, and
/// everything else defaults to Standard.
pub fn classify_one_off(transaction: &OneOffTransaction) -> Category {
    if transaction.is_simulation {
        Category::Simulation
    } else if transaction.modified {
        Category::Manual
    } else {
        transaction.category.unwrap_or(Category::Standard)
    }
}

/// Category fixed by the expansion source.
pub fn category_for_source(source: SourceKind) -> Category {
    match source {
        SourceKind::FixedCost => Category::Fixkosten,
        SourceKind::Salary => Category::Lohn,
        SourceKind::Simulation => Category::Simulation,
        SourceKind::OneOff => Category::Standard,
    }
}

/// Normalize a persisted one-off transaction. Persisted dates were entered
/// directly, so no date shift applies.
pub fn normalize_one_off(transaction: &OneOffTransaction) -> NormalizedTransaction {
    let amount = transaction.amount.abs();
    NormalizedTransaction {
        date: transaction.date,
        details: transaction.details.clone(),
        amount,
        signed_amount: signed_amount(amount, transaction.direction),
        direction: transaction.direction,
        category: classify_one_off(transaction),
        source: SourceKind::OneOff,
        was_date_shifted: false,
    }
}

/// Normalize an expanded occurrence, tagging it with its source category
/// and carrying the shift flag forward.
pub fn normalize_occurrence(occurrence: &Occurrence, source: SourceKind) -> NormalizedTransaction {
    let amount = occurrence.amount.abs();
    NormalizedTransaction {
        date: occurrence.date,
        details: occurrence.label.clone(),
        amount,
        signed_amount: signed_amount(amount, occurrence.direction),
        direction: occurrence.direction,
        category: category_for_source(source),
        source,
        was_date_shifted: occurrence.shifted,
    }
}
