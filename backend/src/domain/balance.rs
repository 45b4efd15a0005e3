//! Running-balance reconstruction.
//!
//! Transactions up to and including the evaluation date are historical
//! facts: the current account balance already reflects them, and the
//! system keeps no second ledger to reconstruct what the balance was on
//! each past date. They are therefore returned without a recomputed
//! balance. Only future transactions get a running balance, folded forward
//! from the current balance. This split is a product decision, not an
//! oversight; turning it into a full historical ledger would silently
//! change displayed figures.

use chrono::NaiveDate;

use crate::domain::models::transaction::{BalancedTransaction, NormalizedTransaction};

/// Annotate transactions with running balances relative to `today`.
///
/// Output is historical first, then future, each partition ascending by
/// date. For future transactions `balance_i = balance_{i-1} +
/// signed_amount_i`, seeded with `current_balance`; the stored value is
/// the post-transaction balance.
pub fn enhance(
    transactions: Vec<NormalizedTransaction>,
    current_balance: f64,
    today: NaiveDate,
) -> Vec<BalancedTransaction> {
    let (mut historical, mut future): (Vec<_>, Vec<_>) =
        transactions.into_iter().partition(|tx| tx.date <= today);

    historical.sort_by_key(|tx| tx.date);
    future.sort_by_key(|tx| tx.date);

    let mut balanced: Vec<BalancedTransaction> = historical
        .into_iter()
        .map(|transaction| BalancedTransaction {
            transaction,
            running_balance: None,
            projected: false,
        })
        .collect();

    let mut balance = current_balance;
    for transaction in future {
        balance += transaction.signed_amount;
        balanced.push(BalancedTransaction {
            transaction,
            running_balance: Some(balance),
            projected: true,
        });
    }

    balanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transaction::SourceKind;
    use shared::{Category, Direction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(date_: NaiveDate, signed: f64) -> NormalizedTransaction {
        let direction = if signed >= 0.0 {
            Direction::Incoming
        } else {
            Direction::Outgoing
        };
        NormalizedTransaction {
            date: date_,
            details: "t".to_string(),
            amount: signed.abs(),
            signed_amount: signed,
            direction,
            category: Category::Standard,
            source: SourceKind::OneOff,
            was_date_shifted: false,
        }
    }

    #[test]
    fn future_balances_are_prefix_sums() {
        let today = date(2024, 6, 1);
        let balanced = enhance(
            vec![
                tx(date(2024, 6, 10), 100.0),
                tx(date(2024, 6, 5), -40.0),
                tx(date(2024, 6, 20), -10.0),
            ],
            1000.0,
            today,
        );

        let balances: Vec<f64> = balanced
            .iter()
            .map(|b| b.running_balance.unwrap())
            .collect();
        assert_eq!(balances, vec![960.0, 1060.0, 1050.0]);
    }

    #[test]
    fn historical_transactions_carry_no_balance() {
        let today = date(2024, 6, 15);
        let balanced = enhance(
            vec![
                tx(date(2024, 6, 1), 50.0),
                // Today itself counts as historical.
                tx(date(2024, 6, 15), 20.0),
                tx(date(2024, 6, 16), 30.0),
            ],
            500.0,
            today,
        );

        assert_eq!(balanced.len(), 3);
        assert_eq!(balanced[0].running_balance, None);
        assert!(!balanced[0].projected);
        assert_eq!(balanced[1].running_balance, None);
        assert_eq!(balanced[2].running_balance, Some(530.0));
        assert!(balanced[2].projected);
    }

    #[test]
    fn historical_come_first_each_partition_sorted() {
        let today = date(2024, 6, 15);
        let balanced = enhance(
            vec![
                tx(date(2024, 7, 1), 1.0),
                tx(date(2024, 6, 10), 1.0),
                tx(date(2024, 6, 20), 1.0),
                tx(date(2024, 5, 1), 1.0),
            ],
            0.0,
            today,
        );

        let dates: Vec<NaiveDate> = balanced.iter().map(|b| b.transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 5, 1),
                date(2024, 6, 10),
                date(2024, 6, 20),
                date(2024, 7, 1),
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(enhance(Vec::new(), 123.0, date(2024, 1, 1)).is_empty());
    }
}
