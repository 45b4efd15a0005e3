//! Aggregation functions: the grouping reducers behind the dashboard
//! numbers. All pure; the report service wires them to storage.

use chrono::{Datelike, Duration, NaiveDate};
use shared::{Category, Direction};
use std::collections::HashMap;

use crate::domain::models::transaction::NormalizedTransaction;

/// Guards the runway division; burn rates at or below zero are reported as
/// unbounded runway instead.
const MIN_BURN_RATE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// `YYYY-MM`.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyBalancePoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// Group by calendar month, summing amounts split by direction.
pub fn monthly_summaries(transactions: &[NormalizedTransaction]) -> Vec<MonthlySummary> {
    let mut by_month: HashMap<String, (f64, f64)> = HashMap::new();

    for tx in transactions {
        let key = format!("{:04}-{:02}", tx.date.year(), tx.date.month());
        let entry = by_month.entry(key).or_insert((0.0, 0.0));
        match tx.direction {
            Direction::Incoming => entry.0 += tx.amount,
            Direction::Outgoing => entry.1 += tx.amount,
        }
    }

    let mut summaries: Vec<MonthlySummary> = by_month
        .into_iter()
        .map(|(month, (income, expenses))| MonthlySummary {
            month,
            income,
            expenses,
            net: income - expenses,
        })
        .collect();
    summaries.sort_by(|a, b| a.month.cmp(&b.month));
    summaries
}

/// Sum outgoing transactions by category, largest first.
pub fn category_totals(transactions: &[NormalizedTransaction]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<Category, f64> = HashMap::new();

    for tx in transactions {
        if tx.direction == Direction::Outgoing {
            *by_category.entry(tx.category).or_insert(0.0) += tx.amount;
        }
    }

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Cumulative balance per calendar day over `[start, end]`, seeded with an
/// arbitrary starting balance.
///
/// Every day in the range gets a point; days without transactions carry
/// the previous balance forward. Independent of the running-balance
/// reconstructor so what-if views can reseed it freely.
pub fn daily_balance_series(
    transactions: &[NormalizedTransaction],
    start: NaiveDate,
    end: NaiveDate,
    seed_balance: f64,
) -> Vec<DailyBalancePoint> {
    let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
    for tx in transactions {
        if tx.date >= start && tx.date <= end {
            *per_day.entry(tx.date).or_insert(0.0) += tx.signed_amount;
        }
    }

    let mut series = Vec::new();
    let mut balance = seed_balance;
    let mut day = start;
    while day <= end {
        if let Some(delta) = per_day.get(&day) {
            balance += delta;
        }
        series.push(DailyBalancePoint { date: day, balance });
        day += Duration::days(1);
    }
    series
}

/// Months of runway left at the given burn rate.
///
/// A burn rate at or below zero means the account is not shrinking:
/// runway is unbounded (`f64::INFINITY`), never a division by zero or NaN.
pub fn cash_runway_months(current_balance: f64, monthly_burn_rate: f64) -> f64 {
    if monthly_burn_rate <= 0.0 {
        f64::INFINITY
    } else {
        current_balance / monthly_burn_rate.max(MIN_BURN_RATE)
    }
}

/// Average monthly burn (expenses minus income) over a set of monthly
/// summaries. Negative when the months netted positive.
pub fn average_monthly_burn(summaries: &[MonthlySummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    let total: f64 = summaries.iter().map(|s| s.expenses - s.income).sum();
    total / summaries.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transaction::SourceKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(
        date_: NaiveDate,
        amount: f64,
        direction: Direction,
        category: Category,
    ) -> NormalizedTransaction {
        NormalizedTransaction {
            date: date_,
            details: "t".to_string(),
            amount,
            signed_amount: match direction {
                Direction::Incoming => amount,
                Direction::Outgoing => -amount,
            },
            direction,
            category,
            source: SourceKind::OneOff,
            was_date_shifted: false,
        }
    }

    #[test]
    fn monthly_summaries_split_by_direction() {
        let summaries = monthly_summaries(&[
            tx(date(2024, 1, 5), 5000.0, Direction::Incoming, Category::Standard),
            tx(date(2024, 1, 20), 1200.0, Direction::Outgoing, Category::Fixkosten),
            tx(date(2024, 2, 3), 800.0, Direction::Outgoing, Category::Lohn),
        ]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month, "2024-01");
        assert_eq!(summaries[0].income, 5000.0);
        assert_eq!(summaries[0].expenses, 1200.0);
        assert_eq!(summaries[0].net, 3800.0);
        assert_eq!(summaries[1].month, "2024-02");
        assert_eq!(summaries[1].net, -800.0);
    }

    #[test]
    fn category_totals_outgoing_only() {
        let totals = category_totals(&[
            tx(date(2024, 1, 5), 9999.0, Direction::Incoming, Category::Standard),
            tx(date(2024, 1, 6), 1200.0, Direction::Outgoing, Category::Fixkosten),
            tx(date(2024, 1, 7), 300.0, Direction::Outgoing, Category::Fixkosten),
            tx(date(2024, 1, 8), 6500.0, Direction::Outgoing, Category::Lohn),
        ]);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, Category::Lohn);
        assert_eq!(totals[0].total, 6500.0);
        assert_eq!(totals[1].category, Category::Fixkosten);
        assert_eq!(totals[1].total, 1500.0);
    }

    #[test]
    fn daily_series_carries_balance_forward() {
        let series = daily_balance_series(
            &[
                tx(date(2024, 1, 2), 100.0, Direction::Incoming, Category::Standard),
                tx(date(2024, 1, 2), 30.0, Direction::Outgoing, Category::Standard),
                tx(date(2024, 1, 4), 20.0, Direction::Outgoing, Category::Standard),
            ],
            date(2024, 1, 1),
            date(2024, 1, 5),
            1000.0,
        );

        let balances: Vec<f64> = series.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![1000.0, 1070.0, 1070.0, 1050.0, 1050.0]);
    }

    #[test]
    fn daily_series_ignores_out_of_range_transactions() {
        let series = daily_balance_series(
            &[tx(date(2023, 12, 31), 500.0, Direction::Incoming, Category::Standard)],
            date(2024, 1, 1),
            date(2024, 1, 2),
            0.0,
        );
        assert!(series.iter().all(|p| p.balance == 0.0));
    }

    #[test]
    fn runway_never_divides_by_zero() {
        assert_eq!(cash_runway_months(10_000.0, 0.0), f64::INFINITY);
        assert_eq!(cash_runway_months(10_000.0, -500.0), f64::INFINITY);
        assert_eq!(cash_runway_months(10_000.0, 2000.0), 5.0);
        assert!(!cash_runway_months(0.0, 0.0).is_nan());
    }

    #[test]
    fn burn_rate_averages_net_expenses() {
        let summaries = vec![
            MonthlySummary {
                month: "2024-01".to_string(),
                income: 1000.0,
                expenses: 4000.0,
                net: -3000.0,
            },
            MonthlySummary {
                month: "2024-02".to_string(),
                income: 2000.0,
                expenses: 3000.0,
                net: -1000.0,
            },
        ];
        assert_eq!(average_monthly_burn(&summaries), 2000.0);
        assert_eq!(average_monthly_burn(&[]), 0.0);
    }
}
