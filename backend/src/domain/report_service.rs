//! Service wiring the aggregation reducers to storage.

use anyhow::Result;
use chrono::{Months, NaiveDate};
use tracing::info;

use crate::domain::balance_service::BalanceService;
use crate::domain::commands::reports::{DailyBalanceQuery, ReportRangeQuery, RunwayResult};
use crate::domain::commands::transactions::ProjectionQuery;
use crate::domain::reporting::{
    average_monthly_burn, cash_runway_months, category_totals, daily_balance_series,
    monthly_summaries, CategoryTotal, DailyBalancePoint, MonthlySummary,
};
use crate::domain::transaction_service::TransactionService;
use crate::storage::csv::CsvConnection;

/// Trailing window the burn rate is averaged over.
const BURN_RATE_MONTHS: u32 = 3;

#[derive(Clone)]
pub struct ReportService {
    transaction_service: TransactionService,
    balance_service: BalanceService,
}

impl ReportService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            transaction_service: TransactionService::new(connection.clone()),
            balance_service: BalanceService::new(connection),
        }
    }

    pub fn monthly_report(&self, query: ReportRangeQuery) -> Result<Vec<MonthlySummary>> {
        let normalized = self
            .transaction_service
            .collect_normalized(&projection_query(&query))?;
        Ok(monthly_summaries(&normalized))
    }

    pub fn category_report(&self, query: ReportRangeQuery) -> Result<Vec<CategoryTotal>> {
        let normalized = self
            .transaction_service
            .collect_normalized(&projection_query(&query))?;
        Ok(category_totals(&normalized))
    }

    /// Balance trajectory over the window, one point per day. Seeded with
    /// the stored balance unless the query reseeds it for a what-if view.
    pub fn daily_balances(&self, query: DailyBalanceQuery) -> Result<Vec<DailyBalancePoint>> {
        let normalized = self.transaction_service.collect_normalized(&ProjectionQuery {
            start: query.start,
            end: query.end,
            include_simulations: query.include_simulations,
            scenario_id: query.scenario_id.clone(),
        })?;
        let seed = query
            .seed_balance
            .unwrap_or_else(|| self.balance_service.current_balance_or_zero());
        Ok(daily_balance_series(&normalized, query.start, query.end, seed))
    }

    pub fn runway(&self) -> Result<RunwayResult> {
        self.runway_as_of(chrono::Local::now().date_naive())
    }

    /// Cash runway from the average burn over the trailing months.
    /// Simulations never enter the burn rate; it reflects booked reality.
    pub fn runway_as_of(&self, today: NaiveDate) -> Result<RunwayResult> {
        let start = today
            .checked_sub_months(Months::new(BURN_RATE_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        let normalized = self.transaction_service.collect_normalized(&ProjectionQuery {
            start,
            end: today,
            include_simulations: false,
            scenario_id: None,
        })?;

        let monthly_burn_rate = average_monthly_burn(&monthly_summaries(&normalized));
        let current_balance = self.balance_service.current_balance_or_zero();
        let months_of_runway = cash_runway_months(current_balance, monthly_burn_rate);

        info!(
            "Runway: balance {:.2}, burn {:.2}/month",
            current_balance, monthly_burn_rate
        );
        Ok(RunwayResult {
            current_balance,
            monthly_burn_rate,
            months_of_runway,
        })
    }
}

fn projection_query(query: &ReportRangeQuery) -> ProjectionQuery {
    ProjectionQuery {
        start: query.start,
        end: query.end,
        include_simulations: query.include_simulations,
        scenario_id: query.scenario_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::transactions::{CreateTransactionCommand, ImportRowCommand};
    use shared::{Category, Direction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        connection: CsvConnection,
        reports: ReportService,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(dir.path()).unwrap();
        Fixture {
            _dir: dir,
            reports: ReportService::new(connection.clone()),
            connection,
        }
    }

    fn seed_rows(f: &Fixture, rows: Vec<(NaiveDate, f64, Direction)>) {
        let commands = rows
            .into_iter()
            .map(|(day, amount, direction)| ImportRowCommand {
                date: day,
                details: "Posten".to_string(),
                amount,
                direction,
                category: Some(Category::Standard),
            })
            .collect();
        TransactionService::new(f.connection.clone())
            .import_transactions(commands)
            .unwrap();
    }

    #[test]
    fn monthly_report_groups_by_month() {
        let f = fixture();
        seed_rows(
            &f,
            vec![
                (date(2024, 4, 5), 8000.0, Direction::Incoming),
                (date(2024, 4, 20), 1200.0, Direction::Outgoing),
                (date(2024, 5, 3), 6500.0, Direction::Outgoing),
            ],
        );

        let summaries = f
            .reports
            .monthly_report(ReportRangeQuery {
                start: date(2024, 4, 1),
                end: date(2024, 5, 31),
                include_simulations: false,
                scenario_id: None,
            })
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month, "2024-04");
        assert_eq!(summaries[0].net, 6800.0);
        assert_eq!(summaries[1].net, -6500.0);
    }

    #[test]
    fn daily_balances_reseedable() {
        let f = fixture();
        BalanceService::new(f.connection.clone())
            .set_current_balance(1000.0, date(2024, 6, 1))
            .unwrap();
        seed_rows(&f, vec![(date(2024, 6, 2), 100.0, Direction::Incoming)]);

        let query = DailyBalanceQuery {
            start: date(2024, 6, 1),
            end: date(2024, 6, 3),
            include_simulations: false,
            scenario_id: None,
            seed_balance: None,
        };

        let stored = f.reports.daily_balances(query.clone()).unwrap();
        assert_eq!(stored.last().unwrap().balance, 1100.0);

        let reseeded = f
            .reports
            .daily_balances(DailyBalanceQuery {
                seed_balance: Some(0.0),
                ..query
            })
            .unwrap();
        assert_eq!(reseeded.last().unwrap().balance, 100.0);
    }

    #[test]
    fn runway_from_trailing_burn() {
        let f = fixture();
        BalanceService::new(f.connection.clone())
            .set_current_balance(12_000.0, date(2024, 6, 30))
            .unwrap();
        // Three months netting -2000 each.
        seed_rows(
            &f,
            vec![
                (date(2024, 4, 10), 2000.0, Direction::Outgoing),
                (date(2024, 5, 10), 2000.0, Direction::Outgoing),
                (date(2024, 6, 10), 2000.0, Direction::Outgoing),
            ],
        );

        let runway = f.reports.runway_as_of(date(2024, 6, 30)).unwrap();
        assert_eq!(runway.monthly_burn_rate, 2000.0);
        assert_eq!(runway.months_of_runway, 6.0);
    }

    #[test]
    fn positive_cashflow_means_unbounded_runway() {
        let f = fixture();
        BalanceService::new(f.connection.clone())
            .set_current_balance(5000.0, date(2024, 6, 30))
            .unwrap();
        seed_rows(&f, vec![(date(2024, 6, 10), 9000.0, Direction::Incoming)]);

        let runway = f.reports.runway_as_of(date(2024, 6, 30)).unwrap();
        assert!(runway.monthly_burn_rate < 0.0);
        assert!(runway.months_of_runway.is_infinite());
    }

    #[test]
    fn empty_books_have_unbounded_runway() {
        let f = fixture();
        let runway = f.reports.runway_as_of(date(2024, 6, 30)).unwrap();
        assert_eq!(runway.monthly_burn_rate, 0.0);
        assert!(runway.months_of_runway.is_infinite());
    }

    #[test]
    fn create_vs_import_category_survives_reports() {
        let f = fixture();
        TransactionService::new(f.connection.clone())
            .create_transaction(CreateTransactionCommand {
                date: date(2024, 6, 5),
                details: "Barausgabe".to_string(),
                amount: 40.0,
                direction: Direction::Outgoing,
                category: None,
                is_simulation: false,
            })
            .unwrap();

        let totals = f
            .reports
            .category_report(ReportRangeQuery {
                start: date(2024, 6, 1),
                end: date(2024, 6, 30),
                include_simulations: false,
                scenario_id: None,
            })
            .unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category, Category::Standard);
        assert_eq!(totals[0].total, 40.0);
    }
}
