// ABOUTME: Canned aggregate reports for the viewer: flight hours and expiring pilot contracts.
// ABOUTME: Results are plain labelled rows; charting is left to the display layer.

use crate::db::Database;
use crate::error::Result;
use crate::statement::{Dialect, Statement, Value};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Contracts ending within this many days from today are reported as expiring.
pub const CONTRACT_WINDOW_DAYS: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    FlightHoursByPlane,
    FlightHoursByPilot,
    ExpiringContracts,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::FlightHoursByPlane,
        ReportKind::FlightHoursByPilot,
        ReportKind::ExpiringContracts,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::FlightHoursByPlane => "Часы налета по самолетам",
            ReportKind::FlightHoursByPilot => "Часы налета пилотов",
            ReportKind::ExpiringContracts => "Пилоты с истекающим контрактом",
        }
    }

    pub fn chart(self) -> ChartHint {
        match self {
            ReportKind::FlightHoursByPlane => ChartHint::Pie,
            ReportKind::FlightHoursByPilot => ChartHint::Bar,
            ReportKind::ExpiringContracts => ChartHint::TableOnly,
        }
    }

    fn columns(self) -> Vec<String> {
        let labels: [&str; 2] = match self {
            ReportKind::FlightHoursByPlane => ["Модель", "Часы налета"],
            ReportKind::FlightHoursByPilot => ["Пилот", "Часы налета"],
            ReportKind::ExpiringContracts => ["Фамилия", "Дата окончания контракта"],
        };
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn statement(self, dialect: Dialect, today: NaiveDate) -> Statement {
        match self {
            ReportKind::FlightHoursByPlane => Statement::new(format!(
                "SELECT {}, {} FROM flight f JOIN plane p ON f.plane = p.number \
                 GROUP BY p.model ORDER BY SUM(f.duration) DESC",
                dialect.as_text("p.model"),
                dialect.as_text("SUM(f.duration)")
            )),
            ReportKind::FlightHoursByPilot => Statement::new(format!(
                "SELECT {}, {} FROM flight GROUP BY pilot ORDER BY SUM(duration) DESC",
                dialect.as_text("pilot"),
                dialect.as_text("SUM(duration)")
            )),
            ReportKind::ExpiringContracts => {
                let until = today
                    .checked_add_days(Days::new(CONTRACT_WINDOW_DAYS))
                    .unwrap_or(NaiveDate::MAX);
                Statement::new(format!(
                    "SELECT {}, {} FROM pilot \
                     WHERE contract_end >= {} AND contract_end <= {} \
                     ORDER BY pilot.contract_end",
                    dialect.as_text("surname"),
                    dialect.as_text("contract_end"),
                    dialect.placeholder(1),
                    dialect.placeholder(2)
                ))
                .bind(Value::Date(Some(today)))
                .bind(Value::Date(Some(until)))
            }
        }
    }
}

/// How the display layer is expected to chart a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartHint {
    Pie,
    Bar,
    TableOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub chart: ChartHint,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs a report as of `today`. An empty result is not an error.
#[tracing::instrument(skip(db))]
pub async fn run_report(db: &Database, kind: ReportKind, today: NaiveDate) -> Result<Report> {
    let rows = db.fetch_rows(&kind.statement(db.dialect(), today)).await?;
    Ok(Report {
        kind,
        title: kind.title().to_string(),
        chart: kind.chart(),
        columns: kind.columns(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiring_window_spans_a_year() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let stmt = ReportKind::ExpiringContracts.statement(Dialect::Postgres, today);

        assert!(stmt.sql.contains("contract_end >= $1 AND contract_end <= $2"));
        assert_eq!(
            stmt.params,
            vec![
                Value::Date(Some(today)),
                Value::Date(NaiveDate::from_ymd_opt(2025, 3, 1)),
            ]
        );
    }

    #[test]
    fn aggregate_reports_take_no_parameters() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for kind in [ReportKind::FlightHoursByPlane, ReportKind::FlightHoursByPilot] {
            assert!(kind.statement(Dialect::Sqlite, today).params.is_empty());
        }
    }

    #[test]
    fn postgres_reports_read_text_and_sort_on_totals() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let stmt = ReportKind::FlightHoursByPilot.statement(Dialect::Postgres, today);
        assert!(stmt.sql.starts_with("SELECT pilot::TEXT, SUM(duration)::TEXT FROM flight"));
        assert!(stmt.sql.ends_with("ORDER BY SUM(duration) DESC"));
    }

    #[test]
    fn every_report_has_two_labelled_columns() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.columns().len(), 2);
            assert!(!kind.title().is_empty());
        }
    }
}
