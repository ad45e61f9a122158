// ABOUTME: Integration tests for the canned viewer reports against seeded flight data.
// ABOUTME: Covers aggregation order, the expiring-contract window and empty results.

mod support;

use airops_lib::reports::{run_report, ChartHint, ReportKind};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use support::{run, seeded_db, strings};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn flight_hours_by_plane_model() -> Result<()> {
    let (db, _catalog) = seeded_db().await?;

    let report = run_report(&db, ReportKind::FlightHoursByPlane, today()).await?;
    assert_eq!(report.chart, ChartHint::Pie);
    assert_eq!(report.rows, vec![strings(&["A320", "9"]), strings(&["SSJ100", "3"])]);
    Ok(())
}

#[tokio::test]
async fn flight_hours_by_pilot() -> Result<()> {
    let (db, _catalog) = seeded_db().await?;

    let report = run_report(&db, ReportKind::FlightHoursByPilot, today()).await?;
    assert_eq!(report.chart, ChartHint::Bar);
    assert_eq!(report.rows, vec![strings(&["2", "8"]), strings(&["1", "4"])]);
    Ok(())
}

#[tokio::test]
async fn only_contracts_ending_within_a_year_are_listed() -> Result<()> {
    let (db, _catalog) = seeded_db().await?;
    let soon = today().checked_add_days(Days::new(200)).unwrap();
    let later = today().checked_add_days(Days::new(400)).unwrap();
    run(
        &db,
        &format!(
            "INSERT INTO pilot (surname, experience, contract_end) VALUES ('Kuznetsov', 4, '{}'), ('Popov', 9, '{}')",
            soon, later
        ),
    )
    .await?;

    let report = run_report(&db, ReportKind::ExpiringContracts, today()).await?;
    assert_eq!(report.rows, vec![vec!["Kuznetsov".to_string(), soon.to_string()]]);
    assert_eq!(report.columns.len(), 2);
    Ok(())
}

#[tokio::test]
async fn contract_ending_today_is_included() -> Result<()> {
    let (db, _catalog) = seeded_db().await?;
    run(
        &db,
        &format!(
            "INSERT INTO pilot (surname, experience, contract_end) VALUES ('Volkov', 1, '{}')",
            today()
        ),
    )
    .await?;

    let report = run_report(&db, ReportKind::ExpiringContracts, today()).await?;
    assert_eq!(report.rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn reports_on_empty_tables_are_empty() -> Result<()> {
    let (db, _catalog) = support::empty_db().await?;

    for kind in ReportKind::ALL {
        let report = run_report(&db, kind, today()).await?;
        assert!(report.is_empty(), "{:?} should be empty", kind);
        assert_eq!(report.title, kind.title());
    }
    Ok(())
}
