// ABOUTME: Shared fixtures for integration tests: an airline schema seeded into SQLite.
// ABOUTME: Provides in-memory databases with a catalog and file-backed session configs.

#![allow(dead_code)]

use airops_lib::config::ConnectionConfig;
use airops_lib::db::Database;
use airops_lib::introspect;
use airops_lib::schema::Catalog;
use airops_lib::statement::Statement;
use anyhow::Result;
use tempfile::TempDir;

const SCHEMA: &[&str] = &[
    "CREATE TABLE country (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
    "CREATE TABLE airline (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        country INTEGER REFERENCES country(id),
        foundation DATE
    )",
    "CREATE TABLE airport (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        country INTEGER REFERENCES country(id)
    )",
    "CREATE TABLE plane (
        id INTEGER PRIMARY KEY,
        number TEXT NOT NULL UNIQUE,
        model TEXT NOT NULL,
        property INTEGER REFERENCES airline(id)
    )",
    "CREATE TABLE pilot (
        id INTEGER PRIMARY KEY,
        surname TEXT NOT NULL,
        experience INTEGER NOT NULL,
        contract_start DATE,
        contract_end DATE
    )",
    "CREATE TABLE flight (
        id INTEGER PRIMARY KEY,
        plane TEXT REFERENCES plane(number),
        pilot INTEGER REFERENCES pilot(id),
        departure INTEGER REFERENCES airport(id),
        destination INTEGER REFERENCES airport(id),
        airline INTEGER REFERENCES airline(id),
        duration INTEGER
    )",
];

const SEED: &[&str] = &[
    "INSERT INTO country (id, name) VALUES (1, 'Russia'), (2, 'Turkey')",
    "INSERT INTO airline (id, name, country, foundation) VALUES (1, 'Aeroflot', 1, '1923-02-09')",
    "INSERT INTO airport (id, name, country) VALUES (1, 'Sheremetyevo', 1), (2, 'Istanbul', 2)",
    "INSERT INTO plane (id, number, model, property) VALUES
        (1, 'RA-73001', 'A320', 1),
        (2, 'RA-89001', 'SSJ100', 1)",
    "INSERT INTO pilot (id, surname, experience, contract_start, contract_end) VALUES
        (1, 'Ivanov', 5, '2020-01-01', '2021-01-01'),
        (2, 'Petrov', 12, '2019-05-01', '2030-05-01'),
        (3, 'Sidorov', 3, '2022-03-15', '2027-03-15')",
    "INSERT INTO flight (id, plane, pilot, departure, destination, airline, duration) VALUES
        (1, 'RA-73001', 1, 1, 2, 1, 4),
        (2, 'RA-73001', 2, 2, 1, 1, 5),
        (3, 'RA-89001', 2, 1, 2, 1, 3)",
];

pub async fn run(db: &Database, sql: &str) -> Result<()> {
    db.execute(&Statement::new(sql), |_| Ok(())).await?;
    Ok(())
}

pub async fn create_schema(db: &Database) -> Result<()> {
    for sql in SCHEMA {
        run(db, sql).await?;
    }
    Ok(())
}

pub async fn seed(db: &Database) -> Result<()> {
    for sql in SEED {
        run(db, sql).await?;
    }
    Ok(())
}

/// In-memory database with the airline schema and seed rows.
pub async fn seeded_db() -> Result<(Database, Catalog)> {
    airops_lib::logging::init();
    let db = Database::connect(&ConnectionConfig::sqlite(":memory:")).await?;
    create_schema(&db).await?;
    seed(&db).await?;
    let catalog = introspect::build_catalog(&db).await?;
    Ok((db, catalog))
}

/// In-memory database with the airline schema and no rows.
pub async fn empty_db() -> Result<(Database, Catalog)> {
    let db = Database::connect(&ConnectionConfig::sqlite(":memory:")).await?;
    create_schema(&db).await?;
    let catalog = introspect::build_catalog(&db).await?;
    Ok((db, catalog))
}

/// Seeded database file; keep the `TempDir` alive for the duration of the test.
pub async fn seeded_file() -> Result<(TempDir, ConnectionConfig)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("airlines.db").display().to_string();

    let db = Database::connect(&ConnectionConfig::sqlite(format!("{}?mode=rwc", path))).await?;
    create_schema(&db).await?;
    seed(&db).await?;
    db.close().await;

    Ok((dir, ConnectionConfig::sqlite(path)))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
