// ABOUTME: Tauri command handlers for frontend-backend communication.
// ABOUTME: Each user intent (role, table, row, save, add, delete, back, report) maps to one command.

use crate::browser::Role;
use crate::config::{self, ConnectionConfig};
use crate::error::Error;
use crate::reports::{Report, ReportKind};
use crate::schema::KNOWN_TABLES;
use crate::session::{BrowserSnapshot, Session};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Application-wide state managed by Tauri. At most one session is open.
pub struct AppState {
    config_dir: PathBuf,
    session: Mutex<Option<Session>>,
}

impl AppState {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            session: Mutex::new(None),
        }
    }

    pub async fn shutdown(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.close().await;
        }
    }
}

fn to_message(err: Error) -> String {
    err.to_string()
}

#[tauri::command]
pub fn get_config(state: tauri::State<'_, AppState>) -> Result<ConnectionConfig, String> {
    config::resolve(&state.config_dir).map_err(to_message)
}

#[tauri::command]
pub fn save_config(
    state: tauri::State<'_, AppState>,
    config: ConnectionConfig,
) -> Result<(), String> {
    config::save(&state.config_dir, &config).map_err(to_message)
}

#[tauri::command]
pub fn list_tables() -> Vec<String> {
    KNOWN_TABLES.iter().map(|t| t.to_string()).collect()
}

#[tauri::command]
pub async fn select_role(
    state: tauri::State<'_, AppState>,
    role: Role,
) -> Result<BrowserSnapshot, String> {
    let config = config::resolve(&state.config_dir).map_err(to_message)?;
    let mut guard = state.session.lock().await;
    if let Some(previous) = guard.take() {
        previous.close().await;
    }
    let session = Session::open(&config, role).await.map_err(to_message)?;
    let snapshot = session.snapshot();
    *guard = Some(session);
    Ok(snapshot)
}

#[tauri::command]
pub async fn navigate_back(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.shutdown().await;
    Ok(())
}

#[tauri::command]
pub async fn select_table(
    state: tauri::State<'_, AppState>,
    name: String,
) -> Result<BrowserSnapshot, String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    session.select_table(&name).await.map_err(to_message)?;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn select_row(
    state: tauri::State<'_, AppState>,
    index: Option<usize>,
) -> Result<BrowserSnapshot, String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    let result = match index {
        Some(index) => session.select_row(index).map(|_| ()),
        None => session.clear_selection(),
    };
    result.map_err(to_message)?;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn edit_field(
    state: tauri::State<'_, AppState>,
    column: String,
    value: String,
) -> Result<(), String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    session.edit_field(&column, value).map_err(to_message)
}

#[tauri::command]
pub async fn save_record(state: tauri::State<'_, AppState>) -> Result<BrowserSnapshot, String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    session.save().await.map_err(to_message)?;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn add_record(state: tauri::State<'_, AppState>) -> Result<BrowserSnapshot, String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    session.add().await.map_err(to_message)?;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn delete_record(state: tauri::State<'_, AppState>) -> Result<BrowserSnapshot, String> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or(Error::NoSession).map_err(to_message)?;
    session.delete().await.map_err(to_message)?;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn run_report(
    state: tauri::State<'_, AppState>,
    kind: ReportKind,
) -> Result<Report, String> {
    let guard = state.session.lock().await;
    let session = guard.as_ref().ok_or(Error::NoSession).map_err(to_message)?;
    session.run_report(kind).await.map_err(to_message)
}
