// ABOUTME: Core library for the airline operations database application.
// ABOUTME: Generic table browsing and CRUD over a fixed set of tables, plus canned reports.

pub mod browser;
pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod form;
pub mod introspect;
pub mod labels;
pub mod logging;
pub mod reports;
pub mod schema;
pub mod session;
pub mod statement;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
use commands::*;

pub use browser::{BrowserState, Role, TableBrowser};
pub use error::{Error, Result};
pub use session::Session;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(AppState::new(config::default_config_dir()))
        .invoke_handler(tauri::generate_handler![
            get_config,
            save_config,
            list_tables,
            select_role,
            navigate_back,
            select_table,
            select_row,
            edit_field,
            save_record,
            add_record,
            delete_record,
            run_report,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|handle, event| {
        if let tauri::RunEvent::Exit = event {
            use tauri::Manager;
            let state = handle.state::<AppState>();
            tauri::async_runtime::block_on(state.shutdown());
        }
    });
}
