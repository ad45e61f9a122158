// ABOUTME: Entry point for the airline operations desktop application.
// ABOUTME: Initializes the Rust backend and starts the app.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    airops_lib::run()
}
