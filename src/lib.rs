#![forbid(unsafe_code)]

mod adapters;
mod app;
mod commands;
mod domain;
mod infrastructure;
mod ports;

use tauri::{Emitter, Manager};
use tokio::sync::broadcast::error::RecvError;

use app::{AppController, ShellSignal};
use commands::{
    // Settings commands
    get_paths, load_settings, save_settings,
    // Profile commands
    delete_profile, get_current_profile, get_profiles, save_profile, set_current_profile,
    // Bootstrap commands
    bootstrap_screen, forget_legacy_connection, request_manual_entry, session_state,
    // Connection commands
    check_db_connection, confirm_auto_connect, connect_manual, connect_with_profile, logout,
    switch_profile,
};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize the application controller
    let controller = match AppController::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .manage(controller)
        .setup(|app| {
            // Forward orchestrator signals to the shell as window events.
            let mut signals = app.state::<AppController>().orchestrator().subscribe();
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                loop {
                    match signals.recv().await {
                        Ok(signal) => {
                            let event = match &signal {
                                ShellSignal::Connected { .. } => "connected",
                                ShellSignal::Disconnected => "disconnected",
                            };
                            let _ = handle.emit(event, &signal);
                        }
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Settings commands
            load_settings,
            save_settings,
            get_paths,
            // Profile commands
            get_profiles,
            get_current_profile,
            save_profile,
            delete_profile,
            set_current_profile,
            // Bootstrap commands
            bootstrap_screen,
            session_state,
            request_manual_entry,
            forget_legacy_connection,
            // Connection commands
            connect_with_profile,
            connect_manual,
            confirm_auto_connect,
            switch_profile,
            check_db_connection,
            logout,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
