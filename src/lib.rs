pub mod adb;
pub mod bridge;
pub mod commands;
pub mod models;
pub mod utils;

use std::sync::Arc;

use tauri::Manager;

use adb::{AdbClient, AdbProvider};
use bridge::InventoryBridge;

pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            commands::storage::get_storage_info,
            commands::apps::get_installed_apps,
            commands::apps::get_app_permissions,
            commands::uninstall::uninstall_app,
        ])
        .setup(|app| {
            let client = AdbClient::from_env();

            // Startup probe, informational only, a device may be plugged in
            // later.
            let probe = client.clone();
            tauri::async_runtime::spawn(async move {
                match probe.devices().await {
                    Ok(devices) if devices.is_empty() => {
                        log::warn!("no Android device attached");
                    }
                    Ok(devices) => log::info!("attached devices: {}", devices.join(", ")),
                    Err(e) => log::warn!("adb not reachable: {}", e),
                }
            });

            let bridge = Arc::new(InventoryBridge::new(Box::new(AdbProvider::new(client))));
            app.manage(bridge);

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running DroidSweep");
}
