use std::sync::Arc;

use tauri::{AppHandle, Emitter, State};

use crate::bridge::InventoryBridge;
use crate::models::UninstallTicket;
use crate::utils::AppError;

/// Event carrying the eventual uninstall outcome to the webview.
pub const UNINSTALL_RESULT_EVENT: &str = "uninstallResult";

/// Accepts the request and returns immediately; the outcome surfaces later
/// through the `uninstallResult` event once the user answers the on-device
/// dialog. A second request while one is pending fails with
/// `ALREADY_IN_PROGRESS`.
#[tauri::command]
pub async fn uninstall_app(
    package_name: String,
    app_handle: AppHandle,
    bridge: State<'_, Arc<InventoryBridge>>,
) -> Result<UninstallTicket, AppError> {
    let (ticket, outcome_rx) = bridge.begin_uninstall(&package_name).await?;

    tauri::async_runtime::spawn(async move {
        match outcome_rx.await {
            Ok(outcome) => {
                let _ = app_handle.emit(UNINSTALL_RESULT_EVENT, &outcome);
            }
            Err(e) => log::error!("uninstall outcome channel dropped: {}", e),
        }
    });

    Ok(ticket)
}
