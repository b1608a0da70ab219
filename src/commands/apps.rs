use std::sync::Arc;

use tauri::State;

use crate::bridge::InventoryBridge;
use crate::models::{AppRecord, PermissionCategory};
use crate::utils::AppError;

#[tauri::command]
pub async fn get_installed_apps(
    bridge: State<'_, Arc<InventoryBridge>>,
) -> Result<Vec<AppRecord>, AppError> {
    bridge.installed_apps().await
}

#[tauri::command]
pub async fn get_app_permissions(
    package_name: String,
    bridge: State<'_, Arc<InventoryBridge>>,
) -> Result<Vec<PermissionCategory>, AppError> {
    bridge.app_permissions(&package_name).await
}
