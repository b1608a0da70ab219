use std::sync::Arc;

use tauri::State;

use crate::bridge::InventoryBridge;
use crate::models::StorageInfoPayload;
use crate::utils::AppError;

#[tauri::command]
pub async fn get_storage_info(
    bridge: State<'_, Arc<InventoryBridge>>,
) -> Result<StorageInfoPayload, AppError> {
    let info = bridge.storage_info().await?;
    Ok(info.into())
}
