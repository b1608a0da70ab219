use serde::{Deserialize, Serialize};

/// Storage statistics for the device's primary data partition.
/// Invariant: `total_bytes == used_bytes + available_bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInfo {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    /// floor(used / total * 100), clamped to [0, 100]; 0 for an empty total.
    pub used_percentage: u8,
}

/// Wire shape for `get_storage_info`: every field a decimal string, which is
/// what the UI layer has always consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfoPayload {
    pub total_storage: String,
    pub used_storage: String,
    pub available_storage: String,
    pub used_percentage: String,
}

impl From<StorageInfo> for StorageInfoPayload {
    fn from(info: StorageInfo) -> Self {
        Self {
            total_storage: info.total_bytes.to_string(),
            used_storage: info.used_bytes.to_string(),
            available_storage: info.available_bytes.to_string(),
            used_percentage: info.used_percentage.to_string(),
        }
    }
}
