use crate::models::StorageInfo;

/// Derive the full storage record from what the platform actually reports:
/// total and available bytes. Used space is the difference, so the
/// `total == used + available` invariant holds by construction.
pub fn storage_info(total_bytes: u64, available_bytes: u64) -> StorageInfo {
    // A backend reporting more available than total would break the invariant.
    let available_bytes = available_bytes.min(total_bytes);
    let used_bytes = total_bytes - available_bytes;

    let used_percentage = if total_bytes == 0 {
        0
    } else {
        ((used_bytes as u128 * 100) / total_bytes as u128).min(100) as u8
    };

    StorageInfo {
        total_bytes,
        used_bytes,
        available_bytes,
        used_percentage,
    }
}
