use serde::{Deserialize, Serialize};

/// The six permission groups the UI knows how to display. Raw Android
/// permission identifiers that match none of them are dropped, never surfaced
/// as "Unknown".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionCategory {
    Camera,
    Location,
    Storage,
    Microphone,
    Contacts,
    Phone,
}

impl PermissionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCategory::Camera => "Camera",
            PermissionCategory::Location => "Location",
            PermissionCategory::Storage => "Storage",
            PermissionCategory::Microphone => "Microphone",
            PermissionCategory::Contacts => "Contacts",
            PermissionCategory::Phone => "Phone",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppCategory {
    Game,
    System,
    Other,
}

impl AppCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppCategory::Game => "Game",
            AppCategory::System => "System",
            AppCategory::Other => "Other",
        }
    }
}

/// One installed, launchable, non-system application as shown in the UI.
/// Built fresh on every `get_installed_apps` call; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub package_name: String,
    pub app_name: String,
    /// `data:image/png;base64,` URI, always decodable as PNG.
    pub app_icon: String,
    /// Base APK file length in MiB; 0.0 when the size could not be read.
    pub size_mb: f64,
    pub installed_at_ms: i64,
    pub last_updated_at_ms: i64,
    pub permissions: Vec<PermissionCategory>,
    pub category: AppCategory,
}
