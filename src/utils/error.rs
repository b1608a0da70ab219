use serde::ser::SerializeStruct;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not list installed apps: {0}")]
    GetApps(String),

    #[error("Could not read app permissions: {0}")]
    GetPermissions(String),

    #[error("An uninstall request is already in progress")]
    AlreadyInProgress,

    #[error("adb failed: {0}")]
    Adb(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Platform(String),
}

impl AppError {
    /// Stable code the webview switches on; everything that is not one of the
    /// modeled request failures collapses to a generic platform error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::GetApps(_) => "GET_APPS_ERROR",
            AppError::GetPermissions(_) => "GET_PERMISSIONS_ERROR",
            AppError::AlreadyInProgress => "ALREADY_IN_PROGRESS",
            AppError::Adb(_) | AppError::Io(_) | AppError::Image(_) | AppError::Platform(_) => {
                "PLATFORM_ERROR"
            }
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type AppResult<T> = Result<T, AppError>;
