use tokio::process::Command;

use super::parse;
use crate::utils::{AppError, AppResult};

/// Thin wrapper around the `adb` CLI. One process per call, output captured;
/// a non-zero exit becomes an `AppError::Adb` carrying stderr.
#[derive(Debug, Clone)]
pub struct AdbClient {
    adb_path: String,
    serial: Option<String>,
}

impl AdbClient {
    pub fn new(adb_path: impl Into<String>, serial: Option<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial,
        }
    }

    /// `ADB` overrides the binary path, `DROIDSWEEP_SERIAL` pins a device
    /// when several are attached.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("ADB").unwrap_or_else(|_| "adb".to_string()),
            std::env::var("DROIDSWEEP_SERIAL").ok(),
        )
    }

    pub async fn exec(&self, args: &[&str]) -> AppResult<String> {
        let mut command = Command::new(&self.adb_path);
        if let Some(serial) = &self.serial {
            command.args(["-s", serial]);
        }
        command.args(args);

        let output = command
            .output()
            .await
            .map_err(|e| AppError::Adb(format!("failed to run {}: {}", self.adb_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Adb(format!(
                "adb {} failed ({}): {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    pub async fn shell(&self, args: &[&str]) -> AppResult<String> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("shell");
        full.extend_from_slice(args);
        self.exec(&full).await
    }

    /// Serials of devices in the `device` state (unauthorized/offline ones
    /// are skipped).
    pub async fn devices(&self) -> AppResult<Vec<String>> {
        let output = self.exec(&["devices"]).await?;
        Ok(parse::parse_devices(&output))
    }
}
