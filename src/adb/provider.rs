use std::time::Duration;

use async_trait::async_trait;

use super::parse;
use super::AdbClient;
use crate::bridge::{DeviceProvider, IconBitmap, PackageFacts, StorageStats};
use crate::utils::{AppError, AppResult};

/// Primary data partition, the one the storage card in the UI reports on.
const DATA_MOUNT: &str = "/data";

/// How often the uninstall watcher re-checks the device.
const VERDICT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Both AOSP and Google builds host the uninstall dialog in a package
/// containing this fragment.
const UNINSTALLER_HINT: &str = "packageinstaller";

/// `DeviceProvider` over a USB/WiFi-attached Android device, driven entirely
/// through the `adb` CLI.
pub struct AdbProvider {
    client: AdbClient,
}

impl AdbProvider {
    pub fn new(client: AdbClient) -> Self {
        Self { client }
    }

    async fn dumpsys_package(&self, package: &str) -> AppResult<parse::DumpsysPackage> {
        let output = self.client.shell(&["dumpsys", "package", package]).await?;
        if output.contains("Unable to find package") || !output.contains("Package [") {
            return Err(AppError::Adb(format!("package {} is not installed", package)));
        }
        Ok(parse::parse_dumpsys_package(&output))
    }

    /// Base APK length in bytes; None when the path or size cannot be read.
    async fn apk_size_bytes(&self, package: &str) -> Option<u64> {
        let path_output = self.client.shell(&["pm", "path", package]).await.ok()?;
        let apk_path = parse::parse_pm_path(&path_output)?;
        let stat_output = self
            .client
            .shell(&["stat", "-c", "%s", &apk_path])
            .await
            .ok()?;
        parse::parse_stat_size(&stat_output)
    }

    async fn has_launcher(&self, package: &str) -> AppResult<bool> {
        let output = self
            .client
            .shell(&["cmd", "package", "resolve-activity", "--brief", package])
            .await?;
        Ok(parse::parse_resolve_activity(&output))
    }

    /// `pm list packages <pkg>` exits 0 whether or not the package exists,
    /// which keeps this usable inside the verdict poll loop.
    async fn is_installed(&self, package: &str) -> AppResult<bool> {
        let output = self.client.shell(&["pm", "list", "packages", package]).await?;
        Ok(parse::parse_package_list(&output)
            .iter()
            .any(|pkg| pkg == package))
    }

    async fn foreground_package(&self) -> AppResult<Option<String>> {
        let output = self
            .client
            .shell(&["dumpsys", "activity", "activities"])
            .await?;
        Ok(parse::parse_foreground_package(&output))
    }
}

#[async_trait]
impl DeviceProvider for AdbProvider {
    fn name(&self) -> &str {
        "adb"
    }

    async fn storage_stats(&self) -> AppResult<StorageStats> {
        let output = self.client.shell(&["df", DATA_MOUNT]).await?;
        let (total_bytes, available_bytes) = parse::parse_df(&output, DATA_MOUNT)
            .ok_or_else(|| {
                AppError::Platform(format!("could not parse df output for {}", DATA_MOUNT))
            })?;
        Ok(StorageStats {
            total_bytes,
            available_bytes,
        })
    }

    async fn list_packages(&self) -> AppResult<Vec<String>> {
        let output = self.client.shell(&["pm", "list", "packages"]).await?;
        Ok(parse::parse_package_list(&output))
    }

    async fn package_facts(&self, package: &str) -> AppResult<PackageFacts> {
        let dump = self.dumpsys_package(package).await?;
        let has_launcher = self.has_launcher(package).await?;

        // Skip the APK stat for apps the bridge is going to drop anyway.
        let apk_size_bytes = if !dump.system && has_launcher {
            self.apk_size_bytes(package).await
        } else {
            None
        };

        Ok(PackageFacts {
            // dumpsys has no display label; the bridge derives one.
            display_name: None,
            system: dump.system,
            game: dump.game,
            has_launcher,
            apk_size_bytes,
            installed_at_ms: dump.installed_at_ms,
            last_updated_at_ms: dump.last_updated_at_ms,
        })
    }

    async fn requested_permissions(&self, package: &str) -> AppResult<Vec<String>> {
        Ok(self.dumpsys_package(package).await?.requested_permissions)
    }

    async fn icon_pixels(&self, _package: &str) -> AppResult<Option<IconBitmap>> {
        // adb cannot rasterize drawables; the bridge falls back to a
        // generated tile.
        Ok(None)
    }

    async fn request_uninstall(&self, package: &str) -> AppResult<()> {
        let uri = format!("package:{}", package);
        let output = self
            .client
            .shell(&[
                "am",
                "start",
                "-a",
                "android.intent.action.DELETE",
                "-d",
                &uri,
            ])
            .await?;
        if output.contains("Error") {
            return Err(AppError::Adb(format!(
                "could not launch uninstall dialog: {}",
                output.trim()
            )));
        }
        log::info!("uninstall dialog requested for {}", package);
        Ok(())
    }

    async fn await_uninstall_verdict(&self, package: &str) -> AppResult<bool> {
        // Confirmed: the package disappears. Cancelled: the uninstaller
        // dialog leaves the foreground with the package still present. No
        // timeout; only the user can resolve the dialog.
        let mut saw_dialog = false;
        loop {
            tokio::time::sleep(VERDICT_POLL_INTERVAL).await;

            if !self.is_installed(package).await? {
                log::info!("{} removed, uninstall confirmed", package);
                return Ok(true);
            }

            match self.foreground_package().await {
                Ok(Some(foreground)) if foreground.contains(UNINSTALLER_HINT) => {
                    saw_dialog = true;
                }
                Ok(_) if saw_dialog => {
                    log::info!("uninstall dialog for {} dismissed, package kept", package);
                    return Ok(false);
                }
                Ok(_) => {}
                Err(e) => log::debug!("foreground probe failed, retrying: {}", e),
            }
        }
    }
}
