pub mod category;
pub mod icon;
pub mod permissions;
pub mod storage;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use crate::models::{AppRecord, StorageInfo, UninstallOutcome, UninstallTicket};
use crate::utils::{fallback_label, AppError, AppResult};

pub use icon::IconBitmap;

/// Everything the bridge needs from a device. The adb backend is the shipping
/// implementation; tests plug in their own.
#[async_trait]
pub trait DeviceProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Total and available bytes of the primary data partition.
    async fn storage_stats(&self) -> AppResult<StorageStats>;

    /// Every installed package id, system packages included; the bridge does
    /// the filtering.
    async fn list_packages(&self) -> AppResult<Vec<String>>;

    async fn package_facts(&self, package: &str) -> AppResult<PackageFacts>;

    /// Raw requested-permission identifiers, in declaration order.
    async fn requested_permissions(&self, package: &str) -> AppResult<Vec<String>>;

    /// Rasterized icon pixels, if the backend can produce them.
    async fn icon_pixels(&self, package: &str) -> AppResult<Option<IconBitmap>>;

    /// Launch the on-device uninstall confirmation dialog. Returns once the
    /// dialog has been requested, not once the user has answered.
    async fn request_uninstall(&self, package: &str) -> AppResult<()>;

    /// Block until the user resolves the confirmation dialog. `true` means
    /// the package was removed. Indefinite wait; only the user can end it.
    async fn await_uninstall_verdict(&self, package: &str) -> AppResult<bool>;
}

#[derive(Debug, Clone, Copy)]
pub struct StorageStats {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Per-package metadata, as far as the device reports it.
#[derive(Debug, Clone, Default)]
pub struct PackageFacts {
    pub display_name: Option<String>,
    pub system: bool,
    pub game: bool,
    pub has_launcher: bool,
    pub apk_size_bytes: Option<u64>,
    pub installed_at_ms: i64,
    pub last_updated_at_ms: i64,
}

struct PendingUninstall {
    request_id: u64,
    package_name: String,
}

/// The device inventory bridge: request in, response out, no state beyond the
/// single pending-uninstall slot. Provider and slot sit behind `Arc`s so the
/// uninstall watcher task can outlive the accepting call.
pub struct InventoryBridge {
    provider: Arc<dyn DeviceProvider>,
    pending_uninstall: Arc<Mutex<Option<PendingUninstall>>>,
    next_request_id: AtomicU64,
}

impl InventoryBridge {
    pub fn new(provider: Box<dyn DeviceProvider>) -> Self {
        Self {
            provider: Arc::from(provider),
            pending_uninstall: Arc::new(Mutex::new(None)),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub async fn storage_info(&self) -> AppResult<StorageInfo> {
        let stats = self.provider.storage_stats().await?;
        Ok(storage::storage_info(stats.total_bytes, stats.available_bytes))
    }

    /// Enumerate launchable non-system apps with full metadata. Any failure
    /// underneath, enumeration or per-app lookup alike, fails the whole call.
    pub async fn installed_apps(&self) -> AppResult<Vec<AppRecord>> {
        let packages = self
            .provider
            .list_packages()
            .await
            .map_err(|e| AppError::GetApps(e.to_string()))?;

        let mut records = Vec::new();
        for package in packages {
            let facts = self
                .provider
                .package_facts(&package)
                .await
                .map_err(|e| AppError::GetApps(e.to_string()))?;

            if facts.system || !facts.has_launcher {
                continue;
            }

            let raw_permissions = self
                .provider
                .requested_permissions(&package)
                .await
                .map_err(|e| AppError::GetApps(e.to_string()))?;

            let app_icon = self
                .resolve_icon(&package)
                .await
                .map_err(|e| AppError::GetApps(e.to_string()))?;

            let app_name = facts
                .display_name
                .clone()
                .unwrap_or_else(|| fallback_label(&package));

            records.push(AppRecord {
                package_name: package,
                app_name,
                app_icon,
                size_mb: facts
                    .apk_size_bytes
                    .map(|bytes| bytes as f64 / (1024.0 * 1024.0))
                    .unwrap_or(0.0),
                installed_at_ms: facts.installed_at_ms,
                last_updated_at_ms: facts.last_updated_at_ms,
                permissions: permissions::map_permissions(&raw_permissions),
                category: category::classify(facts.system, facts.game),
            });
        }

        log::info!("{}: {} launchable apps", self.provider.name(), records.len());
        Ok(records)
    }

    async fn resolve_icon(&self, package: &str) -> AppResult<String> {
        let bitmap = match self.provider.icon_pixels(package).await? {
            Some(bitmap) => bitmap,
            None => icon::placeholder_tile(package),
        };
        icon::encode_data_uri(&bitmap)
    }

    pub async fn app_permissions(
        &self,
        package: &str,
    ) -> AppResult<Vec<crate::models::PermissionCategory>> {
        let raw = self
            .provider
            .requested_permissions(package)
            .await
            .map_err(|e| AppError::GetPermissions(e.to_string()))?;
        Ok(permissions::map_permissions(&raw))
    }

    /// Accept an uninstall request. At most one may be in flight: a second
    /// request before the first resolves fails with `AlreadyInProgress`
    /// instead of silently overwriting the pending slot.
    ///
    /// Returns the acceptance ticket plus the channel on which the single
    /// outcome will be delivered once the user answers the device dialog.
    pub async fn begin_uninstall(
        &self,
        package: &str,
    ) -> AppResult<(UninstallTicket, oneshot::Receiver<UninstallOutcome>)> {
        let mut pending = self.pending_uninstall.lock().await;
        if let Some(current) = pending.as_ref() {
            log::warn!(
                "rejecting uninstall of {}: request {} for {} still pending",
                package,
                current.request_id,
                current.package_name
            );
            return Err(AppError::AlreadyInProgress);
        }

        self.provider.request_uninstall(package).await?;

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        *pending = Some(PendingUninstall {
            request_id,
            package_name: package.to_string(),
        });
        drop(pending);

        let (tx, rx) = oneshot::channel();
        let provider = Arc::clone(&self.provider);
        let slot = Arc::clone(&self.pending_uninstall);
        let package = package.to_string();
        tokio::spawn(async move {
            let success = match provider.await_uninstall_verdict(&package).await {
                Ok(confirmed) => confirmed,
                Err(e) => {
                    log::error!("uninstall verdict for {} failed: {}", package, e);
                    false
                }
            };

            slot.lock().await.take();

            // Receiver may be gone if the UI went away; nothing to do then.
            let _ = tx.send(UninstallOutcome {
                request_id,
                package_name: package,
                success,
            });
        });

        Ok((UninstallTicket { request_id }, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, PermissionCategory};
    use std::collections::{HashMap, VecDeque};

    struct MockProvider {
        storage: StorageStats,
        packages: Vec<String>,
        facts: HashMap<String, PackageFacts>,
        perms: HashMap<String, Vec<String>>,
        icons: HashMap<String, IconBitmap>,
        fail_list: bool,
        verdicts: Mutex<VecDeque<oneshot::Receiver<bool>>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                storage: StorageStats {
                    total_bytes: 1_000_000_000,
                    available_bytes: 250_000_000,
                },
                packages: Vec::new(),
                facts: HashMap::new(),
                perms: HashMap::new(),
                icons: HashMap::new(),
                fail_list: false,
                verdicts: Mutex::new(VecDeque::new()),
            }
        }

        fn with_app(mut self, package: &str, facts: PackageFacts, perms: &[&str]) -> Self {
            self.packages.push(package.to_string());
            self.facts.insert(package.to_string(), facts);
            self.perms
                .insert(package.to_string(), perms.iter().map(|p| p.to_string()).collect());
            self
        }
    }

    #[async_trait]
    impl DeviceProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn storage_stats(&self) -> AppResult<StorageStats> {
            Ok(self.storage)
        }

        async fn list_packages(&self) -> AppResult<Vec<String>> {
            if self.fail_list {
                return Err(AppError::Adb("device offline".into()));
            }
            Ok(self.packages.clone())
        }

        async fn package_facts(&self, package: &str) -> AppResult<PackageFacts> {
            self.facts
                .get(package)
                .cloned()
                .ok_or_else(|| AppError::Adb(format!("package {} not found", package)))
        }

        async fn requested_permissions(&self, package: &str) -> AppResult<Vec<String>> {
            self.perms
                .get(package)
                .cloned()
                .ok_or_else(|| AppError::Adb(format!("package {} not found", package)))
        }

        async fn icon_pixels(&self, package: &str) -> AppResult<Option<IconBitmap>> {
            Ok(self.icons.get(package).cloned())
        }

        async fn request_uninstall(&self, _package: &str) -> AppResult<()> {
            Ok(())
        }

        async fn await_uninstall_verdict(&self, _package: &str) -> AppResult<bool> {
            let rx = self
                .verdicts
                .lock()
                .await
                .pop_front()
                .expect("test queued a verdict");
            rx.await.map_err(|e| AppError::Platform(e.to_string()))
        }
    }

    fn launchable(name: Option<&str>) -> PackageFacts {
        PackageFacts {
            display_name: name.map(|n| n.to_string()),
            has_launcher: true,
            apk_size_bytes: Some(4 * 1024 * 1024),
            installed_at_ms: 1_600_000_000_000,
            last_updated_at_ms: 1_700_000_000_000,
            ..Default::default()
        }
    }

    fn bridge(provider: MockProvider) -> Arc<InventoryBridge> {
        Arc::new(InventoryBridge::new(Box::new(provider)))
    }

    #[tokio::test]
    async fn storage_info_uses_reported_totals() {
        let b = bridge(MockProvider::new());
        let info = b.storage_info().await.unwrap();
        assert_eq!(info.used_bytes, 750_000_000);
        assert_eq!(info.used_percentage, 75);
    }

    #[tokio::test]
    async fn system_and_launcherless_apps_are_filtered() {
        let provider = MockProvider::new()
            .with_app("com.example.keeper", launchable(Some("Keeper")), &[])
            .with_app(
                "com.android.sysui",
                PackageFacts {
                    system: true,
                    has_launcher: true,
                    ..Default::default()
                },
                &[],
            )
            .with_app(
                "com.example.service",
                PackageFacts {
                    has_launcher: false,
                    ..Default::default()
                },
                &[],
            );

        let apps = bridge(provider).installed_apps().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].package_name, "com.example.keeper");
    }

    #[tokio::test]
    async fn records_are_fully_assembled() {
        let provider = MockProvider::new().with_app(
            "com.example.music_player",
            launchable(None),
            &["android.permission.CAMERA", "android.permission.UNKNOWN_X"],
        );

        let apps = bridge(provider).installed_apps().await.unwrap();
        let app = &apps[0];
        assert_eq!(app.app_name, "Music player");
        assert!((app.size_mb - 4.0).abs() < f64::EPSILON);
        assert_eq!(app.permissions, vec![PermissionCategory::Camera]);
        assert_eq!(app.category, AppCategory::Other);
        assert!(app.app_icon.starts_with(icon::DATA_URI_PREFIX));
    }

    #[tokio::test]
    async fn provider_icon_pixels_are_used_when_present() {
        let mut provider =
            MockProvider::new().with_app("com.example.foo", launchable(Some("Foo")), &[]);
        provider.icons.insert(
            "com.example.foo".into(),
            IconBitmap {
                width: 1,
                height: 1,
                rgba: vec![1, 2, 3, 255],
            },
        );

        let apps = bridge(provider).installed_apps().await.unwrap();
        // Distinct from the placeholder tile for the same package.
        let placeholder = icon::encode_data_uri(&icon::placeholder_tile("com.example.foo")).unwrap();
        assert_ne!(apps[0].app_icon, placeholder);
    }

    #[tokio::test]
    async fn game_flag_wins_over_system_in_category() {
        // A system-flagged game would be filtered out of the list; classify is
        // covered directly in bridge::category. Here: game + user app.
        let provider = MockProvider::new().with_app(
            "com.example.game",
            PackageFacts {
                game: true,
                has_launcher: true,
                ..Default::default()
            },
            &[],
        );
        let apps = bridge(provider).installed_apps().await.unwrap();
        assert_eq!(apps[0].category, AppCategory::Game);
    }

    #[tokio::test]
    async fn enumeration_failure_is_a_get_apps_error() {
        let mut provider = MockProvider::new();
        provider.fail_list = true;
        let err = bridge(provider).installed_apps().await.unwrap_err();
        assert_eq!(err.code(), "GET_APPS_ERROR");
    }

    #[tokio::test]
    async fn per_app_lookup_failure_fails_the_whole_call() {
        let mut provider =
            MockProvider::new().with_app("com.example.ok", launchable(Some("Ok")), &[]);
        provider.packages.push("com.example.ghost".into());
        let err = bridge(provider).installed_apps().await.unwrap_err();
        assert_eq!(err.code(), "GET_APPS_ERROR");
    }

    #[tokio::test]
    async fn unresolvable_package_is_a_get_permissions_error() {
        let err = bridge(MockProvider::new())
            .app_permissions("com.example.nope")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GET_PERMISSIONS_ERROR");
    }

    #[tokio::test]
    async fn uninstall_delivers_exactly_one_outcome_after_resolution() {
        let provider = MockProvider::new();
        let (confirm_tx, confirm_rx) = oneshot::channel();
        provider.verdicts.lock().await.push_back(confirm_rx);

        let b = bridge(provider);
        let (ticket, mut rx) = b.begin_uninstall("com.example.foo").await.unwrap();

        // Nothing may fire before the user answers the dialog.
        assert!(rx.try_recv().is_err());

        confirm_tx.send(true).unwrap();
        let outcome = rx.await.unwrap();
        assert_eq!(outcome.request_id, ticket.request_id);
        assert_eq!(outcome.package_name, "com.example.foo");
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn concurrent_uninstall_is_rejected_then_slot_frees_up() {
        let provider = MockProvider::new();
        let (first_tx, first_rx) = oneshot::channel();
        let (_second_tx, second_rx) = oneshot::channel::<bool>();
        {
            let mut verdicts = provider.verdicts.lock().await;
            verdicts.push_back(first_rx);
            verdicts.push_back(second_rx);
        }

        let b = bridge(provider);
        let (first_ticket, first) = b.begin_uninstall("com.example.foo").await.unwrap();

        let err = b.begin_uninstall("com.example.bar").await.unwrap_err();
        assert_eq!(err.code(), "ALREADY_IN_PROGRESS");

        // User cancels the first dialog; the slot must free up.
        first_tx.send(false).unwrap();
        let outcome = first.await.unwrap();
        assert!(!outcome.success);

        let (second_ticket, _rx) = b.begin_uninstall("com.example.bar").await.unwrap();
        assert_ne!(second_ticket.request_id, first_ticket.request_id);
    }
}
