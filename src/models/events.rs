use serde::{Deserialize, Serialize};

/// Returned by `uninstall_app` when the request is accepted. Acceptance only:
/// the actual outcome arrives later through the `uninstallResult` event, and
/// the request id correlates the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallTicket {
    pub request_id: u64,
}

/// Payload of the `uninstallResult` event. Emitted exactly once per accepted
/// request, after the user resolves the on-device confirmation dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallOutcome {
    pub request_id: u64,
    pub package_name: String,
    pub success: bool,
}
