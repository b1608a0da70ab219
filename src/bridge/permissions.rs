use crate::models::PermissionCategory;

/// Ordered keyword table for classifying raw permission identifiers.
/// Substring containment, first match wins; the order is part of the
/// observable behavior and must not change.
const KEYWORD_TABLE: &[(&str, PermissionCategory)] = &[
    ("CAMERA", PermissionCategory::Camera),
    ("LOCATION", PermissionCategory::Location),
    ("STORAGE", PermissionCategory::Storage),
    ("MICROPHONE", PermissionCategory::Microphone),
    ("CONTACTS", PermissionCategory::Contacts),
    ("PHONE", PermissionCategory::Phone),
];

/// Classify one raw identifier (e.g. `android.permission.READ_CONTACTS`).
/// Identifiers matching no keyword yield `None` and are dropped by callers.
pub fn categorize(raw: &str) -> Option<PermissionCategory> {
    KEYWORD_TABLE
        .iter()
        .find(|(keyword, _)| raw.contains(keyword))
        .map(|(_, category)| *category)
}

/// Map a requested-permission list to display categories, preserving input
/// order and duplicates, silently omitting unrecognized identifiers.
pub fn map_permissions<S: AsRef<str>>(raw: &[S]) -> Vec<PermissionCategory> {
    raw.iter().filter_map(|r| categorize(r.as_ref())).collect()
}
