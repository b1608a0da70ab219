//! Pure parsers for the adb command output the provider consumes. Everything
//! here is line-oriented text scraping; keeping it free of process handling
//! makes it testable against captured transcripts.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

static RE_FLAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:pkgF|f)lags=\[\s*([^\]]*?)\s*\]").unwrap());

const DUMPSYS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What `dumpsys package <pkg>` yields that the bridge cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpsysPackage {
    pub system: bool,
    pub game: bool,
    pub installed_at_ms: i64,
    pub last_updated_at_ms: i64,
    pub requested_permissions: Vec<String>,
}

/// `pm list packages`: one `package:<id>` per line.
pub fn parse_package_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .filter(|pkg| !pkg.is_empty())
        .map(|pkg| pkg.to_string())
        .collect()
}

/// `pm path <pkg>`: first line is the base APK, split APKs follow.
pub fn parse_pm_path(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("package:"))
        .filter(|path| !path.is_empty())
        .map(|path| path.to_string())
}

pub fn parse_dumpsys_package(output: &str) -> DumpsysPackage {
    let mut parsed = DumpsysPackage::default();

    for caps in RE_FLAGS.captures_iter(output) {
        for token in caps[1].split_whitespace() {
            match token {
                "SYSTEM" => parsed.system = true,
                "GAME" => parsed.game = true,
                _ => {}
            }
        }
    }

    let mut in_requested = false;
    for line in output.lines() {
        let trimmed = line.trim();

        if let Some(value) = trimmed.strip_prefix("firstInstallTime=") {
            parsed.installed_at_ms = parse_dumpsys_time(value);
        } else if let Some(value) = trimmed.strip_prefix("lastUpdateTime=") {
            parsed.last_updated_at_ms = parse_dumpsys_time(value);
        } else if trimmed == "category=0" {
            // ApplicationInfo.CATEGORY_GAME
            parsed.game = true;
        }

        if in_requested {
            if trimmed.is_empty() || trimmed.ends_with(':') {
                in_requested = false;
            } else {
                // Entries may carry annotations: "android.permission.X: restricted=true"
                let name = trimmed.split(|c: char| c == ':' || c.is_whitespace())
                    .next()
                    .unwrap_or("");
                if !name.is_empty() {
                    parsed.requested_permissions.push(name.to_string());
                }
            }
        } else if trimmed == "requested permissions:" {
            in_requested = true;
        }
    }

    parsed
}

/// dumpsys prints local wall-clock times without a zone; treat them as UTC.
fn parse_dumpsys_time(value: &str) -> i64 {
    NaiveDateTime::parse_from_str(value.trim(), DUMPSYS_TIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// `df <mount>`: returns (total_bytes, available_bytes) for the row mounted
/// at `mount`. Sizes are reported in 1K blocks.
pub fn parse_df(output: &str, mount: &str) -> Option<(u64, u64)> {
    for line in output.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 || *fields.last()? != mount {
            continue;
        }
        let total_kib: u64 = fields[1].parse().ok()?;
        let available_kib: u64 = fields[3].parse().ok()?;
        return Some((total_kib * 1024, available_kib * 1024));
    }
    None
}

/// `cmd package resolve-activity --brief <pkg>`: the last non-empty line is
/// either a component (`pkg/Activity`) or "No activity found".
pub fn parse_resolve_activity(output: &str) -> bool {
    match output.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(line) => {
            let line = line.trim();
            !line.contains("No activity found") && line.contains('/')
        }
        None => false,
    }
}

/// Foreground package from `dumpsys activity activities`
/// (`mResumedActivity: ActivityRecord{... u0 com.foo/.Main t12}`).
pub fn parse_foreground_package(output: &str) -> Option<String> {
    for line in output.lines() {
        if !line.contains("mResumedActivity") && !line.contains("mFocusedApp") {
            continue;
        }
        if let Some(start) = line.find("u0 ") {
            let rest = &line[start + 3..];
            if let Some(end) = rest.find('/') {
                return Some(rest[..end].to_string());
            }
        }
    }
    None
}

/// `stat -c %s <path>`: bare byte count.
pub fn parse_stat_size(output: &str) -> Option<u64> {
    output.trim().parse().ok()
}

/// `adb devices`: serials in the `device` state.
pub fn parse_devices(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(serial), Some("device")) => Some(serial.to_string()),
                _ => None,
            }
        })
        .collect()
}
