pub mod error;

pub use error::{AppError, AppResult};

/// Human-readable fallback label for a package id when the device offers no
/// display name: last dot segment, underscores to spaces, first letter
/// uppercased ("com.foo.music_player" -> "Music player").
pub fn fallback_label(package: &str) -> String {
    let last = package.rsplit('.').next().unwrap_or(package);
    let name = last.replace('_', " ");
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
