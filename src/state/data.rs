/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the API layer and the UI layer.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The logged-in user, as returned by the auth endpoints and persisted
/// in the session file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    /// Login name, also used as the author name on likes and comments
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// File name of the profile picture on the server
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

impl User {
    /// Name shown in greetings: full name when known, username otherwise
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// Single uppercase letter for the avatar placeholder
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// A comment left on a photo
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub photo_name: String,
    pub comment_text: String,
    pub author_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Per-viewer like flag plus the photo's total like count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub liked: bool,
    pub count: u64,
}

/// The message shown on the message page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Letter {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A file chosen in the picker, described from its metadata only.
///
/// Batches are validated on these before any contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    /// File name only (e.g., "beach.jpg")
    pub name: String,
    /// MIME type derived from the extension, if recognised
    pub mime: Option<&'static str>,
    /// Size on disk, `None` when the file could not be inspected
    pub size: Option<u64>,
}

/// A file chosen in the picker, read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    /// File name only (e.g., "beach.jpg")
    pub name: String,
    /// MIME type derived from the extension, if recognised
    pub mime: Option<&'static str>,
    pub size: u64,
    pub bytes: Vec<u8>,
}

/// Format a server timestamp ("2024-02-14T19:30:00.123") for display.
///
/// Anything that does not parse is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    match raw.parse::<NaiveDateTime>() {
        Ok(time) => time.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Human readable byte size ("1.5 MB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        let rounded = (size * 100.0).round() / 100.0;
        format!("{} {}", rounded, UNITS[unit])
    }
}
