use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::state::data::{FileInfo, PickedFile};

/// Extensions we know how to label, with their MIME types
const KNOWN_TYPES: [(&str, &str); 10] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("txt", "text/plain"),
    ("pdf", "application/pdf"),
];

/// MIME type for a file name, judged by its extension
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    KNOWN_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Describe picked files from their metadata. Nothing is read yet, so an
/// oversized pick costs no memory before it is rejected.
pub async fn inspect_files(paths: Vec<PathBuf>) -> Vec<FileInfo> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let size = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(meta.len()),
            Ok(_) => {
                warn!("⚠️  {} is not a regular file", path.display());
                None
            }
            Err(e) => {
                warn!("⚠️  Could not inspect {}: {}", path.display(), e);
                None
            }
        };

        files.push(FileInfo {
            name: file_name(&path),
            mime: mime_for(&path),
            size,
            path,
        });
    }

    debug!("Inspected {} picked files", files.len());
    files
}

/// Read a validated batch into memory. Any file that cannot be read fails
/// the whole batch with the names of the failures.
pub async fn read_batch(files: Vec<FileInfo>) -> Result<Vec<PickedFile>, Vec<String>> {
    let mut picked = Vec::with_capacity(files.len());
    let mut unreadable = Vec::new();

    for file in files {
        match tokio::fs::read(&file.path).await {
            Ok(bytes) => picked.push(PickedFile {
                name: file.name,
                mime: file.mime,
                size: bytes.len() as u64,
                bytes,
            }),
            Err(e) => {
                warn!("⚠️  Could not read {}: {}", file.path.display(), e);
                unreadable.push(file.name);
            }
        }
    }

    if unreadable.is_empty() {
        debug!("Read {} picked files", picked.len());
        Ok(picked)
    } else {
        Err(unreadable)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Show the native multi-file picker for the given filter
pub fn pick_files(title: &str, filter_name: &str, extensions: &[&str]) -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter(filter_name, extensions)
        .pick_files()
        .unwrap_or_default()
}

/// Show the native single-file picker
pub fn pick_file(title: &str, filter_name: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter(filter_name, extensions)
        .pick_file()
}
