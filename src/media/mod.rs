/// Local media handling
///
/// This module handles:
/// - Picking files and reading them for upload (files.rs)
/// - Decoding fetched photos into grid thumbnails (thumbnail.rs)

pub mod files;
pub mod thumbnail;
