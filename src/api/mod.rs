/// Gallery API client
///
/// This module handles:
/// - Typed requests against the REST API (client.rs)
/// - Wire formats (types.rs)
/// - Uploads with progress reporting (upload.rs)

pub mod client;
pub mod types;
pub mod upload;

pub use client::{ApiClient, InteractionsFetch};
pub use upload::UploadEvent;
