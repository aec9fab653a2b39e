/// Multipart uploads that report progress while the body is being sent
///
/// The file is handed to the transport in fixed-size chunks; every chunk
/// pulled off the body stream counts as sent.

use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream::{self, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, info, warn};

use super::client::{json, ApiClient};
use super::types::UploadResponse;
use crate::error::ApiError;
use crate::state::data::PickedFile;
use crate::state::upload::UploadKind;

/// Size of each body chunk handed to the transport
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { sent: u64, total: u64 },
    /// Stored file name on success
    Finished(Result<String, ApiError>),
}

fn endpoint(kind: UploadKind) -> &'static str {
    match kind {
        UploadKind::Photo => "/api/upload",
        UploadKind::Music => "/api/upload/music",
    }
}

/// Body stream over `bytes` that reports cumulative bytes sent on `progress`
fn progress_body(
    bytes: Vec<u8>,
    progress: UnboundedSender<(u64, u64)>,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;

    stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        // The receiver may already be gone if the page was left
        let _ = progress.unbounded_send((sent, total));
        Ok(chunk)
    })
}

async fn send(api: ApiClient, kind: UploadKind, file: PickedFile, progress: UnboundedSender<(u64, u64)>) -> Result<String, ApiError> {
    let total = file.size;
    let name = file.name.clone();
    let mime = file.mime.unwrap_or("application/octet-stream");

    let part = Part::stream_with_length(Body::wrap_stream(progress_body(file.bytes, progress)), total)
        .file_name(name.clone())
        .mime_str(mime)?;
    let form = Form::new().part("file", part);

    debug!("Uploading {name} ({total} bytes) to {}", endpoint(kind));
    let response = api
        .http()
        .post(api.url(endpoint(kind), &[]))
        .multipart(form)
        .send()
        .await?;

    let reply: UploadResponse = json(response).await?;
    match reply.file_name {
        Some(stored) => {
            info!("✅ Uploaded {name} as {stored}");
            Ok(stored)
        }
        None => Err(ApiError::Rejected(
            reply.message.unwrap_or_else(|| "Upload failed".to_string()),
        )),
    }
}

/// Upload one file, yielding progress events and then exactly one
/// `Finished` event
pub fn upload(
    api: ApiClient,
    kind: UploadKind,
    file: PickedFile,
) -> impl Stream<Item = UploadEvent> + Send + 'static {
    let (tx, rx) = mpsc::unbounded();
    let name = file.name.clone();

    let progress = rx.map(|(sent, total)| UploadEvent::Progress { sent, total });
    let finished = stream::once(async move {
        let result = send(api, kind, file, tx).await;
        if let Err(e) = &result {
            warn!("Upload of {name} failed: {e}");
        }
        UploadEvent::Finished(result)
    });

    stream::select(progress, finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_progress_body_reports_cumulative_bytes() {
        let (tx, rx) = mpsc::unbounded();
        let bytes = vec![7u8; CHUNK_SIZE * 2 + 10];

        let chunks: Vec<_> = block_on(progress_body(bytes, tx).collect::<Vec<_>>());
        assert_eq!(chunks.len(), 3);

        let reports: Vec<(u64, u64)> = block_on(rx.collect::<Vec<_>>());
        let total = (CHUNK_SIZE * 2 + 10) as u64;
        assert_eq!(
            reports,
            vec![
                (CHUNK_SIZE as u64, total),
                (CHUNK_SIZE as u64 * 2, total),
                (total, total),
            ]
        );
    }

    #[test]
    fn test_progress_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded();
        drop(rx);

        let chunks: Vec<_> = block_on(progress_body(vec![1, 2, 3], tx).collect::<Vec<_>>());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_ok());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoint(UploadKind::Photo), "/api/upload");
        assert_eq!(endpoint(UploadKind::Music), "/api/upload/music");
    }

    #[tokio::test]
    async fn test_failed_upload_finishes_with_error() {
        let api = ApiClient::new("http://127.0.0.1:9");
        let file = PickedFile {
            name: "a.jpg".into(),
            mime: Some("image/jpeg"),
            size: 3,
            bytes: vec![1, 2, 3],
        };

        let events: Vec<UploadEvent> = upload(api, UploadKind::Photo, file).collect().await;
        let finished: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, UploadEvent::Finished(_)))
            .collect();
        assert_eq!(finished.len(), 1);
        assert!(matches!(finished[0], UploadEvent::Finished(Err(_))));
    }
}
