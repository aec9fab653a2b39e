/// Batch uploads with per-file progress
///
/// A batch is validated as a whole from file metadata, then read, and only
/// then turned into jobs. Each job reports its own progress.

use std::time::Duration;

use super::data::{format_file_size, FileInfo, PickedFile};

/// Largest file accepted for upload (20 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Delay between a finished batch and leaving the upload page
pub const NAVIGATE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Photo,
    Music,
}

impl UploadKind {
    pub fn accepted_mime_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Photo => &["image/jpeg", "image/png", "image/gif", "image/webp"],
            UploadKind::Music => &["audio/mpeg", "audio/wav", "audio/mp4"],
        }
    }

    pub fn accepts(self, mime: Option<&str>) -> bool {
        mime.is_some_and(|m| self.accepted_mime_types().contains(&m))
    }

    /// Human readable list for notices ("JPEG, PNG, GIF, WebP")
    pub fn accepted_label(self) -> &'static str {
        match self {
            UploadKind::Photo => "JPEG, PNG, GIF, WebP",
            UploadKind::Music => "MP3, WAV, M4A",
        }
    }
}

/// Why a whole batch was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchRejection {
    Empty,
    Unreadable { files: Vec<String> },
    WrongType { kind: UploadKind, files: Vec<String> },
    TooLarge { files: Vec<String> },
}

impl std::fmt::Display for BatchRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchRejection::Empty => write!(f, "No files selected"),
            BatchRejection::Unreadable { files } => {
                write!(f, "Could not read these files: {}", files.join(", "))
            }
            BatchRejection::WrongType { kind, files } => write!(
                f,
                "Please select only {} files. Not accepted: {}",
                kind.accepted_label(),
                files.join(", ")
            ),
            BatchRejection::TooLarge { files } => write!(
                f,
                "The following files are too large (max {} each): {}",
                format_file_size(MAX_UPLOAD_BYTES),
                files.join(", ")
            ),
        }
    }
}

/// Check every file of a batch; any violation rejects all of them
pub fn validate_batch(kind: UploadKind, files: &[FileInfo]) -> Result<(), BatchRejection> {
    if files.is_empty() {
        return Err(BatchRejection::Empty);
    }

    let unreadable: Vec<String> = files
        .iter()
        .filter(|f| f.size.is_none())
        .map(|f| f.name.clone())
        .collect();
    if !unreadable.is_empty() {
        return Err(BatchRejection::Unreadable { files: unreadable });
    }

    let wrong_type: Vec<String> = files
        .iter()
        .filter(|f| !kind.accepts(f.mime))
        .map(|f| f.name.clone())
        .collect();
    if !wrong_type.is_empty() {
        return Err(BatchRejection::WrongType { kind, files: wrong_type });
    }

    let too_large: Vec<String> = files
        .iter()
        .filter(|f| f.size.is_some_and(|size| size > MAX_UPLOAD_BYTES))
        .map(|f| f.name.clone())
        .collect();
    if !too_large.is_empty() {
        return Err(BatchRejection::TooLarge { files: too_large });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Uploading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadJob {
    pub id: u64,
    pub file_name: String,
    pub size: u64,
    pub status: JobStatus,
    /// 0 - 100
    pub progress: u8,
    /// Batch this job was submitted with
    batch: u64,
}

/// What the page should do once a batch has settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettled {
    pub succeeded: usize,
    pub failed: usize,
}

/// All jobs of one upload page, oldest first
#[derive(Debug)]
pub struct UploadBoard {
    pub kind: UploadKind,
    pub jobs: Vec<UploadJob>,
    pub notice: Option<String>,
    pub show_success: bool,
    /// A validated batch is being read from disk
    pub reading: bool,
    next_id: u64,
    next_batch: u64,
}

impl UploadBoard {
    pub fn new(kind: UploadKind) -> Self {
        Self {
            kind,
            jobs: Vec::new(),
            notice: None,
            show_success: false,
            reading: false,
            next_id: 1,
            next_batch: 1,
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.reading || self.jobs.iter().any(|j| j.status == JobStatus::Uploading)
    }

    /// Validate a picked batch before reading it. On success the batch is
    /// marked as being read.
    pub fn check(&mut self, files: &[FileInfo]) -> Result<(), BatchRejection> {
        if let Err(rejection) = validate_batch(self.kind, files) {
            self.reject(rejection.clone());
            return Err(rejection);
        }

        self.notice = None;
        self.reading = true;
        Ok(())
    }

    /// The batch failed after validation (a file could not be read)
    pub fn reject(&mut self, rejection: BatchRejection) {
        self.reading = false;
        self.notice = Some(rejection.to_string());
    }

    /// Turn each file of a checked and read batch into a job.
    /// Returns the files paired with their job ids, ready to send.
    pub fn accept(&mut self, files: Vec<PickedFile>) -> Vec<(u64, PickedFile)> {
        self.reading = false;
        let batch = self.next_batch;
        self.next_batch += 1;

        let accepted = files
            .into_iter()
            .map(|file| {
                let id = self.next_id;
                self.next_id += 1;
                self.jobs.push(UploadJob {
                    id,
                    file_name: file.name.clone(),
                    size: file.size,
                    status: JobStatus::Uploading,
                    progress: 0,
                    batch,
                });
                (id, file)
            })
            .collect();

        accepted
    }

    /// Progress only ever moves forward, and only while uploading
    pub fn progress(&mut self, id: u64, sent: u64, total: u64) {
        let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };
        if job.status != JobStatus::Uploading {
            return;
        }

        let percent = percent(sent, total);
        if percent > job.progress {
            job.progress = percent;
        }
    }

    /// Record a job's outcome. When this settles the job's batch, returns
    /// the batch totals.
    pub fn finished(&mut self, id: u64, result: Result<(), String>) -> Option<BatchSettled> {
        let job = self.jobs.iter_mut().find(|j| j.id == id)?;
        if job.status != JobStatus::Uploading {
            return None;
        }

        match result {
            Ok(()) => {
                job.status = JobStatus::Success;
                job.progress = 100;
            }
            Err(e) => job.status = JobStatus::Error(e),
        }
        let batch = job.batch;

        let in_batch = || self.jobs.iter().filter(move |j| j.batch == batch);
        if in_batch().any(|j| j.status == JobStatus::Uploading) {
            return None;
        }

        let succeeded = in_batch().filter(|j| j.status == JobStatus::Success).count();
        let failed = in_batch().count() - succeeded;
        if succeeded > 0 {
            self.show_success = true;
        }

        Some(BatchSettled { succeeded, failed })
    }
}

/// Rounded percentage of `sent` out of `total`, clamped to 0 - 100
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent as f64 * 100.0) / total as f64).round() as u8
}
