use iced::widget::{button, column, container, progress_bar, row, scrollable, text};
use iced::{Alignment, Element, Length};

use super::{error_banner, style, success_banner};
use crate::state::data::format_file_size;
use crate::state::upload::{JobStatus, UploadBoard, UploadJob, UploadKind, MAX_UPLOAD_BYTES};
use crate::Message;

pub fn view(board: &UploadBoard) -> Element<'_, Message> {
    let (title, prompt, done) = match board.kind {
        UploadKind::Photo => (
            "📸 Share new memories",
            "Choose photos to add to our gallery",
            "Photos uploaded! Taking you to the gallery...",
        ),
        UploadKind::Music => (
            "🎵 Add to our playlist",
            "Choose songs for the background music",
            "Music uploaded! Taking you home...",
        ),
    };

    let mut content = column![
        text(title).size(28),
        text(prompt).style(style::muted),
        text(format!(
            "{} up to {} each",
            board.kind.accepted_label(),
            format_file_size(MAX_UPLOAD_BYTES)
        ))
        .size(13)
        .style(style::muted),
        button(text(if board.is_uploading() { "Uploading..." } else { "Choose files" }))
            .padding([10, 24])
            .style(button::primary)
            .on_press_maybe((!board.is_uploading()).then_some(Message::PickUploads)),
    ]
    .spacing(14)
    .align_x(Alignment::Center);

    if let Some(notice) = &board.notice {
        content = content.push(error_banner(notice, None));
    }
    if board.show_success {
        content = content.push(success_banner(done));
    }

    if !board.jobs.is_empty() {
        let jobs = board
            .jobs
            .iter()
            .fold(column![].spacing(10), |jobs, job| jobs.push(job_row(job)));
        content = content.push(scrollable(jobs).height(Length::Fill));
    }

    container(
        container(content)
            .padding(32)
            .max_width(640.0)
            .style(style::card),
    )
    .padding(24)
    .center_x(Length::Fill)
    .into()
}

fn job_row(job: &UploadJob) -> Element<'_, Message> {
    let status = match &job.status {
        JobStatus::Uploading => text(format!("{}%", job.progress)),
        JobStatus::Success => text("✅ Done"),
        JobStatus::Error(e) => text(format!("❌ {e}")).style(text::danger),
    };

    column![
        row![
            text(&job.file_name).width(Length::Fill),
            text(format_file_size(job.size)).size(13).style(style::muted),
            status,
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        progress_bar(0.0..=100.0, f32::from(job.progress)).height(6),
    ]
    .spacing(4)
    .into()
}
