/// Views for every page
///
/// This module handles:
/// - Login and signup forms (auth.rs)
/// - The header shown above every authenticated page (header.rs)
/// - Home, gallery, upload and message pages
/// - Shared colors and widget styles (style.rs)

pub mod auth;
pub mod gallery;
pub mod header;
pub mod home;
pub mod message;
pub mod style;
pub mod upload;

use iced::widget::{button, center, column, container, mouse_area, opaque, row, text};
use iced::{Alignment, Color, Element, Length};

use crate::Message;

/// What the music transport needs to render
#[derive(Debug, Clone, Copy)]
pub struct Music<'a> {
    pub playing: bool,
    pub tracks: &'a [String],
    pub current: Option<&'a String>,
}

/// Inline notice with an optional dismiss button
fn banner<'a>(
    message: &'a str,
    style: fn(&iced::Theme) -> container::Style,
    on_dismiss: Option<Message>,
) -> Element<'a, Message> {
    let mut content = row![text(message).width(Length::Fill)]
        .spacing(10)
        .align_y(Alignment::Center);

    if let Some(on_dismiss) = on_dismiss {
        content = content.push(button(text("✕").size(14)).style(button::text).on_press(on_dismiss));
    }

    container(content)
        .padding([8, 14])
        .width(Length::Fill)
        .style(style)
        .into()
}

pub fn error_banner(message: &str, on_dismiss: Option<Message>) -> Element<'_, Message> {
    banner(message, style::error_banner, on_dismiss)
}

pub fn success_banner(message: &str) -> Element<'_, Message> {
    banner(message, style::success_banner, None)
}

/// Dim everything behind `content`; clicking the backdrop sends `on_blur`
pub fn modal<'a>(content: impl Into<Element<'a, Message>>, on_blur: Message) -> Element<'a, Message> {
    opaque(
        mouse_area(center(opaque(content)).style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.75,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        }))
        .on_press(on_blur),
    )
}

/// Small confirmation card with a cancel and a destructive confirm button
pub fn confirm_dialog<'a>(
    title: &'a str,
    body: &'a str,
    confirm_label: &'a str,
    on_confirm: Message,
    on_cancel: Message,
) -> Element<'a, Message> {
    let actions = row![
        button(text("Cancel")).style(button::secondary).on_press(on_cancel.clone()),
        button(text(confirm_label)).style(button::danger).on_press(on_confirm),
    ]
    .spacing(12);

    let card = container(
        column![text(title).size(20), text(body), actions]
            .spacing(16)
            .align_x(Alignment::Center),
    )
    .padding(24)
    .max_width(380.0)
    .style(style::card);

    modal(card, on_cancel)
}
