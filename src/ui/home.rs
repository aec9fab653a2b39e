use iced::widget::{button, center, column, container, pick_list, row, text};
use iced::{Alignment, Element, Length};

use super::{style, Music};
use crate::state::data::User;
use crate::state::route::Route;
use crate::Message;

pub fn view<'a>(user: &'a User, music: Music<'a>) -> Element<'a, Message> {
    let destinations = [
        ("🖼️  Our Gallery", "Every picture of us", Route::Gallery),
        ("📸 Upload Photos", "Add new memories", Route::UploadPhoto),
        ("🎵 Upload Music", "Songs for our playlist", Route::UploadMusic),
        ("💌 Read the Letter", "A message for you", Route::Message),
    ];

    let cards = destinations
        .into_iter()
        .fold(row![].spacing(16), |cards, (title, caption, route)| {
            cards.push(
                button(
                    column![text(title).size(20), text(caption).size(14).style(style::muted)]
                        .spacing(6)
                        .align_x(Alignment::Center),
                )
                .padding(20)
                .width(200)
                .style(button::secondary)
                .on_press(Message::Navigate(route)),
            )
        });

    let content = column![
        text(format!("Hello, {} 💕", user.display_name())).size(36),
        text("Welcome to our little corner of memories").style(style::muted),
        cards,
        transport(music),
    ]
    .spacing(28)
    .align_x(Alignment::Center);

    center(content).padding(24).into()
}

/// Play/pause plus the track selector, which only appears once tracks exist
fn transport(music: Music<'_>) -> Element<'_, Message> {
    let toggle = button(text(if music.playing { "⏸  Pause music" } else { "▶  Play music" }))
        .padding([8, 16])
        .style(button::primary)
        .on_press(Message::ToggleMusic);

    let mut controls = row![toggle].spacing(12).align_y(Alignment::Center);
    if !music.tracks.is_empty() {
        controls = controls.push(
            pick_list(music.tracks, music.current, Message::ChangeMusic)
                .placeholder("Choose a song")
                .width(260),
        );
    }

    container(controls)
        .padding(16)
        .width(Length::Shrink)
        .style(style::card)
        .into()
}
