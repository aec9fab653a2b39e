use iced::widget::{center, column, container, scrollable, text};
use iced::{Alignment, Element};

use super::style;
use crate::state::letter::LetterState;
use crate::Message;

pub fn view(letter: &LetterState) -> Element<'_, Message> {
    let content = match letter {
        LetterState::Loading => column![text("Loading your letter... 💌").size(20)],
        LetterState::Missing => column![
            text("No message found").size(24),
            text("Check back later 💕").style(style::muted),
        ],
        LetterState::Loaded(found) => {
            let mut body = column![
                text("💌 A letter for you").size(28),
                scrollable(text(&found.content).size(18)).height(360),
            ];
            if let Some(written_at) = letter.written_at() {
                body = body.push(text(written_at).size(13).style(style::muted));
            }
            body
        }
    };

    center(
        container(content.spacing(18).align_x(Alignment::Center))
            .padding(32)
            .max_width(640.0)
            .style(style::card),
    )
    .padding(24)
    .into()
}
