use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, row, text, Image};
use iced::{Alignment, Element, Length};

use super::style;
use crate::state::data::User;
use crate::state::route::Route;
use crate::Message;

const AVATAR_SIZE: f32 = 40.0;

/// Everything the header needs from the application
pub struct Header<'a> {
    pub user: &'a User,
    pub avatar: Option<&'a Handle>,
    pub playing: bool,
    pub menu_open: bool,
}

pub fn view(header: Header<'_>) -> Element<'_, Message> {
    let music = button(text(if header.playing { "⏸" } else { "▶" }).size(18))
        .style(button::secondary)
        .on_press(Message::ToggleMusic);

    let bar = row![
        button(text("💕 Memory Lane").size(22))
            .style(button::text)
            .on_press(Message::Navigate(Route::Home)),
        horizontal_space(),
        text(format!("Welcome, {}!", header.user.username)),
        music,
        button(avatar(header.user, header.avatar))
            .padding(0)
            .style(button::text)
            .on_press(Message::ToggleProfileMenu),
    ]
    .spacing(14)
    .align_y(Alignment::Center);

    let mut content = column![bar].spacing(6);
    if header.menu_open {
        content = content.push(row![horizontal_space(), profile_menu()]);
    }

    container(content)
        .padding([12, 24])
        .width(Length::Fill)
        .into()
}

fn avatar<'a>(user: &'a User, picture: Option<&'a Handle>) -> Element<'a, Message> {
    match picture {
        Some(handle) => Image::new(handle.clone())
            .width(AVATAR_SIZE)
            .height(AVATAR_SIZE)
            .into(),
        None => container(text(user.initial()).size(18))
            .width(AVATAR_SIZE)
            .height(AVATAR_SIZE)
            .center_x(AVATAR_SIZE)
            .center_y(AVATAR_SIZE)
            .style(style::avatar)
            .into(),
    }
}

fn profile_menu() -> Element<'static, Message> {
    let item = |label: &'static str, message: Message| {
        button(text(label))
            .width(Length::Fill)
            .style(button::text)
            .on_press(message)
    };

    container(
        column![
            item("Home", Message::Navigate(Route::Home)),
            item("Logout", Message::Logout),
        ]
        .spacing(2),
    )
    .padding(6)
    .width(140)
    .style(style::dropdown)
    .into()
}
