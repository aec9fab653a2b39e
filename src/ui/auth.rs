/// Login and signup forms
use iced::widget::{button, center, column, container, row, scrollable, text, text_input, TextInput};
use iced::{Alignment, Element, Length};

use super::{error_banner, style, success_banner};
use crate::state::auth::{LoginForm, SignupField, SignupForm};
use crate::state::data::format_file_size;
use crate::state::session::AuthForm;
use crate::Message;

const FORM_WIDTH: f32 = 380.0;

pub fn login(form: &LoginForm) -> Element<'_, Message> {
    let mut content = column![
        text("Welcome back 💕").size(30),
        text("Log in to relive our memories").style(style::muted),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    if let Some(success) = &form.success {
        content = content.push(success_banner(success));
    }
    if let Some(error) = &form.error {
        content = content.push(error_banner(error, None));
    }

    let submit = button(text(if form.loading { "Logging in..." } else { "Login" }))
        .width(Length::Fill)
        .padding(10)
        .style(button::primary)
        .on_press_maybe((!form.loading).then_some(Message::SubmitLogin));

    content = content
        .push(
            text_input("Username", &form.username)
                .on_input(Message::LoginUsername)
                .on_submit(Message::SubmitLogin)
                .padding(10),
        )
        .push(
            row![
                text_input("Password", &form.password)
                    .secure(!form.show_password)
                    .on_input(Message::LoginPassword)
                    .on_submit(Message::SubmitLogin)
                    .padding(10),
                show_toggle(form.show_password, Message::ToggleLoginPassword),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .push(submit)
        .push(
            row![
                text("Don't have an account?").style(style::muted),
                button(text("Sign up"))
                    .style(button::text)
                    .on_press(Message::ShowForm(AuthForm::Signup)),
            ]
            .align_y(Alignment::Center),
        );

    frame(content)
}

pub fn signup(form: &SignupForm) -> Element<'_, Message> {
    let mut content = column![
        text("Create your account 💕").size(30),
        text("Join us and start sharing memories").style(style::muted),
    ]
    .spacing(14)
    .align_x(Alignment::Center);

    if let Some(success) = &form.success {
        content = content.push(success_banner(success));
    }
    if let Some(error) = &form.error {
        content = content.push(error_banner(error, None));
    }

    let mut password = column![row![
        field("Password", &form.password, SignupField::Password).secure(!form.show_password),
        show_toggle(form.show_password, Message::ToggleSignupPassword),
    ]
    .spacing(8)
    .align_y(Alignment::Center)]
    .spacing(4);
    if let Some(strength) = form.password_strength() {
        password = password.push(
            text(format!("Password strength: {}", strength.label()))
                .size(13)
                .style(style::muted),
        );
    }

    let submit = button(text(if form.loading { "Creating account..." } else { "Sign up" }))
        .width(Length::Fill)
        .padding(10)
        .style(button::primary)
        .on_press_maybe((!form.loading).then_some(Message::SubmitSignup));

    content = content
        .push(field("Username", &form.username, SignupField::Username))
        .push(field("Email", &form.email, SignupField::Email))
        .push(field("Full name", &form.full_name, SignupField::FullName))
        .push(password)
        .push(
            row![
                field("Confirm password", &form.confirm_password, SignupField::ConfirmPassword)
                    .secure(!form.show_confirm_password),
                show_toggle(form.show_confirm_password, Message::ToggleConfirmPassword),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .push(profile_picture(form))
        .push(submit)
        .push(
            row![
                text("Already have an account?").style(style::muted),
                button(text("Log in"))
                    .style(button::text)
                    .on_press(Message::ShowForm(AuthForm::Login)),
            ]
            .align_y(Alignment::Center),
        );

    frame(content)
}

fn profile_picture(form: &SignupForm) -> Element<'_, Message> {
    match &form.profile_picture {
        Some(file) => row![
            text("📷").size(28),
            column![
                text(&file.name).size(14),
                text(format_file_size(file.size)).size(12).style(style::muted),
            ]
            .width(Length::Fill),
            button(text("Remove"))
                .style(button::secondary)
                .on_press(Message::RemoveProfilePicture),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into(),
        None => button(text("📷 Add a profile picture (optional)"))
            .width(Length::Fill)
            .style(button::secondary)
            .on_press(Message::PickProfilePicture)
            .into(),
    }
}

fn field<'a>(placeholder: &str, value: &str, which: SignupField) -> TextInput<'a, Message> {
    text_input(placeholder, value)
        .on_input(move |v| Message::SignupEdit(which, v))
        .on_submit(Message::SubmitSignup)
        .padding(10)
}

fn show_toggle(showing: bool, message: Message) -> Element<'static, Message> {
    button(text(if showing { "Hide" } else { "Show" }).size(13))
        .style(button::text)
        .on_press(message)
        .into()
}

fn frame<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    center(scrollable(
        container(content)
            .padding(32)
            .width(FORM_WIDTH)
            .style(style::card),
    ))
    .padding(20)
    .into()
}
