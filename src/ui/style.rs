/// Colors and widget styles shared by every page
use iced::theme::Palette;
use iced::widget::{button, container, text};
use iced::{border, color, Background, Border, Color, Shadow, Theme, Vector};

pub const ROSE: Color = color!(0xe8, 0x4a, 0x7a);
pub const BLUSH: Color = color!(0xfd, 0xe8, 0xef);
pub const WINE: Color = color!(0x5c, 0x1a, 0x33);

pub fn theme() -> Theme {
    Theme::custom(
        "Memory Lane".to_string(),
        Palette {
            background: color!(0xfff5f8),
            text: WINE,
            primary: ROSE,
            success: color!(0x3a, 0xa8, 0x6b),
            danger: color!(0xd6, 0x33, 0x3f),
        },
    )
}

/// White rounded card with a soft shadow
pub fn card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::WHITE)),
        border: border::rounded(16.0).color(BLUSH).width(1.0),
        shadow: Shadow {
            color: Color { a: 0.12, ..WINE },
            offset: Vector::new(0.0, 4.0),
            blur_radius: 16.0,
        },
        ..container::Style::default()
    }
}

/// Drop-down menu panel
pub fn dropdown(theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            radius: 10.0.into(),
            width: 1.0,
            color: Color { a: 0.3, ..ROSE },
        },
        ..card(theme)
    }
}

/// Round placeholder avatar holding the user's initial
pub fn avatar(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(ROSE)),
        text_color: Some(Color::WHITE),
        border: border::rounded(20.0),
        ..container::Style::default()
    }
}

pub fn success_banner(theme: &Theme) -> container::Style {
    banner(theme.palette().success)
}

pub fn error_banner(theme: &Theme) -> container::Style {
    banner(theme.palette().danger)
}

fn banner(tint: Color) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color { a: 0.12, ..tint })),
        text_color: Some(tint),
        border: border::rounded(8.0).color(tint).width(1.0),
        ..container::Style::default()
    }
}

/// Heart button: filled rose once liked
pub fn like(liked: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme, status| {
        let base = button::text(theme, status);
        if liked {
            button::Style {
                text_color: ROSE,
                ..base
            }
        } else {
            base
        }
    }
}

/// Dimmed caption text
pub fn muted(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color { a: 0.6, ..WINE }),
    }
}
