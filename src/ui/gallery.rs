/// Gallery page: photo grid, per-photo likes and comments, lightbox
use std::collections::HashMap;

use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, row, scrollable, stack, text,
    text_input, Image,
};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::{confirm_dialog, error_banner, modal, style, success_banner};
use crate::state::data::format_timestamp;
use crate::state::gallery::GalleryState;
use crate::state::interactions::PhotoInteractions;
use crate::state::route::Route;
use crate::{Message, PhotoImages};

const CARD_WIDTH: f32 = 300.0;
const THUMBNAIL_HEIGHT: f32 = 220.0;

pub fn view<'a>(gallery: &'a GalleryState, images: &'a HashMap<String, PhotoImages>) -> Element<'a, Message> {
    let refresh = button(text(if gallery.refreshing { "Refreshing..." } else { "⟳ Refresh" }))
        .style(button::secondary)
        .on_press_maybe((!gallery.refreshing).then_some(Message::RefreshGallery));

    let toolbar = row![
        text("Our Story in Pictures 💕").size(28),
        horizontal_space(),
        refresh,
        button(text("📸 Add photos"))
            .style(button::primary)
            .on_press(Message::Navigate(Route::UploadPhoto)),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut content = column![toolbar].spacing(16);

    if let Some(error) = &gallery.error {
        content = content.push(error_banner(error, Some(Message::DismissGalleryError)));
    }
    if gallery.delete_success {
        content = content.push(success_banner("Photo deleted"));
    }

    let body: Element<'a, Message> = if gallery.loading {
        center(text("Loading our memories... 💕").size(20)).into()
    } else if gallery.photos.is_empty() {
        center(
            column![
                text("No photos yet").size(22),
                text("Upload the first one to start our story").style(style::muted),
            ]
            .spacing(8)
            .align_x(Alignment::Center),
        )
        .into()
    } else {
        let cards = gallery
            .photos
            .iter()
            .enumerate()
            .map(|(index, name)| photo_card(gallery, index, name, images.get(name)))
            .collect();

        scrollable(
            container(Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0))
                .center_x(Length::Fill),
        )
        .height(Length::Fill)
        .into()
    };

    container(content.push(body)).padding([8, 24]).into()
}

/// Lightbox and confirmation dialogs drawn above the page
pub fn overlay<'a>(
    gallery: &'a GalleryState,
    images: &'a HashMap<String, PhotoImages>,
) -> Option<Element<'a, Message>> {
    let mut layers: Vec<Element<'a, Message>> = Vec::new();

    if let Some(name) = gallery.selected_photo() {
        layers.push(lightbox(gallery, name, images.get(name)));
    }

    if gallery.confirm_delete.is_some() {
        layers.push(confirm_dialog(
            "Delete photo?",
            "This memory will be removed for both of us.",
            if gallery.deleting { "Deleting..." } else { "Delete" },
            Message::ConfirmPhotoDelete,
            Message::CancelPhotoDelete,
        ));
    } else if let Some(pending) = gallery
        .interactions
        .values()
        .find(|i| i.confirm_delete.is_some())
    {
        layers.push(confirm_dialog(
            "Delete comment?",
            "Are you sure you want to delete this comment?",
            "Delete",
            Message::ConfirmCommentDelete(pending.photo_name.clone()),
            Message::CancelCommentDelete(pending.photo_name.clone()),
        ));
    }

    match layers.len() {
        0 => None,
        1 => layers.pop(),
        _ => Some(stack(layers).into()),
    }
}

fn photo_card<'a>(
    gallery: &'a GalleryState,
    index: usize,
    name: &'a str,
    images: Option<&'a PhotoImages>,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images {
        Some(images) => mouse_area(
            Image::new(images.thumbnail.clone())
                .width(Length::Fill)
                .height(THUMBNAIL_HEIGHT)
                .content_fit(ContentFit::Cover),
        )
        .on_press(Message::OpenLightbox(index))
        .into(),
        None => container(text("Loading...").style(style::muted))
            .width(Length::Fill)
            .height(THUMBNAIL_HEIGHT)
            .center_x(Length::Fill)
            .center_y(THUMBNAIL_HEIGHT)
            .into(),
    };

    let menu_button = button(text("⋯").size(18))
        .style(button::text)
        .on_press(Message::TogglePhotoMenu(name.to_string()));

    let mut card = column![picture].spacing(8);

    match gallery.interactions.get(name) {
        Some(interactions) => {
            card = card.push(
                row![actions(interactions), horizontal_space(), menu_button]
                    .align_y(Alignment::Center),
            );
            if gallery.menus.is_photo_open(name) {
                card = card.push(photo_menu(name));
            }
            if let Some(error) = &interactions.error {
                card = card.push(error_banner(
                    error,
                    Some(Message::DismissCommentError(name.to_string())),
                ));
            }
            if interactions.show_comments {
                card = card.push(comments(interactions));
            }
        }
        None => {
            card = card.push(row![horizontal_space(), menu_button]);
            if gallery.menus.is_photo_open(name) {
                card = card.push(photo_menu(name));
            }
        }
    }

    container(card)
        .padding(12)
        .width(CARD_WIDTH)
        .style(style::card)
        .into()
}

/// Heart with like count, and the comment toggle with comment count
fn actions(interactions: &PhotoInteractions) -> Element<'_, Message> {
    let photo = &interactions.photo_name;
    let heart = if interactions.likes.liked { "♥" } else { "♡" };

    let like = button(text(format!("{heart} {}", interactions.likes.count)))
        .style(style::like(interactions.likes.liked))
        .on_press_maybe((!interactions.liking).then(|| Message::ToggleLike(photo.clone())));

    let comment_label = match interactions.comments.len() {
        0 => "💬 Comment".to_string(),
        n => format!("💬 Comment ({n})"),
    };
    let comment = button(text(comment_label))
        .style(button::text)
        .on_press(Message::ToggleComments(photo.clone()));

    row![like, comment].spacing(4).align_y(Alignment::Center).into()
}

fn photo_menu(name: &str) -> Element<'_, Message> {
    row![
        horizontal_space(),
        container(
            button(text("🗑  Delete photo"))
                .style(button::text)
                .on_press(Message::RequestPhotoDelete(name.to_string())),
        )
        .padding(4)
        .style(style::dropdown),
    ]
    .into()
}

fn comments(interactions: &PhotoInteractions) -> Element<'_, Message> {
    let photo = &interactions.photo_name;

    let header = row![
        text(format!("Comments ({})", interactions.comments.len())).size(15),
        horizontal_space(),
        button(text("⌃").size(14))
            .style(button::text)
            .on_press(Message::CollapseComments(photo.clone())),
    ]
    .align_y(Alignment::Center);

    let list: Element<'_, Message> = if interactions.comments.is_empty() {
        text("No comments yet. Be the first to comment! 💕")
            .size(13)
            .style(style::muted)
            .into()
    } else {
        let entries = interactions.comments.iter().fold(column![].spacing(8), |list, comment| {
            let mut meta = row![text(&comment.author_name).size(13)].spacing(8);
            if let Some(created_at) = &comment.created_at {
                meta = meta.push(text(format_timestamp(created_at)).size(11).style(style::muted));
            }

            list.push(
                row![
                    column![meta, text(&comment.comment_text).size(14)]
                        .spacing(2)
                        .width(Length::Fill),
                    button(text("🗑").size(12))
                        .style(button::text)
                        .on_press(Message::RequestCommentDelete(photo.clone(), comment.id)),
                ]
                .align_y(Alignment::Center),
            )
        });
        entries.into()
    };

    let mut panel = column![header, list].spacing(10);

    if interactions.show_success {
        panel = panel.push(success_banner("💕 Comment added successfully!"));
    }

    let can_send = !interactions.submitting && !interactions.draft.trim().is_empty();
    panel = panel.push(
        row![
            text_input("Write a romantic comment... 💕", &interactions.draft)
                .on_input(move |draft| Message::DraftChanged(photo.clone(), draft))
                .on_submit(Message::SubmitComment(photo.clone()))
                .padding(8),
            button(text(if interactions.submitting { "..." } else { "Send" }))
                .style(button::primary)
                .on_press_maybe(can_send.then(|| Message::SubmitComment(photo.clone()))),
        ]
        .spacing(6)
        .align_y(Alignment::Center),
    );

    container(panel).padding(10).style(style::dropdown).into()
}

fn lightbox<'a>(
    gallery: &'a GalleryState,
    name: &'a str,
    images: Option<&'a PhotoImages>,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images {
        Some(images) => Image::new(images.full.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        None => center(text("Loading...")).into(),
    };

    let position = gallery.lightbox.map(|i| i + 1).unwrap_or_default();
    let controls = row![
        button(text("◀")).style(button::secondary).on_press(Message::PreviousPhoto),
        text(format!("{name}  ({position} / {})", gallery.photos.len())),
        button(text("▶")).style(button::secondary).on_press(Message::NextPhoto),
        horizontal_space(),
        button(text("🗑  Delete"))
            .style(button::danger)
            .on_press(Message::RequestPhotoDelete(name.to_string())),
        button(text("✕ Close")).style(button::secondary).on_press(Message::CloseLightbox),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let content = container(column![picture, controls].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::card);

    modal(container(content).padding(40), Message::CloseLightbox)
}
