/// State management module
///
/// This module holds all client-side state, free of any UI toolkit:
/// - The logged-in user and its on-disk record (session.rs)
/// - Path routing to views (route.rs)
/// - Background music control (audio.rs)
/// - Gallery listing, lightbox and menus (gallery.rs, menu.rs)
/// - Likes and comments per photo (interactions.rs)
/// - Batch uploads with progress (upload.rs)
/// - Login/signup forms (auth.rs) and the message page (letter.rs)
/// - Shared data structures (data.rs)

pub mod audio;
pub mod auth;
pub mod data;
pub mod gallery;
pub mod interactions;
pub mod letter;
pub mod menu;
pub mod route;
pub mod session;
pub mod upload;
