use std::collections::HashMap;
use std::time::Duration;

use super::interactions::PhotoInteractions;
use super::menu::MenuState;

/// How long the "photo deleted" notice stays up
pub const DELETE_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Everything the gallery view knows about its photos
#[derive(Debug)]
pub struct GalleryState {
    /// Photo names in listing order
    pub photos: Vec<String>,
    pub loading: bool,
    pub refreshing: bool,
    /// Index into `photos` of the photo shown full-size
    pub lightbox: Option<usize>,
    pub menus: MenuState,
    pub interactions: HashMap<String, PhotoInteractions>,
    /// Photo whose delete dialog is open. The dialog stays up while the
    /// delete request runs.
    pub confirm_delete: Option<String>,
    pub deleting: bool,
    pub delete_success: bool,
    pub error: Option<String>,
    notice_generation: u64,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            photos: Vec::new(),
            loading: true,
            refreshing: false,
            lightbox: None,
            menus: MenuState::default(),
            interactions: HashMap::new(),
            confirm_delete: None,
            deleting: false,
            delete_success: false,
            error: None,
            notice_generation: 0,
        }
    }
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_refresh(&mut self) {
        self.refreshing = true;
    }

    /// Replace the listing. Returns the photos that are new to this view and
    /// still need their bytes and interactions fetched.
    pub fn photos_loaded(&mut self, photos: Vec<String>) -> Vec<String> {
        self.loading = false;
        self.refreshing = false;

        self.interactions.retain(|name, _| photos.contains(name));

        let fresh: Vec<String> = photos
            .iter()
            .filter(|name| !self.interactions.contains_key(*name))
            .cloned()
            .collect();
        for name in &fresh {
            self.interactions
                .insert(name.clone(), PhotoInteractions::new(name.clone()));
        }

        let selected = self.selected_photo().map(str::to_string);
        self.photos = photos;
        self.lightbox = selected.and_then(|name| self.photos.iter().position(|p| *p == name));

        fresh
    }

    /// Listing failed: stop the spinner, keep whatever was shown
    pub fn listing_failed(&mut self) {
        self.loading = false;
        self.refreshing = false;
    }

    pub fn selected_photo(&self) -> Option<&str> {
        self.lightbox
            .and_then(|i| self.photos.get(i))
            .map(String::as_str)
    }

    pub fn open_lightbox(&mut self, index: usize) {
        if index < self.photos.len() {
            self.lightbox = Some(index);
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }

    pub fn next_photo(&mut self) {
        if let Some(i) = self.lightbox {
            if !self.photos.is_empty() {
                self.lightbox = Some((i + 1) % self.photos.len());
            }
        }
    }

    pub fn previous_photo(&mut self) {
        if let Some(i) = self.lightbox {
            let len = self.photos.len();
            if len > 0 {
                self.lightbox = Some((i + len - 1) % len);
            }
        }
    }

    pub fn interactions_mut(&mut self, photo_name: &str) -> Option<&mut PhotoInteractions> {
        self.interactions.get_mut(photo_name)
    }

    pub fn request_delete(&mut self, photo_name: &str) {
        self.menus.dismiss();
        self.confirm_delete = Some(photo_name.to_string());
    }

    /// Close the dialog, unless the delete is already running
    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.confirm_delete = None;
        }
    }

    /// The confirmed photo to delete. `None` when no confirmation is
    /// pending or the delete was already sent.
    pub fn confirm_delete(&mut self) -> Option<String> {
        if self.deleting {
            return None;
        }
        let name = self.confirm_delete.clone()?;
        self.deleting = true;
        Some(name)
    }

    /// Returns the generation of the "deleted" notice to hide later
    pub fn photo_deleted(&mut self, photo_name: &str) -> u64 {
        self.deleting = false;
        self.confirm_delete = None;

        if self.selected_photo() == Some(photo_name) {
            self.close_lightbox();
        }

        let selected = self.selected_photo().map(str::to_string);
        self.photos.retain(|p| p != photo_name);
        self.interactions.remove(photo_name);
        self.lightbox = selected.and_then(|name| self.photos.iter().position(|p| *p == name));

        self.delete_success = true;
        self.notice_generation += 1;
        self.notice_generation
    }

    pub fn delete_failed(&mut self, error: String) {
        self.deleting = false;
        self.confirm_delete = None;
        self.error = Some(error);
    }

    pub fn hide_delete_notice(&mut self, generation: u64) {
        if generation == self.notice_generation {
            self.delete_success = false;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::LikeState;

    fn gallery(photos: &[&str]) -> GalleryState {
        let mut gallery = GalleryState::new();
        gallery.photos_loaded(photos.iter().map(|p| p.to_string()).collect());
        gallery
    }

    #[test]
    fn test_new_photos_are_reported_once() {
        let mut gallery = GalleryState::new();
        assert!(gallery.loading);

        let fresh = gallery.photos_loaded(vec!["a.jpg".into(), "b.jpg".into()]);
        assert_eq!(fresh, vec!["a.jpg", "b.jpg"]);
        assert!(!gallery.loading);

        let fresh = gallery.photos_loaded(vec!["b.jpg".into(), "c.jpg".into()]);
        assert_eq!(fresh, vec!["c.jpg"]);
        assert!(!gallery.interactions.contains_key("a.jpg"));
    }

    #[test]
    fn test_lightbox_wraps_around() {
        let mut gallery = gallery(&["a.jpg", "b.jpg", "c.jpg"]);

        gallery.open_lightbox(2);
        gallery.next_photo();
        assert_eq!(gallery.selected_photo(), Some("a.jpg"));

        gallery.previous_photo();
        assert_eq!(gallery.selected_photo(), Some("c.jpg"));

        gallery.close_lightbox();
        gallery.next_photo();
        assert_eq!(gallery.selected_photo(), None);
    }

    #[test]
    fn test_open_lightbox_out_of_range_is_ignored() {
        let mut gallery = gallery(&["a.jpg"]);
        gallery.open_lightbox(5);
        assert_eq!(gallery.lightbox, None);
    }

    #[test]
    fn test_refresh_keeps_lightbox_on_same_photo() {
        let mut gallery = gallery(&["a.jpg", "b.jpg"]);
        gallery.open_lightbox(1);

        gallery.photos_loaded(vec!["new.jpg".into(), "a.jpg".into(), "b.jpg".into()]);
        assert_eq!(gallery.selected_photo(), Some("b.jpg"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut gallery = gallery(&["a.jpg", "b.jpg"]);
        gallery.menus.toggle_photo("a.jpg");

        gallery.request_delete("a.jpg");
        assert_eq!(gallery.menus.open(), None);

        gallery.cancel_delete();
        assert_eq!(gallery.confirm_delete(), None);
        assert_eq!(gallery.photos.len(), 2);
    }

    #[test]
    fn test_deleting_shown_photo_closes_lightbox() {
        let mut gallery = gallery(&["a.jpg", "b.jpg"]);
        gallery.open_lightbox(0);

        gallery.request_delete("a.jpg");
        let name = gallery.confirm_delete().unwrap();
        assert!(gallery.deleting);

        let generation = gallery.photo_deleted(&name);
        assert_eq!(gallery.confirm_delete, None);
        assert_eq!(gallery.photos, vec!["b.jpg"]);
        assert_eq!(gallery.lightbox, None);
        assert!(gallery.delete_success);

        gallery.hide_delete_notice(generation);
        assert!(!gallery.delete_success);
    }

    #[test]
    fn test_dialog_stays_open_while_deleting() {
        let mut gallery = gallery(&["a.jpg"]);
        gallery.request_delete("a.jpg");

        assert_eq!(gallery.confirm_delete().as_deref(), Some("a.jpg"));
        assert_eq!(gallery.confirm_delete.as_deref(), Some("a.jpg"));
        assert!(gallery.deleting);

        // A second confirm or a cancel does nothing while the request runs
        assert_eq!(gallery.confirm_delete(), None);
        gallery.cancel_delete();
        assert_eq!(gallery.confirm_delete.as_deref(), Some("a.jpg"));

        gallery.delete_failed("Failed to delete photo".into());
        assert_eq!(gallery.confirm_delete, None);
        assert!(!gallery.deleting);
        assert_eq!(gallery.error.as_deref(), Some("Failed to delete photo"));
    }

    #[test]
    fn test_deleting_other_photo_keeps_lightbox_target() {
        let mut gallery = gallery(&["a.jpg", "b.jpg"]);
        gallery.open_lightbox(1);

        gallery.photo_deleted("a.jpg");
        assert_eq!(gallery.selected_photo(), Some("b.jpg"));
    }

    #[test]
    fn test_like_example_from_gallery() {
        let mut gallery = gallery(&["a.jpg", "b.jpg"]);
        let photo = gallery.interactions_mut("a.jpg").unwrap();
        photo.loaded(Some(false), Some(3), Some(Vec::new()));

        assert_eq!(photo.toggle_like().as_deref(), Some("a.jpg"));
        photo.like_done(Ok(LikeState { liked: true, count: 4 }));

        let photo = &gallery.interactions["a.jpg"];
        assert!(photo.likes.liked);
        assert_eq!(photo.likes.count, 4);
    }
}
