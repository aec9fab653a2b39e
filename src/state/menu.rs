/// Drop-down menus: a photo's action menu or the profile menu.
///
/// Only one menu can be open at a time; opening any menu closes the other.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Photo(String),
    Profile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    open: Option<Menu>,
}

impl MenuState {
    pub fn open(&self) -> Option<&Menu> {
        self.open.as_ref()
    }

    pub fn is_photo_open(&self, photo_name: &str) -> bool {
        matches!(&self.open, Some(Menu::Photo(name)) if name == photo_name)
    }

    pub fn is_profile_open(&self) -> bool {
        self.open == Some(Menu::Profile)
    }

    pub fn toggle_photo(&mut self, photo_name: &str) {
        if self.is_photo_open(photo_name) {
            self.open = None;
        } else {
            self.open = Some(Menu::Photo(photo_name.to_string()));
        }
    }

    pub fn toggle_profile(&mut self) {
        if self.is_profile_open() {
            self.open = None;
        } else {
            self.open = Some(Menu::Profile);
        }
    }

    /// A click landed somewhere that is not a menu
    pub fn dismiss(&mut self) {
        self.open = None;
    }

    /// Whether the click-elsewhere listener should be subscribed
    pub fn needs_dismiss_listener(&self) -> bool {
        self.open.is_some()
    }
}
