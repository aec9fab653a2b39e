/// Login and signup form state
///
/// Validation happens here, before anything is sent.

use super::data::{FileInfo, PickedFile};

/// Largest accepted profile picture (5 MiB)
pub const MAX_PROFILE_PICTURE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub show_password: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl LoginForm {
    pub fn edit_username(&mut self, value: String) {
        self.username = value;
        self.error = None;
    }

    pub fn edit_password(&mut self, value: String) {
        self.password = value;
        self.error = None;
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Credentials to send; `None` while a request is in flight
    pub fn submit(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.success = None;

        Some(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    pub fn succeeded(&mut self) {
        self.loading = false;
        self.success = Some("Login successful!".to_string());
    }

    pub fn failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// `None` for an empty password
    pub fn of(password: &str) -> Option<Self> {
        match password.chars().count() {
            0 => None,
            1..=5 => Some(PasswordStrength::Weak),
            6..=7 => Some(PasswordStrength::Medium),
            _ => Some(PasswordStrength::Strong),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Medium => "Medium",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// Everything the signup request needs
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub profile_picture: Option<PickedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Username,
    Email,
    FullName,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub profile_picture: Option<PickedFile>,
    pub show_password: bool,
    pub show_confirm_password: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SignupForm {
    pub fn edit(&mut self, field: SignupField, value: String) {
        match field {
            SignupField::Username => self.username = value,
            SignupField::Email => self.email = value,
            SignupField::FullName => self.full_name = value,
            SignupField::Password => self.password = value,
            SignupField::ConfirmPassword => self.confirm_password = value,
        }
        self.error = None;
    }

    pub fn password_strength(&self) -> Option<PasswordStrength> {
        PasswordStrength::of(&self.password)
    }

    /// Whether a picked picture is worth reading. Explains the refusal
    /// otherwise.
    pub fn check_picture(&mut self, file: &FileInfo) -> bool {
        let Some(size) = file.size else {
            self.error = Some(format!("Could not read {}", file.name));
            return false;
        };
        self.picture_allowed(file.mime, size)
    }

    /// Accept a read profile picture, or explain why not
    pub fn choose_picture(&mut self, file: PickedFile) {
        if self.picture_allowed(file.mime, file.size) {
            self.profile_picture = Some(file);
        }
    }

    fn picture_allowed(&mut self, mime: Option<&str>, size: u64) -> bool {
        if !mime.is_some_and(|m| m.starts_with("image/")) {
            self.error = Some("Please select an image file".to_string());
            return false;
        }
        if size > MAX_PROFILE_PICTURE_BYTES {
            self.error = Some("File size must be less than 5MB".to_string());
            return false;
        }
        self.error = None;
        true
    }

    pub fn remove_picture(&mut self) {
        self.profile_picture = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        if self.password.chars().count() < 6 {
            return Err("Password must be at least 6 characters long".to_string());
        }
        if !self.email.contains('@') {
            return Err("Please enter a valid email address".to_string());
        }
        Ok(())
    }

    /// Validate and hand out the registration. Invalid input sets the
    /// inline error and sends nothing.
    pub fn submit(&mut self) -> Option<Registration> {
        if self.loading {
            return None;
        }
        if let Err(message) = self.validate() {
            self.error = Some(message);
            return None;
        }

        self.loading = true;
        self.error = None;
        self.success = None;

        Some(Registration {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            full_name: self.full_name.clone(),
            profile_picture: self.profile_picture.clone(),
        })
    }

    /// Clear the form and show the success notice
    pub fn succeeded(&mut self) {
        *self = Self {
            success: Some("Account created successfully! You can now log in.".to_string()),
            ..Self::default()
        };
    }

    pub fn failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_signup() -> SignupForm {
        let mut form = SignupForm::default();
        form.edit(SignupField::Username, "juliet".into());
        form.edit(SignupField::Email, "juliet@verona.it".into());
        form.edit(SignupField::FullName, "Juliet Capulet".into());
        form.edit(SignupField::Password, "balcony1".into());
        form.edit(SignupField::ConfirmPassword, "balcony1".into());
        form
    }

    #[test]
    fn test_login_submit_once() {
        let mut form = LoginForm::default();
        form.edit_username("romeo".into());
        form.edit_password("secret".into());

        let creds = form.submit().unwrap();
        assert_eq!(creds.username, "romeo");
        assert!(form.submit().is_none());

        form.failed("Invalid username or password".into());
        assert!(!form.loading);
        assert!(form.submit().is_some());
    }

    #[test]
    fn test_editing_clears_error() {
        let mut form = LoginForm::default();
        form.failed("nope".into());
        form.edit_username("r".into());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_password_mismatch_sends_nothing() {
        let mut form = filled_signup();
        form.edit(SignupField::ConfirmPassword, "balcony2".into());

        assert!(form.submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Passwords do not match"));
        assert!(!form.loading);
    }

    #[test]
    fn test_short_password_and_bad_email() {
        let mut form = filled_signup();
        form.edit(SignupField::Password, "abc".into());
        form.edit(SignupField::ConfirmPassword, "abc".into());
        assert!(form.submit().is_none());
        assert_eq!(
            form.error.as_deref(),
            Some("Password must be at least 6 characters long")
        );

        let mut form = filled_signup();
        form.edit(SignupField::Email, "juliet.verona.it".into());
        assert!(form.submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_valid_signup_and_reset() {
        let mut form = filled_signup();
        let registration = form.submit().unwrap();
        assert_eq!(registration.full_name, "Juliet Capulet");
        assert!(form.loading);

        form.succeeded();
        assert!(form.username.is_empty());
        assert!(!form.loading);
        assert!(form.success.is_some());
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(PasswordStrength::of(""), None);
        assert_eq!(PasswordStrength::of("abc"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("abcdef"), Some(PasswordStrength::Medium));
        assert_eq!(PasswordStrength::of("abcdefgh"), Some(PasswordStrength::Strong));
    }

    #[test]
    fn test_profile_picture_validation() {
        let mut form = SignupForm::default();

        form.choose_picture(PickedFile {
            name: "cv.pdf".into(),
            mime: Some("application/pdf"),
            size: 10,
            bytes: Vec::new(),
        });
        assert!(form.profile_picture.is_none());
        assert_eq!(form.error.as_deref(), Some("Please select an image file"));

        form.choose_picture(PickedFile {
            name: "big.png".into(),
            mime: Some("image/png"),
            size: MAX_PROFILE_PICTURE_BYTES + 1,
            bytes: Vec::new(),
        });
        assert!(form.profile_picture.is_none());

        form.choose_picture(PickedFile {
            name: "me.png".into(),
            mime: Some("image/png"),
            size: 2048,
            bytes: Vec::new(),
        });
        assert!(form.profile_picture.is_some());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_picture_checked_before_reading() {
        let mut form = SignupForm::default();
        let info = |size| FileInfo {
            path: "me.png".into(),
            name: "me.png".into(),
            mime: Some("image/png"),
            size,
        };

        assert!(!form.check_picture(&info(Some(MAX_PROFILE_PICTURE_BYTES * 100))));
        assert_eq!(form.error.as_deref(), Some("File size must be less than 5MB"));

        assert!(!form.check_picture(&info(None)));
        assert_eq!(form.error.as_deref(), Some("Could not read me.png"));

        assert!(form.check_picture(&info(Some(2048))));
        assert!(form.error.is_none());
    }
}
