use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::data::User;
use crate::error::SessionError;

/// Outcome of reading the persisted session record
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Present(User),
    Absent,
    /// The file exists but does not hold a user record
    Corrupt(String),
}

/// Reads and writes the one on-disk session record (JSON-serialized `User`)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: unreadable or unparseable data comes back as `Corrupt`
    pub fn load(&self) -> Loaded {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Loaded::Absent,
            Err(e) => return Loaded::Corrupt(e.to_string()),
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Loaded::Present(user),
            Err(e) => Loaded::Corrupt(e.to_string()),
        }
    }

    pub fn save(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(user)?;
        fs::write(&self.path, json)?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Which form the unauthenticated screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthForm {
    #[default]
    Login,
    Signup,
}

/// Who is logged in, backed by the session file
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    current_user: Option<User>,
    auth_form: AuthForm,
}

impl Session {
    /// Re-hydrate from the store. A corrupt record is discarded silently.
    pub fn restore(store: SessionStore) -> Self {
        debug!("Loading session from {}", store.path().display());
        let current_user = match store.load() {
            Loaded::Present(user) => {
                info!("Restored session for {}", user.username);
                Some(user)
            }
            Loaded::Absent => None,
            Loaded::Corrupt(reason) => {
                warn!("Discarding corrupt session record: {reason}");
                if let Err(e) = store.clear() {
                    warn!("Could not remove corrupt session record: {e}");
                }
                None
            }
        };

        Self {
            store,
            current_user,
            auth_form: AuthForm::Login,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Name used on likes and comments
    pub fn viewer_name(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("Anonymous")
    }

    pub fn auth_form(&self) -> AuthForm {
        self.auth_form
    }

    pub fn show_form(&mut self, form: AuthForm) {
        self.auth_form = form;
    }

    /// Remember the user. A failed write only costs the next restart its login.
    pub fn login(&mut self, user: User) {
        if let Err(e) = self.store.save(&user) {
            warn!("Could not persist session: {e}");
        }
        info!("{} logged in", user.username);
        self.current_user = Some(user);
    }

    /// Signup does not log in; it sends the user back to the login form
    pub fn signup_succeeded(&mut self) {
        self.auth_form = AuthForm::Login;
    }

    /// Forget the user and return to the login form.
    /// Stopping the music is the caller's job.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Could not clear session record: {e}");
        }
        if let Some(user) = self.current_user.take() {
            info!("{} logged out", user.username);
        }
        self.auth_form = AuthForm::Login;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub fn sample_user() -> User {
        User {
            id: Some(1),
            username: "romeo".into(),
            email: "romeo@verona.it".into(),
            full_name: Some("Romeo Montague".into()),
            profile_picture: None,
            created_at: None,
            last_login_at: None,
        }
    }

    #[test]
    fn test_load_absent() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load(), Loaded::Absent);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        store.save(&sample_user()).unwrap();
        assert_eq!(store.load(), Loaded::Present(sample_user()));
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::new(path.clone());
        assert!(matches!(store.load(), Loaded::Corrupt(_)));

        let session = Session::restore(store);
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"hello":"world"}"#).unwrap();

        assert!(matches!(SessionStore::new(path).load(), Loaded::Corrupt(_)));
    }

    #[test]
    fn test_restore_valid_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&sample_user()).unwrap();

        let session = Session::restore(store);
        assert!(session.is_authenticated());
        assert_eq!(session.viewer_name(), "romeo");
    }

    #[test]
    fn test_logout_clears_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::restore(SessionStore::new(path.clone()));

        session.login(sample_user());
        assert!(path.exists());

        session.show_form(AuthForm::Signup);
        session.logout();
        assert!(!session.is_authenticated());
        assert!(!path.exists());
        assert_eq!(session.auth_form(), AuthForm::Login);
        assert_eq!(session.viewer_name(), "Anonymous");
    }

    #[test]
    fn test_signup_returns_to_login_form() {
        let dir = tempdir().unwrap();
        let mut session = Session::restore(SessionStore::new(dir.path().join("s.json")));

        session.show_form(AuthForm::Signup);
        session.signup_succeeded();
        assert_eq!(session.auth_form(), AuthForm::Login);
        assert!(!session.is_authenticated());
    }
}
