/// Path-based navigation
///
/// A path parses into a closed set of routes; together with the session
/// state it resolves to exactly one view.

use super::session::AuthForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Gallery,
    UploadPhoto,
    UploadMusic,
    Message,
    /// Any path we do not serve
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match normalized {
            "/" => Route::Home,
            "/gallery" => Route::Gallery,
            "/upload" => Route::UploadPhoto,
            "/upload/music" => Route::UploadMusic,
            "/message" => Route::Message,
            _ => Route::Unknown(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Gallery => "/gallery",
            Route::UploadPhoto => "/upload",
            Route::UploadMusic => "/upload/music",
            Route::Message => "/message",
            Route::Unknown(path) => path,
        }
    }
}

/// Every screen the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Signup,
    Home,
    Gallery,
    UploadPhoto,
    UploadMusic,
    Message,
}

/// Total mapping from (authenticated?, route, active auth form) to a view.
///
/// Unauthenticated visitors always get the auth form, whatever they asked
/// for; the requested route is not remembered through login.
pub fn resolve(authenticated: bool, route: &Route, form: AuthForm) -> View {
    if !authenticated {
        return match form {
            AuthForm::Login => View::Login,
            AuthForm::Signup => View::Signup,
        };
    }

    match route {
        Route::Home => View::Home,
        Route::Gallery => View::Gallery,
        Route::UploadPhoto => View::UploadPhoto,
        Route::UploadMusic => View::UploadMusic,
        Route::Message => View::Message,
        Route::Unknown(_) => View::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/gallery"), Route::Gallery);
        assert_eq!(Route::parse("/gallery/"), Route::Gallery);
        assert_eq!(Route::parse("/upload"), Route::UploadPhoto);
        assert_eq!(Route::parse("/upload/music"), Route::UploadMusic);
        assert_eq!(Route::parse("/message"), Route::Message);
    }

    #[test]
    fn test_parse_unknown_path() {
        assert_eq!(Route::parse("/secret"), Route::Unknown("/secret".into()));
        assert_eq!(Route::parse("/secret").path(), "/secret");
    }

    #[test]
    fn test_path_round_trip_for_known_routes() {
        for route in [
            Route::Home,
            Route::Gallery,
            Route::UploadPhoto,
            Route::UploadMusic,
            Route::Message,
        ] {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn test_unauthenticated_always_gets_auth_form() {
        for path in ["/", "/gallery", "/upload", "/upload/music", "/message", "/nope"] {
            let route = Route::parse(path);
            assert_eq!(resolve(false, &route, AuthForm::Login), View::Login);
            assert_eq!(resolve(false, &route, AuthForm::Signup), View::Signup);
        }
    }

    #[test]
    fn test_authenticated_routes() {
        let form = AuthForm::Login;
        assert_eq!(resolve(true, &Route::Home, form), View::Home);
        assert_eq!(resolve(true, &Route::Gallery, form), View::Gallery);
        assert_eq!(resolve(true, &Route::UploadPhoto, form), View::UploadPhoto);
        assert_eq!(resolve(true, &Route::UploadMusic, form), View::UploadMusic);
        assert_eq!(resolve(true, &Route::Message, form), View::Message);
    }

    #[test]
    fn test_unknown_route_defaults_to_home() {
        let route = Route::parse("/does-not-exist");
        assert_eq!(resolve(true, &route, AuthForm::Signup), View::Home);
    }
}
