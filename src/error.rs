use thiserror::Error;

/// Failures talking to the gallery API.
///
/// Carried inside iced messages, so every variant holds owned strings and the
/// type is `Clone`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    /// The server answered `{ success: false, message }`
    #[error("{0}")]
    Rejected(String),

    #[error("Could not read file: {0}")]
    Io(String),
}

impl ApiError {
    /// Text suitable for an inline banner.
    ///
    /// Server-provided messages win over transport details, mirroring how the
    /// API reports validation problems in the response body.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(message) if !message.is_empty() => message.clone(),
            ApiError::Status { body, .. } => {
                server_message(body).unwrap_or_else(|| fallback.to_string())
            }
            _ => fallback.to_string(),
        }
    }
}

/// Pull `message` out of a JSON error body, if there is one
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

/// Failures writing or removing the persisted session record
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures from the audio output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("No audio output device available")]
    NoOutputDevice,

    #[error("No track selected")]
    NoSource,

    #[error("Track is not loaded yet")]
    NotLoaded,

    #[error("Audio stream error: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_shown_verbatim() {
        let err = ApiError::Rejected("Invalid username or password".into());
        assert_eq!(err.user_message("Login failed"), "Invalid username or password");
    }

    #[test]
    fn test_status_body_message_is_extracted() {
        let err = ApiError::Status {
            status: 400,
            body: r#"{"success":false,"message":"Username is required"}"#.into(),
        };
        assert_eq!(err.user_message("Signup failed"), "Username is required");
    }

    #[test]
    fn test_fallback_for_transport_errors() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(
            err.user_message("An error occurred during login"),
            "An error occurred during login"
        );

        let plain = ApiError::Status { status: 500, body: "boom".into() };
        assert_eq!(plain.user_message("oops"), "oops");
    }
}
