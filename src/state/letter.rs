use super::data::{format_timestamp, Letter};

/// What the message page is showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LetterState {
    #[default]
    Loading,
    Loaded(Letter),
    Missing,
}

impl LetterState {
    pub fn loaded(result: Result<Letter, String>) -> Self {
        match result {
            Ok(letter) => LetterState::Loaded(letter),
            Err(_) => LetterState::Missing,
        }
    }

    /// Formatted timestamp of the loaded letter, if it has one
    pub fn written_at(&self) -> Option<String> {
        match self {
            LetterState::Loaded(letter) => letter.timestamp.as_deref().map(format_timestamp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_failure_is_missing() {
        assert_eq!(LetterState::loaded(Err("404".into())), LetterState::Missing);
    }

    #[test]
    fn test_loaded_letter_timestamp() {
        let state = LetterState::loaded(Ok(Letter {
            id: Some(1),
            content: "Happy anniversary".into(),
            timestamp: Some("2024-02-14T08:00:00".into()),
        }));
        assert_eq!(state.written_at().as_deref(), Some("Feb 14, 2024 08:00"));
        assert_eq!(LetterState::Loading.written_at(), None);
    }
}
