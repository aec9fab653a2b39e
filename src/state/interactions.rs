/// Likes and comments for a single photo
///
/// The state machine never talks to the network itself: operations that
/// need a request return what to send, and the matching `*_done` method
/// applies the server's answer.

use std::time::Duration;

use super::data::{Comment, LikeState};

/// How long the comment panel stays open after a successful comment
pub const AUTO_COLLAPSE_DELAY: Duration = Duration::from_secs(3);

/// How long the "comment added" notice stays up
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Token identifying one scheduled auto-collapse.
/// Only the most recently issued ticket may collapse the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub photo_name: String,
    pub comment_text: String,
    pub author_name: String,
}

#[derive(Debug, Default)]
pub struct PhotoInteractions {
    pub photo_name: String,
    pub likes: LikeState,
    pub comments: Vec<Comment>,
    pub show_comments: bool,
    pub draft: String,
    pub submitting: bool,
    pub liking: bool,
    pub show_success: bool,
    /// Comment waiting for the user to confirm its deletion
    pub confirm_delete: Option<i64>,
    pub error: Option<String>,
    collapse_generation: u64,
    collapse_armed: bool,
    notice_generation: u64,
}

impl PhotoInteractions {
    pub fn new(photo_name: impl Into<String>) -> Self {
        Self {
            photo_name: photo_name.into(),
            ..Self::default()
        }
    }

    /// Apply the joined result of the three mount-time fetches.
    /// A failed part keeps its default and is only logged by the caller.
    pub fn loaded(
        &mut self,
        liked: Option<bool>,
        count: Option<u64>,
        comments: Option<Vec<Comment>>,
    ) {
        if let Some(liked) = liked {
            self.likes.liked = liked;
        }
        if let Some(count) = count {
            self.likes.count = count;
        }
        if let Some(comments) = comments {
            self.comments = comments;
        }
    }

    /// Start a like toggle; `None` while one is already in flight
    pub fn toggle_like(&mut self) -> Option<String> {
        if self.liking {
            return None;
        }
        self.liking = true;
        Some(self.photo_name.clone())
    }

    /// The server's answer is authoritative for both flag and count
    pub fn like_done(&mut self, result: Result<LikeState, String>) {
        self.liking = false;
        match result {
            Ok(likes) => self.likes = likes,
            Err(e) => self.error = Some(e),
        }
    }

    pub fn edit_draft(&mut self, text: String) {
        self.draft = text;
    }

    /// Validate the draft. Empty or whitespace-only text never leaves the client.
    pub fn submit_comment(&mut self, author_name: &str) -> Option<NewComment> {
        let text = self.draft.trim();
        if text.is_empty() || self.submitting {
            return None;
        }

        self.submitting = true;
        Some(NewComment {
            photo_name: self.photo_name.clone(),
            comment_text: text.to_string(),
            author_name: author_name.to_string(),
        })
    }

    /// Prepend the stored comment and arm a fresh auto-collapse timer,
    /// superseding any earlier one.
    pub fn comment_added(&mut self, comment: Comment) -> (CollapseTicket, u64) {
        self.submitting = false;
        self.comments.insert(0, comment);
        self.draft.clear();
        self.show_success = true;
        self.notice_generation += 1;

        (self.arm_collapse(), self.notice_generation)
    }

    pub fn comment_failed(&mut self, error: String) {
        self.submitting = false;
        self.error = Some(error);
    }

    pub fn hide_notice(&mut self, generation: u64) {
        if generation == self.notice_generation {
            self.show_success = false;
        }
    }

    /// Returns whether the panel actually collapsed
    pub fn auto_collapse(&mut self, ticket: CollapseTicket) -> bool {
        if !self.collapse_armed || ticket.0 != self.collapse_generation {
            return false;
        }
        self.collapse_armed = false;
        self.show_comments = false;
        true
    }

    /// Manual open/close; cancels any pending auto-collapse
    pub fn toggle_comments(&mut self) {
        self.cancel_collapse();
        self.show_comments = !self.show_comments;
    }

    pub fn collapse_comments(&mut self) {
        self.cancel_collapse();
        self.show_comments = false;
    }

    pub fn request_delete(&mut self, comment_id: i64) {
        self.confirm_delete = Some(comment_id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// The confirmed comment id to delete, if a confirmation was pending
    pub fn confirm_delete(&mut self) -> Option<i64> {
        self.confirm_delete.take()
    }

    pub fn comment_deleted(&mut self, comment_id: i64) {
        self.comments.retain(|c| c.id != comment_id);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn arm_collapse(&mut self) -> CollapseTicket {
        self.collapse_generation += 1;
        self.collapse_armed = true;
        CollapseTicket(self.collapse_generation)
    }

    fn cancel_collapse(&mut self) {
        self.collapse_generation += 1;
        self.collapse_armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, text: &str) -> Comment {
        Comment {
            id,
            photo_name: "a.jpg".into(),
            comment_text: text.into(),
            author_name: "romeo".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_empty_comment_is_rejected_locally() {
        let mut photo = PhotoInteractions::new("a.jpg");

        assert!(photo.submit_comment("romeo").is_none());

        photo.edit_draft("   \n\t ".into());
        assert!(photo.submit_comment("romeo").is_none());
        assert!(!photo.submitting);
    }

    #[test]
    fn test_comment_text_is_trimmed() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.edit_draft("  love this  ".into());

        let request = photo.submit_comment("romeo").unwrap();
        assert_eq!(
            request,
            NewComment {
                photo_name: "a.jpg".into(),
                comment_text: "love this".into(),
                author_name: "romeo".into(),
            }
        );
        assert!(photo.submitting);
        // A second press while the first is in flight sends nothing
        assert!(photo.submit_comment("romeo").is_none());
    }

    #[test]
    fn test_new_comments_are_prepended() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.loaded(None, None, Some(vec![comment(1, "first")]));

        photo.edit_draft("second".into());
        photo.submit_comment("romeo");
        photo.comment_added(comment(2, "second"));

        let ids: Vec<i64> = photo.comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(photo.draft.is_empty());
        assert!(photo.show_success);
    }

    #[test]
    fn test_auto_collapse_after_comment() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.toggle_comments();
        assert!(photo.show_comments);

        photo.edit_draft("hi".into());
        photo.submit_comment("romeo");
        let (ticket, _) = photo.comment_added(comment(1, "hi"));

        assert!(photo.auto_collapse(ticket));
        assert!(!photo.show_comments);
    }

    #[test]
    fn test_manual_toggle_cancels_auto_collapse() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.toggle_comments();
        photo.edit_draft("hi".into());
        photo.submit_comment("romeo");
        let (ticket, _) = photo.comment_added(comment(1, "hi"));

        photo.toggle_comments();
        photo.toggle_comments();
        assert!(photo.show_comments);

        assert!(!photo.auto_collapse(ticket));
        assert!(photo.show_comments);
    }

    #[test]
    fn test_new_submission_supersedes_old_timer() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.toggle_comments();

        photo.edit_draft("one".into());
        photo.submit_comment("romeo");
        let (first, _) = photo.comment_added(comment(1, "one"));

        photo.edit_draft("two".into());
        photo.submit_comment("romeo");
        let (second, _) = photo.comment_added(comment(2, "two"));

        assert!(!photo.auto_collapse(first));
        assert!(photo.show_comments);
        assert!(photo.auto_collapse(second));
        assert!(!photo.show_comments);
    }

    #[test]
    fn test_stale_notice_does_not_hide_newer_one() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.edit_draft("one".into());
        photo.submit_comment("romeo");
        let (_, first) = photo.comment_added(comment(1, "one"));

        photo.edit_draft("two".into());
        photo.submit_comment("romeo");
        let (_, second) = photo.comment_added(comment(2, "two"));

        photo.hide_notice(first);
        assert!(photo.show_success);
        photo.hide_notice(second);
        assert!(!photo.show_success);
    }

    #[test]
    fn test_cancelled_delete_leaves_comments() {
        let mut photo = PhotoInteractions::new("a.jpg");
        let comments = vec![comment(1, "one"), comment(2, "two")];
        photo.loaded(None, None, Some(comments.clone()));

        photo.request_delete(1);
        photo.cancel_delete();

        assert_eq!(photo.confirm_delete(), None);
        assert_eq!(photo.comments, comments);
    }

    #[test]
    fn test_confirmed_delete_removes_by_id() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.loaded(None, None, Some(vec![comment(1, "one"), comment(2, "two")]));

        photo.request_delete(1);
        let id = photo.confirm_delete().unwrap();
        photo.comment_deleted(id);

        assert_eq!(photo.comments, vec![comment(2, "two")]);
    }

    #[test]
    fn test_double_like_toggle_restores_original() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.loaded(Some(false), Some(3), None);
        let original = photo.likes;

        assert_eq!(photo.toggle_like().as_deref(), Some("a.jpg"));
        photo.like_done(Ok(LikeState { liked: true, count: 4 }));
        assert_eq!(photo.likes, LikeState { liked: true, count: 4 });

        photo.toggle_like().unwrap();
        photo.like_done(Ok(LikeState { liked: false, count: 3 }));
        assert_eq!(photo.likes, original);
    }

    #[test]
    fn test_like_failure_keeps_state() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.loaded(Some(true), Some(9), None);

        photo.toggle_like();
        assert!(photo.toggle_like().is_none());
        photo.like_done(Err("offline".into()));

        assert_eq!(photo.likes, LikeState { liked: true, count: 9 });
        assert_eq!(photo.error.as_deref(), Some("offline"));
        assert!(!photo.liking);
    }

    #[test]
    fn test_partial_load_keeps_defaults() {
        let mut photo = PhotoInteractions::new("a.jpg");
        photo.loaded(None, Some(5), None);
        assert_eq!(photo.likes, LikeState { liked: false, count: 5 });
        assert!(photo.comments.is_empty());
    }
}
