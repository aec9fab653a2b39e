use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{
    AuthResponse, CommentRequest, LikeRequest, LikeResponse, LoginRequest,
    ProfilePictureResponse, SignupRequest,
};
use crate::error::ApiError;
use crate::state::auth::Credentials;
use crate::state::data::{Comment, LikeState, Letter, PickedFile, User};
use crate::state::interactions::NewComment;

/// Joined result of the three per-photo fetches
#[derive(Debug, Clone)]
pub struct InteractionsFetch {
    pub liked: Result<bool, ApiError>,
    pub count: Result<u64, ApiError>,
    pub comments: Result<Vec<Comment>, ApiError>,
}

/// Handle to the gallery API. Cheap to clone; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path. `segments` are percent-encoded and
    /// appended in order.
    pub fn url(&self, path: &str, segments: &[&str]) -> String {
        let mut url = format!("{}{}", self.base, path);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    // ========== Auth ==========

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        };
        let response = self
            .http
            .post(self.url("/api/auth/login", &[]))
            .json(&body)
            .send()
            .await?;

        auth_user(json(response).await?, "Login failed")
    }

    pub async fn signup(&self, request: &SignupRequest<'_>) -> Result<User, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/signup", &[]))
            .json(request)
            .send()
            .await?;

        auth_user(json(response).await?, "Signup failed")
    }

    /// Returns the stored file name to reference from the signup request
    pub async fn upload_profile_picture(
        &self,
        file: PickedFile,
        username: &str,
    ) -> Result<String, ApiError> {
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("username", username.to_string());

        let response = self
            .http
            .post(self.url("/api/auth/upload-profile-picture", &[]))
            .multipart(form)
            .send()
            .await?;

        let reply: ProfilePictureResponse = json(response).await?;
        match reply.file_name {
            Some(name) if reply.success => Ok(name),
            _ => Err(ApiError::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| "Failed to upload profile picture".to_string()),
            )),
        }
    }

    pub async fn profile_picture(&self, file_name: &str) -> Result<Vec<u8>, ApiError> {
        self.bytes(self.url("/api/auth/profile-pictures", &[file_name])).await
    }

    // ========== Photos & music ==========

    pub async fn list_images(&self) -> Result<Vec<String>, ApiError> {
        let response = self.http.get(self.url("/api/images", &[])).send().await?;
        json(response).await
    }

    pub async fn image_bytes(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        self.bytes(self.url("/api/images", &[name])).await
    }

    /// Music files are served from the same endpoint as photos
    pub async fn track_bytes(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        self.image_bytes(name).await
    }

    pub async fn delete_image(&self, name: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url("/api/images", &[name]))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn list_music(&self) -> Result<Vec<String>, ApiError> {
        let response = self.http.get(self.url("/api/music", &[])).send().await?;
        json(response).await
    }

    // ========== Likes & comments ==========

    pub async fn like_status(&self, photo: &str, user: &str) -> Result<bool, ApiError> {
        let url = format!("{}/user/{}", self.url("/api/likes", &[photo]), urlencoding::encode(user));
        let response = self.http.get(url).send().await?;
        json(response).await
    }

    pub async fn like_count(&self, photo: &str) -> Result<u64, ApiError> {
        let response = self.http.get(self.url("/api/likes", &[photo])).send().await?;
        json(response).await
    }

    pub async fn toggle_like(&self, photo: &str, user: &str) -> Result<LikeState, ApiError> {
        let body = LikeRequest {
            photo_name: photo,
            user_name: user,
        };
        let response = self
            .http
            .post(self.url("/api/likes", &[]))
            .json(&body)
            .send()
            .await?;

        let reply: LikeResponse = json(response).await?;
        Ok(reply.into())
    }

    pub async fn comments(&self, photo: &str) -> Result<Vec<Comment>, ApiError> {
        let response = self.http.get(self.url("/api/comments", &[photo])).send().await?;
        json(response).await
    }

    pub async fn add_comment(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        let body = CommentRequest {
            photo_name: &comment.photo_name,
            comment_text: &comment.comment_text,
            author_name: &comment.author_name,
        };
        let response = self
            .http
            .post(self.url("/api/comments", &[]))
            .json(&body)
            .send()
            .await?;
        json(response).await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url("/api/comments", &[&id.to_string()]))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Like flag, like count and comments for one photo, fetched concurrently
    pub async fn photo_interactions(&self, photo: &str, user: &str) -> InteractionsFetch {
        let (liked, count, comments) = futures::join!(
            self.like_status(photo, user),
            self.like_count(photo),
            self.comments(photo),
        );

        InteractionsFetch { liked, count, comments }
    }

    // ========== Messages ==========

    pub async fn latest_letter(&self) -> Result<Letter, ApiError> {
        let response = self
            .http
            .get(self.url("/api/messages/latest", &[]))
            .send()
            .await?;
        json(response).await
    }

    async fn bytes(&self, url: String) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let bytes = check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Turn a non-2xx response into `ApiError::Status`, keeping the body
pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    debug!("{url} answered {status}");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Multipart part for an in-memory file
pub(crate) fn file_part(file: PickedFile) -> Result<Part, ApiError> {
    let mime = file.mime.unwrap_or("application/octet-stream");
    Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str(mime)
        .map_err(ApiError::from)
}

fn auth_user(reply: AuthResponse, fallback: &str) -> Result<User, ApiError> {
    match reply.user {
        Some(user) if reply.success => Ok(user),
        _ => Err(ApiError::Rejected(
            reply.message.unwrap_or_else(|| fallback.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_segments() {
        let api = ApiClient::new("http://localhost:8080/");
        assert_eq!(api.base(), "http://localhost:8080");
        assert_eq!(api.url("/api/images", &[]), "http://localhost:8080/api/images");
        assert_eq!(
            api.url("/api/images", &["our trip #1.jpg"]),
            "http://localhost:8080/api/images/our%20trip%20%231.jpg"
        );
    }

    #[test]
    fn test_auth_user_requires_success_flag() {
        let reply = AuthResponse {
            success: false,
            message: Some("Invalid username or password".into()),
            user: None,
        };
        assert_eq!(
            auth_user(reply, "Login failed"),
            Err(ApiError::Rejected("Invalid username or password".into()))
        );

        let reply = AuthResponse { success: true, message: None, user: None };
        assert_eq!(auth_user(reply, "Login failed"), Err(ApiError::Rejected("Login failed".into())));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on any sane test machine
        let api = ApiClient::new("http://127.0.0.1:9");
        let err = api.list_images().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
