/// Wire formats of the gallery API (camelCase JSON)

use serde::{Deserialize, Serialize};

use crate::state::data::{LikeState, User};

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub profile_picture: Option<&'a str>,
}

/// Reply of the login and signup endpoints
#[derive(Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Reply of the photo and music upload endpoints
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest<'a> {
    pub photo_name: &'a str,
    pub user_name: &'a str,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: u64,
}

impl From<LikeResponse> for LikeState {
    fn from(response: LikeResponse) -> Self {
        LikeState {
            liked: response.liked,
            count: response.like_count,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest<'a> {
    pub photo_name: &'a str,
    pub comment_text: &'a str,
    pub author_name: &'a str,
}
