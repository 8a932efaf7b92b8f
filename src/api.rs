use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Page, Tweet, User};

/// The remote social API as the client sees it
#[async_trait]
pub trait Api: Send + Sync + std::fmt::Debug {
    /// `GET <resource>?page=<n>`
    async fn fetch_page(&self, resource: &str, page: u32) -> Result<Page<Tweet>>;

    /// `GET /users/<id>`, the profile header
    async fn fetch_user(&self, user_id: u64) -> Result<User>;

    /// `GET /user`, whoever the bearer token belongs to
    async fn fetch_current_user(&self) -> Result<User>;
}
