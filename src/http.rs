use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::api::Api;
use crate::auth::AuthContext;
use crate::error::{ChirpError, Result};
use crate::feed::page_path;
use crate::types::{Page, Tweet, User};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Api`] over HTTP with bearer authentication
pub struct HttpApi {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, auth: AuthContext) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.api_url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.auth.bearer())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChirpError::Transport(format!("{} {}: {}", status, path, text)));
        }

        response.json().await.map_err(ChirpError::from)
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn fetch_page(&self, resource: &str, page: u32) -> Result<Page<Tweet>> {
        self.get_json(&page_path(resource, page)).await
    }

    async fn fetch_user(&self, user_id: u64) -> Result<User> {
        self.get_json(&format!("/users/{}", user_id)).await
    }

    async fn fetch_current_user(&self) -> Result<User> {
        self.get_json("/user").await
    }
}
