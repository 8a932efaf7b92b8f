use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feed::FeedItem;

/// Paged collection envelope returned by every list endpoint.
///
/// All fields are optional on the wire. Missing pagination metadata is
/// read as "no further pages" by the feed engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub last_page: Option<u32>,
}

impl<T> Page<T> {
    /// True when the server says nothing follows this page, or when it
    /// omitted the metadata needed to tell.
    pub fn is_last(&self) -> bool {
        self.next_page_url.is_none() || self.last_page.is_none()
    }
}

/// Account shown in a profile header and as a tweet's author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, rename = "linkText")]
    pub link_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single post in a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub body: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub retweets_count: u64,
    #[serde(default)]
    pub likes_count: u64,
}

impl FeedItem for Tweet {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}
