use std::fmt;

use crate::config::FeedsConfig;

/// Which collection a feed screen pages through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Home,
    Global,
    Profile(u64),
}

impl FeedSource {
    /// Resource path on the API, without the page query
    pub fn resource(&self, feeds: &FeedsConfig) -> String {
        match self {
            FeedSource::Home => feeds.home.clone(),
            FeedSource::Global => feeds.global.clone(),
            FeedSource::Profile(user_id) => feeds.profile.replace("{id}", &user_id.to_string()),
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Home => write!(f, "Home"),
            FeedSource::Global => write!(f, "Global"),
            FeedSource::Profile(user_id) => write!(f, "Profile {}", user_id),
        }
    }
}

/// Append the `page` query parameter to a resource path
pub fn page_path(resource: &str, page: u32) -> String {
    let sep = if resource.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", resource, sep, page)
}
