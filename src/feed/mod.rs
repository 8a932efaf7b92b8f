//! Paginated feed engine.
//!
//! One [`Feed`] is created per mounted list screen. It turns the three
//! triggers a list can see (mount, pull-to-refresh, scroll near the end)
//! into a serialized stream of page requests, merges the pages that come
//! back, and drops responses that were superseded while in flight.
//!
//! The engine never touches the network itself: callers take the
//! [`FetchRequest`] it hands out, perform the request however they like,
//! and feed the outcome back through [`Feed::resolve`].

mod coordinator;
mod source;
mod state;
mod view;

use std::hash::Hash;

pub use coordinator::{Feed, FetchRequest, Outcome, Resolution};
pub use source::{page_path, FeedSource};
pub use state::{FeedState, FetchMode};
pub use view::{is_near_end, FeedView, FooterState, Intent};

/// Anything that can live in a feed. The id is the merge key: a feed never
/// holds two items with the same id.
pub trait FeedItem {
    type Id: Eq + Hash + Clone + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}
