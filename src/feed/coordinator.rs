use tracing::{debug, warn};

use crate::error::ChirpError;
use crate::feed::state::Cursor;
use crate::feed::{FeedItem, FeedState, FeedView, FetchMode, Intent};
use crate::types::Page;

/// A page fetch the caller must perform and report back with [`Feed::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub page: u32,
    pub mode: FetchMode,
}

/// Result of handling an [`Intent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<Id> {
    Fetch(FetchRequest),
    Open(Id),
    Nothing,
}

/// What [`Feed::resolve`] did with a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Applied { mode: FetchMode, added: usize },
    Failed { mode: FetchMode, message: String },
    Stale,
}

#[derive(Debug)]
struct InFlight {
    request: FetchRequest,
    // Cursor before a refresh reset it, put back if the refresh fails
    restore: Option<Cursor>,
}

/// Pagination state plus the trigger rules for one mounted list.
///
/// At most one request is outstanding. A refresh supersedes an in-flight
/// load-more; the superseded response is recognised by its sequence number
/// and dropped when it arrives.
#[derive(Debug)]
pub struct Feed<T: FeedItem> {
    state: FeedState<T>,
    seq: u64,
    in_flight: Option<InFlight>,
    mounted: bool,
}

impl<T: FeedItem> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FeedItem> Feed<T> {
    pub fn new() -> Self {
        Self {
            state: FeedState::default(),
            seq: 0,
            in_flight: None,
            mounted: false,
        }
    }

    pub fn state(&self) -> &FeedState<T> {
        &self.state
    }

    pub fn view(&self) -> FeedView<'_, T> {
        FeedView::project(&self.state)
    }

    /// The request whose response will be accepted, if any
    #[cfg(test)]
    pub fn in_flight(&self) -> Option<FetchRequest> {
        self.in_flight.as_ref().map(|f| f.request)
    }

    /// First fetch for a newly mounted screen. Fires once per feed.
    pub fn mount(&mut self) -> Option<FetchRequest> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.issue(1, FetchMode::Initial, None))
    }

    /// Reset to page 1. Allowed at any time except while a refresh is
    /// already outstanding.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if self.state.is_refreshing {
            debug!("refresh ignored, one already in flight");
            return None;
        }

        let restore = self.state.cursor();
        if self.state.is_loading_more {
            debug!(seq = self.seq, "refresh supersedes load-more");
            self.state.is_loading_more = false;
        }
        self.mounted = true;
        self.state.current_page = 1;
        self.state.reached_end = false;
        Some(self.issue(1, FetchMode::Refresh, Some(restore)))
    }

    /// Fetch the page after the current one, if there is one and nothing
    /// else is loading.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        let state = &self.state;
        if state.is_initial_loading
            || state.is_loading_more
            || state.is_refreshing
            || state.reached_end
            || state.current_page >= state.last_page
        {
            return None;
        }
        let next = state.current_page + 1;
        Some(self.issue(next, FetchMode::LoadMore, None))
    }

    /// Route an intent from the presentation layer
    pub fn handle(&mut self, intent: Intent<T::Id>) -> Outcome<T::Id> {
        let request = match intent {
            Intent::PullToRefresh => self.refresh(),
            Intent::ScrollNearEnd => self.load_more(),
            Intent::ItemSelected(id) => {
                return if self.state.items.iter().any(|item| item.id() == id) {
                    Outcome::Open(id)
                } else {
                    Outcome::Nothing
                };
            }
        };
        request.map_or(Outcome::Nothing, Outcome::Fetch)
    }

    /// Apply the response to a request. Responses to anything but the most
    /// recently issued request are dropped without touching state.
    pub fn resolve(
        &mut self,
        seq: u64,
        result: std::result::Result<Page<T>, ChirpError>,
    ) -> Resolution {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.request.seq == seq && seq == self.seq => flight,
            other => {
                self.in_flight = other;
                debug!(seq, latest = self.seq, "dropping stale feed response");
                return Resolution::Stale;
            }
        };

        let FetchRequest { page, mode, .. } = flight.request;
        match result {
            Ok(data) => {
                let added = self.state.apply_page(page, mode, data);
                debug!(
                    seq,
                    page,
                    ?mode,
                    added,
                    total = self.state.items.len(),
                    reached_end = self.state.reached_end,
                    "feed page applied"
                );
                Resolution::Applied { mode, added }
            }
            Err(err) => {
                let message = err.to_string();
                warn!(seq, page, ?mode, error = %message, "feed fetch failed");
                if let Some(cursor) = flight.restore {
                    self.state.restore(cursor);
                }
                self.state.apply_failure(mode, message.clone());
                Resolution::Failed { mode, message }
            }
        }
    }

    fn issue(&mut self, page: u32, mode: FetchMode, restore: Option<Cursor>) -> FetchRequest {
        self.seq += 1;
        let request = FetchRequest {
            seq: self.seq,
            page,
            mode,
        };
        self.state.begin(mode);
        self.in_flight = Some(InFlight { request, restore });
        debug!(seq = self.seq, page, ?mode, "feed fetch issued");
        request
    }
}
