use std::collections::HashSet;

use crate::feed::FeedItem;
use crate::types::Page;

/// Why a page is being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Initial,
    Refresh,
    LoadMore,
}

impl FetchMode {
    /// Initial and refresh fetches replace the list; load-more appends.
    pub fn replaces(self) -> bool {
        matches!(self, FetchMode::Initial | FetchMode::Refresh)
    }
}

/// Pagination position, snapshotted so a failed refresh can put it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Cursor {
    pub current_page: u32,
    pub last_page: u32,
    pub reached_end: bool,
}

/// Volatile state of one feed. Only the owning [`Feed`](super::Feed) mutates it.
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    pub(super) items: Vec<T>,
    pub(super) current_page: u32,
    pub(super) last_page: u32,
    pub(super) is_initial_loading: bool,
    pub(super) is_refreshing: bool,
    pub(super) is_loading_more: bool,
    pub(super) reached_end: bool,
    pub(super) last_error: Option<String>,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            last_page: 1,
            is_initial_loading: true,
            is_refreshing: false,
            is_loading_more: false,
            reached_end: false,
            last_error: None,
        }
    }
}

impl<T> FeedState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn is_initial_loading(&self) -> bool {
        self.is_initial_loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Settled on the last page the server reported, so no load-more can
    /// follow even if the response still linked a next page.
    pub fn is_exhausted(&self) -> bool {
        !self.is_initial_loading && !self.is_refreshing && self.current_page >= self.last_page
    }

    /// Message of the most recent failed fetch, until the next fetch is issued
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(super) fn cursor(&self) -> Cursor {
        Cursor {
            current_page: self.current_page,
            last_page: self.last_page,
            reached_end: self.reached_end,
        }
    }

    pub(super) fn restore(&mut self, cursor: Cursor) {
        self.current_page = cursor.current_page;
        self.last_page = cursor.last_page;
        self.reached_end = cursor.reached_end;
    }

    pub(super) fn begin(&mut self, mode: FetchMode) {
        self.last_error = None;
        match mode {
            FetchMode::Initial => self.is_initial_loading = true,
            FetchMode::Refresh => self.is_refreshing = true,
            FetchMode::LoadMore => self.is_loading_more = true,
        }
    }

    fn finish(&mut self, mode: FetchMode) {
        match mode {
            FetchMode::Initial => self.is_initial_loading = false,
            FetchMode::Refresh => {
                // A refresh can supersede the initial fetch, so it settles both.
                self.is_refreshing = false;
                self.is_initial_loading = false;
            }
            FetchMode::LoadMore => self.is_loading_more = false,
        }
    }

    /// Record a failed fetch. Items and cursor are left alone.
    pub(super) fn apply_failure(&mut self, mode: FetchMode, message: String) {
        self.finish(mode);
        self.last_error = Some(message);
    }
}

impl<T: FeedItem> FeedState<T> {
    /// Merge a successfully fetched page. Returns how many items were added.
    pub(super) fn apply_page(&mut self, page_number: u32, mode: FetchMode, page: Page<T>) -> usize {
        let reached_end = page.is_last();
        let last_page = page.last_page.unwrap_or(page_number).max(1);

        if mode.replaces() {
            self.items.clear();
        }
        let added = self.extend_unique(page.data);

        self.last_page = last_page;
        self.current_page = page_number.min(last_page.saturating_add(1));
        self.reached_end = reached_end;
        self.finish(mode);
        added
    }

    fn extend_unique(&mut self, incoming: Vec<T>) -> usize {
        let mut seen: HashSet<T::Id> = self.items.iter().map(FeedItem::id).collect();
        let before = self.items.len();
        self.items
            .extend(incoming.into_iter().filter(|item| seen.insert(item.id())));
        self.items.len() - before
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Post(pub u32);

    impl FeedItem for Post {
        type Id = u32;

        fn id(&self) -> u32 {
            self.0
        }
    }

    pub(crate) fn page(ids: std::ops::Range<u32>, last_page: u32, has_next: bool) -> Page<Post> {
        Page {
            data: ids.map(Post).collect(),
            next_page_url: has_next.then(|| "next".to_string()),
            last_page: Some(last_page),
        }
    }

    #[test]
    fn fresh_state_is_initial_loading_on_page_one() {
        let state = FeedState::<Post>::default();
        assert!(state.is_initial_loading());
        assert!(state.items().is_empty());
        assert_eq!(state.current_page(), 1);
        assert!(!state.reached_end());
    }

    #[test]
    fn replace_dedups_within_page() {
        let mut state = FeedState::default();
        let data = Page {
            data: vec![Post(1), Post(2), Post(1)],
            next_page_url: Some("next".into()),
            last_page: Some(2),
        };
        let added = state.apply_page(1, FetchMode::Initial, data);
        assert_eq!(added, 2);
        assert_eq!(state.items(), &[Post(1), Post(2)]);
        assert!(!state.is_initial_loading());
    }

    #[test]
    fn load_more_skips_known_ids() {
        let mut state = FeedState::default();
        state.apply_page(1, FetchMode::Initial, page(0..20, 3, true));
        state.begin(FetchMode::LoadMore);
        // Server shifted by five posts between requests
        let added = state.apply_page(2, FetchMode::LoadMore, page(15..35, 3, true));
        assert_eq!(added, 15);
        assert_eq!(state.items().len(), 35);
        assert_eq!(state.current_page(), 2);
        assert!(!state.is_loading_more());
    }

    #[test]
    fn missing_last_page_marks_end() {
        let mut state = FeedState::default();
        let data = Page {
            data: vec![Post(1)],
            next_page_url: Some("next".into()),
            last_page: None,
        };
        state.apply_page(1, FetchMode::Initial, data);
        assert!(state.reached_end());
        assert_eq!(state.last_page(), 1);
    }

    #[test]
    fn current_page_never_passes_last_page_plus_one() {
        let mut state = FeedState::default();
        state.apply_page(1, FetchMode::Initial, page(0..5, 4, true));
        // Collection shrank under us: page 4 now reports last_page = 2
        state.apply_page(4, FetchMode::LoadMore, page(5..6, 2, false));
        assert_eq!(state.last_page(), 2);
        assert_eq!(state.current_page(), 3);
        assert!(state.reached_end());
    }

    #[test]
    fn huge_last_page_saturates() {
        let mut state = FeedState::default();
        let data = Page {
            data: vec![Post(1)],
            next_page_url: Some("next".into()),
            last_page: Some(u32::MAX),
        };
        state.apply_page(1, FetchMode::Initial, data);
        assert_eq!(state.last_page(), u32::MAX);
        assert_eq!(state.current_page(), 1);
        assert!(!state.reached_end());

        state.begin(FetchMode::LoadMore);
        state.apply_page(u32::MAX, FetchMode::LoadMore, page(2..3, u32::MAX, false));
        assert_eq!(state.current_page(), u32::MAX);
        assert!(state.reached_end());
    }

    #[test]
    fn failure_keeps_items_and_cursor() {
        let mut state = FeedState::default();
        state.apply_page(1, FetchMode::Initial, page(0..20, 3, true));
        state.begin(FetchMode::LoadMore);
        state.apply_failure(FetchMode::LoadMore, "timed out".into());

        assert_eq!(state.items().len(), 20);
        assert_eq!(state.current_page(), 1);
        assert!(!state.reached_end());
        assert!(!state.is_loading_more());
        assert_eq!(state.last_error(), Some("timed out"));
    }

    #[test]
    fn refresh_finish_clears_initial_loading() {
        let mut state = FeedState::<Post>::default();
        state.begin(FetchMode::Refresh);
        state.apply_failure(FetchMode::Refresh, "offline".into());
        assert!(!state.is_refreshing());
        assert!(!state.is_initial_loading());
        assert!(state.items().is_empty());
    }
}
