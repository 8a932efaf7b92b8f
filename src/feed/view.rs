use crate::feed::FeedState;

/// What the bottom of the list should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterState {
    Loading,
    EndOfList,
    Idle,
}

/// User intent coming from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<Id> {
    PullToRefresh,
    ScrollNearEnd,
    ItemSelected(Id),
}

/// Read-only projection of a [`FeedState`] for rendering
#[derive(Debug)]
pub struct FeedView<'a, T> {
    pub items: &'a [T],
    pub is_initial_loading: bool,
    pub is_refreshing: bool,
    pub footer: FooterState,
    pub error: Option<&'a str>,
}

impl<'a, T> FeedView<'a, T> {
    pub fn project(state: &'a FeedState<T>) -> Self {
        let footer = if state.is_loading_more() {
            FooterState::Loading
        } else if state.reached_end() || state.is_exhausted() {
            FooterState::EndOfList
        } else {
            FooterState::Idle
        };

        Self {
            items: state.items(),
            is_initial_loading: state.is_initial_loading(),
            is_refreshing: state.is_refreshing(),
            footer,
            error: state.last_error(),
        }
    }
}

/// Whether the selection sits inside the trailing `threshold` fraction of a
/// viewport's worth of rows, counted from the end of the list.
pub fn is_near_end(selected: usize, len: usize, visible: usize, threshold: f32) -> bool {
    if len == 0 {
        return false;
    }
    let remaining = len.saturating_sub(selected + 1) as f32;
    let window = visible.max(1) as f32 * threshold.clamp(0.0, 1.0);
    remaining <= window
}
