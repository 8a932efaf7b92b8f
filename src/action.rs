use crate::app::ScreenId;
use crate::error::ChirpError;
use crate::types::{Page, Tweet, User};

/// Navigation target
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Global,
    Profile(u64),
    Tweet(Box<Tweet>),
}

#[derive(Debug)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,
    NextTab,
    PrevTab,

    // Feed intents
    Refresh,

    // Navigation
    Navigate(Route),
    OpenAuthor,
    OpenMyProfile,
    OpenLink,

    // Terminal
    Resize(u16),

    // Fetch results, tagged with the screen and request that produced them
    PageLoaded {
        screen: ScreenId,
        seq: u64,
        result: Result<Page<Tweet>, ChirpError>,
    },
    ProfileLoaded {
        screen: ScreenId,
        load_id: u64,
        result: Result<User, ChirpError>,
    },
    CurrentUserLoaded(User),

    Error(String),
    None,
}

impl Action {
    /// Actions that come straight from a keypress
    pub fn is_user_input(&self) -> bool {
        !matches!(
            self,
            Action::PageLoaded { .. }
                | Action::ProfileLoaded { .. }
                | Action::CurrentUserLoaded(_)
                | Action::Resize(_)
                | Action::Error(_)
                | Action::None
        )
    }
}

impl From<ChirpError> for Action {
    fn from(err: ChirpError) -> Self {
        Action::Error(err.to_string())
    }
}
