use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::{Action, Route};
use crate::api::Api;
use crate::config::Config;
use crate::event::Event;
use crate::feed::{is_near_end, Feed, FeedSource, FetchMode, FetchRequest, Intent, Outcome, Resolution};
use crate::types::{Tweet, User};

/// Identifies one mounted screen. Never reused, so results addressed to a
/// screen that has since been popped find nothing and are dropped.
pub type ScreenId = u64;

/// Rows a tweet takes in a list
pub const ITEM_ROWS: usize = 2;

// Header, status bar and list borders
const CHROME_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Global,
}

/// Account header shown above a profile feed
#[derive(Debug, Default)]
pub struct ProfileHeader {
    pub user: Option<User>,
    pub loading: bool,
    load_id: u64,
}

impl ProfileHeader {
    fn begin(&mut self) -> u64 {
        self.load_id += 1;
        self.loading = true;
        self.load_id
    }
}

/// A mounted list screen: one feed plus its selection
#[derive(Debug)]
pub struct FeedScreen {
    pub id: ScreenId,
    pub source: FeedSource,
    pub feed: Feed<Tweet>,
    pub selected: usize,
    pub header: Option<ProfileHeader>,
}

impl FeedScreen {
    fn new(id: ScreenId, source: FeedSource) -> Self {
        let header = match source {
            FeedSource::Profile(_) => Some(ProfileHeader::default()),
            FeedSource::Home | FeedSource::Global => None,
        };
        Self {
            id,
            source,
            feed: Feed::new(),
            selected: 0,
            header,
        }
    }

    pub fn selected_tweet(&self) -> Option<&Tweet> {
        self.feed.state().items().get(self.selected)
    }
}

/// Screens pushed on top of the tab bar
#[derive(Debug)]
pub enum Screen {
    Feed(FeedScreen),
    Tweet(Box<Tweet>),
}

/// Borrowed view of whatever is on top
pub enum Current<'a> {
    Feed(&'a FeedScreen),
    Tweet(&'a Tweet),
}

pub struct App {
    pub tab: Tab,
    pub home: FeedScreen,
    pub global: FeedScreen,
    pub stack: Vec<Screen>,
    pub me: Option<User>,
    pub error: Option<String>,
    pub should_quit: bool,
    pub viewport_rows: u16,
    next_screen_id: ScreenId,
    api: Arc<dyn Api>,
    config: Config,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(api: Arc<dyn Api>, config: Config, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            tab: Tab::default(),
            home: FeedScreen::new(1, FeedSource::Home),
            global: FeedScreen::new(2, FeedSource::Global),
            stack: Vec::new(),
            me: None,
            error: None,
            should_quit: false,
            viewport_rows: 24,
            next_screen_id: 3,
            api,
            config,
            action_tx,
        }
    }

    pub fn current(&self) -> Current<'_> {
        match self.stack.last() {
            Some(Screen::Feed(screen)) => Current::Feed(screen),
            Some(Screen::Tweet(tweet)) => Current::Tweet(tweet),
            None => match self.tab {
                Tab::Home => Current::Feed(&self.home),
                Tab::Global => Current::Feed(&self.global),
            },
        }
    }

    fn current_feed_mut(&mut self) -> Option<&mut FeedScreen> {
        match self.stack.last_mut() {
            Some(Screen::Feed(screen)) => Some(screen),
            Some(Screen::Tweet(_)) => None,
            None => match self.tab {
                Tab::Home => Some(&mut self.home),
                Tab::Global => Some(&mut self.global),
            },
        }
    }

    fn feed_screen_mut(&mut self, id: ScreenId) -> Option<&mut FeedScreen> {
        if self.home.id == id {
            return Some(&mut self.home);
        }
        if self.global.id == id {
            return Some(&mut self.global);
        }
        self.stack.iter_mut().find_map(|screen| match screen {
            Screen::Feed(feed) if feed.id == id => Some(feed),
            _ => None,
        })
    }

    /// How many tweets fit on screen
    pub fn visible_items(&self) -> usize {
        (usize::from(self.viewport_rows).saturating_sub(CHROME_ROWS) / ITEM_ROWS).max(1)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Action::ScrollDown,
                MouseEventKind::ScrollUp => Action::ScrollUp,
                _ => Action::None,
            },
            Event::Resize(_, rows) => Action::Resize(rows),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('Q') => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Tab | KeyCode::Char('l') => Action::NextTab,
            KeyCode::BackTab | KeyCode::Char('h') => Action::PrevTab,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('p') => Action::OpenAuthor,
            KeyCode::Char('m') => Action::OpenMyProfile,
            KeyCode::Char('o') => Action::OpenLink,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some() && action.is_user_input() {
            self.error = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                if self.stack.pop().is_none() {
                    self.should_quit = true;
                }
            }
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollDown => self.scroll_by(1),
            Action::PageUp => self.scroll_by(-(self.visible_items() as isize)),
            Action::PageDown => self.scroll_by(self.visible_items() as isize),
            Action::GoToTop => self.scroll_to(0),
            Action::GoToBottom => self.scroll_to(usize::MAX),
            Action::Select => {
                let target = self
                    .current_feed_mut()
                    .and_then(|screen| Some((screen.id, screen.selected_tweet()?.id)));
                if let Some((screen, tweet_id)) = target {
                    self.dispatch(screen, Intent::ItemSelected(tweet_id));
                }
            }
            Action::NextTab | Action::PrevTab => {
                if self.stack.is_empty() {
                    let route = match self.tab {
                        Tab::Home => Route::Global,
                        Tab::Global => Route::Home,
                    };
                    self.navigate(route);
                }
            }

            Action::Refresh => {
                if let Some(screen) = self.current_feed_mut().map(|s| s.id) {
                    if self.dispatch(screen, Intent::PullToRefresh) {
                        self.reload_header(screen);
                    }
                }
            }

            Action::Navigate(route) => self.navigate(route),
            Action::OpenAuthor => {
                let author = match self.current() {
                    Current::Feed(screen) => screen
                        .selected_tweet()
                        .map(|t| t.user.id)
                        .filter(|id| screen.source != FeedSource::Profile(*id)),
                    Current::Tweet(tweet) => Some(tweet.user.id),
                };
                if let Some(user_id) = author {
                    self.navigate(Route::Profile(user_id));
                }
            }
            Action::OpenMyProfile => match self.me.as_ref().map(|me| me.id) {
                Some(user_id) => self.navigate(Route::Profile(user_id)),
                None => self.error = Some("Account not loaded yet".to_string()),
            },
            Action::OpenLink => {
                let link = match self.current() {
                    Current::Feed(screen) => screen
                        .header
                        .as_ref()
                        .and_then(|h| h.user.as_ref())
                        .and_then(|u| u.link.clone()),
                    Current::Tweet(tweet) => tweet.user.link.clone(),
                };
                if let Some(url) = link {
                    if let Err(e) = open::that(&url) {
                        self.error = Some(format!("Could not open {}: {}", url, e));
                    }
                }
            }

            Action::Resize(rows) => {
                self.viewport_rows = rows;
            }

            Action::PageLoaded {
                screen,
                seq,
                result,
            } => {
                let Some(feed_screen) = self.feed_screen_mut(screen) else {
                    debug!(screen, seq, "page for unmounted screen dropped");
                    return;
                };
                match feed_screen.feed.resolve(seq, result) {
                    Resolution::Applied { mode, added } => {
                        debug!(screen, ?mode, added, "page merged");
                        if mode.replaces() {
                            feed_screen.selected = 0;
                        }
                        self.check_near_end(screen);
                    }
                    Resolution::Failed { mode, message } => {
                        self.error = Some(match mode {
                            FetchMode::LoadMore => format!("Couldn't load more: {}", message),
                            FetchMode::Initial | FetchMode::Refresh => message,
                        });
                    }
                    Resolution::Stale => {}
                }
            }
            Action::ProfileLoaded {
                screen,
                load_id,
                result,
            } => {
                let Some(header) = self
                    .feed_screen_mut(screen)
                    .and_then(|s| s.header.as_mut())
                    .filter(|h| h.load_id == load_id)
                else {
                    debug!(screen, load_id, "stale profile header dropped");
                    return;
                };
                header.loading = false;
                match result {
                    Ok(user) => header.user = Some(user),
                    Err(e) => {
                        tracing::warn!(screen, error = %e, "profile header fetch failed");
                        self.error = Some(e.to_string());
                    }
                }
            }
            Action::CurrentUserLoaded(user) => {
                self.me = Some(user);
            }

            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    /// Push or switch to a screen. Feed screens are mounted on arrival.
    pub fn navigate(&mut self, route: Route) {
        match route {
            Route::Home | Route::Global => {
                self.stack.clear();
                self.tab = if route == Route::Home {
                    Tab::Home
                } else {
                    Tab::Global
                };
                let screen = match self.tab {
                    Tab::Home => self.home.id,
                    Tab::Global => self.global.id,
                };
                self.mount(screen);
            }
            Route::Profile(user_id) => {
                let id = self.next_screen_id;
                self.next_screen_id += 1;
                self.stack
                    .push(Screen::Feed(FeedScreen::new(id, FeedSource::Profile(user_id))));
                self.mount(id);
            }
            Route::Tweet(tweet) => {
                self.stack.push(Screen::Tweet(tweet));
            }
        }
    }

    fn mount(&mut self, screen: ScreenId) {
        let Some(feed_screen) = self.feed_screen_mut(screen) else {
            return;
        };
        let source = feed_screen.source;
        if let Some(request) = feed_screen.feed.mount() {
            self.spawn_fetch(screen, source, request);
            self.reload_header(screen);
        }
    }

    /// Route an intent into a screen's feed and carry out the outcome.
    /// Returns whether a page fetch went out.
    fn dispatch(&mut self, screen: ScreenId, intent: Intent<u64>) -> bool {
        let Some(feed_screen) = self.feed_screen_mut(screen) else {
            return false;
        };
        let source = feed_screen.source;
        match feed_screen.feed.handle(intent) {
            Outcome::Fetch(request) => {
                self.spawn_fetch(screen, source, request);
                return true;
            }
            Outcome::Open(tweet_id) => {
                let tweet = feed_screen
                    .feed
                    .state()
                    .items()
                    .iter()
                    .find(|t| t.id == tweet_id)
                    .cloned();
                if let Some(tweet) = tweet {
                    self.navigate(Route::Tweet(Box::new(tweet)));
                }
            }
            Outcome::Nothing => {}
        }
        false
    }

    fn scroll_by(&mut self, delta: isize) {
        if let Some(selected) = self.current_feed_mut().map(|s| s.selected) {
            self.scroll_to(selected.saturating_add_signed(delta));
        }
    }

    fn scroll_to(&mut self, target: usize) {
        let Some(screen) = self.current_feed_mut() else {
            return;
        };
        let len = screen.feed.state().items().len();
        if len == 0 {
            return;
        }
        screen.selected = target.min(len - 1);
        let id = screen.id;
        self.check_near_end(id);
    }

    /// Ask for the next page when the selection is close enough to the end.
    /// Also runs after a page lands, so short pages keep filling the screen.
    fn check_near_end(&mut self, screen: ScreenId) {
        let visible = self.visible_items();
        let threshold = self.config.scroll.threshold;
        let Some(feed_screen) = self.feed_screen_mut(screen) else {
            return;
        };
        let len = feed_screen.feed.state().items().len();
        if is_near_end(feed_screen.selected, len, visible, threshold) {
            self.dispatch(screen, Intent::ScrollNearEnd);
        }
    }

    fn reload_header(&mut self, screen: ScreenId) {
        let Some(feed_screen) = self.feed_screen_mut(screen) else {
            return;
        };
        let FeedSource::Profile(user_id) = feed_screen.source else {
            return;
        };
        if let Some(load_id) = feed_screen.header.as_mut().map(ProfileHeader::begin) {
            self.spawn_load_profile(screen, user_id, load_id);
        }
    }

    fn spawn_fetch(&self, screen: ScreenId, source: FeedSource, request: FetchRequest) {
        let tx = self.action_tx.clone();
        let api = Arc::clone(&self.api);
        let resource = source.resource(&self.config.feeds);
        let delay = match request.mode {
            FetchMode::LoadMore => Duration::from_millis(self.config.scroll.fetch_delay_ms),
            FetchMode::Initial | FetchMode::Refresh => Duration::ZERO,
        };
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = api.fetch_page(&resource, request.page).await;
            tx.send(Action::PageLoaded {
                screen,
                seq: request.seq,
                result,
            })
            .ok();
        });
    }

    fn spawn_load_profile(&self, screen: ScreenId, user_id: u64, load_id: u64) {
        let tx = self.action_tx.clone();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let result = api.fetch_user(user_id).await;
            tx.send(Action::ProfileLoaded {
                screen,
                load_id,
                result,
            })
            .ok();
        });
    }

    /// Look up who the token belongs to, for the "my profile" shortcut
    pub fn spawn_load_current_user(&self) {
        let tx = self.action_tx.clone();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            match api.fetch_current_user().await {
                Ok(user) => {
                    tx.send(Action::CurrentUserLoaded(user)).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not load current user");
                    tx.send(e.into()).ok();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Notify;

    use crate::error::{ChirpError, Result};
    use crate::types::Page;

    const PAGE_SIZE: u64 = 20;
    const LAST_PAGE: u32 = 3;

    fn user(id: u64) -> User {
        User {
            id,
            name: format!("User {}", id),
            username: format!("user{}", id),
            avatar: None,
            profile: None,
            location: None,
            link: None,
            link_text: None,
            created_at: None,
        }
    }

    /// Serves `LAST_PAGE` pages of 20 tweets for any resource. Tweet ids are
    /// `page * 100 + n`. Page 2 can be held back until released.
    #[derive(Debug, Default)]
    struct ScriptedApi {
        calls: Mutex<Vec<(String, u32)>>,
        fetches: AtomicUsize,
        hold_page_two: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl Api for ScriptedApi {
        async fn fetch_page(&self, resource: &str, page: u32) -> Result<Page<Tweet>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push((resource.to_string(), page));
            if page == 2 {
                if let Some(gate) = &self.hold_page_two {
                    gate.notified().await;
                }
            }
            if page > LAST_PAGE {
                return Err(ChirpError::Transport("404 Not Found".into()));
            }
            let data = (0..PAGE_SIZE)
                .map(|n| Tweet {
                    id: u64::from(page) * 100 + n,
                    body: format!("tweet {} on page {}", n, page),
                    user: user(5),
                    created_at: Utc::now(),
                    replies_count: 0,
                    retweets_count: 0,
                    likes_count: 0,
                })
                .collect();
            Ok(Page {
                data,
                next_page_url: (page < LAST_PAGE).then(|| format!("{}?page={}", resource, page + 1)),
                last_page: Some(LAST_PAGE),
            })
        }

        async fn fetch_user(&self, user_id: u64) -> Result<User> {
            Ok(user(user_id))
        }

        async fn fetch_current_user(&self) -> Result<User> {
            Ok(user(1))
        }
    }

    fn setup(api: ScriptedApi) -> (App, Arc<ScriptedApi>, mpsc::UnboundedReceiver<Action>) {
        let api = Arc::new(api);
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(api.clone(), Config::default(), tx);
        (app, api, rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>, n: usize) {
        for _ in 0..n {
            let action = rx.recv().await.expect("channel closed");
            app.update(action);
        }
    }

    fn ids(screen: &FeedScreen) -> Vec<u64> {
        screen.feed.state().items().iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn home_mounts_and_pages() {
        let (mut app, api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        assert_eq!(app.home.feed.state().items().len(), 20);
        assert!(!app.home.feed.state().is_initial_loading());

        app.update(Action::GoToBottom);
        pump(&mut app, &mut rx, 1).await;
        assert_eq!(app.home.feed.state().items().len(), 40);
        assert_eq!(app.home.feed.state().current_page(), 2);

        let calls = api.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("/tweets".to_string(), 1), ("/tweets".to_string(), 2)]);
    }

    #[tokio::test]
    async fn scrolling_past_the_end_stops_requesting() {
        let (mut app, api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        for _ in 0..2 {
            app.update(Action::GoToBottom);
            pump(&mut app, &mut rx, 1).await;
        }
        assert!(app.home.feed.state().reached_end());
        assert_eq!(app.home.feed.state().items().len(), 60);

        for _ in 0..5 {
            app.update(Action::GoToBottom);
            app.update(Action::ScrollDown);
        }
        assert_eq!(api.fetches.load(Ordering::SeqCst), 3);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_beats_slow_load_more() {
        let gate = Arc::new(Notify::new());
        let (mut app, _api, mut rx) = setup(ScriptedApi {
            hold_page_two: Some(gate.clone()),
            ..ScriptedApi::default()
        });
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        app.update(Action::GoToBottom);
        assert!(app.home.feed.state().is_loading_more());
        app.update(Action::Refresh);
        assert!(app.home.feed.state().is_refreshing());

        // Refresh response lands first
        pump(&mut app, &mut rx, 1).await;
        assert!(!app.home.feed.state().is_refreshing());
        assert_eq!(ids(&app.home), (100..120).collect::<Vec<_>>());

        // Then the superseded page 2 shows up
        gate.notify_one();
        pump(&mut app, &mut rx, 1).await;
        assert_eq!(ids(&app.home), (100..120).collect::<Vec<_>>());
        assert_eq!(app.home.feed.state().current_page(), 1);
        assert!(!app.home.feed.state().is_loading_more());
    }

    #[tokio::test]
    async fn profile_loads_header_and_feed() {
        let (mut app, api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        app.update(Action::OpenAuthor);
        assert_eq!(app.stack.len(), 1);
        pump(&mut app, &mut rx, 2).await;

        let Current::Feed(profile) = app.current() else {
            panic!("expected profile feed on top");
        };
        assert_eq!(profile.source, FeedSource::Profile(5));
        assert_eq!(profile.feed.state().items().len(), 20);
        let header = profile.header.as_ref().unwrap();
        assert!(!header.loading);
        assert_eq!(header.user.as_ref().map(|u| u.id), Some(5));
        assert!(api
            .calls
            .lock()
            .unwrap()
            .contains(&("/users/5/tweets".to_string(), 1)));

        // Already on this author's profile: no duplicate push
        app.update(Action::OpenAuthor);
        assert_eq!(app.stack.len(), 1);
    }

    #[tokio::test]
    async fn repeated_refresh_reloads_header_once() {
        let (mut app, _api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Profile(7));
        pump(&mut app, &mut rx, 2).await;

        for _ in 0..3 {
            app.update(Action::Refresh);
        }
        let Current::Feed(profile) = app.current() else {
            panic!("expected profile feed on top");
        };
        assert!(profile.feed.state().is_refreshing());
        // One load for the mount, one for the refresh that went out
        assert_eq!(profile.header.as_ref().map(|h| h.load_id), Some(2));

        pump(&mut app, &mut rx, 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn results_for_popped_screen_are_dropped() {
        let (mut app, _api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        app.navigate(Route::Profile(9));
        app.update(Action::Back);
        assert!(app.stack.is_empty());

        pump(&mut app, &mut rx, 2).await;
        assert_eq!(app.home.feed.state().items().len(), 20);
        assert!(app.error.is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn select_opens_tweet_and_back_returns() {
        let (mut app, _api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        app.update(Action::ScrollDown);
        app.update(Action::Select);
        match app.current() {
            Current::Tweet(tweet) => assert_eq!(tweet.id, 101),
            Current::Feed(_) => panic!("expected tweet screen"),
        }

        app.update(Action::Back);
        assert!(matches!(app.current(), Current::Feed(_)));
        assert_eq!(app.home.selected, 1);

        app.update(Action::Back);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn tabs_mount_lazily_and_keep_state() {
        let (mut app, api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Home);
        pump(&mut app, &mut rx, 1).await;

        app.update(Action::NextTab);
        assert_eq!(app.tab, Tab::Global);
        pump(&mut app, &mut rx, 1).await;
        assert_eq!(app.global.feed.state().items().len(), 20);

        // Coming back to Home doesn't refetch
        app.update(Action::PrevTab);
        assert_eq!(app.tab, Tab::Home);
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_error_and_keeps_items() {
        let (mut app, _api, mut rx) = setup(ScriptedApi::default());
        app.navigate(Route::Profile(3));
        pump(&mut app, &mut rx, 2).await;

        let Some(Screen::Feed(profile)) = app.stack.last_mut() else {
            panic!("expected profile");
        };
        let request = profile.feed.refresh().unwrap();
        let id = profile.id;
        app.update(Action::PageLoaded {
            screen: id,
            seq: request.seq,
            result: Err(ChirpError::Transport("502 Bad Gateway".into())),
        });
        assert!(app.error.as_deref().unwrap().contains("502"));

        // Next keypress clears it; data from before is intact
        app.update(Action::ScrollDown);
        assert!(app.error.is_none());
        let Current::Feed(profile) = app.current() else {
            panic!("expected profile");
        };
        assert_eq!(profile.feed.state().items().len(), 20);
        assert!(!profile.feed.state().is_refreshing());
    }

    #[tokio::test]
    async fn my_profile_needs_current_user() {
        let (mut app, _api, mut rx) = setup(ScriptedApi::default());
        app.update(Action::OpenMyProfile);
        assert!(app.error.is_some());
        assert!(app.stack.is_empty());

        app.spawn_load_current_user();
        pump(&mut app, &mut rx, 1).await;
        app.update(Action::OpenMyProfile);
        assert_eq!(app.stack.len(), 1);
    }

    #[test]
    fn keys_map_to_actions() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(ScriptedApi::default()), Config::default(), tx);
        let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));

        assert!(matches!(app.handle_event(key(KeyCode::Char('r'))), Action::Refresh));
        assert!(matches!(app.handle_event(key(KeyCode::Char('j'))), Action::ScrollDown));
        assert!(matches!(app.handle_event(key(KeyCode::Enter)), Action::Select));
        assert!(matches!(app.handle_event(key(KeyCode::Esc)), Action::Back));
        assert!(matches!(
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))),
            Action::PageDown
        ));
        assert!(matches!(app.handle_event(Event::Resize(80, 40)), Action::Resize(40)));
    }

    #[test]
    fn visible_items_accounts_for_chrome() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(ScriptedApi::default()), Config::default(), tx);
        app.viewport_rows = 24;
        assert_eq!(app.visible_items(), 10);
        app.viewport_rows = 3;
        assert_eq!(app.visible_items(), 1);
    }
}
