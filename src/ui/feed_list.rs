use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::FeedScreen;
use crate::feed::FooterState;
use crate::types::Tweet;

use super::{format_age, truncate};

pub fn render(frame: &mut Frame, screen: &FeedScreen, title: &str, area: Rect) {
    let view = screen.feed.view();
    let feed_state = screen.feed.state();
    let block = Block::default().borders(Borders::ALL).title(format!(
        " {} ({}) - page {}/{} ",
        title,
        view.items.len(),
        feed_state.current_page(),
        feed_state.last_page()
    ));

    if view.items.is_empty() {
        let message = if view.is_initial_loading || view.is_refreshing {
            "Loading..."
        } else if view.error.is_some() {
            "Couldn't load this feed - press r to try again"
        } else {
            "Nothing here yet"
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;

    let mut items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, tweet)| tweet_item(tweet, i == screen.selected, w))
        .collect();

    match view.footer {
        FooterState::Loading => items.push(ListItem::new(Line::from(Span::styled(
            "  Loading more...",
            Style::default().fg(Color::Yellow),
        )))),
        FooterState::EndOfList => items.push(ListItem::new(Line::from(Span::styled(
            "  End of feed",
            Style::default().fg(Color::DarkGray),
        )))),
        FooterState::Idle => {}
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(screen.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn tweet_item(tweet: &Tweet, selected: bool, width: usize) -> ListItem<'static> {
    let name_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let body = tweet.body.lines().next().unwrap_or("");

    let header = Line::from(vec![
        Span::styled(truncate(&tweet.user.name, 24), name_style),
        Span::raw(" "),
        Span::styled(
            format!("@{}", tweet.user.username),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(format_age(tweet.created_at), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(
            format!("♥ {}", tweet.likes_count),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let text = Line::from(Span::raw(truncate(body, width.saturating_sub(2).max(10))));

    ListItem::new(vec![header, text])
}
