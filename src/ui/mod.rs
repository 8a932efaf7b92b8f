mod feed_list;
mod profile;
mod tweet;

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Current, Tab};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.current() {
        Current::Feed(screen) => match &screen.header {
            Some(header) => profile::render(frame, screen, header, chunks[1]),
            None => feed_list::render(frame, screen, &screen.source.to_string(), chunks[1]),
        },
        Current::Tweet(tweet) => tweet::render(frame, tweet, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled("chirp", title_style), Span::raw(" - ")];
    match app.current() {
        Current::Feed(screen) if screen.header.is_none() => {
            for (tab, label) in [(Tab::Home, " Home "), (Tab::Global, " Global ")] {
                let style = if app.tab == tab {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                spans.push(Span::styled(label, style));
            }
        }
        Current::Feed(screen) => {
            let handle = screen
                .header
                .as_ref()
                .and_then(|h| h.user.as_ref())
                .map(|u| format!("@{}", u.username))
                .unwrap_or_else(|| "Profile".to_string());
            spans.push(Span::styled(handle, title_style));
        }
        Current::Tweet(tweet) => {
            spans.push(Span::styled(
                format!("Tweet by @{}", tweet.user.username),
                title_style,
            ));
        }
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let busy = match app.current() {
        Current::Feed(screen) => {
            let view = screen.feed.view();
            if view.is_refreshing {
                Some("Refreshing...")
            } else if view.is_initial_loading {
                Some("Loading...")
            } else {
                None
            }
        }
        Current::Tweet(_) => None,
    };

    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {} (r: retry)", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(msg) = busy {
        Line::from(vec![Span::styled(msg, Style::default().fg(Color::Yellow))])
    } else {
        let help = match app.current() {
            Current::Feed(screen) if screen.header.is_some() => {
                "j/k/g/G: nav | Enter: open | r: refresh | p: author | o: link | q: back"
            }
            Current::Feed(_) => {
                "h/l: tabs | j/k/g/G: nav | Ctrl+d/u: page | Enter: open | r: refresh | p: author | m: me | q: quit"
            }
            Current::Tweet(_) => "p: author | o: author link | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Compact relative age: `now`, `5m`, `3h`, `2d`
pub fn format_age(dt: DateTime<Utc>) -> String {
    format_age_at(dt, Utc::now())
}

fn format_age_at(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        "now".to_string()
    }
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
