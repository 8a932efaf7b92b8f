use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{FeedScreen, ProfileHeader};
use crate::types::User;

use super::feed_list;

const HEADER_ROWS: u16 = 7;

pub fn render(frame: &mut Frame, screen: &FeedScreen, header: &ProfileHeader, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_ROWS), Constraint::Min(0)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title(" Profile ");
    match &header.user {
        Some(user) => {
            let card = Paragraph::new(profile_lines(user))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(card, chunks[0]);
        }
        None => {
            let message = if header.loading {
                "Loading profile..."
            } else {
                "Profile unavailable"
            };
            let empty = Paragraph::new(message)
                .block(block)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(empty, chunks[0]);
        }
    }

    feed_list::render(frame, screen, "Tweets", chunks[1]);
}

fn profile_lines(user: &User) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(&user.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(format!("@{}", user.username), Style::default().fg(Color::Gray)),
    ])];

    if let Some(bio) = &user.profile {
        lines.push(Line::from(bio.as_str()));
    }

    let mut meta = Vec::new();
    if let Some(location) = &user.location {
        meta.push(Span::styled(
            format!("⌖ {}", location),
            Style::default().fg(Color::Gray),
        ));
        meta.push(Span::raw("  "));
    }
    if let Some(link) = &user.link {
        let text = user.link_text.as_deref().unwrap_or(link.as_str());
        meta.push(Span::styled(
            format!("🔗 {}", text),
            Style::default().fg(Color::Blue),
        ));
        meta.push(Span::raw("  "));
    }
    if let Some(joined) = user.created_at {
        meta.push(Span::styled(
            format!("Joined {}", joined.format("%b %Y")),
            Style::default().fg(Color::Gray),
        ));
    }
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }

    lines
}
