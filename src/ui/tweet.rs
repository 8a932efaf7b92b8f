use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::types::Tweet;

use super::format_age;

pub fn render(frame: &mut Frame, tweet: &Tweet, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                &tweet.user.name,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("@{}", tweet.user.username),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(""),
    ];

    lines.extend(tweet.body.lines().map(Line::from));
    lines.push(Line::from(""));

    let age = match format_age(tweet.created_at).as_str() {
        "now" => "just now".to_string(),
        age => format!("{} ago", age),
    };
    lines.push(Line::from(Span::styled(
        format!("{} · {}", tweet.created_at.format("%H:%M · %d %b %Y"), age),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let count = |n: u64, label: &'static str| {
        vec![
            Span::styled(n.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}   ", label), Style::default().fg(Color::Gray)),
        ]
    };
    let mut engagement = count(tweet.replies_count, "Replies");
    engagement.extend(count(tweet.retweets_count, "Retweets"));
    engagement.extend(count(tweet.likes_count, "Likes"));
    lines.push(Line::from(engagement));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Tweet "))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
