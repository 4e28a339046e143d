//! Reusable UI component helpers
//!
//! Shared pieces used by the main draw code: popup placement and the
//! tag-aware styling of summary HTML.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
};

/// Style one line of HTML: markup dimmed, text content in the given style.
/// The content is opaque and never rewritten, this only splits spans.
pub fn html_line<'a>(line: &'a str, text_style: Style, tag_style: Style) -> Line<'a> {
    let mut spans = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => match rest.find('>') {
                Some(end) => {
                    spans.push(Span::styled(&rest[..=end], tag_style));
                    rest = &rest[end + 1..];
                }
                None => {
                    // Unclosed tag, style the remainder as markup
                    spans.push(Span::styled(rest, tag_style));
                    break;
                }
            },
            Some(idx) => {
                spans.push(Span::styled(&rest[..idx], text_style));
                rest = &rest[idx..];
            }
            None => {
                spans.push(Span::styled(rest, text_style));
                break;
            }
        }
    }

    if spans.is_empty() {
        Line::from("")
    } else {
        Line::from(spans)
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn html_line_keeps_every_character() {
        let text = Style::default();
        let tag = Style::default();

        for input in [
            "<p>one idea per line</p>",
            "plain text without markup",
            "<div>",
            "broken <span class=\"x",
            "",
        ] {
            assert_eq!(plain(&html_line(input, text, tag)), input);
        }
    }

    #[test]
    fn html_line_splits_markup_from_content() {
        let text = Style::default();
        let tag = Style::default().fg(ratatui::style::Color::DarkGray);

        let line = html_line("<p>idea</p>", text, tag);
        let contents: Vec<_> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["<p>", "idea", "</p>"]);
        assert_eq!(line.spans[0].style, tag);
        assert_eq!(line.spans[1].style, text);
    }
}
