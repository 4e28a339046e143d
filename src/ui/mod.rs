mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::OnceLock;

use crate::app::{App, Popup, Section};
use crate::theme::Theme;
use components::{centered_rect, html_line};

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn accent_bright() -> Color { theme().accent_bright }
fn danger() -> Color { theme().danger }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Responsive layout based on terminal height
    let (editor_height, summary_height) = if area.height < 25 {
        // Small terminal - use minimum heights
        (Constraint::Min(4), Constraint::Min(4))
    } else {
        (Constraint::Ratio(2, 5), Constraint::Ratio(3, 5))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info line
            editor_height,         // Lesson editor
            summary_height,        // Summary pane
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_editor_box(f, app, chunks[1]);
    draw_summary_box(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Alert => draw_alert_popup(f, app),
        Popup::Confirm => draw_confirm_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: in-flight request > status message > editor info > ready
    let line = if let Some(ref task) = app.pending {
        let secs = task.elapsed().as_secs();
        Line::from(vec![
            Span::styled("󰔟 ", Style::default().fg(accent_bright())),
            Span::styled(
                format!("{}s", secs),
                Style::default().fg(accent_bright()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled("Generating summary...", Style::default().fg(text())),
        ])
    } else if let Some(ref status) = app.status_message {
        Line::from(vec![Span::styled(status, Style::default().fg(warning()))])
    } else if let Some(ref info) = app.info_message {
        Line::from(vec![Span::styled(info, Style::default().fg(text_dim()))])
    } else {
        Line::from(vec![Span::styled("Ready", Style::default().fg(text_dim()))])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_editor_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Editor && app.popup == Popup::None;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(" Lesson ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.lesson_text.is_empty() && !is_active {
        let hint = Paragraph::new("Type or paste your lesson, then press F2")
            .style(Style::default().fg(text_dim()))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let mut lines: Vec<Line> = app
        .lesson_text
        .lines()
        .map(|l| Line::styled(l, Style::default().fg(text())))
        .collect();
    if app.lesson_text.is_empty() || app.lesson_text.ends_with('\n') {
        lines.push(Line::from(""));
    }

    // Block cursor on the last line while editing
    if is_active {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("█", Style::default().fg(accent())));
        }
    }

    // Keep the cursor in view: show the tail that fits
    let inner_height = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(inner_height.max(1));
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();

    let editor = Paragraph::new(visible)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(editor, area);
}

fn draw_summary_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Summary && app.popup == Popup::None;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let mut title = vec![Span::styled(" Summary ", title_style)];
    if app.summary.openable() {
        title.push(Span::styled("● ", Style::default().fg(success())));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.summary.is_blank() {
        let hint = Paragraph::new("No summary yet")
            .style(Style::default().fg(text_dim()))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    // Error pages (local or from the service) get the danger tint
    let text_style = if app.summary.is_error() {
        Style::default().fg(danger())
    } else {
        Style::default().fg(text())
    };
    let tag_style = Style::default().fg(text_dim());

    // Get the visible lines based on scroll offset
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines: Vec<&str> = app.summary.html().lines().collect();
    let start = app.summary_scroll.min(lines.len().saturating_sub(1));
    let end = (start + inner_height).min(lines.len());

    let visible_lines: Vec<Line> = lines[start..end]
        .iter()
        .map(|line| html_line(line, text_style, tag_style))
        .collect();

    let content = Paragraph::new(visible_lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(content, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Editor => vec![
            ("F2", "Generate"),
            ("Tab", "Summary"),
            ("Ctrl+N", "New"),
            ("F1", "Help"),
            ("Ctrl+C", "Quit"),
        ],
        Section::Summary => vec![
            ("j/k", "Scroll"),
            ("o", "Open"),
            ("s", "Save"),
            ("e", "Edit"),
            ("F2", "Generate"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 {
        4
    } else if area.width < 80 {
        5
    } else {
        hints.len()
    };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_alert_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 60 },
        if area.height < 30 { 60 } else { 40 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Alert ", Style::default().fg(danger())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(danger()));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(popup_area);

    let message = Paragraph::new(app.alert_message.as_str())
        .style(Style::default().fg(text()))
        .wrap(Wrap { trim: false });
    f.render_widget(message, inner[0]);

    let button = Paragraph::new(Line::from(vec![
        Span::styled("[ ", Style::default().fg(text_dim())),
        Span::styled("Enter = OK", Style::default().fg(text()).add_modifier(Modifier::BOLD)),
        Span::styled(" ]", Style::default().fg(text_dim())),
    ]))
    .style(Style::default().bg(bg_selected()))
    .alignment(Alignment::Center);
    f.render_widget(button, inner[1]);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = app.status_message.as_deref().unwrap_or("Confirm?");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: false });

    f.render_widget(confirm, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Editor ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  F2/Ctrl+G ", Style::default().fg(accent())),
            Span::raw("Generate the summary"),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+N    ", Style::default().fg(accent())),
            Span::raw("New lesson (clears editor and summary)"),
        ]),
        Line::from(vec![
            Span::styled("  Tab/Esc   ", Style::default().fg(accent())),
            Span::raw("Switch to the summary pane"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Summary ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  j/k ↑/↓   ", Style::default().fg(accent())),
            Span::raw("Scroll"),
        ]),
        Line::from(vec![
            Span::styled("  o/Enter   ", Style::default().fg(accent())),
            Span::raw("Open the summary in the browser"),
        ]),
        Line::from(vec![
            Span::styled("  s         ", Style::default().fg(accent())),
            Span::raw("Save the summary HTML without opening it"),
        ]),
        Line::from(vec![
            Span::styled("  e/i       ", Style::default().fg(accent())),
            Span::raw("Back to the editor"),
        ]),
        Line::from(vec![
            Span::styled("  q         ", Style::default().fg(accent())),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Quick Start ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  matome                      ", Style::default().fg(accent())),
            Span::raw("Launch this TUI"),
        ]),
        Line::from(vec![
            Span::styled("  matome --file lesson.txt    ", Style::default().fg(accent())),
            Span::raw("Summarize a file, HTML on stdout"),
        ]),
        Line::from(vec![
            Span::styled("  matome --server <url>       ", Style::default().fg(accent())),
            Span::raw("Use a different summarizer service"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("F1", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 matome Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}
