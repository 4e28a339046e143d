use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use crate::api::{SummarizeError, SummaryClient, SummaryOutcome, SummaryTask};
use crate::config::AppConfig;
use crate::lesson::{self, LessonError};
use crate::summary::{export, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Editor,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Alert,   // Blocking notification, dismissed with Enter/Esc
    Confirm, // y/n question, message in status_message
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    // Editor state (the input field)
    pub lesson_text: String,

    // Display surface
    pub summary: Summary,
    pub summary_scroll: usize,

    // In-flight request; None means the trigger is armed
    pub pending: Option<SummaryTask>,

    // Blocking notification content
    pub alert_message: String,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Info line content when nothing else claims it
    pub info_message: Option<String>,

    pub config: AppConfig,
    client: SummaryClient,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = SummaryClient::new(config.server_url.clone())?;

        Ok(Self {
            section: Section::Editor,
            popup: Popup::None,

            lesson_text: String::new(),

            summary: Summary::default(),
            summary_scroll: 0,

            pending: None,

            alert_message: String::new(),

            status_message: None,
            status_message_time: None,
            info_message: None,

            config,
            client,
        })
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Raise a blocking notification; dismissed with Enter/Esc
    fn alert(&mut self, msg: impl Into<String>) {
        self.alert_message = msg.into();
        self.popup = Popup::Alert;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        // Keys that work from either section
        match key.code {
            KeyCode::F(2) => {
                self.submit();
                return Ok(());
            }
            KeyCode::F(1) => {
                self.popup = Popup::Help;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Editor => Section::Summary,
                    Section::Summary => Section::Editor,
                };
                return Ok(());
            }
            _ => {}
        }

        match self.section {
            Section::Editor => self.handle_editor_key(key),
            Section::Summary => self.handle_summary_key(key),
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Alert => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.popup = Popup::None;
                    self.alert_message.clear();
                }
                Ok(())
            }
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc
                        | KeyCode::Char('?')
                        | KeyCode::Char('h')
                        | KeyCode::Enter
                        | KeyCode::Char('q')
                        | KeyCode::F(1)
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Confirm => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.clear_lesson();
                        self.popup = Popup::None;
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        self.popup = Popup::None;
                    }
                    _ => {}
                }
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                // Ctrl+G = generate (same as F2)
                KeyCode::Char('g') => self.submit(),
                // Ctrl+N = new lesson, after confirmation
                KeyCode::Char('n') => {
                    self.set_status("Start a new lesson? Clears editor and summary (y/n)");
                    self.popup = Popup::Confirm;
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.section = Section::Summary,
            KeyCode::Enter => self.lesson_text.push('\n'),
            KeyCode::Backspace => {
                self.lesson_text.pop();
            }
            KeyCode::Char(c) => self.lesson_text.push(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_summary_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_summary(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_summary(-1),
            KeyCode::PageDown => self.scroll_summary(10),
            KeyCode::PageUp => self.scroll_summary(-10),
            KeyCode::Char('g') => self.summary_scroll = 0,
            KeyCode::Char('G') => self.summary_scroll = self.max_scroll(),
            KeyCode::Char('o') | KeyCode::Enter => self.open_external(),
            KeyCode::Char('s') => self.save_summary(),
            KeyCode::Char('e') | KeyCode::Char('i') => self.section = Section::Editor,
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn max_scroll(&self) -> usize {
        self.summary.html().lines().count().saturating_sub(1)
    }

    fn scroll_summary(&mut self, delta: i32) {
        let max = self.max_scroll();
        self.summary_scroll = if delta < 0 {
            self.summary_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.summary_scroll.saturating_add(delta as usize).min(max)
        };
    }

    fn clear_lesson(&mut self) {
        self.lesson_text.clear();
        self.summary = Summary::default();
        self.summary_scroll = 0;
        self.section = Section::Editor;
        self.set_status("Cleared");
    }

    /// The generate trigger. Empty input never reaches the network; while a
    /// request is in flight further triggers are refused.
    pub fn submit(&mut self) {
        if self.pending.is_some() {
            self.set_status("Still generating, hang tight");
            return;
        }

        if let Err(e) = lesson::check_submittable(&self.lesson_text) {
            self.alert(e.to_string());
            return;
        }

        // Advisory only: the service re-validates, and its rejection flows
        // through the server-error path just like it did in the browser
        if let Err(warn) = lesson::preflight(&self.lesson_text) {
            self.set_status(format!("Warning: {}", warn));
        }

        self.summary = Summary::working();
        self.summary_scroll = 0;
        self.pending = Some(SummaryTask::spawn(
            self.client.clone(),
            self.lesson_text.clone(),
        ));
        tracing::info!(
            chars = self.lesson_text.chars().count(),
            server = self.client.server_url(),
            "summary requested"
        );
    }

    /// Open the current summary in the browser. Only valid after a
    /// non-error response; otherwise a blocking notification explains why.
    pub fn open_external(&mut self) {
        if !self.summary.openable() {
            self.alert("There is no valid summary to open.");
            return;
        }

        match export::save_html(&self.config.resolve_export_dir(), self.summary.html()) {
            Ok(path) => match export::open_in_browser(&path) {
                Ok(()) => self.set_status(format!("Opened {}", path.display())),
                Err(e) => self.set_status(format!("Error: {}", e)),
            },
            Err(e) => self.set_status(format!("Error: {}", e)),
        }
    }

    /// Write the summary to the export location without opening a browser
    pub fn save_summary(&mut self) {
        if !self.summary.openable() {
            self.alert("There is no valid summary to save.");
            return;
        }

        match export::save_html(&self.config.resolve_export_dir(), self.summary.html()) {
            Ok(path) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => self.set_status(format!("Error: {}", e)),
        }
    }

    pub fn tick(&mut self) {
        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Poll the in-flight request
        let finished = self.pending.as_mut().and_then(|task| task.try_finish());
        if let Some(result) = finished {
            self.finish_request(result);
        }

        self.update_info_message();
    }

    /// Three-way outcome handling. The trigger re-arms at the single
    /// cleanup point below, success or not.
    fn finish_request(&mut self, result: Result<SummaryOutcome, SummarizeError>) {
        match result {
            Ok(SummaryOutcome::Success { html }) => {
                self.summary = Summary::fetched(html);
                self.section = Section::Summary;
                self.set_status("Summary ready. Press 'o' to open it in the browser");
                if self.config.notifications {
                    let _ = crate::notify("matome", "Summary ready");
                }
                tracing::info!("summary received");
                if self.config.auto_open {
                    self.open_external();
                }
            }
            Ok(SummaryOutcome::ServerError { status, html }) => {
                self.summary = Summary::server_error(html.clone());
                self.alert(format!("Error: {}", html));
                if self.config.notifications {
                    let _ = crate::notify("matome", "Summary failed");
                }
                tracing::warn!(%status, "service rejected the lesson");
            }
            Err(e) => {
                let message = e.to_string();
                self.summary = Summary::local_error(&message);
                self.alert(message.clone());
                if self.config.notifications {
                    let _ = crate::notify("matome", "Summary failed");
                }
                tracing::warn!("{}", message);
            }
        }

        self.pending = None;
        self.summary_scroll = 0;
    }

    /// Update the info line with editor stats when nothing else claims it
    fn update_info_message(&mut self) {
        let chars = self.lesson_text.chars().count();
        let mut parts = vec![format!("{} chars", chars)];

        match lesson::preflight(&self.lesson_text) {
            Err(LessonError::Empty) | Ok(()) => {}
            Err(warn) => parts.push(format!("⚠ {}", warn)),
        }

        parts.push(format!("󰖟 {}", self.client.server_url()));

        self.info_message = Some(parts.join(" │ "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryOrigin;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn test_app() -> App {
        App::new(AppConfig {
            // Port 1 on loopback, where nothing listens
            server_url: "http://127.0.0.1:1/".to_string(),
            notifications: false,
            auto_open: false,
            export_dir: None,
        })
        .unwrap()
    }

    #[test]
    fn empty_lesson_alerts_without_a_request() {
        let mut app = test_app();
        app.lesson_text = "   \n\t ".to_string();

        app.submit();

        assert_eq!(app.popup, Popup::Alert);
        assert_eq!(app.alert_message, "Please type your lesson first!");
        assert!(app.pending.is_none());
        assert!(app.summary.is_blank());
    }

    #[tokio::test]
    async fn in_flight_request_gates_further_triggers() {
        let mut app = test_app();
        app.lesson_text = "Photosynthesis basics".to_string();

        app.submit();
        assert_eq!(app.summary.origin(), SummaryOrigin::Working);
        assert!(app.pending.is_some());

        app.submit();
        assert!(app.status_message.as_deref().unwrap().contains("Still generating"));
        assert_eq!(app.summary.origin(), SummaryOrigin::Working);
    }

    #[tokio::test]
    async fn transport_failure_restores_the_trigger_and_alerts() {
        let mut app = test_app();
        app.lesson_text = "Photosynthesis basics".to_string();

        app.submit();
        for _ in 0..100 {
            app.tick();
            if app.pending.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(app.pending.is_none(), "trigger must re-arm");
        assert_eq!(app.summary.origin(), SummaryOrigin::LocalError);
        assert!(app.summary.html().contains("Failed to connect to the server"));
        assert_eq!(app.popup, Popup::Alert);
        assert!(app.alert_message.contains("Failed to connect to the server"));
    }

    #[test]
    fn success_enables_the_external_view() {
        let mut app = test_app();

        app.finish_request(Ok(SummaryOutcome::Success {
            html: "<h1>Summary</h1>".to_string(),
        }));

        assert_eq!(app.summary.html(), "<h1>Summary</h1>");
        assert!(app.summary.openable());
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.section, Section::Summary);
        assert!(app.pending.is_none());
    }

    #[test]
    fn server_errors_show_the_body_and_alert_with_it() {
        let mut app = test_app();

        app.finish_request(Ok(SummaryOutcome::ServerError {
            status: StatusCode::BAD_REQUEST,
            html: "<p>Validation Error</p>".to_string(),
        }));

        assert_eq!(app.summary.html(), "<p>Validation Error</p>");
        assert!(!app.summary.openable());
        assert_eq!(app.popup, Popup::Alert);
        assert!(app.alert_message.contains("<p>Validation Error</p>"));
    }

    #[test]
    fn external_view_requires_a_valid_summary() {
        let mut app = test_app();

        app.open_external();

        assert_eq!(app.popup, Popup::Alert);
        assert_eq!(app.alert_message, "There is no valid summary to open.");
    }
}
