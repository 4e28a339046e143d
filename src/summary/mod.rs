//! The display surface: one summary at a time, superseded whole on every
//! request. The HTML is opaque; we render it as styled text and never
//! rewrite it.

pub mod export;

/// Where the currently displayed content came from. External view is only
/// valid after a non-error response, tracked here instead of sniffing the
/// markup for error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryOrigin {
    /// Nothing fetched yet
    #[default]
    Blank,
    /// Request in flight, placeholder on screen
    Working,
    /// 2xx body
    Fetched,
    /// Non-2xx body (the service's own error page)
    ServerError,
    /// Transport failure page built locally
    LocalError,
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    html: String,
    origin: SummaryOrigin,
}

impl Summary {
    /// Placeholder shown while the round-trip is in flight.
    pub fn working() -> Self {
        Self {
            html: "<p style=\"text-align: center; font-family: sans-serif;\">\
                   Please wait while the summary is being generated...</p>"
                .to_string(),
            origin: SummaryOrigin::Working,
        }
    }

    /// A 2xx body, verbatim.
    pub fn fetched(html: String) -> Self {
        Self {
            html,
            origin: SummaryOrigin::Fetched,
        }
    }

    /// A non-2xx body, verbatim. Displayed but never openable.
    pub fn server_error(html: String) -> Self {
        Self {
            html,
            origin: SummaryOrigin::ServerError,
        }
    }

    /// Locally built page for a transport failure.
    pub fn local_error(message: &str) -> Self {
        Self {
            html: format!(
                "<p style=\"color: red; text-align: center; font-family: sans-serif;\">{}</p>",
                message
            ),
            origin: SummaryOrigin::LocalError,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn origin(&self) -> SummaryOrigin {
        self.origin
    }

    pub fn is_blank(&self) -> bool {
        self.origin == SummaryOrigin::Blank
    }

    /// Whether the external-view action may run on this content.
    pub fn openable(&self) -> bool {
        self.origin == SummaryOrigin::Fetched && !self.html.is_empty()
    }

    /// Error pages (ours or the service's) get the danger tint when drawn.
    pub fn is_error(&self) -> bool {
        matches!(
            self.origin,
            SummaryOrigin::ServerError | SummaryOrigin::LocalError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fetched_content_is_openable() {
        assert!(Summary::fetched("<h1>Summary</h1>".into()).openable());
        assert!(!Summary::default().openable());
        assert!(!Summary::working().openable());
        assert!(!Summary::server_error("<p>boom</p>".into()).openable());
        assert!(!Summary::local_error("no route to host").openable());
        // An empty 2xx body is nothing worth opening either
        assert!(!Summary::fetched(String::new()).openable());
    }

    #[test]
    fn fetched_body_is_kept_verbatim() {
        let body = "<div><p>󰐊 Photosynthesis +  light</p></div>";
        assert_eq!(Summary::fetched(body.into()).html(), body);
        assert_eq!(Summary::server_error(body.into()).html(), body);
    }

    #[test]
    fn local_error_page_carries_the_message() {
        let summary = Summary::local_error("Failed to connect to the server: refused");
        assert!(summary
            .html()
            .contains("Failed to connect to the server: refused"));
        assert!(summary.is_error());
        assert_eq!(summary.origin(), SummaryOrigin::LocalError);
    }
}
