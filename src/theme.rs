//! Theme colors for the UI
//! Optional overrides are read from ~/.config/matome/theme.toml

use ratatui::style::Color;
use serde::Deserialize;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,        // Active borders, highlights
    pub accent_bright: Color, // Brighter accent for emphasis
    pub danger: Color,        // Errors
    pub success: Color,       // Success indicators
    pub warning: Color,       // Warnings, status feedback
    pub text: Color,          // Primary text
    pub text_dim: Color,      // Dimmed text, HTML tags
    pub bg_selected: Color,   // Selection background
    pub inactive: Color,      // Inactive borders
    pub header: Color,        // Header text
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired defaults when no theme file exists
        Self {
            accent: Color::Rgb(250, 179, 135),
            accent_bright: Color::Rgb(245, 194, 231),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

/// User overrides, all optional, hex strings like "#FFC107"
#[derive(Debug, Default, Deserialize)]
struct ThemeFile {
    accent: Option<String>,
    accent_bright: Option<String>,
    danger: Option<String>,
    success: Option<String>,
    warning: Option<String>,
    text: Option<String>,
    text_dim: Option<String>,
    bg_selected: Option<String>,
    inactive: Option<String>,
    header: Option<String>,
}

impl Theme {
    /// Load the user theme, falling back to defaults
    pub fn load() -> Self {
        if let Some(theme) = Self::load_user_theme() {
            return theme;
        }

        Self::default()
    }

    fn load_user_theme() -> Option<Self> {
        let path = dirs::config_dir()?.join("matome/theme.toml");
        let content = std::fs::read_to_string(&path).ok()?;

        let file: ThemeFile = match toml::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Failed to parse theme file: {}", e);
                return None;
            }
        };

        let mut theme = Self::default();
        apply(&mut theme.accent, file.accent.as_deref());
        apply(&mut theme.accent_bright, file.accent_bright.as_deref());
        apply(&mut theme.danger, file.danger.as_deref());
        apply(&mut theme.success, file.success.as_deref());
        apply(&mut theme.warning, file.warning.as_deref());
        apply(&mut theme.text, file.text.as_deref());
        apply(&mut theme.text_dim, file.text_dim.as_deref());
        apply(&mut theme.bg_selected, file.bg_selected.as_deref());
        apply(&mut theme.inactive, file.inactive.as_deref());
        apply(&mut theme.header, file.header.as_deref());

        Some(theme)
    }
}

fn apply(slot: &mut Color, value: Option<&str>) {
    if let Some(color) = value.and_then(parse_hex_color) {
        *slot = color;
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}
