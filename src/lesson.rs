//! Lesson text rules
//!
//! Only an empty lesson blocks submission; the length and character checks
//! mirror what the service enforces and are advisory in the TUI (the server
//! stays the authority) but fail fast in `--file` mode.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Service-side minimum, counted after trimming
pub const MIN_LESSON_CHARS: usize = 10;
/// Service-side maximum, counted on the raw text
pub const MAX_LESSON_CHARS: usize = 16_000;

/// Anything outside unicode word chars, whitespace and common punctuation
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s.,!?;:@#$%^&*()\-+=\\/\[\]{}|<>]").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LessonError {
    #[error("Please type your lesson first!")]
    Empty,
    #[error("Input too short")]
    TooShort,
    #[error("Input too long")]
    TooLong,
    #[error("Invalid characters detected")]
    InvalidChars,
}

/// The blocking check: an empty (or whitespace-only) lesson never reaches
/// the network.
pub fn check_submittable(text: &str) -> Result<(), LessonError> {
    if text.trim().is_empty() {
        Err(LessonError::Empty)
    } else {
        Ok(())
    }
}

/// Advisory pre-flight mirroring the service's own validation.
pub fn preflight(text: &str) -> Result<(), LessonError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LessonError::Empty);
    }
    if trimmed.chars().count() < MIN_LESSON_CHARS {
        return Err(LessonError::TooShort);
    }
    if text.chars().count() > MAX_LESSON_CHARS {
        return Err(LessonError::TooLong);
    }
    if DISALLOWED.is_match(text) {
        return Err(LessonError::InvalidChars);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_block_submission() {
        assert_eq!(check_submittable(""), Err(LessonError::Empty));
        assert_eq!(check_submittable("  \n\t "), Err(LessonError::Empty));
        assert!(check_submittable("Photosynthesis basics").is_ok());
    }

    #[test]
    fn short_lessons_still_submit_but_warn() {
        assert!(check_submittable("short").is_ok());
        assert_eq!(preflight("short"), Err(LessonError::TooShort));
    }

    #[test]
    fn preflight_length_limits() {
        assert!(preflight("Photosynthesis basics").is_ok());

        let long = "a".repeat(MAX_LESSON_CHARS + 1);
        assert_eq!(preflight(&long), Err(LessonError::TooLong));

        // Exactly at the limit is fine
        let exact = "a".repeat(MAX_LESSON_CHARS);
        assert!(preflight(&exact).is_ok());
    }

    #[test]
    fn preflight_rejects_exotic_characters() {
        assert_eq!(preflight("lesson with emoji 🙂🙂"), Err(LessonError::InvalidChars));
        // Unicode word characters are allowed (Arabic lessons are the common case)
        assert!(preflight("درس عن البناء الضوئي للنبات").is_ok());
        assert!(preflight("Newtons second law? F = m*a, obviously!").is_ok());
    }
}
