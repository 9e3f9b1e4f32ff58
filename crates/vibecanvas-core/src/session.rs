//! UI-agnostic session state
//!
//! One `Session` holds the input text and exactly one `ViewState`. Front-ends
//! call `submit`, run the pipeline with the returned vibe, then hand the
//! outcome to `settle`.

use log::{error, info};

use crate::error::GenerateError;
use crate::vibe::VibeResult;

/// The only message a user ever sees for a failed generation
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong while channeling your vibe. Please try again.";

/// What the screen is currently showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Result(VibeResult),
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Default)]
pub struct Session {
    input: String,
    cursor: usize, // cursor position in input, in chars
    state: ViewState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ViewState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&VibeResult> {
        match &self.state {
            ViewState::Result(result) => Some(result),
            _ => None,
        }
    }

    /// The input is locked while a generation is in flight
    pub fn can_edit(&self) -> bool {
        !self.is_loading()
    }

    pub fn can_submit(&self) -> bool {
        self.can_edit() && !self.input.trim().is_empty()
    }

    // Input editing. Each returns false when the edit was refused.

    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.can_edit() {
            return false;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.can_edit() || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
        true
    }

    pub fn delete(&mut self) -> bool {
        if !self.can_edit() || self.cursor >= self.input.chars().count() {
            return false;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Enter `Loading` and return the vibe to send.
    ///
    /// Refused (returns `None`, state untouched) while loading or when the
    /// trimmed input is empty. Any previous error or result is dropped.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.state = ViewState::Loading;
        Some(self.input.clone())
    }

    /// Finish the in-flight generation. Ignored unless `Loading`.
    pub fn settle(&mut self, outcome: Result<VibeResult, GenerateError>) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.state = match outcome {
            Ok(result) => {
                info!("Vibe ready: {:?}", result.title);
                ViewState::Result(result)
            }
            Err(e) => {
                error!("Vibe generation failed at {} step: {}", e.step(), e);
                ViewState::Error(GENERIC_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    /// "Try a different vibe": drop the result and go back to the input
    pub fn reset(&mut self) -> bool {
        if !matches!(self.state, ViewState::Result(_)) {
            return false;
        }
        self.state = ViewState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImageError, MetadataError};
    use crate::pipeline::generate;
    use crate::pipeline::tests::{neon_rain, FakeModel};
    use std::sync::atomic::Ordering;

    fn typed(text: &str) -> Session {
        let mut session = Session::new();
        for c in text.chars() {
            session.insert_char(c);
        }
        session
    }

    fn sample_result() -> VibeResult {
        VibeResult::new(neon_rain(), "data:image/png;base64,AAAA".to_string())
    }

    #[test]
    fn test_submit_enters_loading_once() {
        let mut session = typed("Midnight rain in Tokyo");
        assert_eq!(session.submit().as_deref(), Some("Midnight rain in Tokyo"));
        assert_eq!(session.state(), &ViewState::Loading);

        // Second press while in flight is rejected
        assert_eq!(session.submit(), None);
        assert!(!session.can_submit());
        assert_eq!(session.state(), &ViewState::Loading);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        for text in ["", "   ", "\t \t"] {
            let mut session = typed(text);
            assert_eq!(session.submit(), None);
            assert_eq!(session.state(), &ViewState::Idle);
        }
    }

    #[test]
    fn test_input_locked_while_loading() {
        let mut session = typed("rain");
        session.submit();
        assert!(!session.insert_char('!'));
        assert!(!session.backspace());
        assert_eq!(session.input(), "rain");
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut session = typed("día");
        session.move_left();
        assert!(session.backspace());
        assert_eq!(session.input(), "da");
        session.move_home();
        assert!(session.delete());
        assert_eq!(session.input(), "a");
        session.move_end();
        session.insert_char('é');
        assert_eq!(session.input(), "aé");
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_settle_success() {
        let mut session = typed("rain");
        session.submit();
        assert!(session.settle(Ok(sample_result())));
        assert_eq!(session.result(), Some(&sample_result()));
        assert_eq!(session.error(), None);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_settle_failure_shows_generic_message() {
        let mut session = typed("rain");
        session.submit();
        session.settle(Err(GenerateError::Image(ImageError::NoImageData)));
        assert_eq!(session.error(), Some(GENERIC_ERROR_MESSAGE));
        assert_eq!(session.result(), None);

        // Still retryable
        assert!(session.can_submit());
        assert!(session.submit().is_some());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_settle_ignored_when_not_loading() {
        let mut session = typed("rain");
        assert!(!session.settle(Ok(sample_result())));
        assert_eq!(session.state(), &ViewState::Idle);
    }

    #[test]
    fn test_reset_from_result() {
        let mut session = typed("rain");
        session.submit();
        session.settle(Ok(sample_result()));

        assert!(session.reset());
        assert_eq!(session.state(), &ViewState::Idle);
        assert_eq!(session.result(), None);
        assert_eq!(session.error(), None);
        assert!(session.can_edit());
        assert!(session.insert_char('!'));
    }

    #[test]
    fn test_reset_only_from_result() {
        let mut session = typed("rain");
        assert!(!session.reset());
        session.submit();
        assert!(!session.reset());
        assert!(session.is_loading());
        session.settle(Err(GenerateError::Metadata(MetadataError::Parse("x".into()))));
        assert!(!session.reset());
    }

    #[test]
    fn test_submit_from_result_replaces_it() {
        let mut session = typed("rain");
        session.submit();
        session.settle(Ok(sample_result()));
        assert!(session.submit().is_some());
        assert_eq!(session.result(), None);
        assert!(session.is_loading());
    }

    #[tokio::test]
    async fn test_full_cycle_renders_metadata_exactly() {
        let model = FakeModel::happy();
        let mut session = typed("Midnight rain in Tokyo");

        let vibe = session.submit().unwrap();
        session.settle(generate(&model, &vibe).await);

        let result = session.result().unwrap();
        assert_eq!(result.title, "Neon Rain");
        assert_eq!(
            result.palette,
            vec!["#1A1A40", "#0F3460", "#16213E", "#533483", "#E94560"]
        );
        assert!(result.image_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_invalid_metadata_cycle() {
        let model = FakeModel::new("<html>oops</html>", Some("abcd"));
        let mut session = typed("rain");

        let vibe = session.submit().unwrap();
        session.settle(generate(&model, &vibe).await);

        assert_eq!(session.error(), Some(GENERIC_ERROR_MESSAGE));
        assert_eq!(model.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_image_cycle_hides_metadata() {
        let mut model = FakeModel::happy();
        model.image_data = None;
        let mut session = typed("rain");

        let vibe = session.submit().unwrap();
        session.settle(generate(&model, &vibe).await);

        assert_eq!(session.error(), Some(GENERIC_ERROR_MESSAGE));
        assert_eq!(session.result(), None);
    }
}
