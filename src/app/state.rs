//! Central application state.
//!
//! All mutable state lives here so that rendering is a pure function over
//! `&AppState` and event handling a function over `&mut AppState`.

use serde_json::Value;

use crate::config::AppConfig;
use crate::core::client::RequestFailure;
use crate::core::controller::{FormController, Submission};
use crate::core::filter::FilterKey;

/// Which pane receives non-global keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Options,
}

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Form,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// Input text, last response, and selected keys.
    pub form: FormController,
    pub focus: Focus,
    pub active_view: ActiveView,
    /// Highlighted row in the option list (index into `FilterKey::ALL`).
    pub option_cursor: usize,
    /// First visible line of the response pane.
    pub response_scroll: u16,
    /// Submissions started and not yet answered.
    pub in_flight: usize,
    /// Submissions captured by the key handler, waiting for the main loop to
    /// spawn them.
    pub pending: Vec<Submission>,
    /// Monotonic tick counter (drives the spinner).
    pub tick: u64,
    /// Controls the main event loop.
    pub should_quit: bool,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            form: FormController::new(),
            focus: Focus::default(),
            active_view: ActiveView::default(),
            option_cursor: 0,
            response_scroll: 0,
            in_flight: 0,
            pending: Vec::new(),
            tick: 0,
            should_quit: false,
            config,
        }
    }

    /// The option under the cursor.
    pub fn highlighted_option(&self) -> FilterKey {
        FilterKey::ALL[self.option_cursor.min(FilterKey::ALL.len() - 1)]
    }

    /// Queue a submission of the current input.
    pub fn request_submit(&mut self) {
        self.pending.push(self.form.submission());
    }

    /// Hand queued submissions to the caller, counting them as in flight.
    pub fn take_pending(&mut self) -> Vec<Submission> {
        let taken = std::mem::take(&mut self.pending);
        self.in_flight += taken.len();
        taken
    }

    /// Apply one finished submission.
    pub fn apply_outcome(&mut self, outcome: Result<Value, RequestFailure>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let replaced = outcome.is_ok();
        self.form.receive(outcome);
        if replaced {
            self.response_scroll = 0;
        }
        if !self.form.shows_options() && self.focus == Focus::Options {
            self.focus = Focus::Input;
        }
    }

    /// Number of lines in the current rendered response.
    pub fn response_line_count(&self) -> usize {
        self.form.render().lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_moves_to_in_flight() {
        let mut state = AppState::new(AppConfig::default());
        state.form.set_input("a1");
        state.request_submit();
        state.request_submit();
        let subs = state.take_pending();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].data, "a1");
        assert_eq!(state.in_flight, 2);
        assert!(state.pending.is_empty());

        state.apply_outcome(Ok(json!({ "numbers": ["1"] })));
        assert_eq!(state.in_flight, 1);
        assert_eq!(state.form.response(), &json!({ "numbers": ["1"] }));
    }

    #[test]
    fn falsy_reply_pulls_focus_back_to_input() {
        let mut state = AppState::new(AppConfig::default());
        state.focus = Focus::Options;
        state.in_flight = 1;
        state.apply_outcome(Ok(Value::Null));
        assert_eq!(state.focus, Focus::Input);
        assert_eq!(state.in_flight, 0);
    }
}
