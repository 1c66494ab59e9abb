//! Submission-and-filter controller.
//!
//! Owns the three pieces of form state (input text, last response, selected
//! keys).  Issuing the request is split in two so the caller decides where
//! the future runs: [`FormController::submission`] captures what to send,
//! [`FormController::receive`] applies whatever came back.

use serde_json::{Map, Value};

use super::client::{EndpointClient, RequestFailure};
use super::filter::{self, FilterKey};

/// Everything needed to send one submission, detached from the controller so
/// it can be moved into a spawned task.
#[derive(Debug, Clone)]
pub struct Submission {
    pub data: String,
}

impl Submission {
    pub async fn send(self, client: &EndpointClient) -> Result<Value, RequestFailure> {
        client.post(&self.data).await
    }
}

#[derive(Debug, Clone)]
pub struct FormController {
    input: String,
    response: Value,
    selection: Vec<FilterKey>,
}

impl Default for FormController {
    fn default() -> Self {
        Self {
            input: String::new(),
            response: Value::Object(Map::new()),
            selection: Vec::new(),
        }
    }
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── input text ──────────────────────────────────────────────

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the whole input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    // ── submission ──────────────────────────────────────────────

    /// Snapshot the current input for sending.  The input is left as-is.
    pub fn submission(&self) -> Submission {
        Submission {
            data: self.input.clone(),
        }
    }

    /// Apply the outcome of a submission.  Success replaces the response
    /// wholesale; failure is logged and leaves the response untouched.
    pub fn receive(&mut self, outcome: Result<Value, RequestFailure>) {
        match outcome {
            Ok(reply) => {
                tracing::debug!("submission succeeded");
                self.response = reply;
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed; keeping previous response");
            }
        }
    }

    /// Send the current input and wait for the reply in place.
    pub async fn submit(&mut self, client: &EndpointClient) {
        let outcome = self.submission().send(client).await;
        self.receive(outcome);
    }

    pub fn response(&self) -> &Value {
        &self.response
    }

    // ── selection ───────────────────────────────────────────────

    pub fn selection(&self) -> &[FilterKey] {
        &self.selection
    }

    /// Replace the selected keys.  Repeats keep their first position.
    pub fn update_selection<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = FilterKey>,
    {
        let mut next: Vec<FilterKey> = Vec::with_capacity(FilterKey::ALL.len());
        for key in keys {
            if !next.contains(&key) {
                next.push(key);
            }
        }
        self.selection = next;
    }

    pub fn is_selected(&self, key: FilterKey) -> bool {
        self.selection.contains(&key)
    }

    /// Flip one key: appended when newly selected, removed otherwise.
    pub fn toggle(&mut self, key: FilterKey) {
        let next: Vec<FilterKey> = if self.is_selected(key) {
            self.selection.iter().copied().filter(|k| *k != key).collect()
        } else {
            self.selection.iter().copied().chain(Some(key)).collect()
        };
        self.update_selection(next);
    }

    // ── view ────────────────────────────────────────────────────

    /// Whether the option list should be offered at all.
    pub fn shows_options(&self) -> bool {
        filter::is_populated(&self.response)
    }

    pub fn render(&self) -> String {
        filter::render(&self.response, &self.selection)
    }
}
