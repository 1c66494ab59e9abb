//! Response filtering — the fixed key domain and the key-projected render.
//!
//! Everything here is pure: it takes a response value and a selection and
//! produces text.  No I/O, no terminal types.

use std::str::FromStr;

use serde_json::{Map, Value};

/// One of the three response fields the user can choose to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Alphabets,
    Numbers,
    HighestLowercaseAlphabet,
}

impl FilterKey {
    /// Display order of the option list.
    pub const ALL: &[FilterKey] = &[
        FilterKey::Alphabets,
        FilterKey::Numbers,
        FilterKey::HighestLowercaseAlphabet,
    ];

    /// The JSON field name this key projects.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Alphabets => "alphabets",
            FilterKey::Numbers => "numbers",
            FilterKey::HighestLowercaseAlphabet => "highest_lowercase_alphabet",
        }
    }

    /// Human-readable label for the option list.
    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Alphabets => "Alphabets",
            FilterKey::Numbers => "Numbers",
            FilterKey::HighestLowercaseAlphabet => "Highest lowercase alphabet",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown filter key `{0}` (expected alphabets, numbers or highest_lowercase_alphabet)")]
pub struct UnknownFilterKey(pub String);

impl FromStr for FilterKey {
    type Err = UnknownFilterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownFilterKey(s.to_string()))
    }
}

/// Is this response worth filtering?  Mirrors JavaScript truthiness for the
/// values a JSON body can hold: `null`, `false`, `0` and `""` are empty,
/// every object and array (even an empty one) is populated.
pub fn is_populated(response: &Value) -> bool {
    match response {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build the `{key: response[key]}` object for `selection`, in selection order.
/// Keys missing from the response (or every key, when the response is not an
/// object) map to `null`.
pub fn project(response: &Value, selection: &[FilterKey]) -> Map<String, Value> {
    let mut out = Map::with_capacity(selection.len());
    for key in selection {
        let value = response.get(key.as_str()).cloned().unwrap_or(Value::Null);
        out.insert(key.as_str().to_string(), value);
    }
    out
}

/// Pretty-print (2-space indent) either the projection or the whole response.
pub fn render(response: &Value, selection: &[FilterKey]) -> String {
    let shown = if is_populated(response) && !selection.is_empty() {
        Value::Object(project(response, selection))
    } else {
        response.clone()
    };
    // Serialising a `Value` cannot fail: every map key is already a string.
    serde_json::to_string_pretty(&shown).unwrap_or_default()
}
