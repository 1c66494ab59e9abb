//! User configuration — key bindings, tick rate, and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/bfhl-tui/config.toml` (default `~/.config/bfhl-tui/config.toml`).
//! The endpoint URL is deliberately absent: it is compiled in.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const APP_DIR: &str = "bfhl-tui";
const DEFAULT_TICK_MS: u64 = 100;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    SwitchFocus,
    OptionUp,
    OptionDown,
    ToggleOption,
    ClearSelection,
    ScrollUp,
    ScrollDown,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup and the file).
    pub const ALL: &[Action] = &[
        Action::Submit,
        Action::SwitchFocus,
        Action::OptionUp,
        Action::OptionDown,
        Action::ToggleOption,
        Action::ClearSelection,
        Action::ScrollUp,
        Action::ScrollDown,
        Action::Help,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Submit => "Submit",
            Action::SwitchFocus => "Switch Focus",
            Action::OptionUp => "Option Up",
            Action::OptionDown => "Option Down",
            Action::ToggleOption => "Toggle Option",
            Action::ClearSelection => "Clear Selection",
            Action::ScrollUp => "Scroll Response Up",
            Action::ScrollDown => "Scroll Response Down",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Actions that still fire while the text input has focus.  The rest
    /// would swallow ordinary typing (e.g. Space).
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Action::Submit
                | Action::SwitchFocus
                | Action::ScrollUp
                | Action::ScrollDown
                | Action::Help
                | Action::Quit
        )
    }

    fn config_key(self) -> &'static str {
        match self {
            Action::Submit => "submit",
            Action::SwitchFocus => "switch_focus",
            Action::OptionUp => "option_up",
            Action::OptionDown => "option_down",
            Action::ToggleOption => "toggle_option",
            Action::ClearSelection => "clear_selection",
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared; SUPER and friends are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-facing form (`"Ctrl+s"`, `"↑"`, `"Space"`).
    pub fn display(&self) -> String {
        self.format(true)
    }

    /// File form (`"Ctrl+s"`, `"Up"`, `"Space"`).
    fn to_config_string(&self) -> String {
        self.format(false)
    }

    fn format(&self, arrows: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up if arrows => "↑".into(),
            KeyCode::Down if arrows => "↓".into(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::BackTab => "BackTab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+s"`, `"Alt+Up"`, `"q"`, `"F1"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case for single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Terminal poll interval; also drives the spinner.
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            tick_rate_ms: DEFAULT_TICK_MS,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(Submit, vec![KeyBind::new(Char('s'), ctrl)]);
        m.insert(SwitchFocus, vec![KeyBind::new(Tab, n)]);
        m.insert(OptionUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(OptionDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ToggleOption, vec![KeyBind::new(Char(' '), n), KeyBind::new(Enter, n)]);
        m.insert(ClearSelection, vec![KeyBind::new(Char('c'), n)]);
        m.insert(ScrollUp, vec![KeyBind::new(PageUp, n)]);
        m.insert(ScrollDown, vec![KeyBind::new(PageDown, n)]);
        m.insert(Help, vec![KeyBind::new(F(1), n)]);
        m.insert(Quit, vec![KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action bound to a key event.  If several match, the binding
    /// with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Bind `bind` to `action`, removing it from every other action first.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Format the binding list for an action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: submit | {}: switch focus | {}: toggle option | {}: help | {}: quit",
            self.short_binding(Action::Submit),
            self.short_binding(Action::SwitchFocus),
            self.short_binding(Action::ToggleOption),
            self.short_binding(Action::Help),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no config file; using defaults");
                Self::default()
            }
        }
    }

    /// Write the effective config to disk and return where it went.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == "tick_rate_ms" {
                if let Ok(v) = value.parse::<u64>() {
                    config.tick_rate_ms = v.clamp(16, 1000);
                }
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if parsed.is_empty() {
                continue;
            }
            config.bindings.insert(action, Vec::new());
            for bind in parsed {
                config.add_binding(action, bind);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# bfhl-tui configuration".to_string(),
            String::new(),
            format!("tick_rate_ms = {}", self.tick_rate_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/bfhl-tui/config.toml`.
fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join(APP_DIR)
        .join("config.toml")
}

/// Where the interactive form logs when `--log-file` is not given:
/// `$XDG_STATE_HOME/bfhl-tui/bfhl-tui.log` (default `~/.local/state/...`).
pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .join(APP_DIR)
        .join("bfhl-tui.log")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(home_fallback)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_cover_every_action() {
        let config = AppConfig::default();
        for &action in Action::ALL {
            assert_ne!(config.display_bindings(action), "unbound", "{action:?}");
        }
        assert_eq!(config.tick_rate_ms, DEFAULT_TICK_MS);
    }

    #[test]
    fn ctrl_s_submits_but_plain_s_does_not() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Submit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parse_overrides_and_clamps() {
        let config = AppConfig::parse_config(
            "# comment\n[bindings]\ntick_rate_ms = 5\nsubmit = F5, Ctrl+Enter\nbogus = x\n",
        );
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(
            config.match_key(key(KeyCode::F(5), KeyModifiers::NONE)),
            Some(Action::Submit)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Enter, KeyModifiers::CONTROL)),
            Some(Action::Submit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn rebinding_steals_key_from_other_action() {
        let config = AppConfig::parse_config("quit = Tab\n");
        assert_eq!(
            config.match_key(key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(config.display_bindings(Action::SwitchFocus), "unbound");
    }

    #[test]
    fn serialised_config_reads_back() {
        let mut config = AppConfig::default();
        config.tick_rate_ms = 250;
        config.add_binding(Action::Help, KeyBind::new(KeyCode::Char('?'), KeyModifiers::NONE));
        let back = AppConfig::parse_config(&config.serialise());
        assert_eq!(back.tick_rate_ms, 250);
        for &action in Action::ALL {
            assert_eq!(back.display_bindings(action), config.display_bindings(action));
        }
    }

    #[test]
    fn log_and_config_live_under_the_app_dir() {
        let log = default_log_path();
        assert!(log.ends_with("bfhl-tui/bfhl-tui.log"), "{}", log.display());
        assert!(config_path().ends_with("bfhl-tui/config.toml"));
    }

    #[test]
    fn typing_keys_are_not_global() {
        assert!(!Action::ToggleOption.is_global());
        assert!(!Action::ClearSelection.is_global());
        assert!(Action::Submit.is_global());
    }
}
