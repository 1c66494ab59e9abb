//! A terminal form that posts free text to the BFHL endpoint and shows the
//! JSON reply, optionally narrowed to a chosen set of fields.
//!
//! Run the binary to open the interactive form.
//! Run with `--data <TEXT> [--select KEY]...` to submit once and print the
//! result to stdout.

mod app;
mod config;
mod core;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState, Focus},
    submit_runtime::{spawn_submission, SubmitOutcome},
};
use crate::config::{self as app_config, AppConfig};
use crate::core::{client::EndpointClient, controller::FormController, filter::FilterKey};
use crate::ui::{
    form::{InputBox, OptionList, ResponseView},
    layout::AppLayout,
    popup::HelpPopup,
    spinner::SendIndicator,
    theme::Theme,
};

const TITLE: &str = " Bajaj Finserv Health Dev Challenge";

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Post text to the BFHL endpoint and filter the reply")]
struct Cli {
    /// Submit this text once, print the rendered reply and exit.
    #[arg(long)]
    data: Option<String>,

    /// Field to keep in headless output (repeatable, order is kept).
    /// One of: alphabets, numbers, highest_lowercase_alphabet.
    #[arg(long = "select", requires = "data")]
    select: Vec<FilterKey>,

    /// Print the last rendered view to stdout when the form is closed.
    #[arg(long)]
    print_on_exit: bool,

    /// Write the effective config file and exit.
    #[arg(long)]
    write_config: bool,

    /// Append logs to this file.  Headless mode logs to stderr by default;
    /// the interactive form always logs to a file so the screen stays clean.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ───────────────────────────────────────── logging ──────────

/// `RUST_LOG` directives on top of a `warn` default, so request failures
/// are reported even when the variable is unset.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── headless ─────────

/// Submit once, apply the selection, and return the rendered view.
async fn run_once(client: &EndpointClient, data: String, select: Vec<FilterKey>) -> String {
    tracing::debug!(endpoint = client.url(), ?select, "headless submit");
    let mut form = FormController::new();
    form.set_input(data);
    form.submit(client).await;
    form.update_selection(select);
    form.render()
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &AppState) {
    let show_options = state.form.shows_options();
    let layout = AppLayout::from_area(frame.area(), show_options);

    frame.render_widget(
        Paragraph::new(TITLE).style(Theme::title_style()),
        layout.title_area,
    );

    let input = InputBox {
        text: state.form.input(),
        focused: state.focus == Focus::Input,
    };
    let cursor = input.cursor(layout.input_area);
    frame.render_widget(input, layout.input_area);

    if let Some(area) = layout.options_area {
        frame.render_widget(
            OptionList {
                selection: state.form.selection(),
                cursor: state.option_cursor,
                focused: state.focus == Focus::Options,
            },
            area,
        );
    }

    let rendered = state.form.render();
    frame.render_widget(
        ResponseView {
            text: &rendered,
            scroll: state.response_scroll,
        },
        layout.response_area,
    );
    frame.render_widget(
        SendIndicator {
            in_flight: state.in_flight,
            tick: state.tick,
        },
        layout.response_area,
    );

    let hint = state.config.status_bar_hint();
    frame.render_widget(
        Paragraph::new(hint).style(Theme::status_bar_style()),
        layout.status_area,
    );

    match state.active_view {
        ActiveView::Help => {
            frame.render_widget(HelpPopup { config: &state.config }, frame.area());
        }
        ActiveView::Form => {
            if let Some(pos) = cursor {
                frame.set_cursor_position(pos);
            }
        }
    }
}

// ───────────────────────────────────────── event loop ───────

/// Start anything the last key press asked for.  No de-duplication: every
/// submit gesture is its own request.
fn start_pending(
    state: &mut AppState,
    tx: &mpsc::UnboundedSender<SubmitOutcome>,
    client: &EndpointClient,
) {
    for submission in state.take_pending() {
        spawn_submission(tx.clone(), client.clone(), submission);
    }
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    state: &mut AppState,
    client: &EndpointClient,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(state.config.tick_rate_ms));
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<SubmitOutcome>();

    loop {
        // Spawn before drawing so the spinner shows on the same frame.
        start_pending(state, &outcome_tx, client);
        terminal.draw(|frame| draw(frame, state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Paste(text) => handler::handle_paste(state, &text),
                    AppEvent::Resize => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(outcome) = outcome_rx.recv() => {
                state.apply_outcome(outcome);
                // Drain whatever else finished before redrawing.
                while let Ok(outcome) = outcome_rx.try_recv() {
                    state.apply_outcome(outcome);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    if state.in_flight > 0 {
        tracing::debug!(in_flight = state.in_flight, "exiting with submissions outstanding");
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.data.is_none() && !cli.write_config;
    let log_file = match cli.log_file.clone() {
        Some(path) => Some(path),
        None if interactive => Some(app_config::default_log_path()),
        None => None,
    };
    init_tracing(log_file.as_ref())?;

    let user_config = AppConfig::load();

    if cli.write_config {
        let path = user_config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── headless mode ─────────────────────────────────────────
    if let Some(data) = cli.data {
        let client = EndpointClient::default();
        println!("{}", run_once(&client, data, cli.select).await);
        return Ok(());
    }

    let client = EndpointClient::default();
    tracing::debug!(endpoint = client.url(), "opening form");
    let mut state = AppState::new(user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut state, &client).await;

    // ── teardown ──────────────────────────────────────────────
    // Restore the terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    result?;

    if cli.print_on_exit {
        println!("{}", state.form.render());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::core::client::RequestFailure;

    /// In-memory log sink shared with the subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    async fn server_replying(template: ResponseTemplate) -> (MockServer, EndpointClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .mount(&server)
            .await;
        let client = EndpointClient::new(server.uri());
        (server, client)
    }

    #[test]
    fn failure_is_logged_without_rust_log() {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter(None))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut form = FormController::new();
            form.receive(Ok(json!({ "numbers": ["1"] })));
            form.receive(Err(RequestFailure::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        });

        let logged = sink.text();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("submission failed"), "{logged}");
        assert!(logged.contains("500"), "{logged}");
        assert!(!logged.contains("submission succeeded"), "debug leaked: {logged}");
    }

    #[test]
    fn rust_log_still_overrides_the_default() {
        let filter = log_filter(Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn select_keeps_command_line_order() {
        let cli = Cli::try_parse_from([
            "bfhl-tui",
            "--data",
            "abc123XYZ",
            "--select",
            "highest_lowercase_alphabet",
            "--select",
            "numbers",
        ])
        .unwrap();
        assert_eq!(cli.data.as_deref(), Some("abc123XYZ"));
        assert_eq!(
            cli.select,
            vec![FilterKey::HighestLowercaseAlphabet, FilterKey::Numbers]
        );
    }

    #[test]
    fn unknown_select_is_a_usage_error() {
        let err = Cli::try_parse_from(["bfhl-tui", "--data", "x", "--select", "Numbers"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn select_requires_data() {
        let err = Cli::try_parse_from(["bfhl-tui", "--select", "numbers"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[tokio::test]
    async fn headless_failure_prints_default_view() {
        let (_server, client) = server_replying(ResponseTemplate::new(500)).await;
        let out = run_once(&client, "abc".into(), vec![]).await;
        assert_eq!(out, "{}");
    }

    #[tokio::test]
    async fn headless_failure_with_selection_prints_nulls() {
        let (_server, client) = server_replying(ResponseTemplate::new(500)).await;
        let out = run_once(&client, "abc".into(), vec![FilterKey::Alphabets]).await;
        assert_eq!(out, "{\n  \"alphabets\": null\n}");
    }

    #[tokio::test]
    async fn headless_success_projects_in_order() {
        let reply = json!({
            "alphabets": ["a"],
            "numbers": ["1"],
            "highest_lowercase_alphabet": ["a"]
        });
        let (_server, client) = server_replying(ResponseTemplate::new(200).set_body_json(reply)).await;
        let out = run_once(
            &client,
            "a1".into(),
            vec![FilterKey::Numbers, FilterKey::Alphabets],
        )
        .await;
        assert_eq!(
            out,
            serde_json::to_string_pretty(&json!({ "numbers": ["1"], "alphabets": ["a"] })).unwrap()
        );
    }

    #[tokio::test]
    async fn spinner_shows_on_the_frame_after_submit() {
        let (_server, client) = server_replying(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(AppConfig::default());
        state.request_submit();

        start_pending(&mut state, &tx, &client);
        assert_eq!(state.in_flight, 1);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &state)).unwrap();
        let buf = terminal.backend().buffer();
        let screen: String = (0..buf.area.height)
            .flat_map(|y| (0..buf.area.width).map(move |x| (x, y)))
            .map(|p| buf[p].symbol().to_string())
            .collect();
        assert!(screen.contains("sending"), "{screen}");
    }
}
