use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedReceiver;

use smart_wallet::app::{App, Focus, InputMode, StatusLevel};
use smart_wallet::config::{self, Config};
use smart_wallet::core::{Action, ExportFormat, Page};
use smart_wallet::infrastructure::HttpWalletApi;
use smart_wallet::modules::export;
use smart_wallet::store::{StoreEvent, WalletStore};
use smart_wallet::{telemetry, ui};

#[derive(Debug, Parser)]
#[command(
    name = "smart-wallet",
    version,
    about = "Smart Wallet: classify Ethereum wallets from the terminal"
)]
struct Args {
    /// Analysis backend base URL (e.g. http://localhost:8080/api/v1)
    #[arg(long)]
    backend_url: Option<String>,

    /// ML service base URL, probed once at startup (e.g. http://localhost:8000)
    #[arg(long)]
    ml_service_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Prefill this address and analyse it right away
    #[arg(long)]
    address: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logging comes up first so config loading can report a bad file
    let _log_guard = match config::log_dir() {
        Some(dir) => match telemetry::init_tracing(&dir, &args.log_level) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("logging disabled: {err:#}");
                None
            }
        },
        None => None,
    };
    let config = apply_args(config::load(), &args);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let api_config = config.api_config();
    tracing::info!(
        backend = %api_config.backend_url,
        ml_service = ?api_config.ml_service_url,
        timeout_secs = api_config.timeout.as_secs(),
        "starting smart-wallet"
    );
    let api = Arc::new(HttpWalletApi::new(api_config)?);
    let (store, store_events) = WalletStore::new(api, runtime.handle().clone());
    store.init();

    let mut app = App::new();
    app.examples = config.quick_picks();
    app.ctx.explorer_url = config.explorer_url();
    if let Some(address) = args.address.as_deref() {
        app.request_search(address);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &store, store_events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // In-flight requests are abandoned on quit
    runtime.shutdown_timeout(Duration::from_millis(200));

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// CLI flags win over env vars and the config file
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(url) = args.backend_url.clone() {
        config.backend_url = Some(url);
    }
    if let Some(url) = args.ml_service_url.clone() {
        config.ml_service_url = Some(url);
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    config
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    store: &WalletStore,
    mut store_events: UnboundedReceiver<StoreEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_store(&mut app, store, &mut store_events);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

/// Hand queued requests to the store, then pull its events and a fresh snapshot
fn pump_store(
    app: &mut App,
    store: &WalletStore,
    store_events: &mut UnboundedReceiver<StoreEvent>,
) {
    if let Some(address) = app.take_address_edit() {
        store.set_wallet_address(address);
    }
    if let Some(address) = app.take_search_request() {
        // The ticket is only needed by callers that await the outcome
        let _ticket = store.search_wallet(address);
    }

    while let Ok(event) = store_events.try_recv() {
        if event == StoreEvent::Navigate(Page::Results) {
            app.set_status("Analysis ready", StatusLevel::Info);
        }
        app.apply_store_event(event);
    }
    app.sync_state(store.snapshot());

    if let Some(text) = app.take_copy_request() {
        handle_copy_to_clipboard(app, text);
    }
    if let Some(format) = app.take_export_request() {
        let action = export::export_analysis(&app.state, format);
        app.apply_action(action);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => match app.page {
            Page::InsertWallet => handle_insert_page(app, key),
            Page::Results => handle_results_page(app, key),
        },
        InputMode::Command => handle_command_mode(app, key),
    }
}

fn handle_insert_page(app: &mut App, key: KeyEvent) {
    if app.focus == Focus::Input {
        match key.code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Tab | KeyCode::Down => app.cycle_focus(true),
            KeyCode::Esc => {
                if app.address_input.is_empty() {
                    app.go_to_results();
                } else {
                    app.clear_input();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_input_char(ch);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('r') => app.go_to_results(),
        KeyCode::Char('i') | KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => {
            app.cycle_focus(true)
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Enter => app.activate(),
        _ => {}
    }
}

fn handle_results_page(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Tab => app.cycle_focus(true),
        KeyCode::BackTab => app.cycle_focus(false),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Enter => app.activate(),
        KeyCode::Char('f') => app.analyze_selected_from(),
        KeyCode::Char('t') => app.analyze_selected_to(),
        KeyCode::Char('o') => app.copy_explorer_url(),
        KeyCode::Char('y') => app.copy_focused(),
        KeyCode::Char('Y') => app.copy_current_wallet(),
        KeyCode::Char('e') => app.apply_action(Action::Export(ExportFormat::Csv)),
        KeyCode::Char('E') => app.apply_action(Action::Export(ExportFormat::Json)),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('n') => app.go_to_insert(),
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                let shown = if text.chars().count() > 24 {
                    format!("{}...", text.chars().take(24).collect::<String>())
                } else {
                    text
                };
                app.set_status(format!("Copied: {}", shown), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "clipboard unavailable");
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
