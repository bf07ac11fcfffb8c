use std::time::{Duration, Instant};

use crate::config::ExampleAddress;
use crate::core::{
    Action, AppState, Command, Context, ExportFormat, NavigateTarget, NotifyLevel, Page, Selected,
};
use crate::domain::format;
use crate::store::StoreEvent;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    // Insert wallet screen
    Input,
    QuickPicks,
    // Results screen
    Wallet,
    Transactions,
    SimilarWallets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSource {
    Example,
    History,
}

/// One entry of the quick-pick list on the insert wallet screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPick {
    pub address: String,
    pub label: String,
    pub source: PickSource,
}

#[derive(Debug)]
pub struct App {
    /// Shared context for key handlers
    pub ctx: Context,
    pub page: Page,
    pub focus: Focus,
    pub input_mode: InputMode,
    /// Text of the address input, mirrored from `AppState::current_address`
    pub address_input: String,
    pub command: CommandBar,
    /// Configured example addresses
    pub examples: Vec<ExampleAddress>,
    pub selected_pick: usize,
    pub selected_tx: usize,
    pub selected_similar: usize,
    /// Store snapshot for the current frame
    pub state: AppState,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pending_search: Option<String>,
    pending_address_edit: Option<String>,
    pending_copy: Option<String>,
    pending_export: Option<ExportFormat>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
            page: Page::InsertWallet,
            focus: Focus::Input,
            input_mode: InputMode::Normal,
            address_input: String::new(),
            command: CommandBar::default(),
            examples: Vec::new(),
            selected_pick: 0,
            selected_tx: 0,
            selected_similar: 0,
            state: AppState::new(),
            status: None,
            help_open: false,
            should_quit: false,
            spinner_frame: 0,
            pending_search: None,
            pending_address_edit: None,
            pending_copy: None,
            pending_export: None,
        }
    }

    /// Take a fresh store snapshot for this frame
    pub fn sync_state(&mut self, state: AppState) {
        self.address_input = state.current_address().to_string();
        self.state = state;
        self.clamp_selections();
        self.sync_context();
    }

    /// Sync context with the focused item
    pub fn sync_context(&mut self) {
        self.ctx.selected = match (self.page, self.focus) {
            (Page::InsertWallet, Focus::QuickPicks) => self
                .quick_picks()
                .get(self.selected_pick)
                .map(|pick| Selected::Wallet(pick.address.clone()))
                .unwrap_or(Selected::None),
            (Page::InsertWallet, _) => {
                if self.address_input.trim().is_empty() {
                    Selected::None
                } else {
                    Selected::Wallet(self.address_input.trim().to_string())
                }
            }
            (Page::Results, Focus::Transactions) => self
                .selected_transaction()
                .map(|tx| Selected::Transaction(tx.hash.clone()))
                .unwrap_or(Selected::None),
            (Page::Results, Focus::SimilarWallets) => self
                .selected_similar_address()
                .map(Selected::SimilarWallet)
                .unwrap_or(Selected::None),
            (Page::Results, _) => self
                .state
                .analyzed_address()
                .map(|address| Selected::Wallet(address.to_string()))
                .unwrap_or(Selected::None),
        };
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
        if self.state.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn focus_label(&self) -> &'static str {
        match self.focus {
            Focus::Input => "Input",
            Focus::QuickPicks => "Quick picks",
            Focus::Wallet => "Wallet",
            Focus::Transactions => "Transactions",
            Focus::SimilarWallets => "Similar wallets",
        }
    }

    /// Examples first, then search history most recent first; each address
    /// listed once
    pub fn quick_picks(&self) -> Vec<QuickPick> {
        let mut picks: Vec<QuickPick> = Vec::new();
        let examples = self.examples.iter().map(|example| QuickPick {
            address: example.address.clone(),
            label: example.display_name(),
            source: PickSource::Example,
        });
        let history = self.state.search_history().iter().rev().map(|address| QuickPick {
            address: address.clone(),
            label: format::wallet_address(address),
            source: PickSource::History,
        });
        for pick in examples.chain(history) {
            if !picks
                .iter()
                .any(|seen| seen.address.eq_ignore_ascii_case(&pick.address))
            {
                picks.push(pick);
            }
        }
        picks
    }

    // Address input

    pub fn push_input_char(&mut self, ch: char) {
        self.address_input.push(ch);
        self.pending_address_edit = Some(self.address_input.clone());
    }

    pub fn pop_input_char(&mut self) {
        self.address_input.pop();
        self.pending_address_edit = Some(self.address_input.clone());
    }

    pub fn clear_input(&mut self) {
        self.address_input.clear();
        self.pending_address_edit = Some(String::new());
    }

    /// Queue a search for the main loop. Ignored while one is in flight.
    pub fn request_search(&mut self, address: &str) {
        if self.state.is_loading() || self.pending_search.is_some() {
            self.set_status("Analysis already in progress", StatusLevel::Warn);
            return;
        }
        let address = address.trim();
        if address.is_empty() {
            self.set_status("Enter a wallet address", StatusLevel::Warn);
            return;
        }
        self.address_input = address.to_string();
        self.pending_address_edit = None;
        self.pending_search = Some(address.to_string());
        self.page = Page::InsertWallet;
        self.focus = Focus::Input;
    }

    pub fn submit_input(&mut self) {
        let address = self.address_input.clone();
        self.request_search(&address);
    }

    pub fn take_search_request(&mut self) -> Option<String> {
        self.pending_search.take()
    }

    pub fn take_address_edit(&mut self) -> Option<String> {
        self.pending_address_edit.take()
    }

    pub fn take_copy_request(&mut self) -> Option<String> {
        self.pending_copy.take()
    }

    pub fn take_export_request(&mut self) -> Option<ExportFormat> {
        self.pending_export.take()
    }

    pub fn apply_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Changed => {}
            StoreEvent::Navigate(Page::Results) => {
                self.page = Page::Results;
                self.focus = Focus::Transactions;
                self.selected_tx = 0;
                self.selected_similar = 0;
                self.sync_context();
            }
            StoreEvent::Navigate(Page::InsertWallet) => self.go_to_insert(),
        }
    }

    // Selection

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = match (self.page, self.focus, forward) {
            (Page::InsertWallet, Focus::Input, _) => Focus::QuickPicks,
            (Page::InsertWallet, _, _) => Focus::Input,
            (Page::Results, Focus::Wallet, true) => Focus::Transactions,
            (Page::Results, Focus::Transactions, true) => Focus::SimilarWallets,
            (Page::Results, _, true) => Focus::Wallet,
            (Page::Results, Focus::Wallet, false) => Focus::SimilarWallets,
            (Page::Results, Focus::SimilarWallets, false) => Focus::Transactions,
            (Page::Results, _, false) => Focus::Wallet,
        };
        self.sync_context();
    }

    pub fn move_selection_up(&mut self) {
        match self.focus {
            Focus::QuickPicks => self.selected_pick = self.selected_pick.saturating_sub(1),
            Focus::Transactions => self.selected_tx = self.selected_tx.saturating_sub(1),
            Focus::SimilarWallets => {
                self.selected_similar = self.selected_similar.saturating_sub(1)
            }
            Focus::Input | Focus::Wallet => {}
        }
        self.sync_context();
    }

    pub fn move_selection_down(&mut self) {
        match self.focus {
            Focus::QuickPicks => self.selected_pick += 1,
            Focus::Transactions => self.selected_tx += 1,
            Focus::SimilarWallets => self.selected_similar += 1,
            Focus::Input | Focus::Wallet => {}
        }
        self.clamp_selections();
        self.sync_context();
    }

    fn clamp_selections(&mut self) {
        let picks = self.quick_picks().len();
        let txs = self
            .state
            .last_result()
            .map(|analysis| analysis.transactions.len())
            .unwrap_or(0);
        let similar = self
            .state
            .last_result()
            .map(|analysis| analysis.similar_wallets().len())
            .unwrap_or(0);
        self.selected_pick = self.selected_pick.min(picks.saturating_sub(1));
        self.selected_tx = self.selected_tx.min(txs.saturating_sub(1));
        self.selected_similar = self.selected_similar.min(similar.saturating_sub(1));
    }

    pub fn selected_transaction(&self) -> Option<&crate::domain::Transaction> {
        self.state
            .last_result()
            .and_then(|analysis| analysis.transactions.get(self.selected_tx))
    }

    pub fn selected_similar_address(&self) -> Option<String> {
        self.state
            .last_result()
            .and_then(|analysis| analysis.similar_wallets().get(self.selected_similar))
            .map(|wallet| wallet.address.clone())
    }

    // Actions on the focused item

    /// Enter on the insert screen or on the similar wallets list
    pub fn activate(&mut self) {
        match (self.page, self.focus) {
            (Page::InsertWallet, Focus::QuickPicks) => {
                if let Some(pick) = self.quick_picks().get(self.selected_pick).cloned() {
                    self.request_search(&pick.address);
                }
            }
            (Page::InsertWallet, _) => self.submit_input(),
            (Page::Results, Focus::SimilarWallets) => {
                if let Some(address) = self.selected_similar_address() {
                    self.request_search(&address);
                }
            }
            (Page::Results, _) => {}
        }
    }

    pub fn analyze_selected_from(&mut self) {
        match self.selected_transaction().map(|tx| tx.from_address.clone()) {
            Some(address) => self.request_search(&address),
            None => self.set_status("No transaction selected", StatusLevel::Warn),
        }
    }

    pub fn analyze_selected_to(&mut self) {
        match self.selected_transaction().map(|tx| tx.to_address.clone()) {
            Some(address) => self.request_search(&address),
            None => self.set_status("No transaction selected", StatusLevel::Warn),
        }
    }

    /// Copy whatever the focused panel points at
    pub fn copy_focused(&mut self) {
        self.sync_context();
        let action = match self.ctx.copy_target() {
            Some(text) => Action::Copy(text),
            None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
        };
        self.apply_action(action);
    }

    pub fn copy_current_wallet(&mut self) {
        let action = match self.state.analyzed_address() {
            Some(address) => Action::Copy(address.to_string()),
            None => Action::Notify("No wallet analysed yet".to_string(), NotifyLevel::Warn),
        };
        self.apply_action(action);
    }

    pub fn copy_explorer_url(&mut self) {
        let action = match self.selected_transaction() {
            Some(tx) => Action::Copy(format::explorer_tx_url(&self.ctx.explorer_url, &tx.hash)),
            None => Action::Notify("No transaction selected".to_string(), NotifyLevel::Warn),
        };
        self.apply_action(action);
    }

    pub fn go_to_insert(&mut self) {
        self.page = Page::InsertWallet;
        self.focus = Focus::Input;
        self.sync_context();
    }

    pub fn go_to_results(&mut self) {
        if self.state.last_result().is_none() {
            self.set_status("No analysis yet", StatusLevel::Warn);
            return;
        }
        self.page = Page::Results;
        if matches!(self.focus, Focus::Input | Focus::QuickPicks) {
            self.focus = Focus::Transactions;
        }
        self.sync_context();
    }

    // Command bar

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }

        let cmd = crate::core::parse_command(&input);
        self.exit_command();
        let action = self.execute_command(&cmd);
        self.apply_action(action);
        self.command.last = Some(input);
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Search(address) => Action::Search(address.clone()),
            Command::Back => Action::Navigate(NavigateTarget::InsertWallet),
            Command::Results => Action::Navigate(NavigateTarget::Results),
            Command::Export(format) => Action::Export(*format),
            Command::Copy => {
                self.sync_context();
                match self.ctx.copy_target() {
                    Some(text) => Action::Copy(text),
                    None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
                }
            }
            Command::Help => Action::Help,
            Command::Quit => Action::Quit,
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command or key handler
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(NavigateTarget::InsertWallet) => self.go_to_insert(),
            Action::Navigate(NavigateTarget::Results) => self.go_to_results(),
            Action::Search(address) => self.request_search(&address),
            Action::Copy(text) => self.pending_copy = Some(text),
            Action::Export(format) => {
                if self.state.last_result().is_some() {
                    self.pending_export = Some(format);
                } else {
                    self.set_status("No analysis to export", StatusLevel::Warn);
                }
            }
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
            Action::Help => self.help_open = !self.help_open,
            Action::Quit => self.should_quit = true,
        }
    }
}
