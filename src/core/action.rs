//! Actions that commands and key handlers return to the app

/// What should happen after a command or key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a specific screen
    Navigate(NavigateTarget),

    /// Analyse a wallet address
    Search(String),

    /// Copy text to the clipboard
    Copy(String),

    /// Export the current analysis
    Export(ExportFormat),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Toggle the help popup
    Help,

    /// Request quit
    Quit,
}

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateTarget {
    /// Address input screen
    InsertWallet,
    /// Results of the last successful analysis
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Transactions, one row each
    Csv,
    /// The whole analysis payload
    Json,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
