//! Shared UI context

/// Currently selected item in the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    None,
    /// The wallet typed in, or the one whose results are shown
    Wallet(String),
    /// Transaction hash
    Transaction(String),
    SimilarWallet(String),
}

/// Context shared between the app and its key handlers
#[derive(Debug)]
pub struct Context {
    /// Currently selected item
    pub selected: Selected,

    /// Block explorer base URL for "view on explorer"
    pub explorer_url: String,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            selected: Selected::None,
            explorer_url: crate::config::DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text a copy action would put on the clipboard
    pub fn copy_target(&self) -> Option<String> {
        match &self.selected {
            Selected::None => None,
            Selected::Wallet(address) | Selected::SimilarWallet(address) => {
                Some(address.clone())
            }
            Selected::Transaction(hash) => Some(hash.clone()),
        }
    }
}
