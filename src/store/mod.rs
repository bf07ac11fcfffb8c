//! Application state store

mod wallet;

pub use wallet::{SearchTicket, StoreEvent, WalletStore};
