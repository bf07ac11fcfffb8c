pub mod action;
pub mod command;
pub mod context;
pub mod state;

pub use action::{Action, ExportFormat, NavigateTarget, NotifyLevel};
pub use command::{parse_command, Command};
pub use context::{Context, Selected};
pub use state::{AppState, Page, RequestId, Resolution, SearchPhase};
