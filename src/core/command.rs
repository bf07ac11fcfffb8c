//! Command parser for the : command system

use super::action::ExportFormat;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Workflow
    Search(String),
    Back,
    Results,

    // Results actions
    Export(ExportFormat),
    Copy,

    // App
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    // A bare address is a search
    if args.is_none() && (cmd.starts_with("0x") || cmd.starts_with("0X")) {
        return Command::Search(cmd.to_string());
    }

    match cmd.to_lowercase().as_str() {
        "search" | "analyze" | "analyse" | "s" => {
            if let Some(addr) = args {
                Command::Search(addr)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "back" | "home" | "new" => Command::Back,
        "results" | "res" => Command::Results,
        "export" | "exp" => match args.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("csv") => Command::Export(ExportFormat::Csv),
            Some("json") => Command::Export(ExportFormat::Json),
            Some(_) => Command::Unknown(input.to_string()),
        },
        "copy" | "y" => Command::Copy,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(input.to_string()),
    }
}
