use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

mod insert;
pub mod layout;
mod results;

use crate::app::{App, Focus, InputMode, StatusLevel};
use crate::core::Page;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    match app.page {
        Page::InsertWallet => insert::draw(f, areas.main, app),
        Page::Results => results::draw(f, areas.main, app),
    }
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "Smart Wallet",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Focus", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.focus_label())),
    ]);

    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let mut right_spans = vec![Span::styled("Backend ", Style::default().fg(Color::DarkGray))];
    right_spans.push(liveness_span(
        app.state
            .liveness_checked()
            .then(|| app.state.backend_alive()),
    ));
    if app.state.liveness_checked() {
        if let Some(ml_alive) = app.state.ml_service_alive() {
            right_spans.push(Span::raw("  "));
            right_spans.push(Span::styled("ML ", Style::default().fg(Color::DarkGray)));
            right_spans.push(liveness_span(Some(ml_alive)));
        }
    }
    let right = Paragraph::new(Line::from(right_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn liveness_span(alive: Option<bool>) -> Span<'static> {
    match alive {
        None => Span::styled("checking", Style::default().fg(Color::DarkGray)),
        Some(true) => Span::styled("● online", Style::default().fg(Color::LightGreen)),
        Some(false) => Span::styled("● offline", Style::default().fg(Color::LightRed)),
    }
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let page = match app.page {
        Page::InsertWallet => "Insert wallet",
        Page::Results => "Results",
    };
    let mut spans = vec![
        Span::styled("Page ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", page)),
        Span::styled("History ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.state.search_history().len())),
    ];
    if let Some(address) = app.state.analyzed_address() {
        spans.push(Span::styled("Wallet ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(crate::domain::format::wallet_address(address)));
    }
    if app.state.is_loading() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} analysing", spinner(app)),
            Style::default().fg(Color::LightYellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("0x") {
        return Some("Analyse this address");
    }

    let commands = [
        ("search", "Analyse a wallet address"),
        ("back", "Back to the address input"),
        ("results", "Show the last analysis"),
        ("export", "Export analysis (csv|json)"),
        ("copy", "Copy the focused item"),
        ("help", "Toggle help"),
        ("quit", "Quit"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("search <addr> | back | export [csv|json] | copy");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(&app.command.input),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let hints: &[(&str, &str)] = match (app.page, app.focus) {
        (Page::InsertWallet, Focus::Input) => &[
            ("Enter", "analyse"),
            ("Tab", "quick picks"),
            ("Esc", "clear"),
            ("Ctrl-c", "quit"),
        ],
        (Page::InsertWallet, _) => &[
            ("Enter", "analyse"),
            ("Tab", "input"),
            ("r", "results"),
            (":", "command"),
            ("?", "help"),
        ],
        (Page::Results, Focus::Transactions) => &[
            ("f/t", "analyse from/to"),
            ("o", "copy explorer URL"),
            ("y", "copy hash"),
            ("e", "export"),
            ("Esc", "back"),
        ],
        (Page::Results, Focus::SimilarWallets) => &[
            ("Enter", "analyse"),
            ("y", "copy address"),
            ("Tab", "next panel"),
            ("Esc", "back"),
        ],
        (Page::Results, _) => &[
            ("y", "copy address"),
            ("Tab", "next panel"),
            ("e", "export"),
            ("Esc", "back"),
        ],
    };

    let mut spans = Vec::new();
    for (idx, (key, label)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::LightCyan),
        ));
        spans.push(Span::styled(
            format!(" {}", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Insert wallet"),
        Line::from("  type       Edit the address"),
        Line::from("  Enter      Analyse address / quick pick"),
        Line::from("  Tab        Input <-> quick picks"),
        Line::from("  j / k      Move selection"),
        Line::from("  r          Back to results"),
        Line::from(""),
        Line::from("Results"),
        Line::from("  Tab        Cycle panels"),
        Line::from("  j / k      Move selection"),
        Line::from("  Enter      Analyse similar wallet"),
        Line::from("  f / t      Analyse from / to address"),
        Line::from("  o          Copy explorer URL"),
        Line::from("  y / Y      Copy focused item / wallet"),
        Line::from("  e / E      Export CSV / JSON"),
        Line::from("  Esc / b    New search"),
        Line::from(""),
        Line::from("Commands (:)"),
        Line::from("  search <addr>, back, results"),
        Line::from("  export [csv|json], copy, help, quit"),
        Line::from(""),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(format!("Focus: {}", app.focus_label())),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER.len()]
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
}

fn highlight_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
