//! Results screen: wallet, wallet type, transactions and similar wallets

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::{highlight_style, layout, panel_block};
use crate::app::{App, Focus};
use crate::domain::format;
use crate::domain::{Transaction, WalletAnalysis};

pub(super) fn draw(f: &mut Frame, area: Rect, app: &App) {
    let Some(analysis) = app.state.last_result() else {
        let empty = Paragraph::new("No analysis yet. Press Esc to enter an address.")
            .block(panel_block("Results".to_string(), false));
        f.render_widget(empty, area);
        return;
    };
    let areas = layout::results_areas(area);

    draw_wallet(f, areas.wallet, app);
    draw_wallet_type(f, areas.wallet_type, analysis);
    draw_similar(f, areas.similar, app, analysis);
    draw_transactions(f, areas.transactions, app, analysis);
    draw_transaction_detail(f, areas.details, app);
}

fn draw_wallet(f: &mut Frame, area: Rect, app: &App) {
    let address = app.state.analyzed_address().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            format::wallet_address(address),
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "y copy full address",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(Text::from(lines)).block(panel_block(
        "Current wallet".to_string(),
        app.focus == Focus::Wallet,
    ));
    f.render_widget(paragraph, area);
}

fn draw_wallet_type(f: &mut Frame, area: Rect, analysis: &WalletAnalysis) {
    let class = analysis.predicted_class().unwrap_or("Unknown");
    let percent = analysis
        .confidence()
        .map(format::confidence_percent)
        .unwrap_or(0);

    let block = panel_block(format!("Wallet type: {class}"), false);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let gauge_area = match analysis.ml_error() {
        Some(error) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(inner);
            let line = Line::from(Span::styled(
                format!("ML: {error}"),
                Style::default().fg(Color::LightRed),
            ));
            f.render_widget(Paragraph::new(line), rows[0]);
            rows[1]
        }
        None => inner,
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightGreen).bg(Color::DarkGray))
        .percent(percent)
        .label(format!("{percent}% confidence"));
    f.render_widget(gauge, gauge_area);
}

fn draw_similar(f: &mut Frame, area: Rect, app: &App, analysis: &WalletAnalysis) {
    let focused = app.focus == Focus::SimilarWallets;
    let wallets = analysis.similar_wallets();

    let items: Vec<ListItem> = wallets
        .iter()
        .map(|wallet| {
            let mut spans = vec![Span::raw(format::format_address(&wallet.address))];
            if let Some(label) = wallet.label.as_deref().filter(|l| !l.trim().is_empty()) {
                spans.push(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(Color::LightBlue),
                ));
            }
            if let Some(count) = wallet.transaction_count {
                spans.push(Span::styled(
                    format!("  {count} txs"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(
            format!("Similar wallets ({})", wallets.len()),
            focused,
        ))
        .highlight_style(highlight_style(focused))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !wallets.is_empty() {
        state.select(Some(app.selected_similar));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_transactions(f: &mut Frame, area: Rect, app: &App, analysis: &WalletAnalysis) {
    let focused = app.focus == Focus::Transactions;

    let items: Vec<ListItem> = analysis
        .transactions
        .iter()
        .map(|tx| {
            let (status, color) = status_label(tx);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{status:<8}"), Style::default().fg(color)),
                Span::raw(format!("{} ", format::format_hash(&tx.hash))),
                Span::styled(
                    format!("{} ETH", format::format_ether(&tx.value)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(
            format!("Last transactions ({})", analysis.transactions.len()),
            focused,
        ))
        .highlight_style(highlight_style(focused))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !analysis.transactions.is_empty() {
        state.select(Some(app.selected_tx));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_transaction_detail(f: &mut Frame, area: Rect, app: &App) {
    let lines = match app.selected_transaction() {
        Some(tx) => transaction_lines(tx),
        None => vec![Line::from(Span::styled(
            "No transactions",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel_block("Transaction".to_string(), false))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn transaction_lines(tx: &Transaction) -> Vec<Line<'static>> {
    let (status, color) = status_label(tx);
    let from = tx
        .from_label()
        .map(str::to_string)
        .unwrap_or_else(|| format::format_address(&tx.from_address));
    let to = tx
        .to_label()
        .map(str::to_string)
        .unwrap_or_else(|| format::format_address(&tx.to_address));

    vec![
        Line::from(vec![
            Span::raw(format::format_date(&tx.block_timestamp)),
            Span::raw("  "),
            Span::styled(status, Style::default().fg(color)),
        ]),
        field("Hash", format::format_hash(&tx.hash)),
        field("From", from),
        field("To", to),
        field("Value", format!("{} ETH", format::format_ether(&tx.value))),
        field("Fee", format!("{} ETH", tx.transaction_fee)),
        field(
            "Gas price",
            format!("{} Gwei", format::format_gas_price(&tx.gas_price)),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "f analyse from  t analyse to  o copy explorer URL",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn status_label(tx: &Transaction) -> (&'static str, Color) {
    if tx.succeeded() {
        ("Success", Color::LightGreen)
    } else {
        ("Failed", Color::LightRed)
    }
}
