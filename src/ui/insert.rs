//! Insert wallet screen

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::{highlight_style, layout, panel_block, spinner};
use crate::app::{App, Focus, PickSource};
use crate::core::SearchPhase;

pub(super) fn draw(f: &mut Frame, area: Rect, app: &App) {
    let areas = layout::insert_areas(area);

    draw_input(f, areas.input, app);
    draw_feedback(f, areas.feedback, app);
    draw_quick_picks(f, areas.quick_picks, app);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input;
    let mut spans = vec![Span::raw(app.address_input.clone())];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    let input = Paragraph::new(Line::from(spans)).block(panel_block(
        "Provide existing wallet address".to_string(),
        focused,
    ));
    f.render_widget(input, area);
}

fn draw_feedback(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.state.phase() {
        SearchPhase::Loading => Line::from(Span::styled(
            format!(
                " {} Analysing {} ...",
                spinner(app),
                crate::domain::format::wallet_address(app.state.current_address())
            ),
            Style::default().fg(Color::LightYellow),
        )),
        SearchPhase::Failed => Line::from(Span::styled(
            format!(" {}", app.state.last_error().unwrap_or("Analysis failed").trim()),
            Style::default().fg(Color::LightRed),
        )),
        SearchPhase::Idle | SearchPhase::Success => Line::from(Span::styled(
            " Enter an address and press Enter to analyse it",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn draw_quick_picks(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::QuickPicks;
    let picks = app.quick_picks();

    let items: Vec<ListItem> = picks
        .iter()
        .map(|pick| {
            let (tag, color) = match pick.source {
                PickSource::Example => ("example", Color::LightBlue),
                PickSource::History => ("recent ", Color::LightMagenta),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{tag} "), Style::default().fg(color)),
                Span::raw(format!("{:<24}", pick.label)),
                Span::styled(pick.address.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(format!("Quick picks ({})", picks.len()), focused))
        .highlight_style(highlight_style(focused))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !picks.is_empty() {
        state.select(Some(app.selected_pick));
    }
    f.render_stateful_widget(list, area, &mut state);
}
