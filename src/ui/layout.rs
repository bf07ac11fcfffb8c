use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub main: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

/// Insert wallet screen
#[derive(Debug, Clone, Copy)]
pub struct InsertAreas {
    pub input: Rect,
    pub feedback: Rect,
    pub quick_picks: Rect,
}

/// Results screen
#[derive(Debug, Clone, Copy)]
pub struct ResultsAreas {
    pub wallet: Rect,
    pub wallet_type: Rect,
    pub similar: Rect,
    pub transactions: Rect,
    pub details: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[2]);

    UiAreas {
        size,
        header: vertical[0],
        main: vertical[1],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}

pub fn insert_areas(main: Rect) -> InsertAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .split(main);

    InsertAreas {
        input: chunks[0],
        feedback: chunks[1],
        quick_picks: chunks[2],
    }
}

pub fn results_areas(main: Rect) -> ResultsAreas {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    ResultsAreas {
        wallet: left[0],
        wallet_type: left[1],
        similar: left[2],
        transactions: right[0],
        details: right[1],
    }
}
