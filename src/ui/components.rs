//! Shared UI components (status bar, loading view, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState};

const SPINNER_FRAMES: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];

/// Full-screen loading view shown while the initial fetch is in flight.
pub fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let frame_idx = (app.started_at.elapsed().as_millis() / 120) as usize % SPINNER_FRAMES.len();
    let rect = centered_rect(30, 3, area);
    let p = Paragraph::new(format!("{} Loading users…", SPINNER_FRAMES[frame_idx]))
        .style(Style::default().fg(app.theme.title))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, rect);
}

/// Render the bottom status bar with mode, counts, and any fetch error.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let error = match &app.store.error {
        Some(e) => format!("  error: {e}"),
        None => String::new(),
    };
    let msg = format!(
        "mode: {mode}  users:{}  shown:{}  rows/page:{}{error}",
        app.store.users.len(),
        app.store.visible_users().len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Centered info/notice modal, dismissed with Enter or Esc.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let rect = centered_rect(56, 7, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.text))
            .block(
                Block::default()
                    .title("Notice")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// A `width` x `height` rect centered inside `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
