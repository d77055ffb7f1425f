pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::{AppState, InputMode, ModalState, SIDEBAR_ITEMS};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let full = f.area();

    // The initial fetch gates the whole page behind a loading view.
    if app.store.loading {
        components::render_loading(f, full, app);
        return;
    }

    let root = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(40)].as_ref())
        .split(full);
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(root[1]);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
        .split(main[1]);

    render_sidebar(f, root[0], app);
    render_header(f, main[0], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, main[2], app);

    if app.modal.is_some() {
        render_modal(f, full, app);
    }
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &AppState) {
    let items: Vec<ListItem> = SIDEBAR_ITEMS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            // Only the dashboard view exists; it is always the active entry.
            let style = if i == 0 {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            let marker = if i == 0 { "▶ " } else { "  " };
            ListItem::new(Line::from(Span::styled(format!("{marker}{label}"), style)))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title("userdash")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(list, area);
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search name/email: {}_", app.store.search_term),
        _ if !app.store.search_term.is_empty() => {
            format!("  filter: \"{}\"", app.store.search_term)
        }
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "Users{prompt}  total:{}  shown:{}  | /: search; n: new; e/Enter: edit; d/Del: delete; r: refresh; q: quit",
        app.store.users.len(),
        app.store.visible_users().len(),
    ))
    .block(
        Block::default()
            .title("User directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match state {
            ModalState::AddUser { .. }
            | ModalState::EditUser { .. }
            | ModalState::DeleteConfirm { .. } => {
                users::render_user_modal(f, area, app, &state);
            }
            ModalState::Info { .. } => {
                components::render_info_modal(f, area, app, &state);
            }
        }
    }
}
