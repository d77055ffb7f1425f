use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, DraftField, ModalState, UserDraft};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let visible = app.store.visible_users();

    if visible.is_empty() {
        let message = if let Some(err) = &app.store.error {
            format!("Could not load users: {err}")
        } else if app.store.users.is_empty() {
            "No users loaded".to_string()
        } else {
            "No users match the search".to_string()
        };
        let style = if app.store.error.is_some() {
            Style::default().fg(app.theme.error_fg)
        } else {
            Style::default().fg(app.theme.text)
        };
        let p = Paragraph::new(message).style(style).block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(p, area);
        return;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = &visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.company.name.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ];

    let header = Row::new(vec!["ID", "NAME", "EMAIL", "COMPANY"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::REVERSED),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.store.visible_users();
    let text = match visible.get(app.selected_index) {
        Some(u) => format!(
            "Name: {}\nEmail: {}\nStreet: {}\nCity: {}\nCompany: {}\nID: {}",
            u.name, u.email, u.address.street, u.address.city, u.company.name, u.id
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_user_modal(f: &mut Frame, area: Rect, app: &mut AppState, state: &ModalState) {
    match state {
        ModalState::AddUser { draft, field } => {
            render_form(f, area, app, "Add user", draft, *field);
        }
        ModalState::EditUser { draft, field, .. } => {
            render_form(f, area, app, "Edit user", draft, *field);
        }
        ModalState::DeleteConfirm { name, selected, .. } => {
            let rect = crate::ui::components::centered_rect(50, 7, area);
            let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
            let no = if *selected == 1 { "[No]" } else { " No  " };
            let body = format!("Delete user '{name}'?\n\n  {yes}    {no}");
            let p = Paragraph::new(body).block(
                Block::default()
                    .title("Confirm delete")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        _ => {}
    }
}

fn render_form(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    draft: &UserDraft,
    active: DraftField,
) {
    let rect = crate::ui::components::centered_rect(54, 10, area);
    let fields = [
        DraftField::Name,
        DraftField::Email,
        DraftField::Street,
        DraftField::City,
        DraftField::Company,
    ];
    let mut text = String::new();
    for field in fields {
        let marker = if field == active { "▶" } else { " " };
        text.push_str(&format!("{marker} {:<8} {}\n", field.label(), draft.field(field)));
    }
    text.push_str("\nTab: next field  Enter: save  Esc: cancel");
    let p = Paragraph::new(text).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
