use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::api::{RestClient, UserApi};
use crate::app::{AppState, DraftField, InputMode, ModalState, UserDraft};
use crate::app::keymap::KeyAction;
use crate::error::{WriteFailure, WriteOp};
use crate::store::StoreEvent;
use crate::ui;

/// Synchronous draw/poll loop. Remote calls run as tasks on the runtime
/// behind `handle`; their completion events arrive on an mpsc channel and
/// are applied through the store reducer before each redraw. Racing
/// responses therefore resolve as last-to-arrive-wins.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    handle: Handle,
    client: RestClient,
    mut app: AppState,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // The view mounts: dispatch the one initial fetch.
    dispatch_fetch(&mut app, &handle, &client, &tx);

    loop {
        while let Ok(store_event) = rx.try_recv() {
            handle_store_event(&mut app, store_event);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if !handle_normal_key(&mut app, &key, &handle, &client, &tx) {
                                break;
                            }
                        }
                        InputMode::Search => handle_search_key(&mut app, key.code),
                        InputMode::Modal => handle_modal_key(&mut app, key.code, &handle, &client, &tx),
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_store_event(app: &mut AppState, event: StoreEvent) {
    if let StoreEvent::WriteFailed(failure) = &event {
        app.modal = Some(ModalState::Info {
            message: failure.to_string(),
        });
        app.input_mode = InputMode::Modal;
    }
    app.store.apply(event);
    clamp_selection(app);
}

fn clamp_selection(app: &mut AppState) {
    let len = app.store.visible_users().len();
    app.selected_index = app.selected_index.min(len.saturating_sub(1));
}

/// Returns false when the application should exit.
fn handle_normal_key(
    app: &mut AppState,
    key: &KeyEvent,
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
) -> bool {
    let Some(action) = app.keymap.resolve(key) else {
        return true;
    };
    match action {
        KeyAction::Quit => return false,
        KeyAction::Ignore => {}
        KeyAction::StartSearch => {
            app.store.set_search_term("");
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewUser => {
            app.modal = Some(ModalState::AddUser {
                draft: UserDraft::default(),
                field: DraftField::Name,
            });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::EditSelection | KeyAction::EnterAction => {
            if let Some(user) = app.store.visible_users().get(app.selected_index).copied() {
                app.modal = Some(ModalState::EditUser {
                    id: user.id,
                    draft: UserDraft::from_user(user),
                    field: DraftField::Name,
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(user) = app.store.visible_users().get(app.selected_index).copied() {
                // Default answer is "No"; deletion always goes through the
                // confirmation prompt.
                app.modal = Some(ModalState::DeleteConfirm {
                    id: user.id,
                    name: user.name.clone(),
                    selected: 1,
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::Refresh => dispatch_fetch(app, handle, client, tx),
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.store.visible_users().len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageBack => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyAction::PageForward => {
            let rpp = app.rows_per_page.max(1);
            let last = app.store.visible_users().len().saturating_sub(1);
            app.selected_index = app.selected_index.saturating_add(rpp).min(last);
        }
    }
    true
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.store.set_search_term("");
            app.input_mode = InputMode::Normal;
            clamp_selection(app);
        }
        KeyCode::Backspace => {
            let mut term = app.store.search_term.clone();
            term.pop();
            app.store.set_search_term(term);
            clamp_selection(app);
        }
        KeyCode::Char(c) => {
            let mut term = app.store.search_term.clone();
            term.push(c);
            app.store.set_search_term(term);
            clamp_selection(app);
        }
        _ => {}
    }
}

fn handle_modal_key(
    app: &mut AppState,
    code: KeyCode,
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
) {
    match &mut app.modal {
        Some(ModalState::AddUser { draft, field }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::Down => *field = field.next(),
            KeyCode::BackTab | KeyCode::Up => *field = field.prev(),
            KeyCode::Backspace => {
                draft.field_mut(*field).pop();
            }
            KeyCode::Char(c) => {
                draft.field_mut(*field).push(c);
            }
            KeyCode::Enter => {
                if draft.is_submittable() {
                    dispatch_create(handle, client, tx, draft.to_candidate());
                    close_modal(app);
                } else {
                    app.modal = Some(ModalState::Info {
                        message: "A name and a valid email are required.".to_string(),
                    });
                }
            }
            _ => {}
        },
        Some(ModalState::EditUser { id, draft, field }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::Down => *field = field.next(),
            KeyCode::BackTab | KeyCode::Up => *field = field.prev(),
            KeyCode::Backspace => {
                draft.field_mut(*field).pop();
            }
            KeyCode::Char(c) => {
                draft.field_mut(*field).push(c);
            }
            KeyCode::Enter => {
                if draft.is_submittable() {
                    dispatch_update(handle, client, tx, draft.to_user(*id));
                    close_modal(app);
                } else {
                    app.modal = Some(ModalState::Info {
                        message: "A name and a valid email are required.".to_string(),
                    });
                }
            }
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => *selected = if *selected == 0 { 1 } else { 0 },
            KeyCode::Enter => {
                if *selected == 0 {
                    dispatch_delete(handle, client, tx, *id);
                }
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn dispatch_fetch(
    app: &mut AppState,
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
) {
    app.store.apply(StoreEvent::FetchStarted);
    let client = client.clone();
    let tx = tx.clone();
    handle.spawn(async move {
        let event = match client.list_users().await {
            Ok(users) => StoreEvent::Fetched(users),
            Err(e) => StoreEvent::FetchFailed(e.to_string()),
        };
        let _ = tx.send(event);
    });
}

fn dispatch_create(
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
    candidate: crate::api::NewUser,
) {
    let client = client.clone();
    let tx = tx.clone();
    handle.spawn(async move {
        let event = match client.create_user(&candidate).await {
            Ok(created) => StoreEvent::Created(created),
            Err(source) => StoreEvent::WriteFailed(WriteFailure {
                operation: WriteOp::Create,
                id: None,
                source,
            }),
        };
        let _ = tx.send(event);
    });
}

fn dispatch_update(
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
    record: crate::api::User,
) {
    let client = client.clone();
    let tx = tx.clone();
    handle.spawn(async move {
        let event = match client.update_user(&record).await {
            Ok(()) => StoreEvent::Updated(record),
            Err(source) => StoreEvent::WriteFailed(WriteFailure {
                operation: WriteOp::Update,
                id: Some(record.id),
                source,
            }),
        };
        let _ = tx.send(event);
    });
}

fn dispatch_delete(
    handle: &Handle,
    client: &RestClient,
    tx: &UnboundedSender<StoreEvent>,
    id: crate::api::UserId,
) {
    let client = client.clone();
    let tx = tx.clone();
    handle.spawn(async move {
        let event = match client.delete_user(id).await {
            Ok(()) => StoreEvent::Deleted(id),
            Err(source) => StoreEvent::WriteFailed(WriteFailure {
                operation: WriteOp::Delete,
                id: Some(id),
                source,
            }),
        };
        let _ = tx.send(event);
    });
}
