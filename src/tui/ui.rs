use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::app::{App, FormKind, Tab, TabData, UiEvent};
use super::render::render_ui;
use crate::app::AppState;
use crate::nav::Root;
use crate::notify::{Notifier, QueueNotifier};
use crate::views::{build_agenda, format};

/// Run the terminal UI
///
/// The gate is bootstrapped in the background so the splash shows until the
/// stored session has been read.
pub async fn run_ui(state: AppState, notices: Arc<QueueNotifier>) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("shelter requires an interactive terminal for the UI.");
        eprintln!("   Use a subcommand instead, e.g. `shelter animals list`.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    let gate = state.gate.clone();
    tokio::spawn(async move {
        gate.bootstrap().await;
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let tick = Duration::from_millis(state.config.ui.tick_ms.max(10));
    let mut app = App::new(state, notices);
    let (tx, mut rx) = mpsc::channel::<UiEvent>(64);

    let res = run_app(&mut terminal, &mut app, tick, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
    tx: mpsc::Sender<UiEvent>,
    rx: &mut mpsc::Receiver<UiEvent>,
) -> Result<()> {
    while app.running {
        // The gate decides the root; pick up any change before drawing
        if app.sync_root() {
            debug!(root = ?app.root, "root changed");
            if app.root == Root::Authenticated {
                load_tab(app, &tx);
            }
        }
        app.refresh_notice();

        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, &tx);
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            if app.apply(event) && app.root == Root::Authenticated {
                load_tab(app, &tx);
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<UiEvent>) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.root {
        Root::Splash => {}
        Root::Auth => handle_auth_key(app, key, tx),
        Root::Authenticated => handle_main_key(app, key, tx),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<UiEvent>) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
        KeyCode::F(2) => app.toggle_auth_form(),
        KeyCode::Enter => submit_auth_form(app, tx),
        _ => app.form.type_key(key),
    }
}

fn submit_auth_form(app: &mut App, tx: &mpsc::Sender<UiEvent>) {
    if app.auth_busy {
        return;
    }
    app.auth_busy = true;

    let auth = app.state.auth.clone();
    let notifier: Arc<dyn Notifier> = app.notices.clone();
    let tx = tx.clone();

    match app.form.kind {
        FormKind::Login => {
            let form = app.form.login_form();
            tokio::spawn(async move {
                let event = match auth.login(&form).await {
                    Ok(route) => UiEvent::Navigate(route),
                    Err(e) => {
                        notifier.report_error(&e);
                        UiEvent::AuthFailed
                    }
                };
                let _ = tx.send(event).await;
            });
        }
        FormKind::Register => {
            let form = app.form.register_form();
            tokio::spawn(async move {
                let event = match auth.register(&form).await {
                    Ok(route) => {
                        notifier.success("Account created", "You can log in now.");
                        UiEvent::Navigate(route)
                    }
                    Err(e) => {
                        notifier.report_error(&e);
                        UiEvent::AuthFailed
                    }
                };
                let _ = tx.send(event).await;
            });
        }
    }
}

fn handle_main_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<UiEvent>) {
    if app.detail.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q')) {
            app.detail = None;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Right | KeyCode::Tab => {
            app.select_tab(app.tab.next());
            load_tab(app, tx);
        }
        KeyCode::Left | KeyCode::BackTab => {
            app.select_tab(app.tab.previous());
            load_tab(app, tx);
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.select_tab(Tab::ALL[index]);
            load_tab(app, tx);
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Char('r') => load_tab(app, tx),
        KeyCode::Enter => open_detail(app, tx),
        KeyCode::Char('L') => logout(app, tx),
        _ => {}
    }
}

fn logout(app: &mut App, tx: &mpsc::Sender<UiEvent>) {
    if app.auth_busy {
        app.notices.info("Logout", "Already in progress.");
        return;
    }
    app.auth_busy = true;

    let auth = app.state.auth.clone();
    let notifier: Arc<dyn Notifier> = app.notices.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match auth.logout().await {
            Ok(route) => {
                notifier.info("Logged out", "Session cleared.");
                UiEvent::Navigate(route)
            }
            Err(e) => {
                notifier.report_error(&e);
                UiEvent::AuthFailed
            }
        };
        let _ = tx.send(event).await;
    });
}

/// Fetch the data behind the current tab
fn load_tab(app: &mut App, tx: &mpsc::Sender<UiEvent>) {
    app.busy = true;
    let api = app.state.api.clone();
    let notifier: Arc<dyn Notifier> = app.notices.clone();
    let tx = tx.clone();
    let tab = app.tab;
    let generation = app.generation;

    tokio::spawn(async move {
        let result = match tab {
            Tab::Animals => api.list_animals().await.map(TabData::Animals),
            Tab::Adopters => api.list_adopters().await.map(TabData::Adopters),
            Tab::Calendar => futures::try_join!(api.list_appointments(), api.list_animals())
                .map(|(appointments, animals)| {
                    TabData::Agenda(build_agenda(&appointments, &animals))
                }),
            Tab::Health => api.health_records().await.map(TabData::HealthRecords),
            Tab::Profile => api.get_profile().await.map(TabData::Profile),
        };

        match result {
            Ok(data) => {
                let _ = tx.send(UiEvent::Loaded { generation, data }).await;
            }
            Err(e) => notifier.report_error(&e),
        }
        let _ = tx.send(UiEvent::Idle).await;
    });
}

/// Show the history of the selected animal or the details of an appointment
fn open_detail(app: &mut App, tx: &mpsc::Sender<UiEvent>) {
    let api = app.state.api.clone();
    let notifier: Arc<dyn Notifier> = app.notices.clone();
    let tx = tx.clone();
    let generation = app.generation;

    match app.tab {
        Tab::Animals => {
            let Some(id) = app.animals.get(app.selected).map(|a| a.id.clone()) else {
                return;
            };
            tokio::spawn(async move {
                match api.animal_history(&id).await {
                    Ok(history) => {
                        let data = TabData::Detail(format::animal_history(&history));
                        let _ = tx.send(UiEvent::Loaded { generation, data }).await;
                    }
                    Err(e) => notifier.report_error(&e),
                }
            });
        }
        Tab::Calendar => {
            let Some(id) = app
                .agenda
                .values()
                .flatten()
                .nth(app.selected)
                .map(|item| item.appointment_id.clone())
            else {
                return;
            };
            tokio::spawn(async move {
                match api.appointment_details(&id).await {
                    Ok(details) => {
                        let data = TabData::Detail(format::appointment_details(&details));
                        let _ = tx.send(UiEvent::Loaded { generation, data }).await;
                    }
                    Err(e) => notifier.report_error(&e),
                }
            });
        }
        Tab::Adopters => {
            if let Some(adopter) = app.adopters.get(app.selected) {
                app.detail = Some(format::adopter_detail(adopter));
            }
        }
        Tab::Health | Tab::Profile => {}
    }
}
