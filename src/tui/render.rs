use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, FormKind, Tab};
use crate::nav::Root;
use crate::views::format;

/// Render the whole screen for the current root
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    match app.root {
        Root::Splash => render_splash(frame, chunks[1], app),
        Root::Auth => render_auth(frame, chunks[1], app),
        Root::Authenticated => render_authenticated(frame, chunks[1], app),
    }

    render_status_bar(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let who = match app.view.user_id() {
        Some(id) => format!("user #{}", id),
        None => "not logged in".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Shelter", app.theme.title()),
        Span::raw(" | "),
        Span::styled(app.state.api.base_url(), app.theme.dimmed()),
        Span::raw(" | "),
        Span::styled(who, app.theme.text()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(app.theme.border(false)),
    );
    frame.render_widget(header, area);
}

fn render_splash(frame: &mut Frame, area: Rect, app: &App) {
    let splash = Paragraph::new("Loading session...")
        .style(app.theme.dimmed())
        .alignment(Alignment::Center);
    frame.render_widget(splash, centered(area, 40, 1));
}

fn render_auth(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let height = form.len() as u16 * 3 + 2;
    let area = centered(area, 60, height);

    let title = match form.kind {
        FormKind::Login => " Log in ",
        FormKind::Register => " Create account ",
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(app.theme.border(true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); form.len()])
        .split(inner);

    for (index, row) in rows.iter().enumerate() {
        let mut input = form.input(index).clone();
        let focused = index == form.focus;
        input.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(form.label(index))
                .border_style(app.theme.border(focused)),
        );
        if !focused {
            input.set_cursor_style(app.theme.text());
        }
        frame.render_widget(&input, *row);
    }
}

fn render_authenticated(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(app.theme.dimmed())
        .highlight_style(app.theme.title().add_modifier(Modifier::UNDERLINED));
    frame.render_widget(tabs, chunks[0]);

    if let Some(detail) = &app.detail {
        let pane = Paragraph::new(detail.as_str())
            .style(app.theme.text())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Details (Esc to close) ")
                    .borders(Borders::ALL)
                    .border_style(app.theme.border(true)),
            );
        frame.render_widget(Clear, chunks[1]);
        frame.render_widget(pane, chunks[1]);
        return;
    }

    if app.tab == Tab::Profile {
        let text = app
            .profile
            .as_ref()
            .map(format::profile_detail)
            .unwrap_or_else(|| "Loading profile...".to_string());
        let pane = Paragraph::new(text).style(app.theme.text()).block(
            Block::default()
                .title(" Profile ")
                .borders(Borders::ALL)
                .border_style(app.theme.border(false)),
        );
        frame.render_widget(pane, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = list_rows(app)
        .into_iter()
        .map(|(text, selectable)| {
            let item = ListItem::new(text);
            if selectable {
                item.style(app.theme.text())
            } else {
                item.style(app.theme.title())
            }
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", app.tab.title()))
                .borders(Borders::ALL)
                .border_style(app.theme.border(true)),
        )
        .highlight_style(app.theme.highlight())
        .highlight_symbol("▶ ");

    if empty {
        let placeholder = Paragraph::new(if app.busy { "Loading..." } else { "Nothing here yet" })
            .style(app.theme.dimmed())
            .block(
                Block::default()
                    .title(format!(" {} ", app.tab.title()))
                    .borders(Borders::ALL)
                    .border_style(app.theme.border(true)),
            );
        frame.render_widget(placeholder, chunks[1]);
        return;
    }

    let mut state = ListState::default();
    state.select(list_position(app));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Rows of the current list; the flag is false for calendar day headings
fn list_rows(app: &App) -> Vec<(String, bool)> {
    match app.tab {
        Tab::Animals => app
            .animals
            .iter()
            .map(|a| (format::animal_line(a), true))
            .collect(),
        Tab::Adopters => app
            .adopters
            .iter()
            .map(|a| (format::adopter_line(a), true))
            .collect(),
        Tab::Calendar => {
            let mut rows = Vec::new();
            for (day, items) in &app.agenda {
                rows.push((day.clone(), false));
                for item in items {
                    rows.push((
                        format!(
                            "  {}  {}  ({})",
                            item.time.as_deref().unwrap_or("--:--"),
                            item.title,
                            item.veterinarian
                        ),
                        true,
                    ));
                }
            }
            rows
        }
        Tab::Health => app
            .health_records
            .iter()
            .map(|r| (format::health_record_line(r), true))
            .collect(),
        Tab::Profile => Vec::new(),
    }
}

/// Map the selected item index to its row, skipping calendar headings
fn list_position(app: &App) -> Option<usize> {
    if app.tab != Tab::Calendar {
        return Some(app.selected);
    }
    list_rows(app)
        .iter()
        .enumerate()
        .filter(|(_, (_, selectable))| *selectable)
        .nth(app.selected)
        .map(|(row, _)| row)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => Line::from(vec![
            Span::styled(format!("{}: ", notice.title), app.theme.notice(notice.level)),
            Span::styled(notice.message.clone(), app.theme.text()),
        ]),
        None => Line::from(Span::styled(key_hints(app), app.theme.dimmed())),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &App) -> &'static str {
    match app.root {
        Root::Splash => "Ctrl+C quit",
        Root::Auth => match app.form.kind {
            FormKind::Login => "Tab next field | Enter log in | F2 create account | Esc quit",
            FormKind::Register => "Tab next field | Enter register | F2 back to login | Esc quit",
        },
        Root::Authenticated => {
            "←/→ tabs | ↑/↓ select | Enter details | r reload | L log out | q quit"
        }
    }
}

/// A rect of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
