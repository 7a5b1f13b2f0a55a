use crossterm::event::KeyEvent;
use ratatui::widgets::{Block, Borders};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tui_textarea::TextArea;

use super::theme::Theme;
use crate::api::{Adopter, Animal, HealthRecord, UserProfile};
use crate::app::AppState;
use crate::constants::UI_NOTICE_TTL_SECS;
use crate::forms::{LoginForm, RegisterForm};
use crate::nav::{Root, Route};
use crate::notify::{Notice, QueueNotifier};
use crate::session::GateView;
use crate::views::Agenda;

/// Sections of the authenticated area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Animals,
    Adopters,
    Calendar,
    Health,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Animals,
        Tab::Adopters,
        Tab::Calendar,
        Tab::Health,
        Tab::Profile,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Animals => "Animals",
            Self::Adopters => "Adopters",
            Self::Calendar => "Calendar",
            Self::Health => "Health",
            Self::Profile => "Profile",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Animals => Route::Dashboard,
            Self::Adopters => Route::Adopters,
            Self::Calendar => Route::Calendar,
            Self::Health => Route::HealthRecords,
            Self::Profile => Route::Profile,
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Data fetched for the authenticated area
#[derive(Debug)]
pub enum TabData {
    Animals(Vec<Animal>),
    Adopters(Vec<Adopter>),
    Agenda(Agenda),
    HealthRecords(Vec<HealthRecord>),
    Profile(UserProfile),
    /// Text for the detail pane
    Detail(String),
}

/// Results coming back from background tasks
#[derive(Debug)]
pub enum UiEvent {
    /// An auth operation finished and asks to navigate
    Navigate(Route),
    /// An auth operation failed
    AuthFailed,
    /// A data load ended
    Idle,
    /// Data fetched while `generation` was current
    Loaded { generation: u64, data: TabData },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

struct FormField {
    label: &'static str,
    input: TextArea<'static>,
}

/// Login or registration form under the auth root
pub struct AuthForm {
    pub kind: FormKind,
    fields: Vec<FormField>,
    pub focus: usize,
}

impl AuthForm {
    pub fn new(kind: FormKind) -> Self {
        let labels: &[(&'static str, bool)] = match kind {
            FormKind::Login => &[("Email", false), ("Password", true)],
            FormKind::Register => &[
                ("Name", false),
                ("Email", false),
                ("Address", false),
                ("Password", true),
                ("Confirm password", true),
            ],
        };

        let fields = labels
            .iter()
            .map(|(label, secret)| {
                let mut input = TextArea::default();
                input.set_block(Block::default().borders(Borders::ALL).title(*label));
                if *secret {
                    input.set_mask_char('•');
                }
                FormField { label: *label, input }
            })
            .collect();

        Self {
            kind,
            fields,
            focus: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn label(&self, index: usize) -> &'static str {
        self.fields[index].label
    }

    pub fn input(&self, index: usize) -> &TextArea<'static> {
        &self.fields[index].input
    }

    pub fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.input.lines().join(""))
            .unwrap_or_default()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn type_key(&mut self, key: KeyEvent) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.input.input(key);
        }
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(self.value(0), self.value(1))
    }

    pub fn register_form(&self) -> RegisterForm {
        RegisterForm {
            name: self.value(0),
            email: self.value(1),
            address: self.value(2),
            password: self.value(3),
            confirm_password: self.value(4),
        }
    }
}

/// Interactive application state
pub struct App {
    pub state: AppState,
    pub notices: Arc<QueueNotifier>,
    pub view: GateView,
    pub theme: Theme,
    pub root: Root,
    pub route: Route,
    pub tab: Tab,
    pub selected: usize,
    pub form: AuthForm,
    pub animals: Vec<Animal>,
    pub adopters: Vec<Adopter>,
    pub agenda: Agenda,
    pub health_records: Vec<HealthRecord>,
    pub profile: Option<UserProfile>,
    /// Detail pane text, shown over the list when set
    pub detail: Option<String>,
    pub notice: Option<Notice>,
    /// A data load is in flight
    pub busy: bool,
    /// A login, registration or logout is in flight
    pub auth_busy: bool,
    /// Bumped on every root change; loads started under an older one are dropped
    pub generation: u64,
    pub running: bool,
}

impl App {
    pub fn new(state: AppState, notices: Arc<QueueNotifier>) -> Self {
        let view = state.session();
        let theme = Theme::named(&state.config.ui.theme);
        let root = view.root();

        Self {
            state,
            notices,
            view,
            theme,
            root,
            route: root.entry(),
            tab: Tab::Animals,
            selected: 0,
            form: AuthForm::new(FormKind::Login),
            animals: Vec::new(),
            adopters: Vec::new(),
            agenda: Agenda::new(),
            health_records: Vec::new(),
            profile: None,
            detail: None,
            notice: None,
            busy: false,
            auth_busy: false,
            generation: 0,
            running: true,
        }
    }

    /// Follow the gate; returns true when the root changed
    pub fn sync_root(&mut self) -> bool {
        let root = self.view.root();
        if root == self.root {
            return false;
        }

        self.root = root;
        self.generation += 1;
        self.busy = false;
        self.route = root.entry();
        self.detail = None;
        self.selected = 0;
        if root == Root::Authenticated {
            self.tab = Tab::Animals;
        } else {
            self.clear_data();
            self.form = AuthForm::new(FormKind::Login);
        }
        true
    }

    /// Navigate; routes the current root does not admit are redirected
    pub fn navigate(&mut self, route: Route) {
        let route = self.root.resolve(route);
        match route {
            Route::Login => self.form = AuthForm::new(FormKind::Login),
            Route::Register => self.form = AuthForm::new(FormKind::Register),
            _ => {
                if let Some(tab) = Tab::ALL.iter().find(|t| t.route() == route) {
                    self.tab = *tab;
                }
            }
        }
        self.route = route;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.route = tab.route();
        self.selected = 0;
        self.detail = None;
    }

    pub fn toggle_auth_form(&mut self) {
        let next = match self.form.kind {
            FormKind::Login => Route::Register,
            FormKind::Register => Route::Login,
        };
        self.navigate(next);
    }

    /// Number of rows in the current tab's list
    pub fn row_count(&self) -> usize {
        match self.tab {
            Tab::Animals => self.animals.len(),
            Tab::Adopters => self.adopters.len(),
            Tab::Calendar => self.agenda.values().map(Vec::len).sum(),
            Tab::Health => self.health_records.len(),
            Tab::Profile => 0,
        }
    }

    pub fn select_next(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + 1).min(rows - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Fold a background result into the state; returns true when the root changed
    pub fn apply(&mut self, event: UiEvent) -> bool {
        let mut root_changed = false;
        match event {
            UiEvent::Navigate(route) => {
                self.auth_busy = false;
                root_changed = self.sync_root();
                self.navigate(route);
            }
            UiEvent::AuthFailed => self.auth_busy = false,
            UiEvent::Idle => self.busy = false,
            UiEvent::Loaded { generation, data } => {
                if generation != self.generation || self.root != Root::Authenticated {
                    debug!(generation, current = self.generation, "dropping stale result");
                    return false;
                }
                match data {
                    TabData::Animals(animals) => self.animals = animals,
                    TabData::Adopters(adopters) => self.adopters = adopters,
                    TabData::Agenda(agenda) => self.agenda = agenda,
                    TabData::HealthRecords(records) => self.health_records = records,
                    TabData::Profile(profile) => self.profile = Some(profile),
                    TabData::Detail(text) => self.detail = Some(text),
                }
            }
        }
        let rows = self.row_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
        root_changed
    }

    /// Pick up new notices and drop the expired one
    pub fn refresh_notice(&mut self) {
        if let Some(latest) = self.notices.drain().pop() {
            self.notice = Some(latest);
        }
        let ttl = Duration::from_secs(UI_NOTICE_TTL_SECS);
        if self.notice.as_ref().is_some_and(|n| n.is_expired(ttl)) {
            self.notice = None;
        }
    }

    fn clear_data(&mut self) {
        self.animals.clear();
        self.adopters.clear();
        self.agenda.clear();
        self.health_records.clear();
        self.profile = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::session::{MemorySessionStore, Session};

    async fn signed_in_app() -> App {
        let store = MemorySessionStore::with_session(Session::new(
            Some("7".into()),
            Some("tok".into()),
        ));
        let notices = Arc::new(QueueNotifier::new());
        let state = AppState::new(Config::default(), Arc::new(store), notices.clone()).unwrap();
        state.gate.bootstrap().await;

        let mut app = App::new(state, notices);
        app.sync_root();
        app
    }

    fn luna() -> Animal {
        serde_json::from_value(serde_json::json!({ "id": 1, "nombre": "Luna" })).unwrap()
    }

    #[tokio::test]
    async fn test_load_applies_under_current_generation() {
        let mut app = signed_in_app().await;
        assert_eq!(app.root, Root::Authenticated);

        app.apply(UiEvent::Loaded {
            generation: app.generation,
            data: TabData::Animals(vec![luna()]),
        });
        assert_eq!(app.animals.len(), 1);
    }

    #[tokio::test]
    async fn test_load_from_before_logout_is_dropped() {
        let mut app = signed_in_app().await;
        let started_under = app.generation;

        app.state.gate.sign_out().await.unwrap();
        assert!(app.sync_root());
        assert_eq!(app.root, Root::Auth);

        app.apply(UiEvent::Loaded {
            generation: started_under,
            data: TabData::Animals(vec![luna()]),
        });
        assert!(app.animals.is_empty());
    }

    #[tokio::test]
    async fn test_auth_action_not_blocked_by_data_load() {
        let mut app = signed_in_app().await;
        app.busy = true;
        app.auth_busy = true;

        app.apply(UiEvent::AuthFailed);
        assert!(!app.auth_busy);
        assert!(app.busy);

        app.apply(UiEvent::Idle);
        assert!(!app.busy);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Animals.next(), Tab::Adopters);
        assert_eq!(Tab::Animals.previous(), Tab::Profile);
        assert_eq!(Tab::Profile.next(), Tab::Animals);
        assert_eq!(Tab::Calendar.route(), Route::Calendar);
    }

    #[test]
    fn test_register_form_fields() {
        let form = AuthForm::new(FormKind::Register);
        assert_eq!(form.len(), 5);
        assert_eq!(form.label(4), "Confirm password");
        assert_eq!(form.register_form(), RegisterForm::default());
    }
}
