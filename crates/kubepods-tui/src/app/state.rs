use chrono::Utc;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use kubepods_types::{ContextInfo, PodRecord, SortKey, TableRow};

use super::{Action, DeleteMenuState, FsBrowser, PodTable, RefreshGate};

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    PodTable,
    ContextSelect,
    FileBrowser,
}

/// Message shown in the line above the status bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// UI-specific transient state
pub struct UiState {
    /// Is help overlay visible?
    pub help_visible: bool,

    /// List state for the context selection screen
    pub list_state: ListState,

    /// Last status or error message (if any)
    pub message: Option<StatusMessage>,

    /// Delete-with-options popup, when open
    pub delete_menu: Option<DeleteMenuState>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            help_visible: false,
            list_state: ListState::default(),
            message: None,
            delete_menu: None,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Available Kubernetes contexts
    pub contexts: Vec<ContextInfo>,

    /// kubectl's current context, as last observed
    pub current_context: Option<String>,

    /// Namespace pod commands are scoped to (None = kubectl default)
    pub namespace: Option<String>,

    /// The pod table
    pub pod_table: PodTable,

    /// Refresh serialization and status
    pub refresh: RefreshGate,

    /// Filesystem browser, while open
    pub fs_browser: Option<FsBrowser>,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for async actions
    pub action_tx: mpsc::UnboundedSender<Action>,
}

impl AppState {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, sort_key: SortKey) -> Self {
        Self {
            current_screen: Screen::PodTable,
            screen_stack: Vec::new(),
            contexts: Vec::new(),
            current_context: None,
            namespace: None,
            pod_table: PodTable::new(sort_key),
            refresh: RefreshGate::new(),
            fs_browser: None,
            ui_state: UiState::default(),
            should_quit: false,
            action_tx,
        }
    }

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
        self.ui_state.list_state.select(Some(0));
    }

    /// Go back to previous screen
    pub fn go_back(&mut self) -> bool {
        if let Some(prev_screen) = self.screen_stack.pop() {
            if self.current_screen == Screen::FileBrowser {
                self.fs_browser = None;
            }
            self.current_screen = prev_screen;
            true
        } else {
            false
        }
    }

    /// Show the context list, selecting the current context
    pub fn open_contexts(&mut self, contexts: Vec<ContextInfo>) {
        self.contexts = contexts;
        if let Some(current) = self.contexts.iter().find(|c| c.is_current) {
            self.current_context = Some(current.name.clone());
        }
        if self.current_screen != Screen::ContextSelect {
            self.navigate_to(Screen::ContextSelect);
        }
        let current = self.contexts.iter().position(|c| c.is_current);
        self.ui_state.list_state.select(current.or(Some(0)));
    }

    /// Record a context switch made through kubectl
    pub fn context_switched(&mut self, name: String) {
        for ctx in &mut self.contexts {
            ctx.is_current = ctx.name == name;
        }
        self.current_context = Some(name);
    }

    /// Project freshly fetched pods and replace the table
    pub fn pods_loaded(&mut self, pods: &[PodRecord]) {
        let now = Utc::now();
        let rows = pods.iter().map(|p| TableRow::project(p, now)).collect();
        self.pod_table.refresh(rows);
    }

    /// Apply a successful fetch. Clears the error left by an earlier failed
    /// refresh. Returns true when a coalesced follow-up fetch should start.
    pub fn refresh_succeeded(&mut self, pods: &[PodRecord]) -> bool {
        if self
            .ui_state
            .message
            .as_ref()
            .is_some_and(|m| m.is_error && m.text.starts_with(REFRESH_FAILED))
        {
            self.dismiss_message();
        }
        self.pods_loaded(pods);
        self.refresh.succeed()
    }

    /// Record a failed fetch, keeping the current rows. Returns true when a
    /// coalesced follow-up fetch should start.
    pub fn refresh_failed(&mut self, error: String) -> bool {
        self.show_error(refresh_error_text(&error));
        self.refresh.fail(error)
    }

    /// Move selection up on the current screen
    pub fn list_up(&mut self) {
        match self.current_screen {
            Screen::PodTable => self.pod_table.select_previous(),
            Screen::ContextSelect => {
                let len = self.contexts.len();
                if len == 0 {
                    return;
                }
                let i = match self.ui_state.list_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.ui_state.list_state.select(Some(i));
            }
            Screen::FileBrowser => {
                if let Some(fs) = &mut self.fs_browser {
                    fs.move_up();
                }
            }
        }
    }

    /// Move selection down on the current screen
    pub fn list_down(&mut self) {
        match self.current_screen {
            Screen::PodTable => self.pod_table.select_next(),
            Screen::ContextSelect => {
                let len = self.contexts.len();
                if len == 0 {
                    return;
                }
                let i = match self.ui_state.list_state.selected() {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.ui_state.list_state.select(Some(i));
            }
            Screen::FileBrowser => {
                if let Some(fs) = &mut self.fs_browser {
                    fs.move_down();
                }
            }
        }
    }

    /// Jump to the first row on the current screen
    pub fn list_top(&mut self) {
        match self.current_screen {
            Screen::PodTable => self.pod_table.select_first(),
            Screen::ContextSelect => {
                if !self.contexts.is_empty() {
                    self.ui_state.list_state.select(Some(0));
                }
            }
            Screen::FileBrowser => {
                if let Some(fs) = &mut self.fs_browser {
                    if !fs.entries.is_empty() {
                        fs.list_state.select(Some(0));
                    }
                }
            }
        }
    }

    /// Jump to the last row on the current screen
    pub fn list_bottom(&mut self) {
        match self.current_screen {
            Screen::PodTable => self.pod_table.select_last(),
            Screen::ContextSelect => {
                if let Some(last) = self.contexts.len().checked_sub(1) {
                    self.ui_state.list_state.select(Some(last));
                }
            }
            Screen::FileBrowser => {
                if let Some(fs) = &mut self.fs_browser {
                    if let Some(last) = fs.entries.len().checked_sub(1) {
                        fs.list_state.select(Some(last));
                    }
                }
            }
        }
    }

    /// Name of the context highlighted on the context screen
    pub fn highlighted_context(&self) -> Option<&str> {
        self.ui_state
            .list_state
            .selected()
            .and_then(|i| self.contexts.get(i))
            .map(|c| c.name.as_str())
    }

    /// Name of the pod selected in the table
    pub fn selected_pod(&self) -> Option<&str> {
        self.pod_table.selected().map(|r| r.name.as_str())
    }

    /// Show an informational message
    pub fn show_status(&mut self, msg: impl Into<String>) {
        self.ui_state.message = Some(StatusMessage {
            text: msg.into(),
            is_error: false,
        });
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.ui_state.message = Some(StatusMessage {
            text: msg.into(),
            is_error: true,
        });
    }

    /// Dismiss the current message
    pub fn dismiss_message(&mut self) {
        self.ui_state.message = None;
    }
}

const REFRESH_FAILED: &str = "Refresh failed: ";

fn refresh_error_text(error: &str) -> String {
    format!("{}{}", REFRESH_FAILED, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RefreshStatus;
    use kubepods_types::{ContainerInfo, PodPhase};

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(tx, SortKey::Name)
    }

    fn pod(name: &str) -> PodRecord {
        let mut c = ContainerInfo::new("app".into());
        c.ready = true;
        PodRecord {
            name: name.into(),
            namespace: "default".into(),
            phase: PodPhase::Running,
            start_time: Some(Utc::now()),
            containers: vec![c],
        }
    }

    #[test]
    fn pods_loaded_projects_rows() {
        let mut s = state();
        s.pods_loaded(&[pod("b"), pod("a")]);
        assert_eq!(s.pod_table.len(), 2);
        assert_eq!(s.selected_pod(), Some("a"));
        assert_eq!(s.pod_table.rows()[0].ready_status(), "1/1");
    }

    #[test]
    fn open_contexts_highlights_current() {
        let mut s = state();
        s.open_contexts(vec![
            ContextInfo::new("dev".into(), false),
            ContextInfo::new("prod".into(), true),
        ]);
        assert_eq!(s.current_screen, Screen::ContextSelect);
        assert_eq!(s.highlighted_context(), Some("prod"));
        assert_eq!(s.current_context.as_deref(), Some("prod"));

        s.list_down();
        assert_eq!(s.highlighted_context(), Some("dev"));

        assert!(s.go_back());
        assert_eq!(s.current_screen, Screen::PodTable);
        assert!(!s.go_back());
    }

    #[test]
    fn context_switch_moves_current_marker() {
        let mut s = state();
        s.open_contexts(vec![
            ContextInfo::new("dev".into(), true),
            ContextInfo::new("prod".into(), false),
        ]);
        s.context_switched("prod".into());
        assert_eq!(s.current_context.as_deref(), Some("prod"));
        assert!(s.contexts[1].is_current);
        assert!(!s.contexts[0].is_current);
    }

    #[test]
    fn leaving_file_browser_drops_it() {
        let mut s = state();
        s.fs_browser = Some(FsBrowser::new("web".into()));
        s.navigate_to(Screen::FileBrowser);
        assert!(s.go_back());
        assert!(s.fs_browser.is_none());
    }

    #[test]
    fn top_and_bottom_follow_screen() {
        let mut s = state();
        s.pods_loaded(&[pod("a"), pod("b"), pod("c")]);
        s.list_bottom();
        assert_eq!(s.selected_pod(), Some("c"));
        s.list_top();
        assert_eq!(s.selected_pod(), Some("a"));

        s.open_contexts(vec![
            ContextInfo::new("dev".into(), true),
            ContextInfo::new("prod".into(), false),
        ]);
        s.list_bottom();
        assert_eq!(s.highlighted_context(), Some("prod"));
        // The pod selection is untouched by context list movement
        assert_eq!(s.selected_pod(), Some("a"));
    }

    #[test]
    fn successful_refresh_clears_refresh_error() {
        let mut s = state();
        assert!(s.refresh.request());
        s.pods_loaded(&[pod("a")]);

        assert!(!s.refresh_failed("`kubectl get pods -o json` exited with status 1: boom".into()));
        assert_eq!(s.pod_table.len(), 1);
        let msg = s.ui_state.message.clone().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.starts_with("Refresh failed: "));

        assert!(s.refresh.request());
        assert!(!s.refresh_succeeded(&[pod("a"), pod("b")]));
        assert!(s.ui_state.message.is_none());
        assert_eq!(s.refresh.status(), &RefreshStatus::Idle);
        assert_eq!(s.pod_table.len(), 2);
    }

    #[test]
    fn successful_refresh_keeps_unrelated_messages() {
        let mut s = state();
        assert!(s.refresh.request());
        s.refresh_failed("boom".into());
        s.show_error("Delete failed: forbidden");

        assert!(s.refresh.request());
        s.refresh_succeeded(&[]);
        assert_eq!(
            s.ui_state.message.as_ref().map(|m| m.text.as_str()),
            Some("Delete failed: forbidden")
        );
    }

    #[test]
    fn messages_track_error_flag() {
        let mut s = state();
        s.show_error("boom");
        assert_eq!(s.ui_state.message.as_ref().map(|m| m.is_error), Some(true));
        s.show_status("ok");
        assert_eq!(s.ui_state.message.as_ref().map(|m| m.is_error), Some(false));
        s.dismiss_message();
        assert!(s.ui_state.message.is_none());
    }
}
