//! Application state and actions

mod action;
mod delete_menu;
mod fs_browser;
mod pod_table;
mod refresh;
mod state;

pub use action::Action;
pub use delete_menu::{DeleteMenuState, DeleteToggle};
pub use fs_browser::FsBrowser;
pub use pod_table::PodTable;
pub use refresh::{RefreshGate, RefreshStatus};
pub use state::{AppState, Screen, StatusMessage, UiState};
