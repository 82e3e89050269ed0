//! TUI components for kubepods
//!
//! This crate provides the terminal user interface for kubepods,
//! including state management, keybindings, settings, event handling, and UI components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{
    Action, AppState, DeleteMenuState, FsBrowser, PodTable, RefreshGate, RefreshStatus, Screen,
    StatusMessage, UiState,
};
pub use config::{KeyBinding, KeyBindings, KeyContext, Overrides, Settings};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{
    Command, CommandPalette, CommandPaletteState, DeleteMenu, HelpOverlay, ListSelector,
    ListSelectorExt, StatusBar, list_nav_hints, pod_table_commands,
};
pub use ui::screens::{ContextSelectScreen, FsBrowserScreen, PodTableScreen};
pub use ui::{Layout, Theme, render};
