pub mod components;
mod layout;
pub mod screens;
mod theme;

pub use layout::Layout;
pub use theme::Theme;

use ratatui::Frame;

use crate::app::{AppState, Screen};
use components::{Command, CommandPalette, CommandPaletteState, DeleteMenu, HelpOverlay};
use screens::{ContextSelectScreen, FsBrowserScreen, PodTableScreen};

/// Draw the current screen and any open overlays
pub fn render(
    frame: &mut Frame,
    state: &mut AppState,
    palette_state: &mut CommandPaletteState,
    commands: &[Command],
) {
    match state.current_screen {
        Screen::PodTable => PodTableScreen::render(frame, state),
        Screen::ContextSelect => ContextSelectScreen::render(frame, state),
        Screen::FileBrowser => FsBrowserScreen::render(frame, state),
    }

    if let Some(menu) = &state.ui_state.delete_menu {
        DeleteMenu::render(frame, menu, state.namespace.as_deref());
    }

    if palette_state.visible {
        CommandPalette::render(frame, palette_state, commands);
    }

    if state.ui_state.help_visible {
        HelpOverlay::render(frame);
    }
}
