//! Keybindings and settings

mod keybindings;
mod settings;

pub use keybindings::{KeyBinding, KeyBindings, KeyContext};
pub use settings::{FileConfig, Overrides, Settings, default_path};
