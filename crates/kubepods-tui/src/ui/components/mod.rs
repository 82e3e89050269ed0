mod command_palette;
mod delete_menu;
mod header;
mod help_overlay;
mod list_selector;
mod message_line;
mod status_bar;

pub use command_palette::{Command, CommandPalette, CommandPaletteState, pod_table_commands};
pub use delete_menu::DeleteMenu;
pub use header::Header;
pub use help_overlay::HelpOverlay;
pub use list_selector::{ItemKind, ListSelector, ListSelectorExt};
pub use message_line::MessageLine;
pub use status_bar::{StatusBar, file_browser_hints, list_nav_hints, pod_table_hints};
