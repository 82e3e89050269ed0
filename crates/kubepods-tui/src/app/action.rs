use kubepods_types::{DeleteOptions, SortKey};

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // List navigation
    ListUp,
    ListDown,
    ListTop,
    ListBottom,
    ListSelect,

    // UI toggles
    ToggleCommandPalette,
    ToggleHelp,

    // Command palette
    PaletteUp,
    PaletteDown,
    PaletteSelect,
    PaletteInput(char),
    PaletteBackspace,
    PaletteClose,

    // Pod table
    Refresh,
    OpenContexts,
    SelectContext(String),
    DeletePod,
    OpenDeleteMenu,
    Exec,
    OpenFilesystem,
    Visit,
    CycleSort,
    ReverseSort,
    SortBy(SortKey),

    // Delete menu
    DeleteMenuUp,
    DeleteMenuDown,
    DeleteMenuToggle,
    DeleteMenuConfirm,
    DeleteMenuClose,
    /// Delete `target` (ignored with `--all`), captured when the delete was requested
    ConfirmDelete {
        target: Option<String>,
        options: DeleteOptions,
    },

    // Filesystem browser
    FsParent,
    FsReload,

    // Status line
    DismissMessage,

    // Tick (for periodic updates)
    Tick,

    // Render request
    Render,
}
