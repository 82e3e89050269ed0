use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use kubepods_types::SortKey;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    PodTable,
    ListNavigation,
    FileBrowser,
    DeleteMenu,
    CommandPalette,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(
            KeyBinding::new(KeyCode::Char(' ')),
            Action::ToggleCommandPalette,
        );
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::ctrl(KeyCode::Char('l')), Action::DismissMessage);
        bindings.insert(KeyContext::Global, global);

        // Shared list movement
        let mut list_nav = HashMap::new();
        list_nav.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Char('g')), Action::ListTop);
        list_nav.insert(KeyBinding::new(KeyCode::Home), Action::ListTop);
        list_nav.insert(KeyBinding::shift(KeyCode::Char('G')), Action::ListBottom);
        list_nav.insert(KeyBinding::new(KeyCode::End), Action::ListBottom);
        list_nav.insert(KeyBinding::new(KeyCode::Enter), Action::ListSelect);

        // Pod table bindings
        let mut pod_table = list_nav.clone();
        pod_table.insert(KeyBinding::new(KeyCode::Char('r')), Action::Refresh);
        pod_table.insert(KeyBinding::new(KeyCode::Char('c')), Action::OpenContexts);
        pod_table.insert(KeyBinding::new(KeyCode::Char('d')), Action::DeletePod);
        pod_table.insert(KeyBinding::shift(KeyCode::Char('D')), Action::OpenDeleteMenu);
        pod_table.insert(KeyBinding::new(KeyCode::Char('x')), Action::Exec);
        pod_table.insert(KeyBinding::new(KeyCode::Char('f')), Action::OpenFilesystem);
        pod_table.insert(KeyBinding::new(KeyCode::Char('v')), Action::Visit);
        pod_table.insert(KeyBinding::new(KeyCode::Char('s')), Action::CycleSort);
        pod_table.insert(KeyBinding::shift(KeyCode::Char('S')), Action::ReverseSort);
        for (digit, key) in ['1', '2', '3', '4', '5'].into_iter().zip([
            SortKey::Name,
            SortKey::Namespace,
            SortKey::Status,
            SortKey::Restarts,
            SortKey::Age,
        ]) {
            pod_table.insert(KeyBinding::new(KeyCode::Char(digit)), Action::SortBy(key));
        }
        bindings.insert(KeyContext::PodTable, pod_table);

        // File browser bindings
        let mut file_browser = list_nav.clone();
        file_browser.insert(KeyBinding::new(KeyCode::Char('l')), Action::ListSelect);
        file_browser.insert(KeyBinding::new(KeyCode::Backspace), Action::FsParent);
        file_browser.insert(KeyBinding::new(KeyCode::Char('h')), Action::FsParent);
        file_browser.insert(KeyBinding::new(KeyCode::Char('r')), Action::FsReload);
        bindings.insert(KeyContext::FileBrowser, file_browser);

        // Context list and other plain lists
        let mut context_list = list_nav;
        context_list.insert(KeyBinding::new(KeyCode::Char('r')), Action::OpenContexts);
        bindings.insert(KeyContext::ListNavigation, context_list);

        // Delete menu bindings
        let mut delete_menu = HashMap::new();
        delete_menu.insert(KeyBinding::new(KeyCode::Up), Action::DeleteMenuUp);
        delete_menu.insert(KeyBinding::new(KeyCode::Char('k')), Action::DeleteMenuUp);
        delete_menu.insert(KeyBinding::new(KeyCode::Down), Action::DeleteMenuDown);
        delete_menu.insert(KeyBinding::new(KeyCode::Char('j')), Action::DeleteMenuDown);
        delete_menu.insert(KeyBinding::new(KeyCode::Char(' ')), Action::DeleteMenuToggle);
        delete_menu.insert(KeyBinding::new(KeyCode::Tab), Action::DeleteMenuToggle);
        delete_menu.insert(KeyBinding::new(KeyCode::Enter), Action::DeleteMenuConfirm);
        delete_menu.insert(KeyBinding::new(KeyCode::Esc), Action::DeleteMenuClose);
        delete_menu.insert(KeyBinding::new(KeyCode::Char('q')), Action::DeleteMenuClose);
        delete_menu.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::DeleteMenuClose);
        bindings.insert(KeyContext::DeleteMenu, delete_menu);

        // Command palette bindings
        let mut palette = HashMap::new();
        palette.insert(KeyBinding::new(KeyCode::Up), Action::PaletteUp);
        palette.insert(KeyBinding::new(KeyCode::Down), Action::PaletteDown);
        palette.insert(KeyBinding::ctrl(KeyCode::Char('p')), Action::PaletteUp);
        palette.insert(KeyBinding::ctrl(KeyCode::Char('n')), Action::PaletteDown);
        palette.insert(KeyBinding::new(KeyCode::Enter), Action::PaletteSelect);
        palette.insert(KeyBinding::new(KeyCode::Esc), Action::PaletteClose);
        palette.insert(KeyBinding::new(KeyCode::Backspace), Action::PaletteBackspace);
        palette.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::PaletteClose);
        bindings.insert(KeyContext::CommandPalette, palette);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(context_bindings) = self.bindings.get(&context) {
            if let Some(action) = context_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event while the delete menu is open (no global fallback)
    pub fn get_delete_menu_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);
        self.bindings
            .get(&KeyContext::DeleteMenu)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event in command palette mode
    pub fn get_palette_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // Check palette bindings first
        if let Some(palette_bindings) = self.bindings.get(&KeyContext::CommandPalette) {
            if let Some(action) = palette_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // For regular characters, return PaletteInput action
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(Action::PaletteInput(c));
            }
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
