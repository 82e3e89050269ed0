use kubepods_types::DeleteOptions;

/// One toggle row of the delete menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteToggle {
    All,
    Cascade,
    Now,
    Force,
}

impl DeleteToggle {
    pub const ALL: [DeleteToggle; 4] = [Self::All, Self::Cascade, Self::Now, Self::Force];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All pods (--all)",
            Self::Cascade => "Cascade (--cascade)",
            Self::Now => "Immediate (--now)",
            Self::Force => "Force (--force)",
        }
    }

    pub fn is_set(&self, options: &DeleteOptions) -> bool {
        match self {
            Self::All => options.all,
            Self::Cascade => options.cascade,
            Self::Now => options.now,
            Self::Force => options.force,
        }
    }

    fn flip(&self, options: &mut DeleteOptions) {
        match self {
            Self::All => options.all = !options.all,
            Self::Cascade => options.cascade = !options.cascade,
            Self::Now => options.now = !options.now,
            Self::Force => options.force = !options.force,
        }
    }
}

/// State of the delete-with-options popup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteMenuState {
    /// Pod the menu was opened on, if any row was selected
    pub target: Option<String>,
    pub options: DeleteOptions,
    pub selection: usize,
}

impl DeleteMenuState {
    pub fn new(target: Option<String>) -> Self {
        Self {
            target,
            options: DeleteOptions::default(),
            selection: 0,
        }
    }

    pub fn move_up(&mut self) {
        let len = DeleteToggle::ALL.len();
        self.selection = (self.selection + len - 1) % len;
    }

    pub fn move_down(&mut self) {
        self.selection = (self.selection + 1) % DeleteToggle::ALL.len();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(toggle) = DeleteToggle::ALL.get(self.selection) {
            toggle.flip(&mut self.options);
        }
    }

    /// Confirming is only possible when there is something to delete
    pub fn can_confirm(&self) -> bool {
        self.options.all || self.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_with_default_options() {
        let menu = DeleteMenuState::new(Some("web".into()));
        assert_eq!(menu.options, DeleteOptions::default());
        assert!(menu.can_confirm());
    }

    #[test]
    fn toggles_are_independent() {
        let mut menu = DeleteMenuState::new(None);
        assert!(!menu.can_confirm());

        menu.toggle_selected(); // all
        menu.move_down();
        menu.toggle_selected(); // cascade off
        menu.move_down();
        menu.move_down();
        menu.toggle_selected(); // force

        assert_eq!(
            menu.options,
            DeleteOptions {
                all: true,
                cascade: false,
                now: false,
                force: true,
            }
        );
        assert!(menu.can_confirm());
    }

    #[test]
    fn selection_wraps() {
        let mut menu = DeleteMenuState::new(None);
        menu.move_up();
        assert_eq!(menu.selection, 3);
        menu.move_down();
        assert_eq!(menu.selection, 0);
    }
}
