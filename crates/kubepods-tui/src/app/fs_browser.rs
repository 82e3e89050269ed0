use ratatui::widgets::ListState;

use kubepods_types::FsEntry;

/// Directory browser over one pod's filesystem
#[derive(Debug)]
pub struct FsBrowser {
    pub pod: String,
    pub path: String,
    pub entries: Vec<FsEntry>,
    pub list_state: ListState,
}

impl FsBrowser {
    pub fn new(pod: String) -> Self {
        Self {
            pod,
            path: "/".to_string(),
            entries: Vec::new(),
            list_state: ListState::default(),
        }
    }

    /// Replace the listing for `path`
    pub fn set_listing(&mut self, path: String, entries: Vec<FsEntry>) {
        self.path = path;
        self.entries = entries;
        self.list_state
            .select(if self.entries.is_empty() { None } else { Some(0) });
    }

    pub fn selected(&self) -> Option<&FsEntry> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    /// Path of the selected directory, if a directory is selected
    pub fn selected_dir_path(&self) -> Option<String> {
        let entry = self.selected().filter(|e| e.is_dir)?;
        Some(join(&self.path, &entry.name))
    }

    /// Parent of the current path, `None` at the root
    pub fn parent_path(&self) -> Option<String> {
        if self.path == "/" {
            return None;
        }
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) | None => Some("/".to_string()),
            Some(i) => Some(trimmed[..i].to_string()),
        }
    }

    pub fn move_up(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn move_down(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }
}

fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str) -> FsEntry {
        FsEntry {
            name: name.into(),
            is_dir: true,
        }
    }

    fn file(name: &str) -> FsEntry {
        FsEntry {
            name: name.into(),
            is_dir: false,
        }
    }

    #[test]
    fn descends_into_selected_directory() {
        let mut fs = FsBrowser::new("web".into());
        fs.set_listing("/".into(), vec![dir("etc"), file("README")]);
        assert_eq!(fs.selected_dir_path().as_deref(), Some("/etc"));

        fs.set_listing("/etc".into(), vec![dir("nginx")]);
        assert_eq!(fs.selected_dir_path().as_deref(), Some("/etc/nginx"));
    }

    #[test]
    fn files_are_not_descended() {
        let mut fs = FsBrowser::new("web".into());
        fs.set_listing("/".into(), vec![dir("etc"), file("README")]);
        fs.move_down();
        assert_eq!(fs.selected_dir_path(), None);
    }

    #[test]
    fn parent_paths() {
        let mut fs = FsBrowser::new("web".into());
        assert_eq!(fs.parent_path(), None);
        fs.set_listing("/etc".into(), vec![]);
        assert_eq!(fs.parent_path().as_deref(), Some("/"));
        fs.set_listing("/etc/nginx/conf.d".into(), vec![]);
        assert_eq!(fs.parent_path().as_deref(), Some("/etc/nginx"));
    }

    #[test]
    fn empty_listing_has_no_selection() {
        let mut fs = FsBrowser::new("web".into());
        fs.set_listing("/empty".into(), vec![]);
        assert!(fs.selected().is_none());
        fs.move_down();
        assert!(fs.selected().is_none());
    }
}
