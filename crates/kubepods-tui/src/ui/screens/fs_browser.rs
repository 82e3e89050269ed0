use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{
            Header, ItemKind, ListSelector, ListSelectorExt, MessageLine, StatusBar,
            file_browser_hints,
        },
    },
};

/// Read-only listing of a pod's filesystem
pub struct FsBrowserScreen;

impl FsBrowserScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, message_area, status_area) = Layout::main(frame.area());

        Header::render(frame, header_area, state, "Files");
        Self::render_list(frame, content_area, state);
        MessageLine::render(frame, message_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let Some(browser) = &mut state.fs_browser else {
            return;
        };

        let items: Vec<(String, ItemKind)> = browser
            .entries
            .iter()
            .map(|entry| {
                let kind = if entry.is_dir {
                    ItemKind::Directory
                } else {
                    ItemKind::Plain
                };
                (entry.name.clone(), kind)
            })
            .collect();

        let selector = ListSelector::new(format!(" {}:{} ", browser.pod, browser.path))
            .items(items)
            .empty_text("Empty directory");

        frame.render_list_selector(area, selector, &mut browser.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let count = state
            .fs_browser
            .as_ref()
            .map(|b| format!("{} entries", b.entries.len()))
            .unwrap_or_default();

        let status = StatusBar::new().hints(file_browser_hints()).right(count);
        frame.render_widget(status, area);
    }
}
