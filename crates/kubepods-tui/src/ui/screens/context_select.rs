use ratatui::{Frame, layout::Rect};

use crate::{
    app::AppState,
    ui::{
        Layout,
        components::{
            Header, ItemKind, ListSelector, ListSelectorExt, MessageLine, StatusBar,
            list_nav_hints,
        },
    },
};

/// Context selection screen
pub struct ContextSelectScreen;

impl ContextSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, message_area, status_area) = Layout::main(frame.area());

        Header::render(frame, header_area, state, "Select Context");
        Self::render_list(frame, content_area, state);
        MessageLine::render(frame, message_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let items: Vec<(String, ItemKind)> = state
            .contexts
            .iter()
            .map(|ctx| {
                let kind = if ctx.is_current {
                    ItemKind::Current
                } else {
                    ItemKind::Plain
                };
                (ctx.name.clone(), kind)
            })
            .collect();

        let selector = ListSelector::new(" Kubernetes Contexts ")
            .items(items)
            .empty_text("No contexts in kubeconfig");

        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let context_count = format!("{} contexts", state.contexts.len());

        let status = StatusBar::new()
            .hints(list_nav_hints())
            .right(context_count);

        frame.render_widget(status, area);
    }
}
