use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::ui::Theme;

/// How a list row is decorated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Plain,
    /// The active entry (e.g. current context)
    Current,
    Directory,
}

/// A generic list selector component
pub struct ListSelector<'a> {
    items: Vec<ListItem<'a>>,
    title: String,
    empty_text: &'a str,
    highlight_symbol: &'a str,
}

impl<'a> ListSelector<'a> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            title: title.into(),
            empty_text: "Nothing to show",
            highlight_symbol: "▶ ",
        }
    }

    /// Add items from an iterator of (display_text, kind) tuples
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, ItemKind)>,
        S: Into<String>,
    {
        self.items = items
            .into_iter()
            .map(|(text, kind)| {
                let text = text.into();
                let content = match kind {
                    ItemKind::Plain => Line::from(Span::styled(text, Theme::list_item())),
                    ItemKind::Current => Line::from(Span::styled(
                        format!("{} (current)", text),
                        Theme::list_item_current(),
                    )),
                    ItemKind::Directory => Line::from(Span::styled(
                        format!("{}/", text),
                        Theme::border_focused(),
                    )),
                };
                ListItem::new(content)
            })
            .collect();
        self
    }

    /// Text shown when there are no items
    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        if self.items.is_empty() {
            Paragraph::new(Span::styled(self.empty_text, Theme::text_dim()))
                .block(block)
                .render(area, buf);
            return;
        }

        let list = List::new(self.items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol(self.highlight_symbol);

        StatefulWidget::render(list, area, buf, state);
    }
}

/// Extension trait to render ListSelector more easily
pub trait ListSelectorExt {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState);
}

impl ListSelectorExt for ratatui::Frame<'_> {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState) {
        self.render_stateful_widget(selector, area, state);
    }
}
