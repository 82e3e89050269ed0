use ratatui::widgets::TableState;

use kubepods_types::{SortKey, TableRow, sort_rows};

/// The pod list shown on the main screen
///
/// Rows are kept sorted by the active key. A refresh replaces the whole row
/// set; selection follows the previously selected pod name when it survives.
#[derive(Debug, Default)]
pub struct PodTable {
    rows: Vec<TableRow>,
    sort_key: SortKey,
    descending: bool,
    state: TableState,
}

impl PodTable {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            rows: Vec::new(),
            sort_key,
            descending: false,
            state: TableState::default(),
        }
    }

    /// Replace every row with a freshly fetched set
    pub fn refresh(&mut self, rows: Vec<TableRow>) {
        let selected_name = self.selected().map(|r| r.name.clone());
        let selected_index = self.state.selected();

        self.rows = rows;
        sort_rows(&mut self.rows, self.sort_key, self.descending);

        let index = selected_name
            .and_then(|name| self.rows.iter().position(|r| r.name == name))
            .or_else(|| selected_index.map(|i| i.min(self.rows.len().saturating_sub(1))))
            .or(Some(0));
        self.select(index);
    }

    /// Rows in display order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Sort by `key`; choosing the active key again flips the direction
    pub fn set_sort_key(&mut self, key: SortKey) {
        if key == self.sort_key {
            self.descending = !self.descending;
        } else {
            self.sort_key = key;
            self.descending = false;
        }
        self.resort();
    }

    /// Advance to the next sort column, ascending
    pub fn cycle_sort_key(&mut self) {
        self.set_sort_key(self.sort_key.next());
    }

    fn resort(&mut self) {
        let selected_name = self.selected().map(|r| r.name.clone());
        sort_rows(&mut self.rows, self.sort_key, self.descending);
        if let Some(name) = selected_name {
            let index = self.rows.iter().position(|r| r.name == name);
            self.select(index);
        }
    }

    pub fn selected(&self) -> Option<&TableRow> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    fn select(&mut self, index: Option<usize>) {
        if self.rows.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(index);
        }
    }

    /// Move selection up, wrapping to the bottom
    pub fn select_previous(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Move selection down, wrapping to the top
    pub fn select_next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        self.select(Some(0));
    }

    pub fn select_last(&mut self) {
        self.select(Some(self.rows.len().saturating_sub(1)));
    }

    pub fn table_state(&mut self) -> &mut TableState {
        &mut self.state
    }
}
