use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use kubepods_types::COLUMNS;

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{Header, MessageLine, StatusBar, pod_table_hints},
    },
};

/// Main screen: one row per pod
pub struct PodTableScreen;

impl PodTableScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, message_area, status_area) = Layout::main(frame.area());

        Header::render(frame, header_area, state, "Pods");
        Self::render_table(frame, content_area, state);
        MessageLine::render(frame, message_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_table(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(" Pods ", Theme::title()));

        let table = &mut state.pod_table;
        if table.is_empty() {
            let text = if state.refresh.is_fetching() {
                "Loading pods..."
            } else {
                "No pods found"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, Theme::text_dim())).block(block),
                area,
            );
            return;
        }

        let sort_column = table.sort_key().column();
        let arrow = if table.is_descending() { " ▼" } else { " ▲" };
        let header = Row::new(COLUMNS.iter().enumerate().map(|(i, title)| {
            let text = if i == sort_column {
                format!("{}{}", title, arrow)
            } else {
                title.to_string()
            };
            Cell::from(text)
        }))
        .style(Theme::table_header());

        let rows: Vec<Row> = table
            .rows()
            .iter()
            .map(|row| {
                let [name, namespace, status, restarts, ready, age] = row.cells();
                Row::new(vec![
                    Cell::from(name),
                    Cell::from(namespace).style(Theme::text_dim()),
                    Cell::from(status).style(Theme::phase(row.status)),
                    Cell::from(restarts),
                    Cell::from(ready),
                    Cell::from(age),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(6),
        ];

        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(widget, area, table.table_state());
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let table = &state.pod_table;
        let direction = if table.is_descending() { "desc" } else { "asc" };
        let summary = format!(
            "{} pods · sort {} {}",
            table.len(),
            table.sort_key(),
            direction
        );

        let status = StatusBar::new().hints(pod_table_hints()).right(summary);
        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kubepods_types::{ContainerInfo, PodPhase, PodRecord, SortKey};
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_headers_and_rows() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, SortKey::Name);
        let mut container = ContainerInfo::new("app".into());
        container.ready = true;
        container.restart_count = 2;
        state.pods_loaded(&[PodRecord {
            name: "api-7d9f".into(),
            namespace: "prod".into(),
            phase: PodPhase::Running,
            start_time: Some(Utc::now() - Duration::hours(3)),
            containers: vec![container],
        }]);

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal
            .draw(|frame| PodTableScreen::render(frame, &mut state))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("NAME ▲"));
        assert!(text.contains("RESTARTS"));
        assert!(text.contains("api-7d9f"));
        assert!(text.contains("Running"));
        assert!(text.contains("1/1"));
        assert!(text.contains("3h"));
        assert!(text.contains("1 pods · sort NAME asc"));
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, SortKey::Name);

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal
            .draw(|frame| PodTableScreen::render(frame, &mut state))
            .unwrap();

        assert!(buffer_text(&terminal).contains("No pods found"));
    }
}
