use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{AppState, RefreshStatus},
    ui::Theme,
};

/// Title block shared by every screen: app name, screen title, context, namespace
pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState, screen_title: &str) {
        let context = state.current_context.as_deref().unwrap_or("(no context)");
        let namespace = state.namespace.as_deref().unwrap_or("(default namespace)");

        let mut spans = vec![
            Span::styled("kubepods", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(screen_title.to_string(), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(context.to_string(), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(namespace.to_string(), Theme::text()),
        ];

        match state.refresh.status() {
            RefreshStatus::Fetching => {
                let text = if state.refresh.has_pending() {
                    "  refreshing… (1 queued)"
                } else {
                    "  refreshing…"
                };
                spans.push(Span::styled(text, Theme::text_dim()));
            }
            RefreshStatus::Failed(_) => {
                spans.push(Span::styled("  refresh failed", Theme::error()));
            }
            RefreshStatus::Idle => {
                if let Some(at) = state.refresh.last_success() {
                    spans.push(Span::styled(
                        format!("  updated {}", at.format("%H:%M:%S")),
                        Theme::text_dim(),
                    ));
                }
            }
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }
}
