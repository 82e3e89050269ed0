use ratatui::{Frame, layout::Rect, text::Span, widgets::Paragraph};

use crate::{app::AppState, ui::Theme};

/// One line for the latest status or error message
pub struct MessageLine;

impl MessageLine {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(msg) = &state.ui_state.message else {
            return;
        };

        // Only the first line; kubectl output can span several
        let text = msg.text.lines().next().unwrap_or_default();
        let style = if msg.is_error {
            Theme::error()
        } else {
            Theme::info()
        };

        frame.render_widget(Paragraph::new(Span::styled(format!(" {}", text), style)), area);
    }
}
