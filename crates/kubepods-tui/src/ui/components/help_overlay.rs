use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::popup(frame.area(), 50, 28);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Navigation",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("j/↓", "Move down"),
            Self::key_line("k/↑", "Move up"),
            Self::key_line("g/G", "First / last row"),
            Self::key_line("Enter/v", "Visit selected pod"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Pods",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("r", "Refresh"),
            Self::key_line("c", "Switch context"),
            Self::key_line("d", "Delete selected pod"),
            Self::key_line("D", "Delete with options"),
            Self::key_line("x", "Exec shell in pod"),
            Self::key_line("f", "Browse pod filesystem"),
            Self::key_line("s", "Next sort column"),
            Self::key_line("S", "Reverse sort order"),
            Self::key_line("1-5", "Sort by column"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "General",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("Space", "Command palette"),
            Self::key_line("Ctrl+l", "Clear message"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Go back"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
