use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{DeleteMenuState, DeleteToggle},
    ui::{Layout, Theme},
};

/// Popup for `kubectl delete pod` with its flag toggles
pub struct DeleteMenu;

impl DeleteMenu {
    pub fn render(frame: &mut Frame, menu: &DeleteMenuState, namespace: Option<&str>) {
        let popup_area = Layout::popup(frame.area(), 60, 13);
        frame.render_widget(Clear, popup_area);

        let target = if menu.options.all {
            "every pod in scope".to_string()
        } else {
            menu.target.clone().unwrap_or_else(|| "(no pod selected)".to_string())
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Target: ", Theme::text_dim()),
                Span::styled(target, Theme::text_highlight()),
            ]),
            Line::from(""),
        ];

        for (i, toggle) in DeleteToggle::ALL.iter().enumerate() {
            let mark = if toggle.is_set(&menu.options) { "[x]" } else { "[ ]" };
            let style = if i == menu.selection {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            lines.push(Line::from(Span::styled(
                format!(" {} {}", mark, toggle.label()),
                style,
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            command_preview(menu, namespace),
            Theme::text_dim(),
        )));
        lines.push(Line::from(""));
        let confirm_hint = if menu.can_confirm() {
            Span::styled("Space toggle · Enter delete · Esc cancel", Theme::text())
        } else {
            Span::styled("Select a pod or enable --all", Theme::error())
        };
        lines.push(Line::from(confirm_hint));

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error())
                .title(Span::styled(" Delete Pods ", Theme::error())),
        );

        frame.render_widget(widget, popup_area);
    }
}

fn command_preview(menu: &DeleteMenuState, namespace: Option<&str>) -> String {
    let mut parts = vec!["kubectl delete pod".to_string()];
    if !menu.options.all {
        if let Some(target) = &menu.target {
            parts.push(target.clone());
        }
    }
    parts.extend(menu.options.flags());
    if let Some(ns) = namespace {
        parts.push(format!("--namespace {}", ns));
    }
    parts.join(" ")
}
