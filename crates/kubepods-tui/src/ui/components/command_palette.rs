use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as RatatuiLayout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::Action;
use crate::ui::Layout;

/// A command that can be executed from the palette
#[derive(Clone)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub key_hint: &'static str,
    pub action: Action,
}

/// Command palette state
pub struct CommandPaletteState {
    pub visible: bool,
    pub search_input: String,
    pub list_state: ListState,
    pub filtered_indices: Vec<usize>,
}

impl Default for CommandPaletteState {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            visible: false,
            search_input: String::new(),
            list_state,
            filtered_indices: Vec::new(),
        }
    }
}

impl CommandPaletteState {
    pub fn open(&mut self, commands: &[Command]) {
        self.visible = true;
        self.search_input.clear();
        self.list_state.select(Some(0));
        self.update_filtered(commands);
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.search_input.clear();
    }

    pub fn update_filtered(&mut self, commands: &[Command]) {
        let query = self.search_input.to_lowercase();
        self.filtered_indices = commands
            .iter()
            .enumerate()
            .filter(|(_, cmd)| {
                query.is_empty()
                    || cmd.name.to_lowercase().contains(&query)
                    || cmd.description.to_lowercase().contains(&query)
            })
            .map(|(i, _)| i)
            .collect();

        // Reset selection if out of bounds
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            if current >= self.filtered_indices.len() {
                self.list_state.select(Some(0));
            } else {
                self.list_state.select(Some(current));
            }
        }
    }

    pub fn move_up(&mut self) {
        let len = self.filtered_indices.len();
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
        let len = self.filtered_indices.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_command<'a>(&self, commands: &'a [Command]) -> Option<&'a Command> {
        let selected_idx = self.list_state.selected()?;
        let cmd_idx = self.filtered_indices.get(selected_idx)?;
        commands.get(*cmd_idx)
    }

    pub fn input_char(&mut self, c: char, commands: &[Command]) {
        self.search_input.push(c);
        self.update_filtered(commands);
    }

    pub fn input_backspace(&mut self, commands: &[Command]) {
        self.search_input.pop();
        self.update_filtered(commands);
    }
}

/// Command palette widget
pub struct CommandPalette;

impl CommandPalette {
    pub fn render(frame: &mut Frame, state: &mut CommandPaletteState, commands: &[Command]) {
        let popup_area = Layout::popup(frame.area(), 64, 16);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        // Split into search input and list
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search input
                Constraint::Min(1),    // Command list
            ])
            .split(popup_area);

        let search_text = if state.search_input.is_empty() {
            vec![Span::styled(
                "Type to filter...",
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![
                Span::styled(&state.search_input, Style::default().fg(Color::White)),
                Span::styled("█", Style::default().fg(Color::Yellow)),
            ]
        };

        let search_widget = Paragraph::new(Line::from(search_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled(
                    " Command Palette ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        frame.render_widget(search_widget, chunks[0]);

        let items: Vec<ListItem> = state
            .filtered_indices
            .iter()
            .filter_map(|&idx| commands.get(idx))
            .map(|cmd| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<20}", cmd.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(cmd.description, Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("  {}", cmd.key_hint),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Yellow)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(list, chunks[1], &mut state.list_state);
    }
}

/// Commands available from the pod table
pub fn pod_table_commands() -> Vec<Command> {
    vec![
        Command {
            name: "Refresh",
            description: "Fetch pods again",
            key_hint: "r",
            action: Action::Refresh,
        },
        Command {
            name: "Switch Context",
            description: "Pick a kubeconfig context",
            key_hint: "c",
            action: Action::OpenContexts,
        },
        Command {
            name: "Delete Pod",
            description: "Delete the selected pod",
            key_hint: "d",
            action: Action::DeletePod,
        },
        Command {
            name: "Delete...",
            description: "Delete with --all/--now/--force",
            key_hint: "D",
            action: Action::OpenDeleteMenu,
        },
        Command {
            name: "Exec",
            description: "Open a shell in the pod",
            key_hint: "x",
            action: Action::Exec,
        },
        Command {
            name: "Browse Files",
            description: "Browse the pod filesystem",
            key_hint: "f",
            action: Action::OpenFilesystem,
        },
        Command {
            name: "Visit",
            description: "Show the selected pod",
            key_hint: "v",
            action: Action::Visit,
        },
        Command {
            name: "Next Sort Column",
            description: "Sort by the next column",
            key_hint: "s",
            action: Action::CycleSort,
        },
        Command {
            name: "Reverse Sort",
            description: "Flip sort direction",
            key_hint: "S",
            action: Action::ReverseSort,
        },
        Command {
            name: "Show Help",
            description: "Display keybindings",
            key_hint: "?",
            action: Action::ToggleHelp,
        },
        Command {
            name: "Quit",
            description: "Exit kubepods",
            key_hint: "q",
            action: Action::Quit,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_name_and_description() {
        let commands = pod_table_commands();
        let mut palette = CommandPaletteState::default();
        palette.open(&commands);
        assert_eq!(palette.filtered_indices.len(), commands.len());

        for c in "shell".chars() {
            palette.input_char(c, &commands);
        }
        let selected = palette.selected_command(&commands).map(|c| c.action.clone());
        assert_eq!(selected, Some(Action::Exec));

        palette.input_backspace(&commands);
        assert!(palette.filtered_indices.len() >= 1);
    }

    #[test]
    fn no_match_clears_selection() {
        let commands = pod_table_commands();
        let mut palette = CommandPaletteState::default();
        palette.open(&commands);
        for c in "zzzz".chars() {
            palette.input_char(c, &commands);
        }
        assert!(palette.selected_command(&commands).is_none());
        palette.move_down();
        assert!(palette.selected_command(&commands).is_none());
    }
}
