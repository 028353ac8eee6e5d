//! Method selection screen

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::{App, MethodOption};
use crate::ui::layout::{centered_rect_fixed, render_help};

/// Draw the method selection dialog
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let dialog = centered_rect_fixed(44, 14, area);

    let block = Block::default()
        .title(" Sign-in method ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Instructions
            Constraint::Min(5),    // Options
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let instructions = Paragraph::new("Choose how to unlock")
        .style(theme.text_secondary())
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[0]);

    let items: Vec<ListItem> = MethodOption::ALL
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = i == app.state.method_index;
            let line = match option {
                MethodOption::Pattern | MethodOption::PinCode => {
                    let mark = if option.is_enabled(&app.state.methods) {
                        "(•)"
                    } else {
                        "( )"
                    };
                    format!(" {} {}", mark, option.label())
                }
                MethodOption::Fingerprint | MethodOption::FaceId => {
                    let mark = if option.is_enabled(&app.state.methods) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    format!(" {} {}", mark, option.label())
                }
                MethodOption::Apply => format!("     {}", option.label()),
            };
            ListItem::new(line).style(theme.list_item(selected))
        })
        .collect();

    frame.render_widget(List::new(items), chunks[1]);

    render_help(
        frame,
        chunks[2],
        "[↑↓] Move  [Space] Toggle  [Enter] Apply  [q] Quit",
        theme,
    );
}
