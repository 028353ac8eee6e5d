//! Unlocked screen

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, render_help};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let dialog = centered_rect_fixed(40, 8, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.success());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let message = if app.state.enrolled {
        "✓ Credential saved"
    } else {
        "✓ Unlocked"
    };
    let title = Paragraph::new(message)
        .style(theme.success().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    render_help(frame, chunks[2], "[Enter] Lock again  [q] Quit", theme);
}
