//! PIN keypad indicator

use latchkey_core::{PinBuffer, PIN_LENGTH};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Indicator row, one dot per slot
///
/// `flash` shows every slot filled; used for one tick after the fourth
/// digit empties the buffer.
pub fn indicator(buffer: &PinBuffer, flash: bool, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(PIN_LENGTH * 2);
    for slot in 1..=PIN_LENGTH {
        let (symbol, style) = if flash || buffer.is_slot_filled(slot) {
            ("●", theme.pin_dot())
        } else {
            ("○", theme.pin_placeholder())
        };
        if slot > 1 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(symbol, style));
    }
    Line::from(spans)
}

pub fn draw(frame: &mut Frame, area: Rect, buffer: &PinBuffer, flash: bool, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Dots
            Constraint::Length(1),
            Constraint::Length(5), // Keypad legend
            Constraint::Min(1),
        ])
        .split(area);

    let dots = Paragraph::new(indicator(buffer, flash, theme)).alignment(Alignment::Center);
    frame.render_widget(dots, chunks[1]);

    let keypad = Paragraph::new(vec![
        Line::from("7  8  9"),
        Line::from("4  5  6"),
        Line::from("1  2  3"),
        Line::from("   0   "),
    ])
    .style(theme.text_muted())
    .alignment(Alignment::Center);
    frame.render_widget(keypad, chunks[3]);
}
