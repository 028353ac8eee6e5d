//! Authentication dialog: frame, prompt and the active capture surface

use latchkey_core::{Capture, ChallengeState, CredentialKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::layout::{centered_rect, render_help};

use super::{pattern, pin};

/// Prompt shown above the capture surface
pub fn prompt(kind: CredentialKind, state: ChallengeState) -> &'static str {
    match (kind, state) {
        (CredentialKind::Pattern, ChallengeState::AwaitingFirstInput) => "Draw a new pattern",
        (CredentialKind::Pattern, ChallengeState::AwaitingConfirmation) => {
            "Draw the pattern again"
        }
        (CredentialKind::Pattern, ChallengeState::AwaitingVerification) => {
            "Draw your pattern to unlock"
        }
        (CredentialKind::Pin, ChallengeState::AwaitingFirstInput) => "Choose a 4-digit PIN",
        (CredentialKind::Pin, ChallengeState::AwaitingConfirmation) => "Enter the PIN again",
        (CredentialKind::Pin, ChallengeState::AwaitingVerification) => "Enter your PIN to unlock",
        (_, ChallengeState::Completed) => "Unlocked",
    }
}

/// Draw the dialog; returns the pattern canvas area when one was drawn
pub fn draw(frame: &mut Frame, area: Rect, app: &App) -> Option<Rect> {
    let theme = &app.theme;
    let session = app.session.as_ref()?;

    let dialog = centered_rect(60, 80, area);
    let title = match session.kind() {
        CredentialKind::Pattern => " Pattern lock ",
        CredentialKind::Pin => " PIN lock ",
    };
    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Min(5),    // Capture surface
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let prompt = Paragraph::new(prompt(session.kind(), session.state()))
        .style(theme.text())
        .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[0]);

    let canvas_area = match session.capture() {
        Capture::Pattern(encoder) => Some(pattern::draw(frame, chunks[1], encoder, theme)),
        Capture::Pin(buffer) => {
            pin::draw(frame, chunks[1], buffer, app.state.pin_flash_ticks > 0, theme);
            None
        }
    };

    let help = match session.kind() {
        CredentialKind::Pattern => "Drag with the mouse to draw  [Esc] Cancel",
        CredentialKind::Pin => "[0-9] Digit  [Backspace] Remove  [Esc] Cancel",
    };
    render_help(frame, chunks[2], help, theme);

    canvas_area
}
