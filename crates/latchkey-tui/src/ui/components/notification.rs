//! Toast notification component

use latchkey_core::{CredentialKind, Outcome};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::Theme;

/// Ticks a toast stays visible at the 100ms tick rate
const SHORT_TTL: u64 = 20;
const LONG_TTL: u64 = 40;

/// Notification severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Toast notification
#[derive(Debug, Clone)]
pub struct Notification {
    /// Message to display
    pub message: String,
    /// Severity level
    pub level: NotificationLevel,
    /// Remaining ticks until dismissal
    pub ttl: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel, ttl: u64) -> Self {
        Self {
            message: message.into(),
            level,
            ttl,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info, SHORT_TTL)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success, SHORT_TTL)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning, LONG_TTL)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error, LONG_TTL)
    }

    /// User-facing message for a challenge outcome
    pub fn for_outcome(kind: CredentialKind, outcome: Outcome) -> Self {
        match (kind, outcome) {
            (CredentialKind::Pattern, Outcome::ConfirmationRequested) => {
                Self::info("Repeat the pattern to confirm")
            }
            (CredentialKind::Pin, Outcome::ConfirmationRequested) => {
                Self::info("Repeat the PIN to confirm")
            }
            (CredentialKind::Pattern, Outcome::ConfirmationMismatch) => {
                Self::warning("Patterns do not match. Draw a new pattern")
            }
            (CredentialKind::Pin, Outcome::ConfirmationMismatch) => {
                Self::warning("PINs do not match. Enter a new PIN")
            }
            (CredentialKind::Pattern, Outcome::EnrollmentSucceeded) => {
                Self::success("Pattern saved")
            }
            (CredentialKind::Pin, Outcome::EnrollmentSucceeded) => Self::success("PIN saved"),
            (_, Outcome::VerificationSucceeded) => Self::success("Unlocked"),
            (CredentialKind::Pattern, Outcome::VerificationFailed) => {
                Self::error("Incorrect pattern")
            }
            (CredentialKind::Pin, Outcome::VerificationFailed) => Self::error("Incorrect PIN"),
        }
    }

    /// Check if notification should be dismissed
    pub fn is_expired(&self) -> bool {
        self.ttl == 0
    }

    /// Decrement TTL
    pub fn tick(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
    }

    pub fn icon(&self) -> &'static str {
        match self.level {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }

    /// Render the notification at the bottom of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let style = match self.level {
            NotificationLevel::Info => theme.info(),
            NotificationLevel::Success => theme.success(),
            NotificationLevel::Warning => theme.warning(),
            NotificationLevel::Error => theme.danger(),
        };

        let width = ((self.message.chars().count() + 6).min(60) as u16).min(area.width);
        let height = 3.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height + 1);
        let toast_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, toast_area);

        let block = Block::default().borders(Borders::ALL).border_style(style);
        let content = Paragraph::new(format!("{} {}", self.icon(), self.message))
            .style(style)
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(content, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let n = Notification::for_outcome(CredentialKind::Pattern, Outcome::ConfirmationRequested);
        assert_eq!(n.message, "Repeat the pattern to confirm");
        assert_eq!(n.level, NotificationLevel::Info);

        let n = Notification::for_outcome(CredentialKind::Pin, Outcome::VerificationFailed);
        assert_eq!(n.message, "Incorrect PIN");
        assert_eq!(n.level, NotificationLevel::Error);

        let n = Notification::for_outcome(CredentialKind::Pattern, Outcome::ConfirmationMismatch);
        assert!(n.message.starts_with("Patterns do not match"));
    }

    #[test]
    fn test_ttl() {
        let mut n = Notification::new("x", NotificationLevel::Info, 1);
        assert!(!n.is_expired());
        n.tick();
        assert!(n.is_expired());
        n.tick();
        assert!(n.is_expired());
    }
}
