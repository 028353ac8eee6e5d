//! Keyboard mapping for the PIN keypad
//!
//! Besides the digit keys, a numeric keypad with Num Lock off reports
//! navigation keys. Those are mapped back to the digit printed on the key.

use crossterm::event::KeyCode;

/// Digit entered by `key`, if any
pub fn digit_for_key(key: KeyCode) -> Option<char> {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(c),
        KeyCode::Insert => Some('0'),
        KeyCode::End => Some('1'),
        KeyCode::Down => Some('2'),
        KeyCode::PageDown => Some('3'),
        KeyCode::Left => Some('4'),
        KeyCode::KeypadBegin => Some('5'),
        KeyCode::Right => Some('6'),
        KeyCode::Home => Some('7'),
        KeyCode::Up => Some('8'),
        KeyCode::PageUp => Some('9'),
        _ => None,
    }
}

/// Whether `key` removes the last PIN digit
pub fn is_remove_key(key: KeyCode) -> bool {
    matches!(key, KeyCode::Backspace | KeyCode::Delete)
}
