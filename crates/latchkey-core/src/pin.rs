//! PIN digit buffer
//!
//! Collects digits one at a time. The fourth digit completes the code; the
//! buffer then refuses further digits until the code is taken.

use zeroize::Zeroizing;

use crate::code::CredentialCode;
use crate::PIN_LENGTH;

/// Result of pushing a character into a [`PinBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPush {
    /// Digit appended; the buffer now holds this many digits
    Added(usize),
    /// Digit appended and the PIN is complete
    Completed,
    /// Not a digit, or the buffer is already full
    Rejected,
}

/// Ordered PIN digits, zeroized on clear and drop
#[derive(Default)]
pub struct PinBuffer {
    digits: Zeroizing<String>,
}

impl PinBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            digits: Zeroizing::new(String::with_capacity(PIN_LENGTH)),
        }
    }

    /// Append a decimal digit
    pub fn push(&mut self, digit: char) -> PinPush {
        if !digit.is_ascii_digit() || self.is_full() {
            return PinPush::Rejected;
        }

        self.digits.push(digit);

        if self.is_full() {
            PinPush::Completed
        } else {
            PinPush::Added(self.digits.len())
        }
    }

    /// Remove the last digit; returns false when the buffer was empty
    pub fn pop(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    /// Take the completed PIN and clear the buffer
    ///
    /// Returns `None` until all digits have been entered.
    pub fn take(&mut self) -> Option<CredentialCode> {
        if !self.is_full() {
            return None;
        }

        let code = CredentialCode::new(self.digits.as_str());
        self.clear();
        Some(code)
    }

    /// Discard all digits
    pub fn clear(&mut self) {
        // Zeroizing only wipes on drop, so replace rather than truncate
        self.digits = Zeroizing::new(String::with_capacity(PIN_LENGTH));
    }

    /// Number of digits entered
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether no digits have been entered
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Whether the PIN is complete
    pub fn is_full(&self) -> bool {
        self.digits.len() >= PIN_LENGTH
    }

    /// Whether the indicator at 1-based `slot` should render as filled
    pub fn is_slot_filled(&self, slot: usize) -> bool {
        slot >= 1 && self.digits.len() >= slot
    }
}

impl std::fmt::Debug for PinBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinBuffer")
            .field("len", &self.digits.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_digit_completes() {
        let mut pin = PinBuffer::new();
        assert_eq!(pin.push('1'), PinPush::Added(1));
        assert_eq!(pin.push('2'), PinPush::Added(2));
        assert_eq!(pin.push('3'), PinPush::Added(3));
        assert_eq!(pin.push('4'), PinPush::Completed);
        assert!(pin.is_full());
    }

    #[test]
    fn test_fifth_digit_rejected_until_taken() {
        let mut pin = PinBuffer::new();
        for digit in ['1', '2', '3', '4'] {
            pin.push(digit);
        }

        assert_eq!(pin.push('5'), PinPush::Rejected);
        assert_eq!(pin.len(), 4);

        let code = pin.take().unwrap();
        assert_eq!(code.as_str(), "1234");
        assert!(pin.is_empty());

        assert_eq!(pin.push('5'), PinPush::Added(1));
    }

    #[test]
    fn test_take_incomplete() {
        let mut pin = PinBuffer::new();
        pin.push('9');
        assert!(pin.take().is_none());
        assert_eq!(pin.len(), 1);
    }

    #[test]
    fn test_non_digit_rejected() {
        let mut pin = PinBuffer::new();
        assert_eq!(pin.push('a'), PinPush::Rejected);
        assert_eq!(pin.push(' '), PinPush::Rejected);
        assert_eq!(pin.push('٣'), PinPush::Rejected);
        assert!(pin.is_empty());
    }

    #[test]
    fn test_pop() {
        let mut pin = PinBuffer::new();
        assert!(!pin.pop());
        assert!(pin.is_empty());

        pin.push('7');
        pin.push('8');
        assert!(pin.pop());
        assert_eq!(pin.len(), 1);
        assert!(pin.pop());
        assert!(!pin.pop());
        assert!(pin.is_empty());
    }

    #[test]
    fn test_slot_fill() {
        let mut pin = PinBuffer::new();
        pin.push('1');
        pin.push('2');

        assert!(!pin.is_slot_filled(0));
        assert!(pin.is_slot_filled(1));
        assert!(pin.is_slot_filled(2));
        assert!(!pin.is_slot_filled(3));
        assert!(!pin.is_slot_filled(4));
    }

    #[test]
    fn test_debug_hides_digits() {
        let mut pin = PinBuffer::new();
        pin.push('4');
        pin.push('2');
        let debug = format!("{:?}", pin);
        assert!(!debug.contains("42"));
    }
}
