//! Application state

use latchkey_core::AuthMethods;
use ratatui::layout::Rect;

use crate::ui::components::Notification;

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Choose which methods are enabled
    #[default]
    SelectMethod,

    /// Pattern canvas or PIN keypad
    Authenticate,

    /// Enrollment or verification succeeded
    Unlocked,
}

/// Rows of the method selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOption {
    Pattern,
    PinCode,
    Fingerprint,
    FaceId,
    Apply,
}

impl MethodOption {
    /// Display order
    pub const ALL: [MethodOption; 5] = [
        MethodOption::Pattern,
        MethodOption::PinCode,
        MethodOption::Fingerprint,
        MethodOption::FaceId,
        MethodOption::Apply,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MethodOption::Pattern => "Pattern",
            MethodOption::PinCode => "PIN code",
            MethodOption::Fingerprint => "Fingerprint",
            MethodOption::FaceId => "Face ID",
            MethodOption::Apply => "Apply",
        }
    }

    /// Whether the option is switched on in `methods`
    pub fn is_enabled(&self, methods: &AuthMethods) -> bool {
        match self {
            MethodOption::Pattern => methods.pattern,
            MethodOption::PinCode => methods.pin_code,
            MethodOption::Fingerprint => methods.fingerprint,
            MethodOption::FaceId => methods.face_id,
            MethodOption::Apply => false,
        }
    }

    /// Pattern and PIN behave as a radio group; biometrics are checkboxes
    pub fn toggle(&self, methods: &mut AuthMethods) {
        match self {
            MethodOption::Pattern => {
                methods.pattern = true;
                methods.pin_code = false;
            }
            MethodOption::PinCode => {
                methods.pin_code = true;
                methods.pattern = false;
            }
            MethodOption::Fingerprint => methods.fingerprint = !methods.fingerprint,
            MethodOption::FaceId => methods.face_id = !methods.face_id,
            MethodOption::Apply => {}
        }
    }
}

/// Application state
#[derive(Default)]
pub struct AppState {
    /// Current screen
    pub current_screen: Screen,

    /// Methods being edited on the selection screen
    pub methods: AuthMethods,

    /// Selected row on the selection screen
    pub method_index: usize,

    /// Active toast
    pub notification: Option<Notification>,

    /// Where the pattern canvas was last drawn, for mouse hit mapping
    pub pattern_area: Option<Rect>,

    /// Ticks left showing a full PIN indicator after submission
    pub pin_flash_ticks: u8,

    /// Whether the last completed session enrolled a new credential
    pub enrolled: bool,
}

impl AppState {
    pub fn new(methods: AuthMethods) -> Self {
        Self {
            methods,
            ..Default::default()
        }
    }

    /// Option under the cursor
    pub fn selected_option(&self) -> MethodOption {
        MethodOption::ALL[self.method_index.min(MethodOption::ALL.len() - 1)]
    }

    pub fn select_previous(&mut self) {
        self.method_index = self.method_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.method_index + 1 < MethodOption::ALL.len() {
            self.method_index += 1;
        }
    }

    /// Replace the active toast
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Advance timers by one tick
    pub fn tick(&mut self) {
        if let Some(notification) = &mut self.notification {
            notification.tick();
            if notification.is_expired() {
                self.notification = None;
            }
        }
        self.pin_flash_ticks = self.pin_flash_ticks.saturating_sub(1);
    }
}
