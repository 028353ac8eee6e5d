//! Application state and event handling
//!
//! The terminal loop is synchronous; store calls are driven to completion
//! on the app's own tokio runtime with `block_on`.

mod keys;
mod state;

pub use keys::{digit_for_key, is_remove_key};
pub use state::{AppState, MethodOption, Screen};

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use latchkey_core::{
    AuthEvent, ChallengeError, CoreError, CredentialKind, CredentialStore, Grid, GridLayout,
    LocalAuthSession, Outcome,
};
use latchkey_store::PreferencesStore;
use ratatui::prelude::*;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::ui::components::Notification;
use crate::ui::screens::pattern::CanvasGeometry;
use crate::ui::{self, Theme};

/// Store shared by every session the app opens
pub type SharedStore = Arc<dyn CredentialStore>;

/// Session type driven by the app
pub type AuthSession = LocalAuthSession<SharedStore>;

/// Ticks the full PIN indicator stays visible after the fourth digit
const PIN_FLASH_TICKS: u8 = 2;

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Color palette
    pub theme: Theme,

    /// Open authentication dialog, if any
    pub session: Option<AuthSession>,

    /// Whether the app should quit
    pub should_quit: bool,

    last_tick: Instant,
    store: SharedStore,
    preferences: PreferencesStore,
    layout: GridLayout,
    events_tx: UnboundedSender<AuthEvent>,
    events_rx: UnboundedReceiver<AuthEvent>,
    /// Whether a mouse drag started on the pattern canvas
    dragging: bool,
    runtime: Runtime,
}

impl App {
    /// Create a new application instance
    ///
    /// Fails fast when `layout` cannot produce a grid.
    pub fn new(
        runtime: Runtime,
        store: SharedStore,
        preferences: PreferencesStore,
        layout: GridLayout,
    ) -> AppResult<Self> {
        Grid::new(layout)?;

        let methods = runtime.block_on(preferences.get()).unwrap_or_else(|e| {
            tracing::warn!("Failed to load preferences, using defaults: {}", e);
            Default::default()
        });

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: AppState::new(methods),
            theme: Theme::default(),
            session: None,
            should_quit: false,
            last_tick: Instant::now(),
            store,
            preferences,
            layout,
            events_tx,
            events_rx,
            dragging: false,
            runtime,
        })
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = tick_rate
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if self.last_tick.elapsed() >= tick_rate {
                self.state.tick();
                self.last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state.current_screen {
            Screen::SelectMethod => self.handle_select_key(key.code),
            Screen::Authenticate => self.handle_authenticate_key(key.code),
            Screen::Unlocked => self.handle_unlocked_key(key.code),
        }
    }

    fn handle_select_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Char(' ') => match self.state.selected_option() {
                MethodOption::Apply => self.apply_methods(),
                option => option.toggle(&mut self.state.methods),
            },
            KeyCode::Enter => self.apply_methods(),
            _ => {}
        }
    }

    fn handle_authenticate_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.dismiss();
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.kind() != CredentialKind::Pin {
            return;
        }

        if let Some(digit) = digit_for_key(key) {
            let result = self.runtime.block_on(session.press_digit(digit));
            log_submit_error(result);
        } else if is_remove_key(key) {
            session.remove_digit();
        }

        self.process_events();
    }

    fn handle_unlocked_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Esc => {
                self.state.current_screen = Screen::SelectMethod;
                self.state.enrolled = false;
            }
            _ => {}
        }
    }

    /// Handle mouse events on the pattern canvas
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.current_screen != Screen::Authenticate {
            return;
        }
        let Some(area) = self.state.pattern_area else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let geometry = CanvasGeometry::new(area, self.layout);
        let touch = geometry.to_layout(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(touch) = touch {
                    session.touch_down(touch);
                    self.dragging = true;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                if let Some(touch) = touch {
                    session.touch_move(touch);
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.dragging => {
                self.dragging = false;
                let result = self.runtime.block_on(session.touch_up());
                log_submit_error(result);
                self.process_events();
            }
            _ => {}
        }
    }

    /// Save the edited methods and open a session for the active kind
    fn apply_methods(&mut self) {
        let methods = self.state.methods;
        if methods.active_kind().is_none() {
            self.state
                .notify(Notification::warning("Enable pattern or PIN to continue"));
            return;
        }

        if let Err(e) = self.runtime.block_on(self.preferences.set(&methods)) {
            tracing::warn!("Failed to save preferences: {}", e);
            self.state
                .notify(Notification::error("Could not save preferences"));
        }

        let opened = self.runtime.block_on(LocalAuthSession::open(
            Arc::clone(&self.store),
            methods,
            self.layout,
            self.events_tx.clone(),
        ));

        match opened {
            Ok(session) => {
                tracing::info!(kind = %session.kind(), state = ?session.state(), "Auth dialog opened");
                self.session = Some(session);
                self.dragging = false;
                self.state.current_screen = Screen::Authenticate;
            }
            Err(e) => {
                tracing::warn!("Failed to open auth dialog: {}", e);
                self.state
                    .notify(Notification::error("Credential store unavailable"));
            }
        }
    }

    /// Close the dialog without authenticating
    fn dismiss(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.dismiss();
        }
        self.process_events();
    }

    /// Apply every queued session event to the UI state
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AuthEvent::GestureCompleted { kind, .. } => {
                    tracing::debug!(%kind, "Gesture completed");
                    if kind == CredentialKind::Pin {
                        self.state.pin_flash_ticks = PIN_FLASH_TICKS;
                    }
                }
                AuthEvent::Outcome(outcome) => self.on_outcome(outcome),
                AuthEvent::StoreUnavailable(message) => {
                    tracing::warn!("Store unavailable: {}", message);
                    self.state
                        .notify(Notification::error("Credential store unavailable"));
                }
                AuthEvent::Dismissed => {
                    self.session = None;
                    self.dragging = false;
                    self.state.current_screen = Screen::SelectMethod;
                    self.state.notify(Notification::info("Cancelled"));
                }
            }
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        let Some(kind) = self.session.as_ref().map(|s| s.kind()) else {
            return;
        };

        self.state.notify(Notification::for_outcome(kind, outcome));

        if outcome.is_terminal() {
            self.state.enrolled = outcome == Outcome::EnrollmentSucceeded;
            self.state.current_screen = Screen::Unlocked;
            self.session = None;
            self.dragging = false;
        }
    }
}

fn log_submit_error<T>(result: Result<T, ChallengeError>) {
    if let Err(e) = result {
        tracing::debug!("Submission not accepted: {}", e);
    }
}
