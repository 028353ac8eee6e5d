//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};

/// Main render function - delegates to the current screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    app.state.pattern_area = None;
    match app.state.current_screen {
        Screen::SelectMethod => screens::select_method::draw(frame, area, app),
        Screen::Authenticate => {
            let canvas = screens::authenticate::draw(frame, area, app);
            app.state.pattern_area = canvas;
        }
        Screen::Unlocked => screens::unlocked::draw(frame, area, app),
    }

    if let Some(notification) = &app.state.notification {
        notification.render(frame, area, &app.theme);
    }
}
