//! Reusable UI components

mod notification;

pub use notification::{Notification, NotificationLevel};
