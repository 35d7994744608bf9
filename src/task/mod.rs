//! Task modules
//! Contains the button scan callback and the event reporter task

pub mod buttons;

// Re-export commonly used items
pub use buttons::{AlarmParams, PANEL, button_reporter, install_panel, scan_buttons};
