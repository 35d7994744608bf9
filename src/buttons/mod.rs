//! Button gesture detection
//! Debounce, click/multi-click, long press and auto-repeat from periodic pin scans

pub mod button;
pub mod config;
pub mod event;
pub mod group;

pub use button::Button;
pub use config::{ButtonConfig, DEFAULT_HISTORY_SIZE, MAX_HISTORY_SIZE, MIN_HISTORY_SIZE};
pub use event::{ButtonEvent, ButtonEventType, ButtonEvents, EVENT_QUEUE_SIZE, EventQueue};
pub use group::ButtonGroup;
