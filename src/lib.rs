//! # Pico Buttons
//! Button gesture detection and hardware alarm scheduling for the RP2040.
//!
//! Buttons are sampled from a periodic timer interrupt, classified into
//! single/multi clicks, long presses and auto-repeat, and handed to the
//! application loop through a wait-free queue.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod buttons;
pub mod history;

pub use alarm::{AlarmHardware, AlarmId, Scheduler, SchedulerError};
pub use buttons::{Button, ButtonConfig, ButtonEvent, ButtonEventType, ButtonEvents, ButtonGroup};
