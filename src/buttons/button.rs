//! Per-button classifier
//! Turns one pin sample per scan into at most one gesture event

use embedded_hal_1::digital::InputPin;

use super::config::ButtonConfig;
use super::event::{ButtonEvent, ButtonEventType};
use crate::history::History;

/// A single input and everything needed to classify it.
///
/// Only ever touched from the scan path of the group that owns it.
pub struct Button<I> {
    name: &'static str,
    pin: I,
    config: ButtonConfig,
    /// Pressed/released per scan, newest at bit 0
    raw: History,
    /// Debounced signal used for click accounting
    filtered: History,
    repeat_cnt: u8,
}

impl<I: InputPin> Button<I> {
    /// Sample the pin and classify it.
    ///
    /// A failed pin read counts as the released level.
    pub fn scan(&mut self, scan_cnt: u64) -> ButtonEvent {
        let pressed = match self.pin.is_high() {
            Ok(high) => high == self.config.active_high(),
            Err(_) => false,
        };
        self.update(pressed, scan_cnt)
    }
}

impl<I> Button<I> {
    pub fn new(name: &'static str, pin: I, config: ButtonConfig) -> Self {
        let size = config.history_size();
        Self {
            name,
            pin,
            config,
            raw: History::new(size, false),
            filtered: History::new(size, false),
            repeat_cnt: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Current auto-repeat count (0 while not repeating)
    pub fn repeat_count(&self) -> u8 {
        self.repeat_cnt
    }

    /// Classify a raw pin level as read from the hardware
    pub fn classify(&mut self, level: bool, scan_cnt: u64) -> ButtonEvent {
        self.update(level == self.config.active_high(), scan_cnt)
    }

    fn update(&mut self, pressed: bool, scan_cnt: u64) -> ButtonEvent {
        let cfg = self.config;
        let mut repeat_cnt = 0u8;
        let mut detect_long = false;
        let mut detect_long_long = false;

        self.raw.push(pressed);
        let push_run = self.raw.trailing_ones();
        let release_run = self.raw.trailing_zeros();

        // Repeat, from the unfiltered signal
        if cfg.repeat_enabled() && scan_cnt % (u64::from(cfg.repeat_skip()) + 1) == 0 {
            if cfg.repeat_detect_cnt() > 0 && push_run >= cfg.repeat_detect_cnt() {
                self.repeat_cnt = self.repeat_cnt.saturating_add(1);
                repeat_cnt = self.repeat_cnt;
            } else {
                self.repeat_cnt = 0;
            }
        }

        // Long / LongLong, from the unfiltered signal. Equality so each fires once per hold.
        if cfg.long_enabled() && push_run > 0 {
            if push_run == cfg.long_detect_cnt() {
                detect_long = true;
            } else if push_run == cfg.long_long_detect_cnt() {
                detect_long_long = true;
            }
        }

        // Debounce: hold the last state, flip only on unanimous agreement
        self.filtered.push(self.filtered.test(0));
        if push_run >= cfg.filter_size() {
            self.filtered.set(0, true);
        } else if release_run >= cfg.filter_size() {
            self.filtered.set(0, false);
        }

        let act_finished = self.filtered.trailing_zeros() >= cfg.act_finish_cnt();

        let click_cnt = if repeat_cnt > 0 {
            1
        } else if act_finished {
            self.filtered.rising_edge_count(!cfg.multi_clicks())
        } else {
            0
        };

        // Block re-counting until a fresh release/press cycle shifts zeros back in
        if detect_long || click_cnt > 0 {
            self.filtered.fill(true);
        }

        let event_type = if repeat_cnt > 0 {
            ButtonEventType::SingleRepeated
        } else if click_cnt > 1 {
            ButtonEventType::Multi
        } else if click_cnt == 1 {
            ButtonEventType::Single
        } else if detect_long {
            ButtonEventType::Long
        } else if detect_long_long {
            ButtonEventType::LongLong
        } else {
            ButtonEventType::None
        };

        ButtonEvent {
            button_name: self.name,
            event_type,
            click_count: click_cnt,
            repeat_count: repeat_cnt,
        }
    }
}
