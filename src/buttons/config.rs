//! Button classification settings
//! All thresholds are scan counts, so the same config works at any scan cadence

use crate::history::MAX_WIDTH;

/// Smallest accepted history window
pub const MIN_HISTORY_SIZE: u8 = 10;
/// Largest accepted history window
pub const MAX_HISTORY_SIZE: u8 = MAX_WIDTH;
/// History window used by the presets
pub const DEFAULT_HISTORY_SIZE: u8 = 40;

/// Per-button classification settings.
///
/// Immutable once built. [`ButtonConfig::new`] never fails: out-of-range values
/// are clamped to the nearest valid one.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    /// Pin level that means "pressed". False for a button between GND and a pulled-up pin.
    active_high: bool,
    /// Count bursts of clicks instead of reporting every click as single
    multi_clicks: bool,
    /// Number of scans kept in the raw and filtered windows
    history_size: u8,
    /// Consecutive agreeing raw samples needed to flip the filtered state
    filter_size: u8,
    /// Consecutive released filtered scans that close a click burst (multi-click only)
    act_finish_cnt: u8,
    /// Continuous press length that starts auto-repeat (0 disables repeat)
    repeat_detect_cnt: u8,
    /// Extra scans skipped between repeat increments
    repeat_skip: u8,
    /// Continuous press length that reports Long (0 disables)
    long_detect_cnt: u8,
    /// Continuous press length that reports LongLong (0 disables)
    long_long_detect_cnt: u8,
}

impl ButtonConfig {
    /// Single clicks only, no repeat, no long press
    pub const SINGLE: Self = Self::new(false, false, DEFAULT_HISTORY_SIZE, 1, 0, 0, 0, 0, 0);

    /// Single clicks with auto-repeat while held
    pub const SINGLE_REPEAT: Self =
        Self::new(false, false, DEFAULT_HISTORY_SIZE, 1, 0, 10, 2, 0, 0);

    /// Multi-click bursts plus Long and LongLong press
    pub const MULTI: Self = Self::new(false, true, DEFAULT_HISTORY_SIZE, 1, 5, 0, 2, 15, 39);

    /// Build a config, clamping every field into its valid range
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        active_high: bool,
        multi_clicks: bool,
        history_size: u8,
        filter_size: u8,
        act_finish_cnt: u8,
        repeat_detect_cnt: u8,
        repeat_skip: u8,
        long_detect_cnt: u8,
        long_long_detect_cnt: u8,
    ) -> Self {
        let history_size = clamp(history_size, MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
        Self {
            active_high,
            multi_clicks,
            history_size,
            filter_size: clamp(filter_size, 1, history_size),
            act_finish_cnt: if multi_clicks {
                clamp(act_finish_cnt, 0, history_size)
            } else {
                0
            },
            repeat_detect_cnt,
            repeat_skip,
            long_detect_cnt: clamp(long_detect_cnt, 0, history_size - 1),
            long_long_detect_cnt: clamp(long_long_detect_cnt, 0, history_size - 1),
        }
    }

    /// Same settings with a different pressed polarity
    #[must_use]
    pub const fn with_active_high(mut self, active_high: bool) -> Self {
        self.active_high = active_high;
        self
    }

    pub const fn active_high(&self) -> bool {
        self.active_high
    }

    pub const fn multi_clicks(&self) -> bool {
        self.multi_clicks
    }

    pub const fn history_size(&self) -> u8 {
        self.history_size
    }

    pub const fn filter_size(&self) -> u8 {
        self.filter_size
    }

    pub const fn act_finish_cnt(&self) -> u8 {
        self.act_finish_cnt
    }

    pub const fn repeat_detect_cnt(&self) -> u8 {
        self.repeat_detect_cnt
    }

    pub const fn repeat_skip(&self) -> u8 {
        self.repeat_skip
    }

    pub const fn long_detect_cnt(&self) -> u8 {
        self.long_detect_cnt
    }

    pub const fn long_long_detect_cnt(&self) -> u8 {
        self.long_long_detect_cnt
    }

    /// Repeat is only evaluated when neither long threshold is set
    pub(crate) const fn repeat_enabled(&self) -> bool {
        self.long_detect_cnt == 0 && self.long_long_detect_cnt == 0
    }

    /// Long/LongLong are only evaluated when repeat is off
    pub(crate) const fn long_enabled(&self) -> bool {
        self.repeat_detect_cnt == 0
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self::SINGLE
    }
}

const fn clamp(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
