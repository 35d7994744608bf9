//! Hardware alarm scheduler
//! Software timers multiplexed onto the comparator channels of one free-running
//! microsecond counter, each channel with its own interrupt line

use core::fmt;

pub mod hardware;
pub mod scheduler;

pub use hardware::AlarmHardware;
pub use scheduler::{AlarmCallback, Scheduler};

/// Comparator channels on the RP2040 TIMER block
pub const NUM_ALARMS: usize = 4;

/// Shortest interval and re-arm distance, in microseconds.
///
/// A comparator only matches on equality, so a target closer than this to the
/// current count may already have slipped by when it is written.
pub const MIN_INTERVAL_US: u32 = 2;

/// Comparator channel number
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmId(pub u8);

impl AlarmId {
    pub const ALARM0: Self = Self(0);
    pub const ALARM1: Self = Self(1);
    pub const ALARM2: Self = Self(2);
    pub const ALARM3: Self = Self(3);

    /// Bit of this channel in the armed/enable/status registers
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALARM{}", self.0)
    }
}

/// Errors from alarm registration
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// No comparator channel with this id
    InvalidAlarmId(AlarmId),
    /// Channel exists but is owned by another driver
    ReservedAlarm(AlarmId),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlarmId(id) => write!(f, "alarm id out of range: {}", id.0),
            Self::ReservedAlarm(id) => write!(f, "{id} is reserved by another driver"),
        }
    }
}

impl core::error::Error for SchedulerError {}
