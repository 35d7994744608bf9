//! Alarm scheduler
//! Owns the alarm slots and the timer handle, re-arms from the interrupt handlers

use core::cell::RefCell;

use critical_section::Mutex;

use super::{AlarmHardware, AlarmId, MIN_INTERVAL_US, NUM_ALARMS, SchedulerError};

/// Called from interrupt context when an alarm fires: id, name, registration parameters
pub type AlarmCallback<P> = fn(AlarmId, &'static str, P);

struct Registration<P> {
    name: &'static str,
    repeat: bool,
    interval: u32,
    /// Absolute counter value of the next firing
    target: u64,
    callback: AlarmCallback<P>,
    params: P,
}

struct Slot<P> {
    registration: Option<Registration<P>>,
    /// Bumped on every set/clear so a firing only re-arms the registration it ran
    generation: u32,
}

impl<P> Slot<P> {
    const EMPTY: Self = Self {
        registration: None,
        generation: 0,
    };
}

/// Snapshot taken before running a callback outside the critical section
struct Firing<P> {
    name: &'static str,
    callback: AlarmCallback<P>,
    params: P,
    generation: u32,
}

/// Software alarms on top of a hardware timer.
///
/// One slot per comparator channel. Registration and clearing run from the
/// application loop, [`Scheduler::on_interrupt`] from the channel's interrupt
/// handler. Slot state is only touched inside short critical sections and
/// callbacks always run outside of them.
///
/// `P` is the parameter type handed to callbacks, fixed at compile time per
/// deployment (usually an enum of `&'static` targets).
pub struct Scheduler<H, P, const N: usize = NUM_ALARMS> {
    hw: H,
    slots: [Mutex<RefCell<Slot<P>>>; N],
}

impl<H, P, const N: usize> Scheduler<H, P, N> {
    pub const fn new(hw: H) -> Self {
        Self {
            hw,
            slots: [const { Mutex::new(RefCell::new(Slot::EMPTY)) }; N],
        }
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }
}

impl<H: AlarmHardware, P: Copy, const N: usize> Scheduler<H, P, N> {
    /// Microseconds since the counter started.
    ///
    /// The counter halves are read unlatched, so the high half is read again
    /// after the low one and the read is retried if the low half rolled over in
    /// between.
    pub fn now_us(&self) -> u64 {
        let mut hi = self.hw.read_time_high();
        loop {
            let lo = self.hw.read_time_low();
            let next_hi = self.hw.read_time_high();
            if next_hi == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
            hi = next_hi;
        }
    }

    /// Fire `callback` every `interval_us` microseconds until cleared
    pub fn set_repeating_alarm(
        &self,
        id: AlarmId,
        name: &'static str,
        interval_us: u32,
        callback: AlarmCallback<P>,
        params: P,
    ) -> Result<(), SchedulerError> {
        self.set_alarm(id, name, interval_us, true, callback, params)
    }

    /// Fire `callback` once, `interval_us` microseconds from now
    pub fn set_oneshot_alarm(
        &self,
        id: AlarmId,
        name: &'static str,
        interval_us: u32,
        callback: AlarmCallback<P>,
        params: P,
    ) -> Result<(), SchedulerError> {
        self.set_alarm(id, name, interval_us, false, callback, params)
    }

    /// Drop the registration and disarm the channel.
    ///
    /// No firing starts after this returns; a callback already running finishes
    /// but is not re-armed.
    pub fn clear_alarm(&self, id: AlarmId) -> Result<(), SchedulerError> {
        let index = self.check(id)?;
        critical_section::with(|cs| {
            let mut slot = self.slots[index].borrow_ref_mut(cs);
            slot.registration = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.disable_channel(id);
        });
        info!("{} cleared", id.0);
        Ok(())
    }

    /// Whether a callback is registered on `id`
    pub fn is_active(&self, id: AlarmId) -> bool {
        self.slot_index(id).is_some_and(|index| {
            critical_section::with(|cs| self.slots[index].borrow_ref(cs).registration.is_some())
        })
    }

    /// Absolute counter value the alarm fires at next
    pub fn next_target(&self, id: AlarmId) -> Option<u64> {
        let index = self.slot_index(id)?;
        critical_section::with(|cs| {
            self.slots[index]
                .borrow_ref(cs)
                .registration
                .as_ref()
                .map(|r| r.target)
        })
    }

    /// Interrupt handler body for channel `id`.
    ///
    /// Acknowledges the interrupt, runs the callback and re-arms repeating
    /// alarms on the previous target plus the interval. A target that has
    /// already passed (callback overran) is pulled to the nearest safe point,
    /// skipping missed periods instead of bursting through them.
    pub fn on_interrupt(&self, id: AlarmId) {
        let Some(index) = self.slot_index(id) else {
            return;
        };
        if !self.hw.interrupt_status(id) {
            return;
        }
        self.hw.clear_interrupt(id);

        let Some(firing) = self.begin_firing(index) else {
            return;
        };
        (firing.callback)(id, firing.name, firing.params);
        self.finish_firing(id, index, firing.generation);
    }

    fn begin_firing(&self, index: usize) -> Option<Firing<P>> {
        critical_section::with(|cs| {
            let slot = self.slots[index].borrow_ref(cs);
            slot.registration.as_ref().map(|r| Firing {
                name: r.name,
                callback: r.callback,
                params: r.params,
                generation: slot.generation,
            })
        })
    }

    fn finish_firing(&self, id: AlarmId, index: usize, generation: u32) {
        critical_section::with(|cs| {
            let mut slot = self.slots[index].borrow_ref_mut(cs);
            if slot.generation != generation {
                // Replaced or cleared while the callback ran
                return;
            }
            let repeat = match slot.registration.as_ref() {
                Some(r) => r.repeat,
                None => return,
            };
            if !repeat {
                slot.registration = None;
                self.disable_channel(id);
                return;
            }
            let now = self.now_us();
            if let Some(r) = slot.registration.as_mut() {
                r.target += u64::from(r.interval);
                let earliest = now + u64::from(MIN_INTERVAL_US);
                if r.target < earliest {
                    trace!("{} overran, target moved by {}us", id.0, earliest - r.target);
                    r.target = earliest;
                }
                self.hw.write_alarm(id, r.target as u32);
            }
        });
    }

    fn set_alarm(
        &self,
        id: AlarmId,
        name: &'static str,
        interval_us: u32,
        repeat: bool,
        callback: AlarmCallback<P>,
        params: P,
    ) -> Result<(), SchedulerError> {
        let index = self.check(id)?;
        let interval = interval_us.max(MIN_INTERVAL_US);
        let target = critical_section::with(|cs| {
            let mut slot = self.slots[index].borrow_ref_mut(cs);
            let mut target = self.now_us() + u64::from(interval);
            // Drop any firing left over from a previous registration
            self.hw.clear_interrupt(id);
            slot.generation = slot.generation.wrapping_add(1);
            slot.registration = Some(Registration {
                name,
                repeat,
                interval,
                target,
                callback,
                params,
            });

            let now = self.now_us();
            if target <= now {
                target = now + u64::from(MIN_INTERVAL_US);
                if let Some(r) = slot.registration.as_mut() {
                    r.target = target;
                }
            }
            self.hw.write_alarm(id, target as u32);
            self.hw.set_interrupt_enabled(id, true);
            self.hw.set_irq_line(id, true);
            target
        });
        info!(
            "{} ({}) armed: interval {}us, repeat {}, first at {}",
            id.0, name, interval, repeat, target
        );
        Ok(())
    }

    fn disable_channel(&self, id: AlarmId) {
        self.hw.set_irq_line(id, false);
        self.hw.set_interrupt_enabled(id, false);
        self.hw.disarm(id);
    }

    fn slot_index(&self, id: AlarmId) -> Option<usize> {
        (id.index() < N).then_some(id.index())
    }

    fn check(&self, id: AlarmId) -> Result<usize, SchedulerError> {
        let Some(index) = self.slot_index(id) else {
            warn!("alarm id {} out of range", id.0);
            return Err(SchedulerError::InvalidAlarmId(id));
        };
        if self.hw.is_reserved(id) {
            warn!("alarm {} is reserved", id.0);
            return Err(SchedulerError::ReservedAlarm(id));
        }
        Ok(index)
    }
}
