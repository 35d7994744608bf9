//! Timer peripheral access
//! Register-level operations the scheduler needs from the hardware

use super::AlarmId;

/// A free-running 64-bit microsecond counter with comparator channels.
///
/// Every method maps onto a single register access so implementations stay
/// usable from interrupt context. Enable-bit updates must be atomic set/clear
/// writes rather than read-modify-write sequences, since both the application
/// loop and interrupt handlers touch them.
pub trait AlarmHardware {
    /// Upper half of the counter, raw (unlatched) read
    fn read_time_high(&self) -> u32;

    /// Lower half of the counter, raw (unlatched) read
    fn read_time_low(&self) -> u32;

    /// Load the comparator with the low word of `target` and arm it
    fn write_alarm(&self, id: AlarmId, target: u32);

    /// Disarm the comparator without waiting for it to match
    fn disarm(&self, id: AlarmId);

    /// Atomically set or clear the channel's interrupt-enable bit
    fn set_interrupt_enabled(&self, id: AlarmId, enabled: bool);

    /// Masked interrupt status of the channel
    fn interrupt_status(&self, id: AlarmId) -> bool;

    /// Acknowledge the channel's interrupt
    fn clear_interrupt(&self, id: AlarmId);

    /// Enable or disable the interrupt controller line serving the channel
    fn set_irq_line(&self, id: AlarmId, enabled: bool);

    /// Channel owned by some other driver and not available for alarms
    fn is_reserved(&self, _id: AlarmId) -> bool {
        false
    }
}

impl<T: AlarmHardware + ?Sized> AlarmHardware for &T {
    fn read_time_high(&self) -> u32 {
        (**self).read_time_high()
    }

    fn read_time_low(&self) -> u32 {
        (**self).read_time_low()
    }

    fn write_alarm(&self, id: AlarmId, target: u32) {
        (**self).write_alarm(id, target);
    }

    fn disarm(&self, id: AlarmId) {
        (**self).disarm(id);
    }

    fn set_interrupt_enabled(&self, id: AlarmId, enabled: bool) {
        (**self).set_interrupt_enabled(id, enabled);
    }

    fn interrupt_status(&self, id: AlarmId) -> bool {
        (**self).interrupt_status(id)
    }

    fn clear_interrupt(&self, id: AlarmId) {
        (**self).clear_interrupt(id);
    }

    fn set_irq_line(&self, id: AlarmId, enabled: bool) {
        (**self).set_irq_line(id, enabled);
    }

    fn is_reserved(&self, id: AlarmId) -> bool {
        (**self).is_reserved(id)
    }
}
