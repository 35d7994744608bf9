//! RP2040 TIMER peripheral access for the alarm scheduler
//! ALARM0 and TIMER_IRQ_0 belong to the embassy time driver, channels 1..=3 are ours

use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::pac;
use pico_buttons::alarm::{AlarmHardware, AlarmId};

use crate::SCHEDULER;

/// Offsets of the atomic set/clear register aliases
const ATOMIC_SET: usize = 0x2000;
const ATOMIC_CLEAR: usize = 0x3000;

/// Handle to the TIMER block. Zero-sized, the registers are global.
pub struct Rp2040Timer {
    _private: (),
}

impl Rp2040Timer {
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

fn set_line(irq: impl InterruptExt, enabled: bool) {
    if enabled {
        irq.unpend();
        // SAFETY: the handlers below only touch the scheduler, which guards its own state
        unsafe { irq.enable() };
    } else {
        irq.disable();
    }
}

impl AlarmHardware for Rp2040Timer {
    fn read_time_high(&self) -> u32 {
        pac::TIMER.timerawh().read()
    }

    fn read_time_low(&self) -> u32 {
        pac::TIMER.timerawl().read()
    }

    fn write_alarm(&self, id: AlarmId, target: u32) {
        // Writing the comparator arms it
        pac::TIMER.alarm(id.index()).write_value(target);
    }

    fn disarm(&self, id: AlarmId) {
        // Write 1 to disarm
        pac::TIMER.armed().write(|w| w.0 = id.mask());
    }

    fn set_interrupt_enabled(&self, id: AlarmId, enabled: bool) {
        let alias = if enabled { ATOMIC_SET } else { ATOMIC_CLEAR };
        let reg = (pac::TIMER.inte().as_ptr() as usize + alias) as *mut u32;
        // SAFETY: set/clear alias of INTE, only this channel's bit is touched
        unsafe { core::ptr::write_volatile(reg, id.mask()) };
    }

    fn interrupt_status(&self, id: AlarmId) -> bool {
        pac::TIMER.ints().read().0 & id.mask() != 0
    }

    fn clear_interrupt(&self, id: AlarmId) {
        pac::TIMER.intr().write(|w| w.0 = id.mask());
    }

    fn set_irq_line(&self, id: AlarmId, enabled: bool) {
        match id {
            AlarmId::ALARM1 => set_line(interrupt::TIMER_IRQ_1, enabled),
            AlarmId::ALARM2 => set_line(interrupt::TIMER_IRQ_2, enabled),
            AlarmId::ALARM3 => set_line(interrupt::TIMER_IRQ_3, enabled),
            _ => {}
        }
    }

    fn is_reserved(&self, id: AlarmId) -> bool {
        id == AlarmId::ALARM0
    }
}

#[interrupt]
unsafe fn TIMER_IRQ_1() {
    SCHEDULER.on_interrupt(AlarmId::ALARM1);
}

#[interrupt]
unsafe fn TIMER_IRQ_2() {
    SCHEDULER.on_interrupt(AlarmId::ALARM2);
}

#[interrupt]
unsafe fn TIMER_IRQ_3() {
    SCHEDULER.on_interrupt(AlarmId::ALARM3);
}
