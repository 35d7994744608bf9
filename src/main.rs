//! # Pico Buttons
//! Raspberry Pi Pico button panel: seven buttons scanned from a hardware
//! alarm, gestures printed over RTT

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::config::Config;
use pico_buttons::alarm::{AlarmId, Scheduler};
use pico_buttons::buttons::EventQueue;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod config;
mod rp_timer;
mod task;

use rp_timer::Rp2040Timer;
use task::{AlarmParams, PANEL, button_reporter, install_panel, scan_buttons};

/// Firmware version - automatically populated from Cargo.toml
pub static FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Alarms on TIMER channels 1..=3, serviced by the handlers in `rp_timer`
pub static SCHEDULER: Scheduler<Rp2040Timer, AlarmParams> = Scheduler::new(Rp2040Timer::new());

static EVENT_QUEUE: StaticCell<EventQueue> = StaticCell::new();

/// Helper function to spawn tasks and unwrap, panicking if spawn fails.
/// This is acceptable during initialization as we want to fail fast if we can't spawn a task.
#[allow(clippy::unwrap_used)]
fn spawn_unwrap<S>(spawner: &Spawner, token: embassy_executor::SpawnToken<S>) {
    spawner.spawn(token).unwrap();
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting pico buttons v{}", FIRMWARE_VERSION);

    let p = embassy_rp::init(Config::default());

    let (keys, led) = config::init_all(
        p.PIN_18, p.PIN_19, p.PIN_20, p.PIN_21, p.PIN_22, p.PIN_26, p.PIN_27, p.PIN_25,
    );

    let events = install_panel(keys, EVENT_QUEUE.init(EventQueue::new()));

    // Nothing scans the panel without this alarm, fail fast
    if let Err(err) = SCHEDULER.set_repeating_alarm(
        AlarmId(config::SCAN_ALARM_ID),
        "button scan",
        config::SCAN_INTERVAL_US,
        scan_buttons,
        AlarmParams::ScanButtons(&PANEL),
    ) {
        defmt::panic!("Failed to start button scan: {}", err);
    }

    spawn_unwrap(&spawner, button_reporter(events, led));

    info!(
        "Scanning every {}us, started at {}us",
        config::SCAN_INTERVAL_US,
        SCHEDULER.now_us()
    );
}
