//! Button handling
//! Scan callback run from the alarm interrupt, and the task reporting the
//! resulting gesture events

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_rp::gpio::{Input, Output};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use pico_buttons::alarm::AlarmId;
use pico_buttons::buttons::{
    Button, ButtonConfig, ButtonEvent, ButtonEventType, ButtonEvents, ButtonGroup, EventQueue,
};

use crate::config::{Keys, POLL_INTERVAL_MS, SCAN_SKIP};

/// Buttons on the panel
pub const PANEL_SIZE: usize = 7;

pub type PanelGroup = ButtonGroup<'static, Input<'static>, PANEL_SIZE>;
pub type SharedPanel = Mutex<CriticalSectionRawMutex, RefCell<Option<PanelGroup>>>;

/// The panel, shared between init and the scan alarm
pub static PANEL: SharedPanel = Mutex::new(RefCell::new(None));

/// Parameters handed to alarm callbacks
#[derive(Clone, Copy)]
pub enum AlarmParams {
    ScanButtons(&'static SharedPanel),
}

/// Build the "5WayTactile+2" group and publish it in [`PANEL`].
/// Returns the event handle for the reporter.
pub fn install_panel(keys: Keys<'static>, queue: &'static mut EventQueue) -> ButtonEvents<'static> {
    let (mut group, events) = ButtonGroup::new(
        "5WayTactile+2",
        [
            Button::new("reset", keys.reset, ButtonConfig::SINGLE),
            Button::new("set", keys.set, ButtonConfig::SINGLE),
            Button::new("center", keys.center, ButtonConfig::MULTI),
            Button::new("left", keys.left, ButtonConfig::SINGLE_REPEAT),
            Button::new("right", keys.right, ButtonConfig::SINGLE_REPEAT),
            Button::new("up", keys.up, ButtonConfig::SINGLE_REPEAT),
            Button::new("down", keys.down, ButtonConfig::SINGLE_REPEAT),
        ],
        queue,
    );
    group.set_scan_skip(SCAN_SKIP);
    PANEL.lock(|panel| panel.replace(Some(group)));
    events
}

/// Alarm callback: one scan of every button in the group
pub fn scan_buttons(_id: AlarmId, _name: &'static str, params: AlarmParams) {
    match params {
        AlarmParams::ScanButtons(panel) => panel.lock(|panel| {
            if let Some(group) = panel.borrow_mut().as_mut() {
                group.scan();
            }
        }),
    }
}

/// Button reporter task - prints at most one event per poll and blinks the LED
#[embassy_executor::task]
pub async fn button_reporter(mut events: ButtonEvents<'static>, mut led: Output<'static>) -> ! {
    info!("Button reporter task started");

    let mut dropped = 0;
    loop {
        if let Some(event) = events.poll_event() {
            report(&event);
        }

        let now_dropped = events.dropped_events();
        if now_dropped != dropped {
            warn!("{} button events dropped", now_dropped.wrapping_sub(dropped));
            dropped = now_dropped;
        }

        led.toggle();
        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

fn report(event: &ButtonEvent) {
    let name = event.button_name;
    match event.event_type {
        ButtonEventType::Single => info!("{}: 1", name),
        ButtonEventType::SingleRepeated => info!("{}: 1 (Repeated)", name),
        ButtonEventType::Multi => info!("{}: {}", name, event.click_count),
        ButtonEventType::Long => info!("{}: Long", name),
        ButtonEventType::LongLong => info!("{}: LongLong", name),
        ButtonEventType::None => {}
    }
}
