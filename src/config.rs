//! GPIO configuration and build-time settings for the button panel.
//! Buttons are active-low with internal pull-ups.

include!(concat!(env!("OUT_DIR"), "/config_generated.rs"));

use embassy_rp::{
    Peri,
    gpio::{Input, Level, Output, Pull},
    peripherals,
};

/// Buttons on the 5-way tactile switch plus two extra keys:
/// - reset  -> GPIO18
/// - set    -> GPIO19
/// - center -> GPIO20
/// - right  -> GPIO21
/// - left   -> GPIO22
/// - down   -> GPIO26
/// - up     -> GPIO27
pub struct Keys<'d> {
    pub reset: Input<'d>,
    pub set: Input<'d>,
    pub center: Input<'d>,
    pub right: Input<'d>,
    pub left: Input<'d>,
    pub down: Input<'d>,
    pub up: Input<'d>,
}

/// Initialize the button inputs and the on-board LED (GPIO25).
#[allow(clippy::too_many_arguments)]
pub fn init_all(
    pin_18: Peri<'static, peripherals::PIN_18>,
    pin_19: Peri<'static, peripherals::PIN_19>,
    pin_20: Peri<'static, peripherals::PIN_20>,
    pin_21: Peri<'static, peripherals::PIN_21>,
    pin_22: Peri<'static, peripherals::PIN_22>,
    pin_26: Peri<'static, peripherals::PIN_26>,
    pin_27: Peri<'static, peripherals::PIN_27>,
    pin_25: Peri<'static, peripherals::PIN_25>,
) -> (Keys<'static>, Output<'static>) {
    let keys = Keys {
        reset: Input::new(pin_18, Pull::Up),
        set: Input::new(pin_19, Pull::Up),
        center: Input::new(pin_20, Pull::Up),
        right: Input::new(pin_21, Pull::Up),
        left: Input::new(pin_22, Pull::Up),
        down: Input::new(pin_26, Pull::Up),
        up: Input::new(pin_27, Pull::Up),
    };

    let led = Output::new(pin_25, Level::Low);

    (keys, led)
}
