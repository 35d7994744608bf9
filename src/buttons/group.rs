//! Button group
//! Scans every registered button and queues their events in one FIFO

use embedded_hal_1::digital::InputPin;

use super::button::Button;
use super::event::{ButtonEvents, EventQueue, EventSink};

/// A set of buttons scanned together.
///
/// `scan` is meant to run from a periodic alarm callback; the matching
/// [`ButtonEvents`] handle returned by [`ButtonGroup::new`] is polled from the
/// application loop.
pub struct ButtonGroup<'q, I, const N: usize> {
    name: &'static str,
    buttons: [Button<I>; N],
    scan_skip: u8,
    scan_cnt: u64,
    events: EventSink<'q>,
}

impl<'q, I, const N: usize> ButtonGroup<'q, I, N> {
    /// Create a group over `buttons`, in registration order, using `queue` for its events
    pub fn new(
        name: &'static str,
        buttons: [Button<I>; N],
        queue: &'q mut EventQueue,
    ) -> (Self, ButtonEvents<'q>) {
        let (events, consumer) = queue.split();
        info!("button group {} created with {} buttons", name, N);
        (
            Self {
                name,
                buttons,
                scan_skip: 0,
                scan_cnt: 0,
                events,
            },
            consumer,
        )
    }

    /// Ignore the first `scan_skip` scans, e.g. while pull-ups settle after boot.
    /// Counted from creation, so only effective before that many scans have run.
    pub fn set_scan_skip(&mut self, scan_skip: u8) {
        self.scan_skip = scan_skip;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn buttons(&self) -> &[Button<I>] {
        &self.buttons
    }

    /// Scans seen so far, skipped ones included
    pub fn scan_count(&self) -> u64 {
        self.scan_cnt
    }

    /// Events discarded because the queue was full
    pub fn dropped_events(&self) -> u32 {
        self.events.dropped()
    }

    /// Classify already-sampled pin levels, one per button in registration order
    pub fn scan_levels(&mut self, levels: &[bool; N]) {
        if self.begin_scan() {
            for (button, &level) in self.buttons.iter_mut().zip(levels) {
                let event = button.classify(level, self.scan_cnt);
                if !event.is_none() {
                    self.events.push(event);
                }
            }
        }
        self.scan_cnt += 1;
    }

    fn begin_scan(&self) -> bool {
        self.scan_cnt >= u64::from(self.scan_skip)
    }
}

impl<I: InputPin, const N: usize> ButtonGroup<'_, I, N> {
    /// Sample and classify every button. Never blocks, safe from interrupt context.
    pub fn scan(&mut self) {
        if self.begin_scan() {
            for button in &mut self.buttons {
                let event = button.scan(self.scan_cnt);
                if !event.is_none() {
                    self.events.push(event);
                }
            }
        }
        self.scan_cnt += 1;
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal_1::digital::{ErrorType, InputPin};

    use super::*;
    use crate::buttons::{ButtonConfig, ButtonEventType, EVENT_QUEUE_SIZE};

    /// Pin whose level the test drives through a shared cell
    struct MockPin<'a> {
        level: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    /// Pin that always fails to read
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = embedded_hal_1::digital::ErrorKind;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal_1::digital::ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal_1::digital::ErrorKind::Other)
        }
    }

    fn scan_n<I: InputPin, const N: usize>(group: &mut ButtonGroup<'_, I, N>, n: u32) {
        for _ in 0..n {
            group.scan();
        }
    }

    #[test]
    fn test_end_to_end_multi_preset() {
        // Active-low pins idle high
        let center = Cell::new(true);
        let mut queue = EventQueue::new();
        let (mut group, mut events) = ButtonGroup::new(
            "panel",
            [Button::new(
                "center",
                MockPin { level: &center },
                ButtonConfig::MULTI,
            )],
            &mut queue,
        );

        // Double click
        center.set(false);
        scan_n(&mut group, 3);
        center.set(true);
        scan_n(&mut group, 4);
        center.set(false);
        scan_n(&mut group, 3);
        center.set(true);
        scan_n(&mut group, 10);

        let event = events.poll_event().expect("double click");
        assert_eq!(event.button_name, "center");
        assert_eq!(event.event_type, ButtonEventType::Multi);
        assert_eq!(event.click_count, 2);
        assert_eq!(events.poll_event(), None);

        // Hold through both long thresholds
        center.set(false);
        scan_n(&mut group, 15);
        let event = events.poll_event().expect("long");
        assert_eq!(event.event_type, ButtonEventType::Long);
        scan_n(&mut group, 24);
        let event = events.poll_event().expect("long long");
        assert_eq!(event.event_type, ButtonEventType::LongLong);

        center.set(true);
        scan_n(&mut group, 20);
        assert_eq!(events.poll_event(), None);
    }

    #[test]
    fn test_buttons_report_in_registration_order() {
        let a = Cell::new(false);
        let b = Cell::new(false);
        let mut queue = EventQueue::new();
        let (mut group, mut events) = ButtonGroup::new(
            "pair",
            [
                Button::new("a", MockPin { level: &a }, ButtonConfig::SINGLE),
                Button::new("b", MockPin { level: &b }, ButtonConfig::SINGLE),
            ],
            &mut queue,
        );
        // Both idle high (released) first
        a.set(true);
        b.set(true);
        scan_n(&mut group, 2);

        a.set(false);
        b.set(false);
        group.scan();

        assert_eq!(events.poll_event().map(|e| e.button_name), Some("a"));
        assert_eq!(events.poll_event().map(|e| e.button_name), Some("b"));
        assert!(events.is_empty());
    }

    #[test]
    fn test_scan_skip_ignores_early_scans() {
        let pin = Cell::new(false);
        let mut queue = EventQueue::new();
        let (mut group, mut events) = ButtonGroup::new(
            "skip",
            [Button::new("k", MockPin { level: &pin }, ButtonConfig::SINGLE)],
            &mut queue,
        );
        group.set_scan_skip(5);

        // Pressed from power-up, but the first five scans are ignored
        scan_n(&mut group, 5);
        assert_eq!(group.scan_count(), 5);
        assert!(events.is_empty());

        group.scan();
        assert_eq!(
            events.poll_event().map(|e| e.event_type),
            Some(ButtonEventType::Single)
        );
    }

    #[test]
    fn test_full_queue_never_blocks_scan() {
        let config = ButtonConfig::new(false, false, 10, 1, 0, 1, 0, 0, 0);
        let mut queue = EventQueue::new();
        let (mut group, mut events) = ButtonGroup::new(
            "broken",
            [Button::new("r", BrokenPin, config)],
            &mut queue,
        );

        // Broken reads count as released: nothing to report
        scan_n(&mut group, 50);
        assert!(events.is_empty());

        let mut flood_queue = EventQueue::new();
        let (mut flood, mut flood_events) = ButtonGroup::new(
            "flood",
            [Button::new("r", BrokenPin, config)],
            &mut flood_queue,
        );
        // Repeat every scan while held, far more events than the queue holds
        for _ in 0..100 {
            flood.scan_levels(&[false]);
        }
        assert_eq!(flood_events.len(), EVENT_QUEUE_SIZE);
        assert_eq!(flood.dropped_events(), 100 - EVENT_QUEUE_SIZE as u32);

        let mut seen = 0;
        while let Some(event) = flood_events.poll_event() {
            assert_eq!(event.event_type, ButtonEventType::SingleRepeated);
            seen += 1;
        }
        assert_eq!(seen, EVENT_QUEUE_SIZE);
    }

    #[test]
    fn test_scan_skip_stays_closed_past_u32_range() {
        let pin = Cell::new(true);
        let mut queue = EventQueue::new();
        let (mut group, mut events) = ButtonGroup::new(
            "long-run",
            [Button::new("k", MockPin { level: &pin }, ButtonConfig::SINGLE)],
            &mut queue,
        );
        group.set_scan_skip(3);
        scan_n(&mut group, 10);

        // Years of scanning later
        group.scan_cnt = u64::from(u32::MAX);
        group.scan();
        pin.set(false);
        scan_n(&mut group, 2);
        pin.set(true);
        scan_n(&mut group, 10);

        assert_eq!(group.scan_count(), u64::from(u32::MAX) + 13);
        assert_eq!(
            events.poll_event().map(|e| e.event_type),
            Some(ButtonEventType::Single)
        );
        assert!(events.is_empty());
        assert_eq!(group.name(), "long-run");
        assert_eq!(group.buttons().len(), 1);
    }
}
