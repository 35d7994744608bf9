//! Bit-packed sample history
//! Fixed-width shift-in window over a `u64`, newest sample at bit 0

/// Widest window a [`History`] can hold
pub const MAX_WIDTH: u8 = 64;

/// Shift-in window of boolean samples.
///
/// Bit 0 is the newest sample and bit `width - 1` the oldest. Every primitive
/// is a handful of word operations so it can run from interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct History {
    bits: u64,
    mask: u64,
}

impl History {
    /// Create a window of `width` samples (clamped to `1..=64`), every sample set to `fill`
    pub const fn new(width: u8, fill: bool) -> Self {
        let width = if width == 0 {
            1
        } else if width > MAX_WIDTH {
            MAX_WIDTH
        } else {
            width
        };
        let mask = if width == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self {
            bits: if fill { mask } else { 0 },
            mask,
        }
    }

    /// Number of samples the window holds
    pub const fn width(&self) -> u8 {
        self.mask.count_ones() as u8
    }

    /// Raw packed samples
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Overwrite every sample with `flag`
    pub fn fill(&mut self, flag: bool) {
        self.bits = if flag { self.mask } else { 0 };
    }

    /// Shift in a new sample at bit 0, dropping the oldest one
    pub fn push(&mut self, flag: bool) {
        self.bits = ((self.bits << 1) | u64::from(flag)) & self.mask;
    }

    /// Sample at position `i` (0 = newest). Out-of-window positions read as false.
    pub fn test(&self, i: u8) -> bool {
        i < self.width() && self.bits & (1 << i) != 0
    }

    /// Overwrite the sample at position `i`. Out-of-window positions are ignored.
    pub fn set(&mut self, i: u8, flag: bool) {
        if i >= self.width() {
            return;
        }
        let bit = 1u64 << i;
        if flag {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    /// Length of the run of `true` samples ending at the newest sample
    pub fn trailing_ones(&self) -> u8 {
        // Bits above the window are zero in `bits`, so they are ones here and stop the count
        (!self.bits).trailing_zeros() as u8
    }

    /// Length of the run of `false` samples ending at the newest sample
    pub fn trailing_zeros(&self) -> u8 {
        (self.bits | !self.mask).trailing_zeros() as u8
    }

    /// Count released-to-pressed transitions inside the window.
    ///
    /// A transition is a pair `(i, i + 1)` where sample `i` is set and the older
    /// sample `i + 1` is clear. With `single_only` any number of transitions is
    /// reported as 1.
    pub fn rising_edge_count(&self, single_only: bool) -> u8 {
        // The oldest sample has no older neighbour inside the window
        let edges = self.bits & !(self.bits >> 1) & (self.mask >> 1);
        if edges == 0 {
            0
        } else if single_only {
            1
        } else {
            edges.count_ones() as u8
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_WIDTH, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_samples(width: u8, oldest_first: &[bool]) -> History {
        let mut history = History::new(width, false);
        for &sample in oldest_first {
            history.push(sample);
        }
        history
    }

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(History::new(0, false).width(), 1);
        assert_eq!(History::new(10, false).width(), 10);
        assert_eq!(History::new(64, false).width(), 64);
        assert_eq!(History::new(200, true).width(), 64);
    }

    #[test]
    fn test_trailing_runs_on_uniform_windows() {
        for width in [10u8, 40, 63, 64] {
            let zeros = History::new(width, false);
            assert_eq!(zeros.trailing_ones(), 0);
            assert_eq!(zeros.trailing_zeros(), width);

            let ones = History::new(width, true);
            assert_eq!(ones.trailing_ones(), width);
            assert_eq!(ones.trailing_zeros(), 0);
        }
    }

    #[test]
    fn test_push_discards_oldest_sample() {
        let mut history = History::new(10, true);
        history.push(false);
        assert_eq!(history.bits(), 0b11_1111_1110);
        assert_eq!(history.trailing_zeros(), 1);
        assert_eq!(history.trailing_ones(), 0);

        for _ in 0..10 {
            history.push(false);
        }
        assert_eq!(history.bits(), 0);
    }

    #[test]
    fn test_trailing_runs_after_mixed_samples() {
        let history = from_samples(16, &[true, true, false, true, true, true]);
        assert_eq!(history.trailing_ones(), 3);
        assert_eq!(history.trailing_zeros(), 0);

        let history = from_samples(16, &[true, false, false]);
        assert_eq!(history.trailing_ones(), 0);
        assert_eq!(history.trailing_zeros(), 2);
    }

    #[test]
    fn test_bit_access() {
        let mut history = History::new(12, false);
        history.set(0, true);
        history.set(1, true);
        assert!(history.test(0));
        assert!(history.test(1));
        assert!(!history.test(2));

        history.set(0, false);
        assert!(!history.test(0));
        assert_eq!(history.bits(), 0b10);

        // Outside the window
        history.set(12, true);
        assert!(!history.test(12));
        assert_eq!(history.bits(), 0b10);
    }

    #[test]
    fn test_rising_edges() {
        // released, pressed, released, pressed, pressed
        let history = from_samples(20, &[false, true, false, true, true]);
        assert_eq!(history.rising_edge_count(false), 2);
        assert_eq!(history.rising_edge_count(true), 1);

        assert_eq!(History::new(20, false).rising_edge_count(false), 0);
        assert_eq!(History::new(20, true).rising_edge_count(false), 0);
    }

    #[test]
    fn test_falling_transition_is_not_an_edge() {
        // pressed then released: the press started before the window
        let history = from_samples(10, &[true; 10]);
        let mut history = history;
        history.push(false);
        history.push(false);
        assert_eq!(history.rising_edge_count(false), 0);
    }

    #[test]
    fn test_oldest_sample_never_counts_as_edge() {
        let mut history = History::new(10, false);
        history.set(9, true);
        assert_eq!(history.rising_edge_count(false), 0);

        history.set(8, true);
        history.set(9, false);
        assert_eq!(history.rising_edge_count(false), 1);
    }

    #[test]
    fn test_full_width_alternating_pattern() {
        let history = History {
            bits: 0x5555_5555_5555_5555,
            mask: u64::MAX,
        };
        assert_eq!(history.rising_edge_count(false), 32);

        let history = History {
            bits: 0xAAAA_AAAA_AAAA_AAAA,
            mask: u64::MAX,
        };
        // Bit 63 is set but has no older neighbour
        assert_eq!(history.rising_edge_count(false), 31);
    }
}
