//! Indicator set: the three status LEDs every actuator node carries.
//!
//! The whole configuration fits in one byte, which is what the alarm and
//! entry sequences snapshot before they take over the LEDs and restore
//! afterwards.

use core::fmt;

/// One of the fixed indicators on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Indicator {
    Red = 0b001,
    Green = 0b010,
    Blue = 0b100,
}

impl Indicator {
    /// Every indicator, in bit order.
    pub const ALL: [Indicator; 3] = [Indicator::Red, Indicator::Green, Indicator::Blue];

    /// Return the bitmask for this indicator.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

/// Bitmask snapshot of the on/off state of every indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorSet(u8);

impl IndicatorSet {
    /// All indicators off.
    pub const OFF: Self = Self(0);
    /// All indicators on.
    pub const ALL_ON: Self = Self(0b111);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_ON.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_on(self, indicator: Indicator) -> bool {
        self.0 & indicator.mask() != 0
    }

    /// Copy of this set with `indicator` forced on or off.
    #[must_use]
    pub const fn with(self, indicator: Indicator, on: bool) -> Self {
        if on {
            Self(self.0 | indicator.mask())
        } else {
            Self(self.0 & !indicator.mask())
        }
    }

    /// Copy of this set with `indicator` flipped.
    #[must_use]
    pub const fn toggled(self, indicator: Indicator) -> Self {
        Self(self.0 ^ indicator.mask())
    }

    /// Copy of this set with every indicator flipped.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self(!self.0 & Self::ALL_ON.0)
    }
}

impl fmt::Display for IndicatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |i: Indicator, c: char| if self.is_on(i) { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(Indicator::Red, 'R'),
            flag(Indicator::Green, 'G'),
            flag(Indicator::Blue, 'B')
        )
    }
}
