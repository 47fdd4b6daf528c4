//! GPIO indicator adapter.
//!
//! Drives the three node LEDs through `embedded-hal` output pins and keeps
//! the last written configuration so snapshots never read the hardware.
//! A pin error is logged; the cached state still records the request.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::IndicatorPort;
use crate::drivers::indicators::{Indicator, IndicatorSet};

pub struct GpioIndicators<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: IndicatorSet,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> GpioIndicators<R, G, B> {
    /// Take the pins and switch every LED off.
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut leds = Self {
            red,
            green,
            blue,
            current: IndicatorSet::ALL_ON,
        };
        leds.set_indicators(IndicatorSet::OFF);
        leds
    }

    /// Give the pins back.
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

fn drive<P: OutputPin>(pin: &mut P, indicator: Indicator, on: bool) {
    let res = if on { pin.set_high() } else { pin.set_low() };
    if let Err(e) = res {
        warn!("{:?} LED pin error: {:?}", indicator, e);
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> IndicatorPort for GpioIndicators<R, G, B> {
    fn indicators(&self) -> IndicatorSet {
        self.current
    }

    fn set_indicators(&mut self, set: IndicatorSet) {
        for indicator in Indicator::ALL {
            if set.is_on(indicator) == self.current.is_on(indicator) {
                continue;
            }
            let on = set.is_on(indicator);
            match indicator {
                Indicator::Red => drive(&mut self.red, indicator, on),
                Indicator::Green => drive(&mut self.green, indicator, on),
                Indicator::Blue => drive(&mut self.blue, indicator, on),
            }
        }
        self.current = set;
    }
}
