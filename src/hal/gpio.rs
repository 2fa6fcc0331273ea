//! GPIO line interface
//!
//! [`PinSlic`] drives a SLIC through three digital pins: switch-hook
//! detect (input), forward/reverse polarity and ring mode (outputs).
//! Pin errors are swallowed: a failed read repeats the previous sample,
//! which the hook debouncer treats like any other noise.

use embedded_hal::digital::{InputPin, OutputPin};

use super::Slic;

/// Polarity of the switch-hook detect input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HookPolarity {
    /// Input reads high when the handset is lifted
    #[default]
    ActiveHigh,
    /// Input reads low when the handset is lifted
    ActiveLow,
}

/// SLIC wired to three GPIO pins
#[derive(Debug)]
pub struct PinSlic<SHK, FR, RM>
where
    SHK: InputPin,
    FR: OutputPin,
    RM: OutputPin,
{
    shk: SHK,
    fr: FR,
    rm: RM,
    polarity: HookPolarity,
    last_off_hook: bool,
}

impl<SHK, FR, RM> PinSlic<SHK, FR, RM>
where
    SHK: InputPin,
    FR: OutputPin,
    RM: OutputPin,
{
    /// Take ownership of the pins; the outputs start in the idle
    /// (forward polarity, no ring) position
    pub fn new(shk: SHK, mut fr: FR, mut rm: RM, polarity: HookPolarity) -> Self {
        let _ = fr.set_low();
        let _ = rm.set_low();
        Self {
            shk,
            fr,
            rm,
            polarity,
            last_off_hook: false,
        }
    }

    /// Give the pins back
    pub fn release(self) -> (SHK, FR, RM) {
        (self.shk, self.fr, self.rm)
    }
}

impl<SHK, FR, RM> Slic for PinSlic<SHK, FR, RM>
where
    SHK: InputPin,
    FR: OutputPin,
    RM: OutputPin,
{
    fn is_off_hook(&mut self) -> bool {
        if let Ok(high) = self.shk.is_high() {
            self.last_off_hook = match self.polarity {
                HookPolarity::ActiveHigh => high,
                HookPolarity::ActiveLow => !high,
            };
        }
        self.last_off_hook
    }

    fn set_polarity_reversed(&mut self, reversed: bool) {
        let _ = if reversed {
            self.fr.set_high()
        } else {
            self.fr.set_low()
        };
    }

    fn set_ring_mode(&mut self, ringing: bool) {
        let _ = if ringing {
            self.rm.set_high()
        } else {
            self.rm.set_low()
        };
    }
}
