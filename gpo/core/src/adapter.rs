//! `embedded-hal` output pins as [`Output`]s

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::StatefulOutputPin;

use crate::gpo::{Capability, Output};
use crate::level::Level;

/// Wraps a vendor `embedded-hal` pin so it can sit behind the GPO interface
///
/// The pin lives in a critical-section mutex so the wrapper can be shared
/// with interrupt handlers. Pin errors are swallowed: commands become no-ops
/// and queries report `false`.
pub struct EmbeddedHalOutput<P> {
    pin: Mutex<RefCell<P>>,
    on_level: Level,
}

impl<P: StatefulOutputPin> EmbeddedHalOutput<P> {
    /// Wrap `pin`, treating `on_level` as ON
    pub const fn new(pin: P, on_level: Level) -> Self {
        Self {
            pin: Mutex::new(RefCell::new(pin)),
            on_level,
        }
    }

    /// Level that means ON
    pub const fn on_level(&self) -> Level {
        self.on_level
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin.into_inner().into_inner()
    }

    fn with_pin<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.pin.borrow_ref_mut(cs)))
    }

    fn drive(&self, level: Level) {
        let _ = self.with_pin(|pin| pin.set_state(level.into()));
    }

    fn level(&self) -> Option<Level> {
        self.with_pin(|pin| pin.is_set_high().ok()).map(Level::from)
    }
}

impl<P: StatefulOutputPin> Output for EmbeddedHalOutput<P> {
    fn supports(&self, _capability: Capability) -> bool {
        true
    }

    fn on(&self) {
        self.drive(self.on_level);
    }

    fn off(&self) {
        self.drive(self.on_level.inverted());
    }

    fn toggle(&self) {
        let _ = self.with_pin(|pin| pin.toggle());
    }

    fn is_on(&self) -> bool {
        self.level() == Some(self.on_level)
    }

    fn is_off(&self) -> bool {
        self.level() == Some(self.on_level.inverted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

    #[derive(Default)]
    struct FakePin {
        high: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakePin {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    // Pin whose driver always reports a fault.
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    impl StatefulOutputPin for BrokenPin {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn active_high_pin_follows_logic() {
        let out = EmbeddedHalOutput::new(FakePin::default(), Level::High);
        out.on();
        assert!(out.is_on());
        assert!(!out.is_off());
        assert!(out.release().high);
    }

    #[test]
    fn active_low_pin_reports_logical_state() {
        let out = EmbeddedHalOutput::new(FakePin::default(), Level::Low);
        out.on();
        assert!(out.is_on());
        out.toggle();
        assert!(out.is_off());
        assert!(out.release().high);
    }

    #[test]
    fn pin_errors_degrade_to_false() {
        let out = EmbeddedHalOutput::new(BrokenPin, Level::High);
        out.on();
        out.off();
        out.toggle();
        assert!(!out.is_on());
        assert!(!out.is_off());
    }
}
