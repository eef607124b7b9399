//! GPO lines backed by STM32F4 GPIO pins

use core::fmt;

use gpo_core::{Gpo, GpoMethod, Level};

use crate::port::{GpioRegister, Pin, PinState, Port};

/// Where a line lives: the port registers and the pin on that port
#[derive(Clone, Copy)]
pub struct LineConfig {
    port: &'static dyn GpioRegister,
    pin: Pin,
}

impl LineConfig {
    /// Create a configuration for `pin` on `port`
    pub const fn new(port: &'static dyn GpioRegister, pin: Pin) -> Self {
        Self { port, pin }
    }

    /// Pin on the port
    pub const fn pin(&self) -> Pin {
        self.pin
    }
}

impl fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineConfig").field("pin", &self.pin).finish_non_exhaustive()
    }
}

/// Board-level description of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub port: Port,
    pub pin: Pin,
    /// Level that lights the lamp
    pub on_level: Level,
}

impl LineSpec {
    /// User lamp on PA5, lit when high
    pub const BLUE_LAMP: LineSpec = LineSpec {
        port: Port::A,
        pin: Pin::P5,
        on_level: Level::High,
    };

    /// Build the GPO instance for this line
    ///
    /// # Safety
    /// Operations on the returned line access the registers of `self.port`.
    /// See [`Port::registers`].
    pub const unsafe fn build(&self) -> Gpo<LineConfig> {
        line(self.port.registers(), self.pin, self.on_level)
    }
}

const GPO_METHOD: GpoMethod<LineConfig> = GpoMethod {
    on: Some(write_on),
    off: Some(write_off),
    toggle: Some(toggle),
    is_on: Some(read_is_on),
    is_off: Some(read_is_off),
};

/// Bind `pin` on `port` to the GPO interface
pub const fn line(port: &'static dyn GpioRegister, pin: Pin, on_level: Level) -> Gpo<LineConfig> {
    Gpo::new(&GPO_METHOD, on_level, LineConfig::new(port, pin))
}

/// GPO instance for the blue user lamp
///
/// # Safety
/// Operations on the returned line access the GPIOA registers. The caller
/// must be running on an STM32F4 and must clock GPIOA before the first
/// operation. Building the line itself touches nothing.
///
/// ```compile_fail
/// let lamp = gpo_cm4f::blue_lamp();
/// ```
pub const unsafe fn blue_lamp() -> Gpo<LineConfig> {
    LineSpec::BLUE_LAMP.build()
}

fn on_state(gpo: &Gpo<LineConfig>) -> PinState {
    PinState::from_level(gpo.on_level())
}

fn off_state(gpo: &Gpo<LineConfig>) -> PinState {
    PinState::from_level(gpo.off_level())
}

fn write_on(gpo: &Gpo<LineConfig>) {
    if let Some(line) = gpo.config() {
        line.port.write_pin(line.pin, on_state(gpo));
    }
}

fn write_off(gpo: &Gpo<LineConfig>) {
    if let Some(line) = gpo.config() {
        line.port.write_pin(line.pin, off_state(gpo));
    }
}

// Polarity plays no part: the pin flips whatever it means.
fn toggle(gpo: &Gpo<LineConfig>) {
    if let Some(line) = gpo.config() {
        line.port.toggle_pin(line.pin);
    }
}

fn read_is_on(gpo: &Gpo<LineConfig>) -> bool {
    gpo.config()
        .map_or(false, |line| line.port.read_pin(line.pin) == on_state(gpo))
}

fn read_is_off(gpo: &Gpo<LineConfig>) -> bool {
    gpo.config()
        .map_or(false, |line| line.port.read_pin(line.pin) == off_state(gpo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU16, Ordering};
    use gpo_core::{Capability, Output};

    // Port whose pins read back what was last driven.
    struct SoftPort {
        odr: AtomicU16,
    }

    impl SoftPort {
        const fn new() -> Self {
            Self {
                odr: AtomicU16::new(0),
            }
        }

        fn is_high(&self, pin: Pin) -> bool {
            self.odr.load(Ordering::Relaxed) & pin.mask() != 0
        }
    }

    impl GpioRegister for SoftPort {
        fn write_pin(&self, pin: Pin, state: PinState) {
            match state {
                PinState::Set => self.odr.fetch_or(pin.mask(), Ordering::Relaxed),
                PinState::Reset => self.odr.fetch_and(!pin.mask(), Ordering::Relaxed),
            };
        }

        fn toggle_pin(&self, pin: Pin) {
            self.odr.fetch_xor(pin.mask(), Ordering::Relaxed);
        }

        fn read_pin(&self, pin: Pin) -> PinState {
            if self.is_high(pin) {
                PinState::Set
            } else {
                PinState::Reset
            }
        }
    }

    #[test]
    fn active_high_drives_high_for_on() {
        static PORT: SoftPort = SoftPort::new();
        let lamp = line(&PORT, Pin::P5, Level::High);
        lamp.on();
        assert!(PORT.is_high(Pin::P5));
        assert!(lamp.is_on());
        assert!(!lamp.is_off());
        lamp.off();
        assert!(!PORT.is_high(Pin::P5));
        assert!(lamp.is_off());
    }

    #[test]
    fn active_low_drives_low_for_on() {
        static PORT: SoftPort = SoftPort::new();
        PORT.write_pin(Pin::P3, PinState::Set);
        let lamp = line(&PORT, Pin::P3, Level::Low);
        lamp.on();
        assert!(!PORT.is_high(Pin::P3));
        assert!(lamp.is_on());
        assert!(!lamp.is_off());
    }

    #[test]
    fn toggle_touches_only_its_pin() {
        static PORT: SoftPort = SoftPort::new();
        let a = line(&PORT, Pin::P1, Level::High);
        let b = line(&PORT, Pin::P2, Level::High);
        b.on();
        a.toggle();
        assert!(a.is_on());
        assert!(b.is_on());
        a.toggle();
        assert!(a.is_off());
        assert!(b.is_on());
    }

    #[test]
    fn missing_config_is_a_no_op() {
        let lamp: Gpo<LineConfig> = Gpo::from_parts(Some(&GPO_METHOD), Level::High, None);
        lamp.on();
        lamp.off();
        lamp.toggle();
        assert!(!lamp.is_on());
        assert!(!lamp.is_off());
        assert!(lamp.supports(Capability::Off));

        // Slots called directly still check for a configuration.
        write_on(&lamp);
        write_off(&lamp);
        toggle(&lamp);
        assert!(!read_is_on(&lamp));
        assert!(!read_is_off(&lamp));
    }

    #[test]
    fn blue_lamp_is_a5_active_high() {
        // SAFETY: only the description is inspected, no pin is driven.
        let lamp = unsafe { blue_lamp() };
        assert!(lamp.is_valid());
        assert_eq!(lamp.on_level(), Level::High);
        assert_eq!(lamp.config().map(LineConfig::pin), Some(Pin::P5));
        for capability in Capability::ALL {
            assert!(lamp.supports(capability));
        }
    }
}
