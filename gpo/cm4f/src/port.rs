//! STM32F4 GPIO port access

use core::fmt;
use core::ptr::{read_volatile, write_volatile};

use gpo_core::{GpoError, GpoResult, Level};

/// Electrical pin state as the vendor registers see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// Pin driven or read low
    Reset,
    /// Pin driven or read high
    Set,
}

impl PinState {
    /// Pin state matching an electrical level
    pub const fn from_level(level: Level) -> Self {
        match level {
            Level::High => PinState::Set,
            Level::Low => PinState::Reset,
        }
    }

    /// Check if the pin is high
    pub const fn is_set(self) -> bool {
        matches!(self, PinState::Set)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PinState::Reset => defmt::write!(fmt, "Reset"),
            PinState::Set => defmt::write!(fmt, "Set"),
        }
    }
}

/// Single pin of a port, stored as its bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(u16);

impl Pin {
    pub const P0: Pin = Pin(1 << 0);
    pub const P1: Pin = Pin(1 << 1);
    pub const P2: Pin = Pin(1 << 2);
    pub const P3: Pin = Pin(1 << 3);
    pub const P4: Pin = Pin(1 << 4);
    pub const P5: Pin = Pin(1 << 5);
    pub const P6: Pin = Pin(1 << 6);
    pub const P7: Pin = Pin(1 << 7);
    pub const P8: Pin = Pin(1 << 8);
    pub const P9: Pin = Pin(1 << 9);
    pub const P10: Pin = Pin(1 << 10);
    pub const P11: Pin = Pin(1 << 11);
    pub const P12: Pin = Pin(1 << 12);
    pub const P13: Pin = Pin(1 << 13);
    pub const P14: Pin = Pin(1 << 14);
    pub const P15: Pin = Pin(1 << 15);

    /// Create a pin from its number (0-15)
    pub const fn new(number: u8) -> GpoResult<Self> {
        if number > 15 {
            Err(GpoError::InvalidPin)
        } else {
            Ok(Pin(1 << number))
        }
    }

    /// Get the pin bit mask
    pub const fn mask(self) -> u16 {
        self.0
    }

    /// Get the pin number
    pub const fn number(self) -> u8 {
        self.0.trailing_zeros() as u8
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pin {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "P{}", self.number());
    }
}

/// Register primitives of one GPIO port
///
/// Calls are synchronous, never block and cannot fail. Each access must be a
/// single register-width operation so it is safe from interrupt context.
pub trait GpioRegister: Sync {
    /// Drive `pin` to `state`
    fn write_pin(&self, pin: Pin, state: PinState);

    /// Invert the driven state of `pin`
    fn toggle_pin(&self, pin: Pin);

    /// Read the input state of `pin`
    fn read_pin(&self, pin: Pin) -> PinState;
}

// Register offsets inside a GPIO block
const IDR: usize = 0x10;
const ODR: usize = 0x14;
const BSRR: usize = 0x18;

/// Memory-mapped STM32F4 GPIO port
#[derive(Debug)]
pub struct GpioPort {
    base: usize,
}

// SAFETY: STM32F4 memory map addresses. They are only handed out through
// `Port::registers`, whose callers take on the clocking requirement.
const GPIOA: GpioPort = unsafe { GpioPort::new(0x4002_0000) };
const GPIOB: GpioPort = unsafe { GpioPort::new(0x4002_0400) };
const GPIOC: GpioPort = unsafe { GpioPort::new(0x4002_0800) };
const GPIOD: GpioPort = unsafe { GpioPort::new(0x4002_0C00) };
const GPIOE: GpioPort = unsafe { GpioPort::new(0x4002_1000) };
const GPIOH: GpioPort = unsafe { GpioPort::new(0x4002_1C00) };

impl GpioPort {
    /// Create a port at `base`
    ///
    /// # Safety
    /// `base` must be the address of a GPIO register block on the running
    /// device, and the port must be clocked before any pin is accessed.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the register block
    pub const fn base(&self) -> usize {
        self.base
    }

    const fn register(&self, offset: usize) -> *mut u32 {
        (self.base + offset) as *mut u32
    }
}

impl GpioRegister for GpioPort {
    fn write_pin(&self, pin: Pin, state: PinState) {
        let mask = u32::from(pin.mask());
        let bits = match state {
            PinState::Set => mask,
            PinState::Reset => mask << 16,
        };
        // SAFETY: the caller of `new` vouched for a clocked block; BSRR writes
        // are atomic.
        unsafe { write_volatile(self.register(BSRR), bits) }
    }

    fn toggle_pin(&self, pin: Pin) {
        let mask = u32::from(pin.mask());
        // SAFETY: the caller of `new` vouched for a clocked block.
        let odr = unsafe { read_volatile(self.register(ODR)) };
        let bits = ((odr & mask) << 16) | (!odr & mask);
        // SAFETY: as above; the set/reset pair lands in one BSRR write.
        unsafe { write_volatile(self.register(BSRR), bits) }
    }

    fn read_pin(&self, pin: Pin) -> PinState {
        // SAFETY: the caller of `new` vouched for a clocked block.
        let idr = unsafe { read_volatile(self.register(IDR)) };
        if idr & u32::from(pin.mask()) != 0 {
            PinState::Set
        } else {
            PinState::Reset
        }
    }
}

/// Port letter of an STM32F4 GPIO block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    H,
}

impl Port {
    /// Register block of this port
    ///
    /// # Safety
    /// Every access through the returned port touches the real registers.
    /// The caller must be running on an STM32F4 and must clock this port
    /// before the first pin operation.
    ///
    /// ```compile_fail
    /// let port = gpo_cm4f::Port::A.registers();
    /// ```
    pub const unsafe fn registers(self) -> &'static GpioPort {
        match self {
            Port::A => &GPIOA,
            Port::B => &GPIOB,
            Port::C => &GPIOC,
            Port::D => &GPIOD,
            Port::E => &GPIOE,
            Port::H => &GPIOH,
        }
    }
}
