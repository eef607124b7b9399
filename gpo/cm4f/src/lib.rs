#![cfg_attr(not(feature = "std"), no_std)]

//! STM32F4 GPO backend
//!
//! Binds the `gpo-core` interface to output pins of STM32F4 (ARM Cortex-M4F)
//! GPIO ports. Each line carries its port, pin and ON polarity; the logical
//! ON/OFF requests are translated to pin states from that polarity.
//!
//! Lines built from the chip's register blocks ([`blue_lamp`],
//! [`LineSpec::build`], [`Port::registers`]) are `unsafe` to create: the
//! caller promises the port is clocked before the line is used. Lines over any
//! other [`GpioRegister`] are built safely with [`line()`].
//!
//! ## Features
//! - `std` - `std::error::Error` for `GpoError`
//! - `defmt` - `defmt::Format` for the port types
//!
//! ## Example
//! ```
//! use gpo_cm4f::{blue_lamp, Pin};
//! use gpo_core::Level;
//!
//! // SAFETY: the lamp is only inspected here, never driven.
//! let lamp = unsafe { blue_lamp() };
//! assert_eq!(lamp.on_level(), Level::High);
//! assert_eq!(lamp.config().map(|line| line.pin()), Some(Pin::P5));
//! ```

pub mod line;
pub mod port;

pub use line::{blue_lamp, line, LineConfig, LineSpec};
pub use port::{GpioPort, GpioRegister, Pin, PinState, Port};

/// General-purpose timers that can raise period-elapsed events
pub mod timers {
    use gpo_core::TimerId;

    /// 32-bit general-purpose timer 2
    pub const TIM2: TimerId = TimerId::new(2);
    /// 16-bit general-purpose timer 3
    pub const TIM3: TimerId = TimerId::new(3);
    /// 16-bit general-purpose timer 4
    pub const TIM4: TimerId = TimerId::new(4);
    /// 32-bit general-purpose timer 5
    pub const TIM5: TimerId = TimerId::new(5);
}
