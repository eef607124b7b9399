#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # GPO Core
//!
//! Vendor-agnostic interface for a general-purpose digital output (GPO).
//!
//! A backend describes what it can do with a [`GpoMethod`] table of optional
//! slots and hands out immutable [`Gpo`] instances bound to that table. Callers
//! only ever see the [`Output`] trait, or the free functions in [`gpo`] that
//! also accept an absent instance.
//!
//! Nothing on the output path can fail loudly: an absent instance, an unbound
//! slot or a missing configuration all degrade to "nothing happened" for
//! commands and `false` for queries. This keeps interrupt handlers free of
//! error paths.
//!
//! ## Example
//! ```
//! use gpo_core::{gpo, Gpo, GpoMethod, Level, Output};
//!
//! static OUTPUT_ONLY: GpoMethod<()> = GpoMethod {
//!     on: Some(|_| {}),
//!     off: Some(|_| {}),
//!     ..GpoMethod::EMPTY
//! };
//!
//! let lamp = Gpo::new(&OUTPUT_ONLY, Level::High, ());
//! lamp.on();
//! assert!(!lamp.is_on());
//! gpo::toggle::<Gpo<()>>(None);
//! ```

use core::fmt;

pub mod adapter;
pub mod gpo;
pub mod level;
pub mod timer;

pub use adapter::EmbeddedHalOutput;
pub use gpo::{Capability, Command, Gpo, GpoMethod, Output, Query};
pub use level::Level;
pub use timer::TimerId;

/// Result type for construction and wiring steps
pub type GpoResult<T> = Result<T, GpoError>;

/// Errors raised while building or wiring outputs
///
/// Output operations themselves never return these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpoError {
    /// Pin number outside the port
    InvalidPin,
    /// Wiring phase was already opened
    AlreadyWired,
    /// Dispatcher has no free handler slot
    TooManyHandlers,
}

impl fmt::Display for GpoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpoError::InvalidPin => write!(f, "Pin number out of range"),
            GpoError::AlreadyWired => write!(f, "Wiring phase already opened"),
            GpoError::TooManyHandlers => write!(f, "No free handler slot"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GpoError {}

#[cfg(feature = "defmt")]
impl defmt::Format for GpoError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            GpoError::InvalidPin => defmt::write!(fmt, "InvalidPin"),
            GpoError::AlreadyWired => defmt::write!(fmt, "AlreadyWired"),
            GpoError::TooManyHandlers => defmt::write!(fmt, "TooManyHandlers"),
        }
    }
}
