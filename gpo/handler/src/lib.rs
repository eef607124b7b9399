#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # GPO Handler
//!
//! Reacts to periodic timer expiry by toggling a general-purpose output.
//!
//! A [`TimerToggleHandler`] only knows the `gpo-core` [`Output`] interface;
//! the composition root decides which concrete line backs it. Handlers are
//! registered with a [`Dispatcher`] during its single wiring phase, and the
//! timer interrupt forwards every period-elapsed event to the dispatcher once
//! it is armed.
//!
//! [`Output`]: gpo_core::Output

pub mod dispatch;
pub mod handler;

pub use dispatch::{Armed, Dispatcher, Wiring};
pub use handler::{PeriodElapsed, TimerToggleHandler};
