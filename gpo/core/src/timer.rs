//! Timer source identity

use core::fmt;

/// Identifies which hardware timer raised a period-elapsed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u8);

impl TimerId {
    /// Create a timer id from the peripheral instance number
    pub const fn new(instance: u8) -> Self {
        Self(instance)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIM{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "TIM{}", self.0);
    }
}
