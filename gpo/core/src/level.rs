//! Electrical output levels

use core::fmt;
use core::ops::Not;

/// Electrical level of an output line
///
/// Also used as the polarity of a line: the level that means "ON".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// Return the opposite level
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Self::Output {
        self.inverted()
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for embedded_hal::digital::PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => embedded_hal::digital::PinState::Low,
            Level::High => embedded_hal::digital::PinState::High,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::High => write!(f, "high"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Level {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Level::Low => defmt::write!(fmt, "low"),
            Level::High => defmt::write!(fmt, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_swaps_levels() {
        assert_eq!(Level::High.inverted(), Level::Low);
        assert_eq!(Level::Low.inverted(), Level::High);
        assert_eq!(!Level::High, Level::Low);
    }

    #[test]
    fn from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
    }
}
