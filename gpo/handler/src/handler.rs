//! Timer toggle handler

use gpo_core::{gpo, Output, TimerId};

/// Reaction to a period-elapsed event
///
/// Several reactions may share one notification channel, so each receives
/// the id of the timer that fired and filters for its own source.
pub trait PeriodElapsed: Sync {
    /// Called once per elapsed period of timer `source`
    fn on_period_elapsed(&self, source: TimerId);
}

/// Toggles one output every time its timer period elapses
///
/// Holds a non-owning reference to the output and nothing else; it is
/// stateless between events.
pub struct TimerToggleHandler<'a> {
    source: TimerId,
    gpo: Option<&'a (dyn Output + Sync)>,
}

impl<'a> TimerToggleHandler<'a> {
    /// Bind a handler for timer `source` to `gpo`
    pub const fn new(source: TimerId, gpo: &'a (dyn Output + Sync)) -> Self {
        Self {
            source,
            gpo: Some(gpo),
        }
    }

    /// Handler for timer `source` with no output wired yet
    pub const fn unbound(source: TimerId) -> Self {
        Self { source, gpo: None }
    }

    /// Timer this handler listens to
    pub const fn source(&self) -> TimerId {
        self.source
    }

    /// Check whether an output is wired
    pub const fn is_bound(&self) -> bool {
        self.gpo.is_some()
    }
}

impl PeriodElapsed for TimerToggleHandler<'_> {
    fn on_period_elapsed(&self, source: TimerId) {
        if source == self.source {
            gpo::toggle(self.gpo);
        }
    }
}
