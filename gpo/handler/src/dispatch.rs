//! Period-elapsed dispatch
//!
//! The timer interrupt has no context of its own, so it forwards every event
//! to a `static` [`Dispatcher`]. Start-up code opens the dispatcher's wiring
//! phase exactly once, registers handlers, then arms it:
//!
//! ```
//! use gpo_core::TimerId;
//! use gpo_handler::{Dispatcher, TimerToggleHandler};
//!
//! static DISPATCH: Dispatcher<1> = Dispatcher::new();
//! static HANDLER: TimerToggleHandler<'static> = TimerToggleHandler::unbound(TimerId::new(3));
//!
//! let mut wiring = DISPATCH.wiring().unwrap();
//! wiring.register(&HANDLER).unwrap();
//! let _armed = wiring.arm();
//! // unmask the timer interrupt here
//! DISPATCH.notify(TimerId::new(3));
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use gpo_core::{GpoError, GpoResult, TimerId};
use heapless::Vec;

use crate::handler::PeriodElapsed;

/// Fans period-elapsed events out to up to `N` handlers
pub struct Dispatcher<const N: usize> {
    handlers: Mutex<RefCell<Vec<&'static dyn PeriodElapsed, N>>>,
    wired: AtomicBool,
    armed: AtomicBool,
}

impl<const N: usize> Dispatcher<N> {
    /// Create an empty, unarmed dispatcher
    pub const fn new() -> Self {
        Self {
            handlers: Mutex::new(RefCell::new(Vec::new())),
            wired: AtomicBool::new(false),
            armed: AtomicBool::new(false),
        }
    }

    /// Open the wiring phase
    ///
    /// Only the first call succeeds; later calls return
    /// [`GpoError::AlreadyWired`]. The phase stays consumed even if the
    /// returned [`Wiring`] is dropped without [`Wiring::arm`]: the dispatcher
    /// then never arms and every event is dropped.
    pub fn wiring(&self) -> GpoResult<Wiring<'_, N>> {
        if self.wired.swap(true, Ordering::AcqRel) {
            return Err(GpoError::AlreadyWired);
        }
        Ok(Wiring { dispatcher: self })
    }

    /// Check whether the dispatcher has been armed
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.handlers.borrow_ref(cs).len())
    }

    /// Check whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward a period-elapsed event from timer `source`
    ///
    /// Called from the timer interrupt. Does nothing until armed.
    pub fn notify(&self, source: TimerId) {
        if !self.is_armed() {
            #[cfg(feature = "defmt")]
            if self.wired.load(Ordering::Acquire) {
                defmt::warn!("{} elapsed on a wired but unarmed dispatcher", source);
            } else {
                defmt::trace!("{} elapsed before arming", source);
            }
            return;
        }
        critical_section::with(|cs| {
            for handler in self.handlers.borrow_ref(cs).iter() {
                handler.on_period_elapsed(source);
            }
        });
    }
}

impl<const N: usize> Default for Dispatcher<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the wiring phase is open
///
/// Consumed by [`Wiring::arm`], so no handler can be added once events flow.
pub struct Wiring<'d, const N: usize> {
    dispatcher: &'d Dispatcher<N>,
}

impl<'d, const N: usize> Wiring<'d, N> {
    /// Register `handler`
    ///
    /// Returns [`GpoError::TooManyHandlers`] once `N` handlers are registered.
    pub fn register(&mut self, handler: &'static dyn PeriodElapsed) -> GpoResult<()> {
        critical_section::with(|cs| self.dispatcher.handlers.borrow_ref_mut(cs).push(handler))
            .map_err(|_| GpoError::TooManyHandlers)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("registered period handler {}/{}", self.dispatcher.len(), N);
        Ok(())
    }

    /// Close the wiring phase and start forwarding events
    pub fn arm(self) -> Armed<'d, N> {
        self.dispatcher.armed.store(true, Ordering::Release);
        #[cfg(feature = "defmt")]
        defmt::debug!("period dispatcher armed");
        Armed {
            dispatcher: self.dispatcher,
        }
    }
}

/// Proof that the dispatcher is armed
///
/// Held by start-up code until the timer interrupt is unmasked.
pub struct Armed<'d, const N: usize> {
    dispatcher: &'d Dispatcher<N>,
}

impl<'d, const N: usize> Armed<'d, N> {
    /// The armed dispatcher
    pub fn dispatcher(&self) -> &'d Dispatcher<N> {
        self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;

    const TIM2: TimerId = TimerId::new(2);

    struct Counter {
        hits: AtomicU32,
    }

    impl Counter {
        const fn new() -> Self {
            Self {
                hits: AtomicU32::new(0),
            }
        }

        fn hits(&self) -> u32 {
            self.hits.load(Ordering::Relaxed)
        }
    }

    impl PeriodElapsed for Counter {
        fn on_period_elapsed(&self, _source: TimerId) {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn wiring_opens_once() {
        let dispatch: Dispatcher<1> = Dispatcher::new();
        assert!(dispatch.wiring().is_ok());
        assert!(matches!(dispatch.wiring(), Err(GpoError::AlreadyWired)));
    }

    #[test]
    fn register_respects_capacity() {
        static A: Counter = Counter::new();
        static B: Counter = Counter::new();
        let dispatch: Dispatcher<1> = Dispatcher::new();
        let mut wiring = dispatch.wiring().unwrap();
        assert_eq!(wiring.register(&A), Ok(()));
        assert_eq!(wiring.register(&B), Err(GpoError::TooManyHandlers));
        assert_eq!(dispatch.len(), 1);
    }

    #[test]
    fn events_before_arming_are_dropped() {
        static COUNTER: Counter = Counter::new();
        let dispatch: Dispatcher<2> = Dispatcher::new();
        let mut wiring = dispatch.wiring().unwrap();
        wiring.register(&COUNTER).unwrap();

        dispatch.notify(TIM2);
        assert_eq!(COUNTER.hits(), 0);

        let armed = wiring.arm();
        assert!(armed.dispatcher().is_armed());
        dispatch.notify(TIM2);
        assert_eq!(COUNTER.hits(), 1);
    }

    #[test]
    fn dropped_wiring_never_arms() {
        static COUNTER: Counter = Counter::new();
        let dispatch: Dispatcher<1> = Dispatcher::new();
        {
            let mut wiring = dispatch.wiring().unwrap();
            wiring.register(&COUNTER).unwrap();
        }

        assert!(matches!(dispatch.wiring(), Err(GpoError::AlreadyWired)));
        assert!(!dispatch.is_armed());
        dispatch.notify(TIM2);
        assert_eq!(COUNTER.hits(), 0);
    }

    #[test]
    fn every_handler_sees_every_event() {
        static A: Counter = Counter::new();
        static B: Counter = Counter::new();
        let dispatch: Dispatcher<2> = Dispatcher::default();
        assert!(dispatch.is_empty());
        let mut wiring = dispatch.wiring().unwrap();
        wiring.register(&A).unwrap();
        wiring.register(&B).unwrap();
        let _armed = wiring.arm();

        dispatch.notify(TIM2);
        dispatch.notify(TimerId::new(9));
        assert_eq!(A.hits(), 2);
        assert_eq!(B.hits(), 2);
    }
}
