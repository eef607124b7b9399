//! General-purpose output interface
//!
//! A backend fills a [`GpoMethod`] table with the operations its hardware can
//! perform and leaves the rest as `None`. Every [`Gpo`] instance of that
//! backend points at the same table, carries its ON polarity and a typed
//! configuration that only the backend reads.
//!
//! Dispatch is defensive at every step:
//!
//! | situation                    | command | query   |
//! |------------------------------|---------|---------|
//! | instance absent (`None`)     | no-op   | `false` |
//! | instance has no table        | no-op   | `false` |
//! | slot unbound                 | no-op   | `false` |
//! | slot bound                   | called  | result  |

use core::fmt;

use crate::level::Level;

/// Operations a GPO backend may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Drive the line to its ON level
    On,
    /// Drive the line to its OFF level
    Off,
    /// Invert the current level
    Toggle,
    /// Query whether the line is ON
    IsOn,
    /// Query whether the line is OFF
    IsOff,
}

impl Capability {
    /// Every capability, in slot order
    pub const ALL: [Capability; 5] = [
        Capability::On,
        Capability::Off,
        Capability::Toggle,
        Capability::IsOn,
        Capability::IsOff,
    ];
}

#[cfg(feature = "defmt")]
impl defmt::Format for Capability {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Capability::On => defmt::write!(fmt, "On"),
            Capability::Off => defmt::write!(fmt, "Off"),
            Capability::Toggle => defmt::write!(fmt, "Toggle"),
            Capability::IsOn => defmt::write!(fmt, "IsOn"),
            Capability::IsOff => defmt::write!(fmt, "IsOff"),
        }
    }
}

/// Command slot of a method table
pub type Command<C> = fn(&Gpo<C>);

/// Query slot of a method table
pub type Query<C> = fn(&Gpo<C>) -> bool;

/// Method table shared by every instance of one backend
///
/// Unbound slots are a permanent, valid state: they mean the backend does not
/// support that operation.
pub struct GpoMethod<C: 'static> {
    /// Outputs the ON level
    pub on: Option<Command<C>>,
    /// Outputs the OFF level
    pub off: Option<Command<C>>,
    /// Toggles the output level
    pub toggle: Option<Command<C>>,
    /// Returns true if the output level is ON
    pub is_on: Option<Query<C>>,
    /// Returns true if the output level is OFF
    pub is_off: Option<Query<C>>,
}

impl<C: 'static> GpoMethod<C> {
    /// Table with every slot unbound
    pub const EMPTY: Self = Self {
        on: None,
        off: None,
        toggle: None,
        is_on: None,
        is_off: None,
    };

    /// Check whether the slot for `capability` is bound
    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::On => self.on.is_some(),
            Capability::Off => self.off.is_some(),
            Capability::Toggle => self.toggle.is_some(),
            Capability::IsOn => self.is_on.is_some(),
            Capability::IsOff => self.is_off.is_some(),
        }
    }
}

impl<C: 'static> fmt::Debug for GpoMethod<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpoMethod")
            .field("on", &self.on.is_some())
            .field("off", &self.off.is_some())
            .field("toggle", &self.toggle.is_some())
            .field("is_on", &self.is_on.is_some())
            .field("is_off", &self.is_off.is_some())
            .finish()
    }
}

/// One output line bound to a backend
///
/// Built once at start-up and never mutated. `C` is the backend's own
/// configuration type (port, pin, ...); generic code never looks inside it.
#[derive(Debug)]
pub struct Gpo<C: 'static> {
    method: Option<&'static GpoMethod<C>>,
    on_level: Level,
    config: Option<C>,
}

impl<C: 'static> Gpo<C> {
    /// Create an instance bound to `method`
    pub const fn new(method: &'static GpoMethod<C>, on_level: Level, config: C) -> Self {
        Self {
            method: Some(method),
            on_level,
            config: Some(config),
        }
    }

    /// Create an instance from possibly missing parts
    pub const fn from_parts(
        method: Option<&'static GpoMethod<C>>,
        on_level: Level,
        config: Option<C>,
    ) -> Self {
        Self {
            method,
            on_level,
            config,
        }
    }

    /// Create an instance with no backend; every operation is a no-op
    pub const fn unbound(on_level: Level) -> Self {
        Self {
            method: None,
            on_level,
            config: None,
        }
    }

    /// Check whether the instance has a method table
    pub const fn is_valid(&self) -> bool {
        self.method.is_some()
    }

    /// Level that means ON
    pub const fn on_level(&self) -> Level {
        self.on_level
    }

    /// Level that means OFF
    pub const fn off_level(&self) -> Level {
        self.on_level.inverted()
    }

    /// Backend configuration, if any
    pub const fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }
}

/// Object-safe view of a general-purpose output
///
/// The default methods do nothing and report `false`, so a backend that is
/// not table-driven can implement only what its hardware supports.
pub trait Output {
    /// Check whether this output implements `capability`
    fn supports(&self, capability: Capability) -> bool;

    /// Output ON level
    fn on(&self) {}

    /// Output OFF level
    fn off(&self) {}

    /// Toggle the output level
    fn toggle(&self) {}

    /// Check whether the output is ON
    fn is_on(&self) -> bool {
        false
    }

    /// Check whether the output is OFF
    fn is_off(&self) -> bool {
        false
    }
}

impl<C: 'static> Output for Gpo<C> {
    fn supports(&self, capability: Capability) -> bool {
        self.method.map_or(false, |method| method.supports(capability))
    }

    fn on(&self) {
        if let Some(on) = self.method.and_then(|method| method.on) {
            on(self);
        }
    }

    fn off(&self) {
        if let Some(off) = self.method.and_then(|method| method.off) {
            off(self);
        }
    }

    fn toggle(&self) {
        if let Some(toggle) = self.method.and_then(|method| method.toggle) {
            toggle(self);
        }
    }

    fn is_on(&self) -> bool {
        match self.method.and_then(|method| method.is_on) {
            Some(is_on) => is_on(self),
            None => false,
        }
    }

    fn is_off(&self) -> bool {
        match self.method.and_then(|method| method.is_off) {
            Some(is_off) => is_off(self),
            None => false,
        }
    }
}

/// Output ON level on a possibly absent output
pub fn on<G: Output + ?Sized>(gpo: Option<&G>) {
    if let Some(gpo) = gpo {
        gpo.on();
    }
}

/// Output OFF level on a possibly absent output
pub fn off<G: Output + ?Sized>(gpo: Option<&G>) {
    if let Some(gpo) = gpo {
        gpo.off();
    }
}

/// Toggle a possibly absent output
pub fn toggle<G: Output + ?Sized>(gpo: Option<&G>) {
    if let Some(gpo) = gpo {
        gpo.toggle();
    }
}

/// Check whether a possibly absent output is ON
pub fn is_on<G: Output + ?Sized>(gpo: Option<&G>) -> bool {
    gpo.map_or(false, |gpo| gpo.is_on())
}

/// Check whether a possibly absent output is OFF
pub fn is_off<G: Output + ?Sized>(gpo: Option<&G>) -> bool {
    gpo.map_or(false, |gpo| gpo.is_off())
}

/// Check whether a possibly absent output implements `capability`
pub fn supports<G: Output + ?Sized>(gpo: Option<&G>, capability: Capability) -> bool {
    gpo.map_or(false, |gpo| gpo.supports(capability))
}
