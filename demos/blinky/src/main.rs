//! Blinky - blue lamp toggled by TIM3 period interrupts
//!
//! Composition root for a Nucleo-F401RE: the blue lamp (PA5, active-high)
//! is bound to a toggle handler listening on TIM3, the handler is registered
//! with the period dispatcher, and only once the dispatcher is armed is the
//! TIM3 interrupt unmasked.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;
use critical_section::Mutex;
use panic_halt as _;
use stm32f4xx_hal::pac::{self, interrupt, Interrupt};
use stm32f4xx_hal::prelude::*;
use stm32f4xx_hal::timer::{CounterHz, Event, Flag};

use gpo_cm4f::{blue_lamp, timers, LineConfig};
use gpo_core::{Gpo, GpoResult};
use gpo_handler::{Armed, Dispatcher, TimerToggleHandler};

/// Lamp toggles per second
const TOGGLE_HZ: u32 = 2;

// SAFETY: `main` clocks GPIOA through `split` before the TIM3 interrupt, the
// only path that drives the lamp, is unmasked.
static LAMP: Gpo<LineConfig> = unsafe { blue_lamp() };
static HANDLER: TimerToggleHandler<'static> = TimerToggleHandler::new(timers::TIM3, &LAMP);
static DISPATCH: Dispatcher<1> = Dispatcher::new();

// Kept so the interrupt can acknowledge the update flag.
static BLINK_TIMER: Mutex<RefCell<Option<CounterHz<pac::TIM3>>>> = Mutex::new(RefCell::new(None));

fn wire() -> GpoResult<Armed<'static, 1>> {
    let mut wiring = DISPATCH.wiring()?;
    wiring.register(&HANDLER)?;
    Ok(wiring.arm())
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[entry]
fn main() -> ! {
    let Some(dp) = pac::Peripherals::take() else {
        halt();
    };

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(84.MHz()).freeze();

    // Clock the port and make PA5 a push-pull output; the GPO line drives it
    // through the port registers from here on.
    let gpioa = dp.GPIOA.split();
    let _lamp_pin = gpioa.pa5.into_push_pull_output();

    let mut timer = dp.TIM3.counter_hz(&clocks);
    if timer.start(TOGGLE_HZ.Hz()).is_err() {
        halt();
    }
    timer.listen(Event::Update);
    critical_section::with(|cs| BLINK_TIMER.borrow_ref_mut(cs).replace(timer));

    let Ok(_armed) = wire() else {
        halt();
    };

    // SAFETY: the dispatcher is armed and the handler wired, so the first
    // interrupt already reaches the lamp.
    unsafe { NVIC::unmask(Interrupt::TIM3) };

    halt()
}

#[interrupt]
fn TIM3() {
    critical_section::with(|cs| {
        if let Some(timer) = BLINK_TIMER.borrow_ref_mut(cs).as_mut() {
            timer.clear_flags(Flag::Update);
        }
    });
    DISPATCH.notify(timers::TIM3);
}
