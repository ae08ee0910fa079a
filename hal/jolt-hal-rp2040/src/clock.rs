//! SysTick millisecond clock
//!
//! SysTick is programmed for a 1 kHz interrupt. The firmware's `SysTick`
//! exception handler calls [`SysTickClock::on_tick`], which advances a
//! global millisecond counter.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use jolt_hal::Clock;
use portable_atomic::{AtomicU32, Ordering};

/// SysTick reload register is 24 bits wide
const MAX_RELOAD: u32 = 0x00FF_FFFF;

static TICKS_MS: AtomicU32 = AtomicU32::new(0);

/// Millisecond clock driven by the SysTick exception
pub struct SysTickClock {
    _syst: SYST,
}

impl SysTickClock {
    /// Configure SysTick for 1 ms ticks from the core clock and start it
    pub fn start(mut syst: SYST, core_clock_hz: u32) -> Self {
        let reload = (core_clock_hz / 1000).saturating_sub(1).min(MAX_RELOAD);

        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(reload);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();

        Self { _syst: syst }
    }

    /// Advance the counter by one millisecond
    ///
    /// Must only be called from the SysTick exception handler.
    pub fn on_tick() {
        // Only writer, so no read-modify-write atomic is needed
        let now = TICKS_MS.load(Ordering::Relaxed);
        TICKS_MS.store(now.wrapping_add(1), Ordering::Relaxed);
    }
}

impl Clock for SysTickClock {
    fn now_ms(&self) -> u32 {
        TICKS_MS.load(Ordering::Relaxed)
    }
}
