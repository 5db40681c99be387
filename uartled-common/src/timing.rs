// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! LED duty cycle.

/// Time the LED stays lit in each cycle.
pub const LED_ON_MS: u32 = 100;
/// Time the LED stays dark in each cycle, before the message is sent.
pub const LED_OFF_MS: u32 = 700;

/// On/off durations of one blink cycle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTiming {
    pub on_ms: u32,
    pub off_ms: u32,
}

impl BlinkTiming {
    /// 100ms on, 700ms off.
    pub const DEFAULT: Self = Self {
        on_ms: LED_ON_MS,
        off_ms: LED_OFF_MS,
    };

    pub const fn new(on_ms: u32, off_ms: u32) -> Self {
        Self { on_ms, off_ms }
    }

    /// Full cycle length, saturating at `u32::MAX`.
    pub const fn period_ms(&self) -> u32 {
        self.on_ms.saturating_add(self.off_ms)
    }

    /// Share of the period the LED is lit, rounded down. Zero for an empty period.
    pub const fn duty_percent(&self) -> u32 {
        let on = self.on_ms as u64;
        match on + self.off_ms as u64 {
            0 => 0,
            period => (on * 100 / period) as u32,
        }
    }
}

/// Next wait before re-checking `deadline_us`, capped at `max_us`.
///
/// Returns `None` once `now_us` has reached the deadline. Callers fix the
/// deadline once and re-read the clock after any other work, so that work
/// is absorbed into the sleep instead of extending it.
pub const fn next_wait_us(now_us: u64, deadline_us: u64, max_us: u32) -> Option<u32> {
    if now_us >= deadline_us {
        return None;
    }
    let remaining = deadline_us - now_us;
    if remaining < max_us as u64 {
        Some(remaining as u32)
    } else {
        Some(max_us)
    }
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}
