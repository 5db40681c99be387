// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The blink-and-report loop.
//!
//! Each cycle drives the LED high for `on_ms`, low for `off_ms`, then bumps
//! the cycle counter and writes `Message <N>` to the serial transport.
//! Pin and transport failures are not recovered from: pin errors are
//! dropped and a failed write only loses that line.

use crate::message::{format_message, write_banner};
use crate::timing::BlinkTiming;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Owns the LED pin, the delay source and the serial transport for the
/// lifetime of the loop.
pub struct BlinkAndReport<L, D, W> {
    led: L,
    delay: D,
    serial: W,
    timing: BlinkTiming,
    count: u32,
}

impl<L, D, W> BlinkAndReport<L, D, W>
where
    L: OutputPin,
    D: DelayNs,
    W: Write,
{
    pub fn new(led: L, delay: D, serial: W) -> Self {
        Self::with_timing(led, delay, serial, BlinkTiming::DEFAULT)
    }

    pub fn with_timing(led: L, delay: D, serial: W, timing: BlinkTiming) -> Self {
        Self {
            led,
            delay,
            serial,
            timing,
            count: 0,
        }
    }

    /// Number of completed cycles.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn timing(&self) -> BlinkTiming {
        self.timing
    }

    /// Send the startup banner.
    pub fn announce(&mut self) {
        if write_banner(&mut self.serial).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Serial: banner dropped");
        }
    }

    /// Run one blink cycle and report it. Returns the counter value sent.
    pub fn cycle(&mut self) -> u32 {
        self.led.set_high().ok();
        self.delay.delay_ms(self.timing.on_ms);
        self.led.set_low().ok();
        self.delay.delay_ms(self.timing.off_ms);

        self.count = self.count.wrapping_add(1);
        let line = format_message(self.count);
        if self.serial.write_str(&line).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Serial: message {} dropped", self.count);
        }
        self.count
    }

    /// Announce, then blink and report forever.
    pub fn run(mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::println!(
            "Blinking: {}ms on, {}ms off",
            self.timing.on_ms,
            self.timing.off_ms
        );

        self.announce();
        loop {
            let _count = self.cycle();
            #[cfg(feature = "defmt")]
            defmt::info!("Cycle {}", _count);
        }
    }

    /// Hand the resources back.
    pub fn release(self) -> (L, D, W) {
        (self.led, self.delay, self.serial)
    }
}
