// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Blink-and-report loop for the UartLed example.
//!
//! This crate supports both `no_std` (embedded) and host environments:
//! - Default: `no_std`, generic over `embedded-hal` traits and `core::fmt::Write`
//! - `embedded` feature: Enables RP2040 board bring-up (rp2040-hal)
//! - `defmt` feature: Enables defmt logging from the loop

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod message;
pub mod report;
pub mod timing;

// Board bring-up for the Raspberry Pi Pico (requires embedded feature)
#[cfg(feature = "embedded")]
pub mod board;

// Re-export commonly used types
pub use message::{format_message, write_banner, BANNER, LINE_ENDING, MESSAGE_PREFIX};
pub use report::BlinkAndReport;
pub use timing::{next_wait_us, BlinkTiming, LED_OFF_MS, LED_ON_MS};
