// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Text written to the serial transport.

use core::fmt::{self, Write};
use heapless::String;

/// Startup banner, sent once before the first cycle.
pub const BANNER: &str = "Welcome to UartLed";
pub const MESSAGE_PREFIX: &str = "Message ";
/// Stdio on the Pico translates `\n` to CRLF, so lines end the same way here.
pub const LINE_ENDING: &str = "\r\n";

/// Prefix, the widest `u32` (10 digits) and the line ending.
pub const MESSAGE_CAPACITY: usize = MESSAGE_PREFIX.len() + 10 + LINE_ENDING.len();

/// Build the report line for `count`, e.g. `"Message 7\r\n"`.
pub fn format_message(count: u32) -> String<MESSAGE_CAPACITY> {
    let mut line = String::new();
    // Capacity fits any u32, so this cannot fail.
    write!(line, "{MESSAGE_PREFIX}{count}{LINE_ENDING}").ok();
    line
}

/// Write the startup banner line.
pub fn write_banner(out: &mut impl Write) -> fmt::Result {
    write!(out, "{BANNER}{LINE_ENDING}")
}
