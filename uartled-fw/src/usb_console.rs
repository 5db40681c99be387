// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC console carrying the report stream.
//!
//! The device has to be polled every few milliseconds to stay enumerated.
//! Instead of an interrupt, `PollingDelay` polls at least every 1ms while it
//! waits out a deadline, so the loop's blocking waits keep USB alive.

use core::cell::UnsafeCell;
use core::fmt;
use embedded_hal::delay::DelayNs;
use rp2040_hal::{usb::UsbBus, Timer};
use uartled_common::board::UsbParts;
use uartled_common::next_wait_us;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

/// Longest sleep between two USB polls.
const POLL_INTERVAL_US: u32 = 1_000;
/// Polls to wait for room in the TX buffer before giving up on a line.
const WRITE_RETRIES: u32 = 1_000;

#[derive(Debug, defmt::Format)]
pub enum ConsoleError {
    /// The USB bus allocator was already created.
    BusTaken,
    StringTooLong,
}

pub struct UsbConsole {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
}

impl UsbConsole {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus>) -> Result<Self, ConsoleError> {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x2E8A, 0x000A))
            .strings(&[StringDescriptors::default()
                .manufacturer("ADNT")
                .product("UartLed")
                .serial_number("0001")])
            .map_err(|_| ConsoleError::StringTooLong)?
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Ok(Self { serial, usb_dev })
    }

    /// Poll the USB device and discard any input from the host.
    pub fn poll(&mut self) -> bool {
        let active = self.usb_dev.poll(&mut [&mut self.serial]);
        if active {
            let mut sink = [0u8; 64];
            self.serial.read(&mut sink).ok();
        }
        active
    }

    fn is_configured(&self) -> bool {
        self.usb_dev.state() == UsbDeviceState::Configured
    }

    /// Write all bytes, polling while the TX buffer is full.
    ///
    /// Output is dropped while no host has configured the device.
    fn write_all(&mut self, data: &[u8]) -> Result<(), UsbError> {
        if !self.is_configured() {
            return Ok(());
        }

        let mut offset = 0;
        let mut retries = 0;
        while offset < data.len() {
            match self.serial.write(&data[offset..]) {
                Ok(n) => offset += n,
                Err(UsbError::WouldBlock) if retries < WRITE_RETRIES => {
                    retries += 1;
                    self.poll();
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Wrapper to hold the console in a static without `static mut`.
///
/// SAFETY: Only the main thread touches it; no interrupt handler uses USB.
struct SyncConsole(UnsafeCell<Option<UsbConsole>>);
unsafe impl Sync for SyncConsole {}

static USB_CONSOLE: SyncConsole = SyncConsole(UnsafeCell::new(None));

/// Bring up the USB bus and store the console (call once at startup).
pub fn init(usb: UsbParts) -> Result<(), ConsoleError> {
    let UsbParts {
        regs,
        dpram,
        clock,
        mut resets,
    } = usb;

    let usb_bus = cortex_m::singleton!(
        : UsbBusAllocator<UsbBus> =
            UsbBusAllocator::new(UsbBus::new(regs, dpram, clock, true, &mut resets))
    )
    .ok_or(ConsoleError::BusTaken)?;

    let console = UsbConsole::new(usb_bus)?;
    // SAFETY: Called only once during initialization, single-threaded
    unsafe {
        *USB_CONSOLE.0.get() = Some(console);
    }
    Ok(())
}

fn with_console<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut UsbConsole) -> R,
{
    // SAFETY: Single-threaded environment, no concurrent access
    unsafe { (*USB_CONSOLE.0.get()).as_mut().map(f) }
}

/// `fmt::Write` sink over the stored console.
pub struct UsbWriter;

impl fmt::Write for UsbWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match with_console(|console| console.write_all(s.as_bytes())) {
            Some(Ok(())) => Ok(()),
            _ => Err(fmt::Error),
        }
    }
}

/// Blocking delay that keeps the USB device serviced.
///
/// Sleeps run against a deadline taken from the timer when the delay starts.
/// Polling happens inside that window, so a 700ms delay ends 700ms later
/// however long each poll takes.
pub struct PollingDelay {
    timer: Timer,
}

impl PollingDelay {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }

    fn sleep_us(&mut self, us: u64) {
        let deadline = self.timer.get_counter().ticks() + us;
        loop {
            with_console(UsbConsole::poll);
            let now = self.timer.get_counter().ticks();
            match next_wait_us(now, deadline, POLL_INTERVAL_US) {
                Some(step) => self.timer.delay_us(step),
                None => break,
            }
        }
    }
}

impl DelayNs for PollingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleep_us(u64::from(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.sleep_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleep_us(u64::from(ms) * 1_000);
    }
}
