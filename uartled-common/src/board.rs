// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Raspberry Pi Pico bring-up: clocks, timer, LED pin and the default UART.

use embedded_hal::digital::OutputPin;
use rp2040_hal::{
    clocks::{init_clocks_and_plls, UsbClock},
    fugit::RateExtU32,
    gpio::{
        bank0::{Gpio0, Gpio1, Gpio25},
        FunctionSioOutput, FunctionUart, Pin, Pins, PullDown,
    },
    pac,
    uart::{DataBits, Enabled, StopBits, UartConfig, UartPeripheral},
    Clock, Sio, Timer, Watchdog,
};

/// Pico crystal oscillator frequency.
pub const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;
/// Default stdio UART speed (8N1).
pub const UART_BAUD_RATE: u32 = 115_200;

/// On-board LED (GP25).
pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;
/// UART0 TX on GP0, RX on GP1.
pub type UartPins = (
    Pin<Gpio0, FunctionUart, PullDown>,
    Pin<Gpio1, FunctionUart, PullDown>,
);
/// UART0 enabled at `UART_BAUD_RATE`.
pub type Uart = UartPeripheral<Enabled, pac::UART0, UartPins>;

/// USB controller parts, left unconfigured until the USB console takes them.
pub struct UsbParts {
    pub regs: pac::USBCTRL_REGS,
    pub dpram: pac::USBCTRL_DPRAM,
    pub clock: UsbClock,
    pub resets: pac::RESETS,
}

/// Peripherals handed to the firmware after bring-up.
pub struct Board {
    pub timer: Timer,
    pub led_pin: LedPin,
    pub uart: Uart,
    pub usb: UsbParts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// `pac::Peripherals` was already taken.
    PeripheralsTaken,
    /// Crystal oscillator or PLL failed to start.
    Clocks,
    /// Baud rate not reachable from the peripheral clock.
    Uart,
}

/// Bring up the board. Call once, at startup.
pub fn init() -> Result<Board, BoardError> {
    let mut pac = pac::Peripherals::take().ok_or(BoardError::PeripheralsTaken)?;
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    let clocks = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .map_err(|_| BoardError::Clocks)?;

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let sio = Sio::new(pac.SIO);
    let pins = Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut led_pin = pins.gpio25.into_push_pull_output();
    led_pin.set_low().ok();

    let uart_pins = (
        pins.gpio0.into_function::<FunctionUart>(),
        pins.gpio1.into_function::<FunctionUart>(),
    );
    let uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(UART_BAUD_RATE.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .map_err(|_| BoardError::Uart)?;

    Ok(Board {
        timer,
        led_pin,
        uart,
        usb: UsbParts {
            regs: pac.USBCTRL_REGS,
            dpram: pac.USBCTRL_DPRAM,
            clock: clocks.usb_clock,
            resets: pac.RESETS,
        },
    })
}

/// Microseconds since reset, read from the free-running timer.
///
/// Reads 0 until `init` has taken the timer out of reset, so log lines
/// printed before bring-up carry a zero timestamp.
pub fn uptime_us() -> u64 {
    // SAFETY: read-only access to TIMERAWH/TIMERAWL, which have no side effects.
    let timer = unsafe { &*pac::TIMER::ptr() };
    loop {
        let hi = timer.timerawh().read().bits();
        let lo = timer.timerawl().read().bits();
        // Retry if the low word rolled over between the two reads.
        if timer.timerawh().read().bits() == hi {
            return (u64::from(hi) << 32) | u64::from(lo);
        }
    }
}
