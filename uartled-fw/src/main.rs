// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

#![no_std]
#![no_main]

#[cfg(feature = "usb")]
mod usb_console;

use defmt_rtt as _;
use panic_probe as _;
use uartled_common::{board, BlinkAndReport};

defmt::timestamp!("{=u64:us}", { board::uptime_us() });

use cortex_m_rt::entry;

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

const VERSION: &str = env!("UARTLED_VERSION");

#[entry]
fn main() -> ! {
    defmt::println!("UartLed v{} init", VERSION);

    let board = match board::init() {
        Ok(board) => board,
        Err(e) => {
            defmt::error!("Board init failed: {:?}", e);
            halt()
        }
    };
    defmt::println!("Board ready, LED on GP25");

    start(board)
}

#[cfg(not(feature = "usb"))]
fn start(board: board::Board) -> ! {
    defmt::println!("Serial: UART0 at {} baud", board::UART_BAUD_RATE);
    BlinkAndReport::new(board.led_pin, board.timer, board.uart).run()
}

#[cfg(feature = "usb")]
fn start(board: board::Board) -> ! {
    use embedded_hal::digital::OutputPin;

    let board::Board {
        timer,
        mut led_pin,
        usb,
        ..
    } = board;

    if let Err(e) = usb_console::init(usb) {
        defmt::error!("USB console init failed: {:?}", e);
        led_pin.set_high().ok();
        halt()
    }
    defmt::println!("Serial: USB CDC");

    BlinkAndReport::new(
        led_pin,
        usb_console::PollingDelay::new(timer),
        usb_console::UsbWriter,
    )
    .run()
}

/// Park the core after a fatal bring-up failure.
fn halt() -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
