// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for the blink-and-report loop against recording mocks.

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use uartled_common::{BlinkAndReport, BlinkTiming, BANNER, LED_OFF_MS, LED_ON_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    High,
    Low,
    SleepMs(u32),
    Write(String),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct MockPin(Log);

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(Event::High);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(Event::Low);
        Ok(())
    }
}

struct MockDelay(Log);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        panic!("loop should sleep in whole milliseconds");
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Event::SleepMs(ms));
    }
}

struct MockSerial(Log);

impl fmt::Write for MockSerial {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.borrow_mut().push(Event::Write(s.to_string()));
        Ok(())
    }
}

/// Serial transport that rejects every write.
struct BrokenSerial;

impl fmt::Write for BrokenSerial {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}

fn setup() -> (BlinkAndReport<MockPin, MockDelay, MockSerial>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let report = BlinkAndReport::new(
        MockPin(log.clone()),
        MockDelay(log.clone()),
        MockSerial(log.clone()),
    );
    (report, log)
}

fn written(log: &Log) -> String {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(s) => Some(s.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_starts_at_zero() {
    let (report, log) = setup();

    assert_eq!(report.count(), 0);
    assert_eq!(report.timing(), BlinkTiming::DEFAULT);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_announce_writes_banner() {
    let (mut report, log) = setup();
    report.announce();

    assert_eq!(written(&log), format!("{BANNER}\r\n"));
    assert_eq!(report.count(), 0);
}

#[test]
fn test_cycle_sequence() {
    let (mut report, log) = setup();
    let count = report.cycle();

    assert_eq!(count, 1);
    assert_eq!(
        *log.borrow(),
        vec![
            Event::High,
            Event::SleepMs(LED_ON_MS),
            Event::Low,
            Event::SleepMs(LED_OFF_MS),
            Event::Write("Message 1\r\n".to_string()),
        ]
    );
}

#[test]
fn test_nth_message_carries_n() {
    let (mut report, log) = setup();

    for n in 1..=50u32 {
        assert_eq!(report.cycle(), n);
        assert_eq!(report.count(), n);
    }

    let expected: String = (1..=50).map(|n| format!("Message {n}\r\n")).collect();
    assert_eq!(written(&log), expected);
}

#[test]
fn test_every_cycle_is_100ms_on_700ms_off() {
    let (mut report, log) = setup();
    for _ in 0..10 {
        report.cycle();
    }

    let log = log.borrow();
    let mut on_ms = Vec::new();
    let mut off_ms = Vec::new();
    let mut lit = false;
    for event in log.iter() {
        match event {
            Event::High => lit = true,
            Event::Low => lit = false,
            Event::SleepMs(ms) if lit => on_ms.push(*ms),
            Event::SleepMs(ms) => off_ms.push(*ms),
            Event::Write(_) => assert!(!lit, "message sent while LED is lit"),
        }
    }

    assert_eq!(on_ms, vec![100; 10]);
    assert_eq!(off_ms, vec![700; 10]);
    let total: u32 = on_ms.iter().chain(off_ms.iter()).sum();
    assert_eq!(total, 10 * BlinkTiming::DEFAULT.period_ms());
}

#[test]
fn test_banner_precedes_first_message() {
    let (mut report, log) = setup();
    report.announce();
    report.cycle();
    report.cycle();

    assert_eq!(
        written(&log),
        "Welcome to UartLed\r\nMessage 1\r\nMessage 2\r\n"
    );
}

#[test]
fn test_custom_timing() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut report = BlinkAndReport::with_timing(
        MockPin(log.clone()),
        MockDelay(log.clone()),
        MockSerial(log.clone()),
        BlinkTiming::new(20, 30),
    );
    report.cycle();

    let sleeps: Vec<u32> = log
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::SleepMs(ms) => Some(*ms),
            _ => None,
        })
        .collect();
    assert_eq!(sleeps, vec![20, 30]);
}

#[test]
fn test_write_failure_does_not_stop_counting() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut report = BlinkAndReport::new(
        MockPin(log.clone()),
        MockDelay(log.clone()),
        BrokenSerial,
    );

    report.announce();
    assert_eq!(report.cycle(), 1);
    assert_eq!(report.cycle(), 2);

    // The LED keeps blinking even though nothing reaches the host.
    let edges = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::High | Event::Low))
        .count();
    assert_eq!(edges, 4);
}

#[test]
fn test_release_returns_resources() {
    let (mut report, log) = setup();
    report.cycle();

    let (mut pin, _delay, _serial) = report.release();
    pin.set_high().unwrap();

    assert_eq!(log.borrow().last(), Some(&Event::High));
}
