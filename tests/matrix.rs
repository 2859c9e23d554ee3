//! Host-level tests for the row-multiplexed refresh sequence, driven through mock pins.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as DigitalErrorType, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};
use word_clock::ChannelBuffer;
use word_clock::ChannelSink;
use word_clock::matrix::{GrayscalePort, RefreshDriver, RowCounter, RowLines, RowSelect};
use word_clock::shared_constants::ROWS;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Pin(&'static str, bool),
    Shift(Vec<u8>),
    Flush,
}

type Log = Rc<RefCell<Vec<Event>>>;

struct MockPin {
    name: &'static str,
    log: Log,
}

impl DigitalErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, true));
        Ok(())
    }
}

struct MockSpi {
    log: Log,
}

impl SpiErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Shift(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Flush);
        Ok(())
    }
}

const ROW_NAMES: [&str; ROWS] = [
    "row0", "row1", "row2", "row3", "row4", "row5", "row6", "row7", "row8",
];

fn pin(name: &'static str, log: &Log) -> MockPin {
    MockPin {
        name,
        log: Rc::clone(log),
    }
}

fn port(log: &Log) -> GrayscalePort<MockPin, MockSpi> {
    GrayscalePort::new(
        pin("blank", log),
        pin("latch", log),
        MockSpi {
            log: Rc::clone(log),
        },
    )
}

fn row_lines(log: &Log) -> RowLines<MockPin> {
    RowLines::new(ROW_NAMES.map(|name| pin(name, log)))
}

fn drain(log: &Log) -> Vec<Event> {
    log.borrow_mut().drain(..).collect()
}

/// Rows switched on, in order.
fn selected_rows(events: &[Event]) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Pin(name, true) if name.starts_with("row") => Some(*name),
            _ => None,
        })
        .collect()
}

#[test]
fn driver_starts_blanked() {
    let log = Log::default();
    let buffer = ChannelBuffer::new();
    let _driver = RefreshDriver::new(port(&log), row_lines(&log), &buffer).expect("pins work");

    assert_eq!(drain(&log), vec![Event::Pin("blank", true)]);
}

#[test]
fn cycle_runs_in_order() {
    let log = Log::default();
    let buffer = ChannelBuffer::new();
    buffer.set_channel(0, 15, 0xFFF);
    let mut driver = RefreshDriver::new(port(&log), row_lines(&log), &buffer).expect("pins work");
    drain(&log);

    driver.cycle().expect("pins work");

    assert_eq!(
        drain(&log),
        vec![
            Event::Pin("blank", true),
            Event::Pin("row7", false),
            Event::Pin("latch", true),
            Event::Pin("latch", false),
            Event::Pin("row8", true),
            Event::Pin("blank", false),
            Event::Shift(buffer.row_bytes(0).to_vec()),
            Event::Flush,
        ]
    );
    assert_eq!(driver.lit_row(), ROWS - 1);
    assert_eq!(buffer.refresh_count(), 1);
}

#[test]
fn rows_round_robin_with_data_one_row_ahead() {
    let log = Log::default();
    let buffer = ChannelBuffer::new();
    for row in 0..ROWS {
        buffer.set_channel(row, 0, u16::try_from(row + 1).expect("fits"));
    }
    let mut driver = RefreshDriver::new(port(&log), row_lines(&log), &buffer).expect("pins work");
    drain(&log);

    for cycle in 0..2 * ROWS {
        driver.cycle().expect("pins work");
        let events = drain(&log);
        let lit = (cycle + ROWS - 1) % ROWS;
        let shifted = (lit + 1) % ROWS;

        assert_eq!(driver.lit_row(), lit);
        assert_eq!(selected_rows(&events), vec![ROW_NAMES[lit]]);
        assert!(events.contains(&Event::Pin(ROW_NAMES[(lit + ROWS - 1) % ROWS], false)));
        assert!(events.contains(&Event::Shift(buffer.row_bytes(shifted).to_vec())));
    }
    assert_eq!(buffer.refresh_count(), u64::try_from(2 * ROWS).expect("fits"));
}

#[test]
fn latched_data_is_the_row_being_lit() {
    let log = Log::default();
    let buffer = ChannelBuffer::new();
    buffer.set_channel(4, 3, 0x800);
    let mut driver = RefreshDriver::new(port(&log), row_lines(&log), &buffer).expect("pins work");

    let mut shifted_before_latch = Vec::new();
    let mut latched_for = Vec::new();
    for _ in 0..ROWS {
        driver.cycle().expect("pins work");
        for event in drain(&log) {
            match event {
                Event::Shift(bytes) => shifted_before_latch = bytes,
                Event::Pin(name, true) if name.starts_with("row") => {
                    latched_for.push((name, shifted_before_latch.clone()));
                }
                _ => {}
            }
        }
    }

    let row4 = latched_for
        .iter()
        .find(|(name, _)| *name == "row4")
        .expect("row 4 lit");
    assert_eq!(row4.1, buffer.row_bytes(4).to_vec());
}

#[test]
fn counter_resets_on_row_zero_and_clocks_otherwise() {
    let log = Log::default();
    let mut counter = RowCounter::new(pin("clock", &log), pin("reset", &log));

    counter.deselect(3).expect("pins work");
    assert!(drain(&log).is_empty());

    counter.select(0).expect("pins work");
    assert_eq!(
        drain(&log),
        vec![Event::Pin("reset", true), Event::Pin("reset", false)]
    );

    counter.select(1).expect("pins work");
    assert_eq!(
        drain(&log),
        vec![Event::Pin("clock", true), Event::Pin("clock", false)]
    );
}

#[test]
fn counter_wiring_drives_the_same_cycle() {
    let log = Log::default();
    let buffer = ChannelBuffer::new();
    let counter = RowCounter::new(pin("clock", &log), pin("reset", &log));
    let mut driver = RefreshDriver::new(port(&log), counter, &buffer).expect("pins work");
    drain(&log);

    driver.cycle().expect("pins work");
    driver.cycle().expect("pins work");
    let events = drain(&log);

    let resets = events
        .iter()
        .filter(|event| **event == Event::Pin("reset", true))
        .count();
    let clocks = events
        .iter()
        .filter(|event| **event == Event::Pin("clock", true))
        .count();
    // Row 8 is clocked in, then the counter wraps to row 0 with a reset.
    assert_eq!((clocks, resets), (1, 1));
}

#[test]
fn row_lines_ignore_out_of_range_rows() {
    let log = Log::default();
    let mut lines = row_lines(&log);

    lines.select(ROWS).expect("pins work");
    lines.deselect(ROWS).expect("pins work");
    assert!(drain(&log).is_empty());

    lines.select(2).expect("pins work");
    assert_eq!(drain(&log), vec![Event::Pin("row2", true)]);
}
