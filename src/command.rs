//! Line protocol of the serial console.
//!
//! A request is `<command><argument>\r\n`, a reply is `<command><result>\r\n`:
//!
//! | request              | effect                                   | reply              |
//! |----------------------|------------------------------------------|--------------------|
//! | `v`                  | none                                     | `v<version>`       |
//! | `b` / `bHH`          | set the brightness ceiling to hex `HH`   | `bHH` (current)    |
//! | `t` / `tYYMMDDhhmmss`| set the time and write it to the RTC     | `tYYMMDDhhmmss`    |
//!
//! An argument of the wrong length or with bad digits leaves the state alone; the reply
//! still shows the current value. Unknown commands are echoed with an empty result.

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::clock_state::ClockState;
use crate::shared_constants::VERSION;
use crate::time_value::TimeValue;

/// Bytes of argument kept per line. Further bytes are dropped.
pub const ARGUMENT_CAPACITY: usize = 12;
/// Longest reply, line ending included.
pub const REPLY_CAPACITY: usize = 32;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const LINE_END: &str = "\r\n";

const COMMAND_VERSION: u8 = b'v';
const COMMAND_BRIGHTNESS: u8 = b'b';
const COMMAND_TIME: u8 = b't';

const BRIGHTNESS_DIGITS: usize = 2;
const TIME_DIGITS: usize = 12;

/// One received request line, line ending stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub command: u8,
    pub argument: Vec<u8, ARGUMENT_CAPACITY>,
    /// More argument bytes arrived than fit. The argument holds the first
    /// [`ARGUMENT_CAPACITY`] bytes and the rest were dropped.
    pub overflowed: bool,
}

/// Assembles request lines from a byte stream.
#[derive(Debug, Default)]
pub struct CommandParser {
    command: Option<u8>,
    argument: Vec<u8, ARGUMENT_CAPACITY>,
    overflowed: bool,
    pending_cr: bool,
}

impl CommandParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command: None,
            argument: Vec::new(),
            overflowed: false,
            pending_cr: false,
        }
    }

    /// Feed one received byte. Returns the request once its `\r\n` arrives.
    ///
    /// A line holding nothing but `\r\n` yields no request.
    pub fn feed(&mut self, byte: u8) -> Option<CommandLine> {
        if self.pending_cr {
            self.pending_cr = false;
            if byte == LF {
                return self.finish();
            }
            self.push(CR);
        }
        if byte == CR {
            self.pending_cr = true;
        } else {
            self.push(byte);
        }
        None
    }

    fn push(&mut self, byte: u8) {
        if self.command.is_none() {
            self.command = Some(byte);
        } else if self.argument.push(byte).is_err() {
            self.overflowed = true;
        }
    }

    fn finish(&mut self) -> Option<CommandLine> {
        let line = self.command.take().map(|command| CommandLine {
            command,
            argument: core::mem::take(&mut self.argument),
            overflowed: self.overflowed,
        });
        self.overflowed = false;
        line
    }
}

/// Response to one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String<REPLY_CAPACITY>,
    /// A time set by the request, to be written to the real-time clock.
    pub persist: Option<TimeValue>,
}

/// Apply a request to the clock state and build the reply.
#[must_use]
pub fn execute(line: &CommandLine, state: &mut ClockState) -> Reply {
    let argument = line.argument.as_slice();
    let mut reply = Reply {
        text: String::new(),
        persist: None,
    };
    // Every reply fits REPLY_CAPACITY. A longer version string is cut at the capacity,
    // leaving room for the line ending.
    let _ = reply.text.push(char::from(line.command));
    match line.command {
        COMMAND_VERSION => {
            for ch in VERSION.chars() {
                let needed = reply
                    .text
                    .len()
                    .saturating_add(ch.len_utf8())
                    .saturating_add(LINE_END.len());
                if needed > REPLY_CAPACITY {
                    break;
                }
                let _ = reply.text.push(ch);
            }
        }
        COMMAND_BRIGHTNESS => {
            if let Some(ceiling) = parse_hex_byte(argument) {
                state.set_ceiling(ceiling);
            }
            let _ = write!(reply.text, "{:02X}", state.ceiling());
        }
        COMMAND_TIME => {
            if let Some(time) = parse_time(argument, state.time()) {
                state.set_time(time);
                reply.persist = Some(time);
            }
            let _ = write_time(&mut reply.text, state.time());
        }
        _ => {}
    }
    let _ = reply.text.push_str(LINE_END);
    reply
}

fn write_time(text: &mut String<REPLY_CAPACITY>, time: &TimeValue) -> core::fmt::Result {
    write!(
        text,
        "{:02}{:02}{:02}{:02}{:02}{:02}",
        time.year, time.month, time.day, time.hours, time.minutes, time.seconds
    )
}

/// Exactly two hex digits, either case.
fn parse_hex_byte(digits: &[u8]) -> Option<u8> {
    if digits.len() != BRIGHTNESS_DIGITS {
        return None;
    }
    let text = core::str::from_utf8(digits).ok()?;
    if !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(text, 16).ok()
}

/// `YYMMDDhhmmss` as plain decimal digits. The day of the week is carried over from `current`.
fn parse_time(digits: &[u8], current: &TimeValue) -> Option<TimeValue> {
    if digits.len() != TIME_DIGITS || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut pairs = digits.chunks_exact(2).map(|pair| {
        pair.iter().fold(0_u8, |value, digit| {
            value.saturating_mul(10).saturating_add(digit.saturating_sub(b'0'))
        })
    });
    let time = TimeValue {
        year: pairs.next()?,
        month: pairs.next()?,
        day: pairs.next()?,
        hours: pairs.next()?,
        minutes: pairs.next()?,
        seconds: pairs.next()?,
        day_of_week: current.day_of_week,
    };
    time.is_valid().then_some(time)
}
