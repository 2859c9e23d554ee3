//! Host-level tests for the DS1307 driver against an in-memory register file.

use embassy_futures::block_on;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use word_clock::ds1307::{ADDRESS, Ds1307, decode_registers, encode_registers};
use word_clock::{Error, TimeSource, TimeValue};

const SUMMER_MORNING: TimeValue = TimeValue {
    seconds: 45,
    minutes: 30,
    hours: 8,
    day: 15,
    month: 6,
    year: 20,
    day_of_week: 1,
};

/// Registers 0x00–0x07 with an auto-incrementing address pointer, like the real chip.
#[derive(Default)]
struct MockRtc {
    registers: [u8; 8],
    pointer: usize,
    addresses: Vec<u8>,
    unplugged: bool,
}

impl MockRtc {
    fn with_registers(registers: [u8; 8]) -> Self {
        Self {
            registers,
            ..Self::default()
        }
    }

    fn next(&mut self) -> &mut u8 {
        let slot = &mut self.registers[self.pointer % 8];
        self.pointer += 1;
        slot
    }
}

impl ErrorType for MockRtc {
    type Error = ErrorKind;
}

impl I2c for MockRtc {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.addresses.push(address);
        if self.unplugged {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if let Some((&pointer, data)) = bytes.split_first() {
                        self.pointer = usize::from(pointer);
                        for &byte in data {
                            *self.next() = byte;
                        }
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = *self.next();
                    }
                }
            }
        }
        Ok(())
    }
}

#[test]
fn write_stores_bcd_registers_and_clears_control() {
    let mut rtc = Ds1307::new(MockRtc::with_registers([0xFF; 8]));
    block_on(rtc.write_time(&SUMMER_MORNING)).expect("bus works");

    let mock = rtc.release();
    assert_eq!(mock.registers, [0x45, 0x30, 0x08, 0x01, 0x15, 0x06, 0x20, 0x00]);
    assert_eq!(mock.addresses, [ADDRESS]);
}

#[test]
fn written_time_reads_back() {
    let mut rtc = Ds1307::new(MockRtc::default());
    block_on(rtc.write_time(&SUMMER_MORNING)).expect("bus works");

    assert_eq!(block_on(rtc.read_time()).expect("valid time"), SUMMER_MORNING);
    assert_eq!(rtc.release().addresses, [ADDRESS, ADDRESS]);
}

#[test]
fn read_masks_clock_halt_and_hour_mode_bits() {
    let mut rtc = Ds1307::new(MockRtc::with_registers([
        0x80 | 0x12,
        0x34,
        0x40 | 0x11,
        0x03,
        0x28,
        0x02,
        0x24,
        0x00,
    ]));

    assert_eq!(
        block_on(rtc.read_time()).expect("valid time"),
        TimeValue {
            seconds: 12,
            minutes: 34,
            hours: 11,
            day: 28,
            month: 2,
            year: 24,
            day_of_week: 3,
        }
    );
}

#[test]
fn never_set_chip_reports_invalid_time() {
    let mut rtc = Ds1307::new(MockRtc::default());
    let err = block_on(rtc.read_time()).expect_err("day 0 is invalid");
    assert!(matches!(
        err,
        Error::InvalidRtcTime {
            field: "day",
            value: 0
        }
    ));
}

#[test]
fn out_of_range_field_is_named() {
    let registers = [0x00, 0x00, 0x10, 0x02, 0x01, 0x13, 0x13];
    assert!(matches!(
        decode_registers(&registers),
        Err(Error::InvalidRtcTime {
            field: "month",
            value: 13
        })
    ));

    let registers = [0x00, 0x00, 0x25, 0x02, 0x01, 0x01, 0x13];
    assert!(matches!(
        decode_registers(&registers),
        Err(Error::InvalidRtcTime {
            field: "hours",
            value: 25
        })
    ));
}

#[test]
fn bus_errors_are_reported() {
    let mut rtc = Ds1307::new(MockRtc {
        unplugged: true,
        ..MockRtc::default()
    });

    assert!(matches!(
        block_on(rtc.read_time()),
        Err(Error::I2c(ErrorKind::NoAcknowledge(_)))
    ));
    assert!(matches!(
        block_on(rtc.write_time(&SUMMER_MORNING)),
        Err(Error::I2c(_))
    ));
}

#[test]
fn register_image_starts_at_zero() {
    assert_eq!(
        encode_registers(&TimeValue::POWER_ON),
        [0x00, 0x00, 0x00, 0x10, 0x00, 0x01, 0x01, 0x13, 0x00]
    );
}
