//! Host-level tests for grayscale channel packing.

use word_clock::shared_constants::{CHANNELS, GRAYSCALE_BYTES, ROWS};
use word_clock::{ChannelBuffer, ChannelSink};

/// Straightforward bit-by-bit packing: channel 15 first, 12 bits each, most significant bit first.
fn reference_bytes(values: &[u16; CHANNELS]) -> [u8; GRAYSCALE_BYTES] {
    let mut bytes = [0_u8; GRAYSCALE_BYTES];
    let mut bit_index = 0;
    for channel in (0..CHANNELS).rev() {
        for bit in (0..12).rev() {
            if (values[channel] >> bit) & 1 == 1 {
                bytes[bit_index / 8] |= 0x80 >> (bit_index % 8);
            }
            bit_index += 1;
        }
    }
    bytes
}

#[test]
fn single_channels_land_where_the_driver_expects_them() {
    for channel in [0, 1, 14, 15] {
        for value in [0, 1, 0xFFF] {
            let buffer = ChannelBuffer::new();
            buffer.set_channel(3, channel, value);

            let mut expected = [0; CHANNELS];
            expected[channel] = value;
            assert_eq!(
                buffer.row_bytes(3),
                reference_bytes(&expected),
                "channel {channel} value {value:#x}"
            );
        }
    }
}

#[test]
fn known_byte_positions() {
    let buffer = ChannelBuffer::new();
    buffer.set_channel(0, 15, 0xFFF);
    buffer.set_channel(0, 0, 0xABC);
    let bytes = buffer.row_bytes(0);

    assert_eq!(bytes[0], 0xFF);
    assert_eq!(bytes[1], 0xF0);
    assert_eq!(bytes[22], 0x0A);
    assert_eq!(bytes[23], 0xBC);
}

#[test]
fn neighbours_in_a_pair_are_kept() {
    let buffer = ChannelBuffer::new();
    buffer.set_channel(5, 14, 0x123);
    buffer.set_channel(5, 15, 0x456);
    buffer.set_channel(5, 14, 0x789);

    let mut expected = [0; CHANNELS];
    expected[14] = 0x789;
    expected[15] = 0x456;
    assert_eq!(buffer.row_bytes(5), reference_bytes(&expected));
}

#[test]
fn full_row_matches_reference() {
    let buffer = ChannelBuffer::new();
    let mut expected = [0; CHANNELS];
    for (channel, value) in expected.iter_mut().enumerate() {
        *value = u16::try_from(channel * 257 + 3).expect("fits") & 0x0FFF;
        buffer.set_channel(ROWS - 1, channel, *value);
    }
    assert_eq!(buffer.row_bytes(ROWS - 1), reference_bytes(&expected));
}

#[test]
fn rows_are_independent() {
    let buffer = ChannelBuffer::new();
    buffer.set_channel(2, 7, 0xFFF);

    assert_ne!(buffer.row_bytes(2), [0; GRAYSCALE_BYTES]);
    for row in (0..ROWS).filter(|&row| row != 2) {
        assert_eq!(buffer.row_bytes(row), [0; GRAYSCALE_BYTES], "row {row}");
    }
}

#[test]
fn values_are_clamped_to_twelve_bits() {
    let buffer = ChannelBuffer::new();
    buffer.set_channel(0, 15, u16::MAX);
    buffer.set_channel(0, 14, 0);

    let mut expected = [0; CHANNELS];
    expected[15] = 0xFFF;
    assert_eq!(buffer.row_bytes(0), reference_bytes(&expected));
}

#[test]
fn out_of_range_writes_are_ignored() {
    let buffer = ChannelBuffer::new();
    buffer.set_channel(ROWS, 0, 0xFFF);
    buffer.set_channel(0, CHANNELS, 0xFFF);

    for row in 0..ROWS {
        assert_eq!(buffer.row_bytes(row), [0; GRAYSCALE_BYTES]);
    }
    assert_eq!(buffer.row_bytes(ROWS), [0; GRAYSCALE_BYTES]);
    assert_eq!(buffer.refresh_count(), 0);
}
