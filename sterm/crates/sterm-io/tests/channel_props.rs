//! Property tests: values written to a channel read back unchanged.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use sterm_io::{BitChannel, ByteChannel};

#[quickcheck]
fn prop_int_round_trip(values: Vec<Option<i32>>) -> bool {
    let mut bits = BitChannel::new(ByteChannel::memory());
    for value in &values {
        bits.write_int(*value).unwrap();
    }
    let out = bits.finish().unwrap();

    let mut input = BitChannel::new(ByteChannel::from_bytes(out.into_bytes().unwrap()));
    values.iter().all(|value| input.read_int().unwrap() == *value)
}

#[quickcheck]
fn prop_varint_round_trip(values: Vec<u32>) -> bool {
    let mut chan = ByteChannel::memory();
    for value in &values {
        chan.write_varint(*value).unwrap();
    }

    values.iter().all(|value| chan.read_varint() == Some(*value)) && chan.read_byte().is_none()
}

#[quickcheck]
fn prop_seven_bit_string_round_trip(text: String) -> TestResult {
    if text.bytes().any(|b| b == 0 || b >= 0x80) {
        return TestResult::discard();
    }

    let mut bits = BitChannel::new(ByteChannel::memory());
    bits.write_string(&text).unwrap();
    bits.write_int(Some(7)).unwrap();
    let out = bits.finish().unwrap();

    let mut input = BitChannel::new(ByteChannel::from_bytes(out.into_bytes().unwrap()));
    TestResult::from_bool(
        input.read_string().as_deref() == Some(text.as_str())
            && input.read_int().unwrap() == Some(7),
    )
}

#[quickcheck]
fn prop_mixed_bit_widths(fields: Vec<(u32, u8)>) -> bool {
    let fields: Vec<(u32, u32)> = fields
        .into_iter()
        .map(|(value, width)| {
            let width = u32::from(width % 33);
            let masked = if width == 32 { value } else { value & ((1 << width) - 1) };
            (masked, width)
        })
        .collect();

    let mut bits = BitChannel::new(ByteChannel::memory());
    for (value, width) in &fields {
        bits.write_bits(*value, *width).unwrap();
    }
    let out = bits.finish().unwrap();

    let mut input = BitChannel::new(ByteChannel::from_bytes(out.into_bytes().unwrap()));
    fields
        .iter()
        .all(|(value, width)| input.read_bits(*width) == Some(*value))
}
