// This module turns six 10 bit tube codes into the byte frame clocked into the shift registers
//
// The registers take 64 bits per frame but only 60 carry cathode data, so the frame starts
// with 4 padding bits which fall off the far end of the chain.

use crate::digits::CODE_MASK;

pub const SLOTS: usize = 6;
pub const CODE_BITS: u32 = 10;
pub const LEAD_PADDING_BITS: u32 = 4;
pub const FRAME_LEN: usize = 8;

// States of the packing machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Check,
    Fill,
    Output,
    Done,
}

/// Packs six codes, slot 0 first, into the 8 byte frame.
///
/// A 16 bit accumulator is topped up with one code whenever fewer than 8 bits are buffered,
/// and drained one byte at a time from the top. Bits above the low ten of each code are
/// ignored.
pub fn pack(slots: &[u16; SLOTS]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    let mut written = 0;

    let mut accum: u16 = 0;
    let mut accum_bits: u32 = 0; // Bits buffered at the top of accum
    let mut slot = 0;

    let mut state = State::Init;
    while state != State::Done {
        state = match state {
            State::Init => {
                accum = 0;
                accum_bits = LEAD_PADDING_BITS; // Leading zeros count as already buffered
                slot = 0;
                State::Check
            }

            State::Check => {
                if accum_bits < 8 {
                    State::Fill
                } else {
                    State::Output
                }
            }

            // Place the new code just below the buffered bits, accum_bits is at most 6 here
            State::Fill => {
                accum |= (slots[slot] & CODE_MASK) << (16 - CODE_BITS - accum_bits);
                accum_bits += CODE_BITS;
                slot += 1;
                State::Check
            }

            State::Output => {
                frame[written] = (accum >> 8) as u8;
                written += 1;
                accum <<= 8;
                accum_bits -= 8;

                if slot >= SLOTS {
                    // 4 + 60 bits is a whole number of bytes, what is left fills the last one
                    frame[written] = (accum >> 8) as u8;
                    written += 1;
                    State::Done
                } else {
                    State::Check
                }
            }

            State::Done => State::Done,
        };
    }

    debug_assert_eq!(written, FRAME_LEN);
    frame
}

/// Splits a frame back into the six codes it was packed from.
pub fn unpack(frame: &[u8; FRAME_LEN]) -> [u16; SLOTS] {
    let stream = u64::from_be_bytes(*frame);

    let mut slots = [0u16; SLOTS];
    for (i, slot) in slots.iter_mut().enumerate() {
        let shift = CODE_BITS * (SLOTS - 1 - i) as u32;
        *slot = (stream >> shift) as u16 & CODE_MASK;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digits::DIGIT_CODES;
    use proptest::prelude::*;

    // Same frame built with a single 64 bit shift register
    fn reference_frame(slots: &[u16; SLOTS]) -> [u8; FRAME_LEN] {
        let stream = slots
            .iter()
            .fold(0u64, |acc, &code| (acc << CODE_BITS) | (code & CODE_MASK) as u64);
        stream.to_be_bytes()
    }

    #[test]
    fn all_blank_frame() {
        let frame = pack(&[0x3FF; SLOTS]);
        assert_eq!(frame, [0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn padding_nibble_is_always_zero() {
        let frame = pack(&[0xFFFF; SLOTS]);
        assert_eq!(frame[0] & 0xF0, 0);
    }

    #[test]
    fn first_slot_is_first_on_the_wire() {
        // Digit 9 clears the top cathode bit of slot 0, which is bit 3 of the first byte
        let mut slots = [DIGIT_CODES[10]; SLOTS];
        slots[0] = DIGIT_CODES[9];
        let frame = pack(&slots);
        assert_eq!(frame[0], 0x07);
        assert!(frame[1..].iter().all(|&b| b == 0xFF));

        // Digit 0 clears the bottom cathode bit of slot 5, the very last bit of the frame
        let mut slots = [DIGIT_CODES[10]; SLOTS];
        slots[5] = DIGIT_CODES[0];
        let frame = pack(&slots);
        assert_eq!(frame[7], 0xFE);
        assert_eq!(frame[0], 0x0F);
    }

    #[test]
    fn matches_reference_for_mixed_digits() {
        let slots = [
            DIGIT_CODES[3],
            DIGIT_CODES[5],
            DIGIT_CODES[9],
            DIGIT_CODES[1],
            DIGIT_CODES[0],
            DIGIT_CODES[7],
        ];
        assert_eq!(pack(&slots), reference_frame(&slots));
        assert_eq!(unpack(&pack(&slots)), slots);
    }

    proptest! {
        #[test]
        fn pack_matches_reference(slots in prop::array::uniform6(0u16..=CODE_MASK)) {
            prop_assert_eq!(pack(&slots), reference_frame(&slots));
        }

        #[test]
        fn unpack_recovers_table_codes(values in prop::array::uniform6(0usize..DIGIT_CODES.len())) {
            let slots = values.map(|v| DIGIT_CODES[v]);
            prop_assert_eq!(unpack(&pack(&slots)), slots);
        }
    }
}
