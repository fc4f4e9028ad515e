//! Instruction word encoding.
//!
//! Every instruction is exactly 16 bits (2 bytes), stored big-endian:
//! ```text
//! Byte 0: high byte
//! Byte 1: low byte
//! ```
//! There is no header and no padding beyond the instruction width.

/// A raw 16-bit instruction word.
pub type Word = u16;

/// Width of one instruction in bytes.
pub const INSTRUCTION_WIDTH: u16 = 2;

/// Compose two bytes into a word (big-endian).
pub fn decode_word(bytes: [u8; 2]) -> Word {
    u16::from_be_bytes(bytes)
}

/// Split a word into its two bytes (big-endian).
pub fn encode_word(word: Word) -> [u8; 2] {
    word.to_be_bytes()
}

/// Read the word stored at `address` in `bytes`.
///
/// Returns `None` if `address + 1` is past the end of the slice.
pub fn fetch_word(bytes: &[u8], address: usize) -> Option<Word> {
    let hi = *bytes.get(address)?;
    let lo = *bytes.get(address.checked_add(1)?)?;
    Some(decode_word([hi, lo]))
}

/// Encode a sequence of words as a program image.
pub fn encode_words(words: &[Word]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * INSTRUCTION_WIDTH as usize);
    for &word in words {
        bytes.extend_from_slice(&encode_word(word));
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_byte_order() {
        assert_eq!(decode_word([0x12, 0x34]), 0x1234);
        assert_eq!(encode_word(0xabcd), [0xab, 0xcd]);
    }

    #[test]
    fn fetch_in_bounds() {
        let bytes = [0x12, 0x04, 0x00, 0xee];
        assert_eq!(fetch_word(&bytes, 0), Some(0x1204));
        assert_eq!(fetch_word(&bytes, 1), Some(0x0400));
        assert_eq!(fetch_word(&bytes, 2), Some(0x00ee));
    }

    #[test]
    fn fetch_needs_two_bytes() {
        let bytes = [0x12, 0x04, 0x00];
        assert_eq!(fetch_word(&bytes, 2), None);
        assert_eq!(fetch_word(&bytes, 3), None);
        assert_eq!(fetch_word(&[], 0), None);
        assert_eq!(fetch_word(&bytes, usize::MAX), None);
    }

    #[test]
    fn encode_program_image() {
        assert_eq!(
            encode_words(&[0x2204, 0x0000, 0x00ee]),
            vec![0x22, 0x04, 0x00, 0x00, 0x00, 0xee]
        );
        assert!(encode_words(&[]).is_empty());
    }
}
