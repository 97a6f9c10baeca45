// src/common/crc.rs

use super::error::CodecError;
use arrayvec::ArrayString;
use crc::{Algorithm, Crc};

/// CRC algorithm used by the WXT5xx ASCII protocol (CRC-16/ARC).
/// Polynomial: 0x8005 (reflected feedback value 0xA001)
/// Initial Value: 0x0000
/// Input Reflected: true
/// Output Reflected: true
/// Final XOR: 0x0000
/// Check Value: 0xBB3D (for "123456789")
pub const WXT_CRC: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x8005,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0xBB3D,
    residue: 0x0000,
};

const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&WXT_CRC);

/// Number of characters the checksum occupies on the wire.
pub const CHECKSUM_LEN: usize = 3;

/// Calculates the 16-bit CRC over exactly the bytes that precede the
/// checksum in the frame (address included, terminator excluded).
#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Splits a CRC into three 6-bit groups, each OR'd with `0x40`.
///
/// Bits 12..15 land in the first group, so every character is printable.
pub fn encode_crc_ascii(crc_value: u16) -> [u8; 3] {
    let char1 = 0x40 | ((crc_value >> 12) & 0x3F) as u8;
    let char2 = 0x40 | ((crc_value >> 6) & 0x3F) as u8;
    let char3 = 0x40 | (crc_value & 0x3F) as u8;
    [char1, char2, char3]
}

/// Computes the 3-character checksum for a frame body.
pub fn checksum(frame: &str) -> ArrayString<CHECKSUM_LEN> {
    let mut out = ArrayString::new();
    for byte in encode_crc_ascii(calculate_crc16(frame.as_bytes())) {
        // 0x40..=0x7F is always ASCII
        out.push(byte as char);
    }
    out
}

/// Returns `true` when `candidate` is exactly the checksum of `frame`.
pub fn verify(frame: &str, candidate: &str) -> bool {
    checksum(frame).as_str() == candidate
}

/// Splits the trailing checksum off `line` and verifies it.
///
/// Returns the frame content that preceded the checksum. On mismatch the
/// error carries both the computed and the transmitted checksum.
pub fn split_verified(line: &str) -> Result<&str, CodecError> {
    // address plus checksum at minimum
    if line.len() < CHECKSUM_LEN + 1 || !line.is_char_boundary(line.len() - CHECKSUM_LEN) {
        return Err(CodecError::TooShort);
    }
    let (frame, received) = line.split_at(line.len() - CHECKSUM_LEN);
    let expected = checksum(frame);
    if expected.as_str() == received {
        Ok(frame)
    } else {
        let mut actual = ArrayString::new();
        actual.push_str(received);
        tracing::warn!(%expected, %actual, "checksum mismatch, frame rejected");
        Err(CodecError::InvalidChecksum { expected, actual })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_check_value() {
        assert_eq!(calculate_crc16(b"123456789"), 0xBB3D);
    }

    #[test]
    fn test_known_vectors() {
        // Same CRC and encoding as the SDI-12 published example "0+3.14OqZ"
        assert_eq!(calculate_crc16(b"0+3.14"), 0xFC5A);
        assert_eq!(checksum("0+3.14").as_str(), "OqZ");

        assert_eq!(checksum("0xU").as_str(), "CCb");
        assert_eq!(checksum("0xTU").as_str(), "NYq");
        assert_eq!(checksum("0R").as_str(), "OvU");
        assert_eq!(
            checksum("0r2,Ta=23.1C,Tp=24.0C,Ua=45.0P,Pa=1013.2H").as_str(),
            "FW~"
        );
    }

    #[test]
    fn test_encoding_is_printable() {
        for crc_val in [0x0000u16, 0xFFFF, 0x1234, 0xABCD] {
            let encoded = encode_crc_ascii(crc_val);
            assert!(encoded.iter().all(|b| (0x40..=0x7F).contains(b)), "{:#06x}", crc_val);
        }
        assert_eq!(&encode_crc_ascii(0xFFFF), b"O\x7f\x7f");
        assert_eq!(&encode_crc_ascii(0x0000), b"@@@");
    }

    #[test]
    fn test_verify_accepts_own_output() {
        let frame = "0xU,M=P";
        let sum = checksum(frame);
        assert_eq!(sum.as_str(), "Er~");
        assert!(verify(frame, &sum));
    }

    #[test]
    fn test_verify_rejects_single_character_mutations() {
        let frame = "0+3.14";
        let good = checksum(frame);
        for pos in 0..CHECKSUM_LEN {
            let mut bytes = [0u8; CHECKSUM_LEN];
            bytes.copy_from_slice(good.as_bytes());
            bytes[pos] = if bytes[pos] == b'A' { b'B' } else { b'A' };
            let mutated = core::str::from_utf8(&bytes).unwrap();
            assert!(!verify(frame, mutated), "mutation at {} accepted", pos);
        }
        // Mutated data with the original checksum
        assert!(!verify("0+3.15", &good));
    }

    #[test]
    fn test_split_verified() {
        assert_eq!(split_verified("0+3.14OqZ"), Ok("0+3.14"));

        match split_verified("0+3.14OqX") {
            Err(CodecError::InvalidChecksum { expected, actual }) => {
                assert_eq!(expected.as_str(), "OqZ");
                assert_eq!(actual.as_str(), "OqX");
            }
            other => panic!("Expected InvalidChecksum, got {:?}", other),
        }

        assert_eq!(split_verified("Oq"), Err(CodecError::TooShort));
        assert_eq!(split_verified("OqZ"), Err(CodecError::TooShort));
        assert_eq!(split_verified(""), Err(CodecError::TooShort));
    }
}
