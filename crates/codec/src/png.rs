//! The client's PNG obfuscation.
//!
//! Stored images are standard PNGs with bytes 1..=3 of the signature
//! rewritten from ASCII `PNG` to ASCII `png`. Nothing else changes, so the
//! codec is a three-byte check-and-swap in each direction.

use crate::CodecError;

/// The real signature bytes at offset 1 of a PNG file.
pub const PNG_MAGIC: [u8; 3] = [0x50, 0x4e, 0x47];
/// The lowercased bytes the client stores instead.
pub const OBFUSCATED_MAGIC: [u8; 3] = [0x70, 0x6e, 0x67];

/// Restores a stored image to a standard PNG.
///
/// Fails with [`CodecError::BadPngMagic`] when bytes 1..=3 are not `png` —
/// including when handed an already-restored file, which keeps a double
/// decode from silently passing through.
pub fn decode(raw: &[u8]) -> Result<Vec<u8>, CodecError> {
    swap_magic(raw, OBFUSCATED_MAGIC, PNG_MAGIC)
}

/// Re-obfuscates a standard PNG into the stored form.
pub fn encode(raw: &[u8]) -> Result<Vec<u8>, CodecError> {
    swap_magic(raw, PNG_MAGIC, OBFUSCATED_MAGIC)
}

fn swap_magic(raw: &[u8], expected: [u8; 3], replacement: [u8; 3]) -> Result<Vec<u8>, CodecError> {
    if raw.len() < 4 {
        return Err(CodecError::Truncated {
            need: 4,
            have: raw.len(),
        });
    }
    if raw[1..4] != expected {
        return Err(CodecError::BadPngMagic {
            expected: hex(&expected),
            found: hex(&raw[1..4]),
        });
    }
    let mut out = raw.to_vec();
    out[1..4].copy_from_slice(&replacement);
    Ok(out)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_restores_signature() {
        let stored = [0x89, 0x70, 0x6e, 0x67, 0x0d, 0x0a, 0x1a, 0x0a];
        let decoded = decode(&stored).unwrap();
        assert_eq!(decoded, [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn round_trip() {
        let stored = [0xff, 0x70, 0x6e, 0x67, 0x01, 0x02];
        let decoded = decode(&stored).unwrap();
        assert_eq!(encode(&decoded).unwrap(), stored);
    }

    #[test]
    fn genuine_png_fails_decode() {
        let genuine = [0x89, 0x50, 0x4e, 0x47, 0x0d];
        let err = decode(&genuine).unwrap_err();
        match err {
            CodecError::BadPngMagic { found, .. } => assert_eq!(found, "504e47"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_input_fails() {
        assert!(decode(&[0x89, 0x70]).is_err());
        assert!(encode(&[]).is_err());
    }
}
