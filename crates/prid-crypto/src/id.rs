//! Party ids and their fixed-width byte encoding

use crate::error::PridError;

/// Largest id accepted as a KDF sub-key index (2^53 - 1).
///
/// Identifiers derived by other implementations carry ids through a
/// double-precision integer on the way into the KDF. Ids above this bound
/// are rejected rather than silently narrowed.
pub const MAX_SUBKEY_ID: u64 = (1 << 53) - 1;

/// Parse a decimal id.
///
/// Values that do not fit in 64 bits fail with [`PridError::IdOutOfRange`].
/// Anything that is not a plain decimal integer is also reported as out of
/// range, since no valid id has that spelling.
pub fn parse_id(input: &str) -> Result<u64, PridError> {
    input.trim().parse::<u64>().map_err(|_| PridError::IdOutOfRange { max: u64::MAX })
}

/// Check an id against the KDF sub-key bound.
pub fn check_subkey_id(id: u64) -> Result<u64, PridError> {
    if id > MAX_SUBKEY_ID {
        return Err(PridError::IdOutOfRange { max: MAX_SUBKEY_ID });
    }
    Ok(id)
}

/// Little-endian encoding of `value` into `N` bytes.
///
/// Bytes past the eighth are zero. `N` below eight truncates the high
/// bytes; the pipeline only uses widths of eight and twenty-four.
pub(crate) fn le_bytes<const N: usize>(value: u64) -> [u8; N] {
    let mut out = [0u8; N];
    let le = value.to_le_bytes();
    let len = N.min(le.len());
    out[..len].copy_from_slice(&le[..len]);
    out
}
