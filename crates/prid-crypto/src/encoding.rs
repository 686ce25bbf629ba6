//! PRId encoding using `XSalsa20-Poly1305`
//!
//! The receiving party's id is encrypted under the context secret with the
//! sending party's id as nonce. Only the eight ciphertext bytes are kept;
//! the Poly1305 tag is dropped. The cipher serves as a keyed permutation of
//! the id here, so a PRId proves nothing about who produced it.

use std::{fmt, str::FromStr};

use crypto_secretbox::{
    XSalsa20Poly1305,
    aead::{AeadInPlace, KeyInit, generic_array::GenericArray},
};

use crate::{derivation::ContextSecret, error::PridError, id::le_bytes, keys::decode_hex};

/// Size of a PRId (8 bytes)
pub const PRID_SIZE: usize = 8;

/// Literal prefix of the textual PRId form
pub const PRID_PREFIX: &str = "0x";

/// `XSalsa20` nonce width (24 bytes)
const NONCE_SIZE: usize = 24;

/// Pairwise reproducible identifier.
///
/// Displays as `0x` followed by 16 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prid([u8; PRID_SIZE]);

impl Prid {
    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; PRID_SIZE] {
        &self.0
    }
}

impl From<[u8; PRID_SIZE]> for Prid {
    fn from(bytes: [u8; PRID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Prid> for [u8; PRID_SIZE] {
    fn from(prid: Prid) -> Self {
        prid.0
    }
}

impl fmt::Display for Prid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PRID_PREFIX}{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Prid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prid({self})")
    }
}

impl FromStr for Prid {
    type Err = PridError;

    /// Parse the textual form. The `0x` prefix is optional; anything other
    /// than 16 hex digits is malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        <[u8; PRID_SIZE]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| PridError::MalformedHexInput)
    }
}

/// Encode the identifier for direction `from_id -> to_id`.
///
/// Layout:
/// - key: context secret (32 bytes)
/// - nonce: `from_id` little-endian, zero-padded to 24 bytes
/// - plaintext: `to_id` little-endian (8 bytes)
///
/// Total over all `u64` ids; the identifier is the 8-byte ciphertext.
pub(crate) fn encode(secret: &ContextSecret, from_id: u64, to_id: u64) -> Prid {
    let Ok(cipher) = XSalsa20Poly1305::new_from_slice(secret.as_bytes()) else {
        unreachable!("context secret is always 32 bytes");
    };

    let nonce = le_bytes::<NONCE_SIZE>(from_id);
    let mut buffer = le_bytes::<PRID_SIZE>(to_id);

    // Detached mode leaves the ciphertext in place; the tag is not part of the id
    let Ok(_tag) =
        cipher.encrypt_in_place_detached(GenericArray::from_slice(&nonce), &[], &mut buffer)
    else {
        unreachable!("XSalsa20-Poly1305 encryption cannot fail for an 8-byte message");
    };

    Prid(buffer)
}
