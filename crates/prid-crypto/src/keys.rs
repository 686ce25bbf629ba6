//! X25519 key material accepted by the derivation pipeline
//!
//! Keys arrive either as raw bytes or as hex strings with an optional `0x`
//! prefix. Both forms are normalized into fixed 32-byte keys before any
//! cryptographic operation runs. Secret keys zeroize on drop.

use std::fmt;

use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroizing;

use crate::error::PridError;

/// Size of X25519 secret and public keys (32 bytes)
pub const KEY_SIZE: usize = 32;

/// Caller-supplied key material in either accepted form.
#[derive(Clone, Copy)]
pub enum KeyInput<'a> {
    /// Raw key bytes
    Bytes(&'a [u8]),
    /// Hexadecimal string, optionally prefixed with `0x`
    Hex(&'a str),
}

impl<'a> From<&'a [u8]> for KeyInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a [u8; KEY_SIZE]> for KeyInput<'a> {
    fn from(bytes: &'a [u8; KEY_SIZE]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for KeyInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for KeyInput<'a> {
    fn from(hex: &'a str) -> Self {
        Self::Hex(hex)
    }
}

impl<'a> From<&'a String> for KeyInput<'a> {
    fn from(hex: &'a String) -> Self {
        Self::Hex(hex)
    }
}

// Key bytes are never included in the debug output, even for public keys,
// because the same input type carries secrets.
impl fmt::Debug for KeyInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "KeyInput::Bytes({} bytes)", bytes.len()),
            Self::Hex(hex) => write!(f, "KeyInput::Hex({} chars)", hex.len()),
        }
    }
}

impl KeyInput<'_> {
    /// Normalize into exactly [`KEY_SIZE`] bytes.
    fn to_key_bytes(self) -> Result<Zeroizing<[u8; KEY_SIZE]>, PridError> {
        match self {
            Self::Bytes(bytes) => fixed_key(bytes),
            Self::Hex(hex) => {
                let decoded = decode_hex(hex)?;
                fixed_key(&decoded)
            },
        }
    }
}

/// Decode a hex string, accepting an optional `0x`/`0X` prefix.
///
/// Returns [`PridError::MalformedHexInput`] for non-hex characters or an odd
/// number of digits. The decoded bytes zeroize when dropped.
pub fn decode_hex(input: &str) -> Result<Zeroizing<Vec<u8>>, PridError> {
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    hex::decode(digits).map(Zeroizing::new).map_err(|_| PridError::MalformedHexInput)
}

pub(crate) fn fixed_key(bytes: &[u8]) -> Result<Zeroizing<[u8; KEY_SIZE]>, PridError> {
    let key = <[u8; KEY_SIZE]>::try_from(bytes)
        .map_err(|_| PridError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() })?;
    Ok(Zeroizing::new(key))
}

/// An X25519 secret key.
///
/// The scalar is wiped when the key is dropped.
#[derive(Clone)]
pub struct SecretKey(StaticSecret);

impl SecretKey {
    /// Build a secret key from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PridError> {
        KeyInput::Bytes(bytes).try_into()
    }

    /// Build a secret key from a hex string with optional `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, PridError> {
        KeyInput::Hex(hex).try_into()
    }

    /// The public key paired with this secret key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(X25519Public::from(&self.0))
    }

    pub(crate) fn as_static_secret(&self) -> &StaticSecret {
        &self.0
    }
}

impl TryFrom<KeyInput<'_>> for SecretKey {
    type Error = PridError;

    fn try_from(input: KeyInput<'_>) -> Result<Self, Self::Error> {
        let bytes = input.to_key_bytes()?;
        Ok(Self(StaticSecret::from(*bytes)))
    }
}

impl TryFrom<&SecretKey> for SecretKey {
    type Error = PridError;

    fn try_from(key: &SecretKey) -> Result<Self, Self::Error> {
        Ok(key.clone())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// An X25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(X25519Public);

impl PublicKey {
    /// Build a public key from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PridError> {
        KeyInput::Bytes(bytes).try_into()
    }

    /// Build a public key from a hex string with optional `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, PridError> {
        KeyInput::Hex(hex).try_into()
    }

    /// Raw 32-byte Montgomery u-coordinate.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        self.0.as_bytes()
    }

    pub(crate) fn as_x25519(&self) -> &X25519Public {
        &self.0
    }
}

impl TryFrom<KeyInput<'_>> for PublicKey {
    type Error = PridError;

    fn try_from(input: KeyInput<'_>) -> Result<Self, Self::Error> {
        let bytes = input.to_key_bytes()?;
        Ok(Self(X25519Public::from(*bytes)))
    }
}

impl TryFrom<&PublicKey> for PublicKey {
    type Error = PridError;

    fn try_from(key: &PublicKey) -> Result<Self, Self::Error> {
        Ok(*key)
    }
}

/// Forward every [`KeyInput`] source type to the key's `TryFrom<KeyInput>`.
macro_rules! impl_try_from_key_input {
    ($key:ty: $($source:ty),+ $(,)?) => {
        $(
            impl TryFrom<$source> for $key {
                type Error = PridError;

                fn try_from(source: $source) -> Result<Self, Self::Error> {
                    KeyInput::from(source).try_into()
                }
            }
        )+
    };
}

impl_try_from_key_input!(SecretKey: &[u8], &[u8; KEY_SIZE], &Vec<u8>, &str, &String);
impl_try_from_key_input!(PublicKey: &[u8], &[u8; KEY_SIZE], &Vec<u8>, &str, &String);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(0x{})", hex::encode(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_SECRET: &str = "c9432ed5c0c5c24e8a4ff190619893918b4d1265a67d123895023fa7324b43e0";
    const ALICE_PUBLIC: &str = "0fea2cafabdc83752be36fa5349640da2c828add0a290df13cd2d8173eb2496f";

    #[test]
    fn hex_with_and_without_prefix_match() {
        let bare = PublicKey::from_hex(ALICE_PUBLIC).unwrap();
        let prefixed = PublicKey::from_hex(&format!("0x{ALICE_PUBLIC}")).unwrap();
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn hex_and_bytes_match() {
        let bytes = hex::decode(ALICE_PUBLIC).unwrap();
        let from_bytes = PublicKey::from_bytes(&bytes).unwrap();
        let from_hex = PublicKey::from_hex(ALICE_PUBLIC).unwrap();
        assert_eq!(from_bytes, from_hex);
    }

    #[test]
    fn public_key_matches_secret_key() {
        let secret = SecretKey::from_hex(ALICE_SECRET).unwrap();
        let public = PublicKey::from_hex(ALICE_PUBLIC).unwrap();
        assert_eq!(secret.public_key(), public);
    }

    #[test]
    fn short_key_is_rejected() {
        let result = SecretKey::from_bytes(&[0u8; 31]);
        assert_eq!(result.unwrap_err(), PridError::InvalidKeyLength { expected: 32, actual: 31 });
    }

    #[test]
    fn long_hex_key_is_rejected() {
        let hex = format!("{ALICE_PUBLIC}00");
        let result = PublicKey::from_hex(&hex);
        assert_eq!(result.unwrap_err(), PridError::InvalidKeyLength { expected: 32, actual: 33 });
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let mut hex = ALICE_SECRET.to_string();
        hex.replace_range(0..1, "g");
        assert_eq!(SecretKey::from_hex(&hex).unwrap_err(), PridError::MalformedHexInput);

        // Odd number of digits
        assert_eq!(SecretKey::from_hex("0xabc").unwrap_err(), PridError::MalformedHexInput);
    }

    #[test]
    fn prefix_is_only_stripped_at_start() {
        let hex = format!("{}0x{}", &ALICE_PUBLIC[..2], &ALICE_PUBLIC[4..]);
        assert_eq!(PublicKey::from_hex(&hex).unwrap_err(), PridError::MalformedHexInput);
    }

    #[test]
    fn all_input_forms_convert() {
        let bytes = hex::decode(ALICE_PUBLIC).unwrap();
        let array = <[u8; KEY_SIZE]>::try_from(bytes.as_slice()).unwrap();
        let owned = ALICE_PUBLIC.to_string();
        let expected = PublicKey::from_hex(ALICE_PUBLIC).unwrap();

        assert_eq!(PublicKey::try_from(bytes.as_slice()).unwrap(), expected);
        assert_eq!(PublicKey::try_from(&bytes).unwrap(), expected);
        assert_eq!(PublicKey::try_from(&array).unwrap(), expected);
        assert_eq!(PublicKey::try_from(&owned).unwrap(), expected);
        assert_eq!(PublicKey::try_from(&expected).unwrap(), expected);
    }

    #[test]
    fn secret_key_debug_is_redacted() {
        let secret = SecretKey::from_hex(ALICE_SECRET).unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains(&ALICE_SECRET[..8]));

        let input = KeyInput::from(ALICE_SECRET);
        assert_eq!(format!("{input:?}"), "KeyInput::Hex(64 chars)");
    }
}
