//! Context key derivation using keyed BLAKE2b
//!
//! The root secret is the BLAKE2b key, the sub-key id fills the salt and the
//! context label fills the personalization block. The message is empty. This
//! is the layout of libsodium's `crypto_kdf` and produces identical output.

use std::{fmt, str::FromStr};

use blake2::{
    Blake2bMac,
    digest::{Mac, consts::U32},
};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{
    agreement::RootSecret,
    error::PridError,
    id::{check_subkey_id, le_bytes},
    keys::decode_hex,
};

type Blake2bMac256 = Blake2bMac<U32>;

/// Size of a context label (8 bytes)
pub const CONTEXT_SIZE: usize = 8;

/// Size of a context shared secret (32 bytes)
pub const CONTEXT_SECRET_SIZE: usize = 32;

/// BLAKE2b salt width; the sub-key id occupies the low eight bytes
const SALT_SIZE: usize = 16;

/// Default context for connection identifiers
pub const CTX_CONNECTION: Context = Context::from_label(b"PRIdCtx0");

/// Domain-separation label for key derivation.
///
/// Always exactly eight bytes. Identical keys and ids under different
/// contexts produce unrelated identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context([u8; CONTEXT_SIZE]);

impl Context {
    /// Context from a fixed eight-byte label.
    pub const fn from_label(label: &[u8; CONTEXT_SIZE]) -> Self {
        Self(*label)
    }

    /// Context from an arbitrary byte slice, which must be eight bytes long.
    pub fn new(label: &[u8]) -> Result<Self, PridError> {
        <[u8; CONTEXT_SIZE]>::try_from(label)
            .map(Self)
            .map_err(|_| PridError::InvalidContextLength { expected: CONTEXT_SIZE, actual: label.len() })
    }

    /// Raw label bytes.
    pub fn as_bytes(&self) -> &[u8; CONTEXT_SIZE] {
        &self.0
    }
}

impl FromStr for Context {
    type Err = PridError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::new(label.as_bytes())
    }
}

impl TryFrom<&str> for Context {
    type Error = PridError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Secret shared by two parties for one (root secret, sub-key id, context).
///
/// Callers that derive several identifiers toward the same peer id can keep
/// this value and skip the key agreement. Zeroized on drop; comparison is
/// constant time.
#[derive(Clone)]
pub struct ContextSecret {
    key: [u8; CONTEXT_SECRET_SIZE],
}

impl ContextSecret {
    /// Context secret from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PridError> {
        let key = <[u8; CONTEXT_SECRET_SIZE]>::try_from(bytes).map_err(|_| {
            PridError::InvalidKeyLength { expected: CONTEXT_SECRET_SIZE, actual: bytes.len() }
        })?;
        Ok(Self { key })
    }

    /// Context secret from a hex string with optional `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, PridError> {
        let decoded = decode_hex(hex)?;
        Self::from_bytes(&decoded)
    }

    /// 32-byte symmetric key.
    pub fn as_bytes(&self) -> &[u8; CONTEXT_SECRET_SIZE] {
        &self.key
    }

    /// Lowercase hex with a `0x` prefix.
    ///
    /// The returned string holds secret material; callers own its lifetime.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key))
    }
}

impl PartialEq for ContextSecret {
    fn eq(&self, other: &Self) -> bool {
        self.key[..].ct_eq(&other.key[..]).into()
    }
}

impl Eq for ContextSecret {}

impl fmt::Debug for ContextSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContextSecret(..)")
    }
}

impl Drop for ContextSecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the context shared secret for `sub_key_id` under `context`.
///
/// In identifier derivation `sub_key_id` is always the receiving party's id.
///
/// # Errors
///
/// - `IdOutOfRange`: `sub_key_id` exceeds [`crate::MAX_SUBKEY_ID`]
pub(crate) fn derive_context_secret(
    root: &RootSecret,
    sub_key_id: u64,
    context: &Context,
) -> Result<ContextSecret, PridError> {
    let sub_key_id = check_subkey_id(sub_key_id)?;
    let salt = le_bytes::<SALT_SIZE>(sub_key_id);

    let Ok(mac) = Blake2bMac256::new_with_salt_and_personal(root.key(), &salt, context.as_bytes())
    else {
        unreachable!("32-byte key, 16-byte salt and 8-byte persona are valid BLAKE2b parameters");
    };

    let mut output = mac.finalize().into_bytes();
    let mut key = [0u8; CONTEXT_SECRET_SIZE];
    key.copy_from_slice(&output);
    output.as_mut_slice().zeroize();

    Ok(ContextSecret { key })
}
