//! Error types for PRId derivation

use thiserror::Error;

/// Errors from PRId derivation.
///
/// Every variant is an input error detected before any secret is derived
/// from it. None of the messages carry key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PridError {
    /// Key material is not the exact expected length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Id exceeds the bound of the stage it is used in
    #[error("id out of range: maximum supported id is {max}")]
    IdOutOfRange {
        /// Largest accepted id
        max: u64,
    },

    /// Key string is not valid hexadecimal after stripping the `0x` prefix
    #[error("malformed hex input")]
    MalformedHexInput,

    /// Context label is not exactly eight bytes
    #[error("invalid context length: expected {expected}, got {actual}")]
    InvalidContextLength {
        /// Expected context length in bytes
        expected: usize,
        /// Actual context length in bytes
        actual: usize,
    },

    /// Peer public key is a low-order point; the agreement output is all zero
    #[error("key agreement produced a non-contributory shared secret")]
    NonContributoryKey,

    /// Startup known-answer test did not reproduce the reference identifier
    #[error("cryptographic self-test failed")]
    SelfTestFailed,
}
