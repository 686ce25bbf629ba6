//! Pairwise Reproducible Identifiers
//!
//! Two parties, each holding its own X25519 secret key and the other's public
//! key, independently derive the same short identifier for a directed
//! relationship `from_id -> to_id`. No secret key leaves its owner and none
//! can be recovered from the identifier.
//!
//! # Pipeline
//!
//! ```text
//! Own Secret Key + Peer Public Key
//!        │
//!        ▼ X25519 + HSalsa20
//! Root Secret
//!        │
//!        ▼ BLAKE2b KDF (sub-key = to_id, persona = context)
//! Context Secret
//!        │
//!        ▼ XSalsa20-Poly1305 (nonce = from_id, message = to_id), tag dropped
//! PRId (8 bytes, "0x" + 16 hex digits)
//! ```
//!
//! Every stage is a pure function. Intermediate secrets are owned by the
//! call that produced them and are zeroized when dropped.
//!
//! # Properties
//!
//! Symmetry:
//! - Both key holders derive the same root secret, context secret and PRId
//!   for the same `(from_id, to_id, context)`
//!
//! Direction:
//! - Swapping `from_id` and `to_id` changes both the KDF sub-key and the
//!   nonce, so the two directions have unrelated identifiers
//!
//! Separation:
//! - Different contexts over the same keys and ids give unrelated identifiers
//!
//! Authenticity:
//! - None. The cipher output is kept without its tag. A PRId is a handle, not
//!   a proof of origin
//!
//! # Example
//!
//! ```
//! use prid_crypto::{CTX_CONNECTION, prid_derive};
//!
//! let alice_secret = "0xc9432ed5c0c5c24e8a4ff190619893918b4d1265a67d123895023fa7324b43e0";
//! let bob_public = "0xd0d4eb21db1df63369c147e63b2573816dd4b3fe513e95bf87f7ed1835407e62";
//!
//! let prid = prid_derive(alice_secret, bob_public, 42, 478, &CTX_CONNECTION)?;
//! assert_eq!(prid.to_string(), "0xace4d2995b1a829c");
//! # Ok::<(), prid_crypto::PridError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod agreement;
pub mod derivation;
pub mod encoding;
pub mod error;
pub mod id;
pub mod keys;
pub mod ready;

pub use derivation::{CONTEXT_SECRET_SIZE, CONTEXT_SIZE, CTX_CONNECTION, Context, ContextSecret};
pub use encoding::{PRID_PREFIX, PRID_SIZE, Prid};
pub use error::PridError;
pub use id::{MAX_SUBKEY_ID, parse_id};
pub use keys::{KEY_SIZE, KeyInput, PublicKey, SecretKey};
pub use ready::ready;

/// Derive the PRId for direction `from_id -> to_id`.
///
/// Keys may be given as raw bytes, hex strings (optional `0x` prefix) or
/// already-parsed [`SecretKey`]/[`PublicKey`] references. The holder of the
/// peer's secret key and this party's public key derives the same value.
///
/// # Errors
///
/// - `InvalidKeyLength`: a key is not 32 bytes
/// - `MalformedHexInput`: a key string is not hex
/// - `IdOutOfRange`: `to_id` exceeds [`MAX_SUBKEY_ID`]
/// - `NonContributoryKey`: the public key is a low-order point
/// - `SelfTestFailed`: the primitives failed their startup check
pub fn prid_derive<S, P>(
    from_secret_key: S,
    to_public_key: P,
    from_id: u64,
    to_id: u64,
    context: &Context,
) -> Result<Prid, PridError>
where
    S: TryInto<SecretKey, Error = PridError>,
    P: TryInto<PublicKey, Error = PridError>,
{
    let context_secret = context_shared_secret(from_secret_key, to_public_key, to_id, context)?;
    prid_from_shared(&context_secret, from_id, to_id)
}

/// Derive the context shared secret toward `to_id`.
///
/// Runs key agreement and key derivation only. Keep the result to derive
/// several identifiers toward the same `to_id` with [`prid_from_shared`].
///
/// # Errors
///
/// Same as [`prid_derive`].
pub fn context_shared_secret<S, P>(
    from_secret_key: S,
    to_public_key: P,
    to_id: u64,
    context: &Context,
) -> Result<ContextSecret, PridError>
where
    S: TryInto<SecretKey, Error = PridError>,
    P: TryInto<PublicKey, Error = PridError>,
{
    ready()?;

    let secret: SecretKey = from_secret_key.try_into()?;
    let public: PublicKey = to_public_key.try_into()?;
    let root = agreement::agree(&secret, &public)?;

    derivation::derive_context_secret(&root, to_id, context)
}

/// Derive a PRId from a cached context secret.
///
/// The context secret must have been derived toward `to_id`; a secret
/// derived for another id yields a valid-looking but unrelated identifier.
///
/// # Errors
///
/// - `SelfTestFailed`: the primitives failed their startup check
pub fn prid_from_shared(
    context_secret: &ContextSecret,
    from_id: u64,
    to_id: u64,
) -> Result<Prid, PridError> {
    ready()?;
    Ok(encoding::encode(context_secret, from_id, to_id))
}

/// Derive PRIds from `from_id` toward several peer ids with one key
/// agreement.
///
/// Returns `(to_id, prid)` pairs in input order. Fails as a whole on the
/// first id out of range.
///
/// # Errors
///
/// Same as [`prid_derive`].
pub fn prid_derive_many<S, P>(
    from_secret_key: S,
    to_public_key: P,
    from_id: u64,
    to_ids: &[u64],
    context: &Context,
) -> Result<Vec<(u64, Prid)>, PridError>
where
    S: TryInto<SecretKey, Error = PridError>,
    P: TryInto<PublicKey, Error = PridError>,
{
    ready()?;

    let secret: SecretKey = from_secret_key.try_into()?;
    let public: PublicKey = to_public_key.try_into()?;
    let root = agreement::agree(&secret, &public)?;

    to_ids
        .iter()
        .map(|&to_id| {
            let context_secret = derivation::derive_context_secret(&root, to_id, context)?;
            Ok((to_id, encoding::encode(&context_secret, from_id, to_id)))
        })
        .collect()
}
