//! Root secret agreement using X25519 and HSalsa20
//!
//! The raw X25519 output is not uniformly distributed, so it is hashed with
//! HSalsa20 under a zero input block. This yields the same 32-byte key as the
//! precomputation step of the `crypto_box` construction, so derived
//! identifiers match those of libsodium-based implementations.

use salsa20::{
    Key, hsalsa,
    cipher::{consts::U10, generic_array::GenericArray},
};
use zeroize::Zeroize;

use crate::{
    error::PridError,
    keys::{PublicKey, SecretKey},
};

/// Size of the root shared secret (32 bytes)
pub const ROOT_SECRET_SIZE: usize = 32;

/// HSalsa20 input used to hash the X25519 output
const HSALSA_INPUT: [u8; 16] = [0u8; 16];

/// Symmetric root secret shared by two key pairs.
///
/// Only lives for the duration of one derivation. Zeroized on drop.
pub(crate) struct RootSecret {
    key: [u8; ROOT_SECRET_SIZE],
}

impl RootSecret {
    pub(crate) fn key(&self) -> &[u8; ROOT_SECRET_SIZE] {
        &self.key
    }
}

impl Drop for RootSecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Agree on a root secret with a peer.
///
/// Symmetric: `agree(a.secret, b.public)` equals `agree(b.secret, a.public)`.
///
/// # Errors
///
/// - `NonContributoryKey`: the peer public key is a low-order point
pub(crate) fn agree(own_secret: &SecretKey, peer_public: &PublicKey) -> Result<RootSecret, PridError> {
    let shared = own_secret.as_static_secret().diffie_hellman(peer_public.as_x25519());
    if !shared.was_contributory() {
        return Err(PridError::NonContributoryKey);
    }

    let mut hashed =
        hsalsa::<U10>(Key::from_slice(shared.as_bytes()), GenericArray::from_slice(&HSALSA_INPUT));

    let mut key = [0u8; ROOT_SECRET_SIZE];
    key.copy_from_slice(&hashed);
    hashed.as_mut_slice().zeroize();

    Ok(RootSecret { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_SECRET: &str = "c9432ed5c0c5c24e8a4ff190619893918b4d1265a67d123895023fa7324b43e0";
    const ALICE_PUBLIC: &str = "0fea2cafabdc83752be36fa5349640da2c828add0a290df13cd2d8173eb2496f";
    const BOB_SECRET: &str = "dc106e1371293ee9536956e1253f43f8941d4a5c4e40f15968d24b75512b6920";
    const BOB_PUBLIC: &str = "d0d4eb21db1df63369c147e63b2573816dd4b3fe513e95bf87f7ed1835407e62";

    fn keys(secret: &str, public: &str) -> (SecretKey, PublicKey) {
        (SecretKey::from_hex(secret).unwrap(), PublicKey::from_hex(public).unwrap())
    }

    #[test]
    fn agreement_is_symmetric() {
        let (alice_secret, bob_public) = keys(ALICE_SECRET, BOB_PUBLIC);
        let (bob_secret, alice_public) = keys(BOB_SECRET, ALICE_PUBLIC);

        let alice_root = agree(&alice_secret, &bob_public).unwrap();
        let bob_root = agree(&bob_secret, &alice_public).unwrap();

        assert_eq!(alice_root.key(), bob_root.key());
    }

    #[test]
    fn root_secret_is_not_raw_x25519_output() {
        let (alice_secret, bob_public) = keys(ALICE_SECRET, BOB_PUBLIC);

        let raw = alice_secret.as_static_secret().diffie_hellman(bob_public.as_x25519());
        let root = agree(&alice_secret, &bob_public).unwrap();

        assert_ne!(root.key(), raw.as_bytes());
    }

    #[test]
    fn different_peers_produce_different_roots() {
        let (alice_secret, bob_public) = keys(ALICE_SECRET, BOB_PUBLIC);
        let alice_public = PublicKey::from_hex(ALICE_PUBLIC).unwrap();

        let with_bob = agree(&alice_secret, &bob_public).unwrap();
        let with_self = agree(&alice_secret, &alice_public).unwrap();

        assert_ne!(with_bob.key(), with_self.key());
    }

    #[test]
    fn low_order_public_key_is_rejected() {
        let alice_secret = SecretKey::from_hex(ALICE_SECRET).unwrap();

        // The identity point (u = 0) and u = 1 both have small order
        for u in [[0u8; 32], {
            let mut one = [0u8; 32];
            one[0] = 1;
            one
        }] {
            let public = PublicKey::from_bytes(&u).unwrap();
            assert!(matches!(agree(&alice_secret, &public), Err(PridError::NonContributoryKey)));
        }
    }
}
