//! Process-wide readiness gate
//!
//! The first public operation runs a known-answer test of the whole
//! pipeline and caches the verdict. Later calls read the cached verdict
//! without further synchronization. A failed self-test makes every
//! operation fail with [`PridError::SelfTestFailed`] for the rest of the
//! process lifetime.

use std::sync::OnceLock;

use crate::{
    agreement::agree,
    derivation::{CTX_CONNECTION, derive_context_secret},
    encoding::encode,
    error::PridError,
    keys::{PublicKey, SecretKey},
};

const SELF_TEST_SECRET: &str = "c9432ed5c0c5c24e8a4ff190619893918b4d1265a67d123895023fa7324b43e0";
const SELF_TEST_PEER_PUBLIC: &str =
    "d0d4eb21db1df63369c147e63b2573816dd4b3fe513e95bf87f7ed1835407e62";
const SELF_TEST_FROM_ID: u64 = 42;
const SELF_TEST_TO_ID: u64 = 478;
const SELF_TEST_PRID: [u8; 8] = [0xAC, 0xE4, 0xD2, 0x99, 0x5B, 0x1A, 0x82, 0x9C];

static SELF_TEST: OnceLock<bool> = OnceLock::new();

/// Block until the primitives are verified, then report the verdict.
pub fn ready() -> Result<(), PridError> {
    let passed = *SELF_TEST.get_or_init(|| {
        let passed = run_self_test();
        if passed {
            tracing::debug!("PRId self-test passed");
        } else {
            tracing::error!("PRId self-test failed, all derivations will be refused");
        }
        passed
    });

    if passed { Ok(()) } else { Err(PridError::SelfTestFailed) }
}

fn run_self_test() -> bool {
    let Ok(secret) = SecretKey::from_hex(SELF_TEST_SECRET) else {
        return false;
    };
    let Ok(peer) = PublicKey::from_hex(SELF_TEST_PEER_PUBLIC) else {
        return false;
    };
    let Ok(root) = agree(&secret, &peer) else {
        return false;
    };
    let Ok(context_secret) = derive_context_secret(&root, SELF_TEST_TO_ID, &CTX_CONNECTION) else {
        return false;
    };

    *encode(&context_secret, SELF_TEST_FROM_ID, SELF_TEST_TO_ID).as_bytes() == SELF_TEST_PRID
}
