//! Fuzz target for the full PRId derivation pipeline
//!
//! # Strategy
//!
//! - Arbitrary secret scalars for both parties
//! - Boundary ids (0, 2^53 - 1, 2^53, u64::MAX) mixed with arbitrary ids
//! - Arbitrary eight-byte contexts
//! - Staged derivation against one-shot derivation
//!
//! # Invariants
//!
//! - Both parties derive the same context secret and PRId
//! - Derivation is deterministic
//! - Swapping distinct ids changes the PRId
//! - to_id above 2^53 - 1 is rejected, never truncated
//! - Textual form parses back to the same PRId
//! - Pipeline never panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prid_crypto::{
    Context, MAX_SUBKEY_ID, Prid, PridError, SecretKey, context_shared_secret, prid_derive,
    prid_from_shared,
};

#[derive(Debug, Clone, Arbitrary)]
struct PipelineScenario {
    alice_secret: [u8; 32],
    bob_secret: [u8; 32],
    from_id: IdInput,
    to_id: IdInput,
    context: [u8; 8],
}

#[derive(Debug, Clone, Arbitrary)]
enum IdInput {
    Zero,
    SubkeyMax,
    AboveSubkeyMax,
    Max,
    Arbitrary(u64),
}

impl IdInput {
    fn value(&self) -> u64 {
        match self {
            IdInput::Zero => 0,
            IdInput::SubkeyMax => MAX_SUBKEY_ID,
            IdInput::AboveSubkeyMax => MAX_SUBKEY_ID + 1,
            IdInput::Max => u64::MAX,
            IdInput::Arbitrary(id) => *id,
        }
    }
}

fuzz_target!(|scenario: PipelineScenario| {
    let Ok(alice_secret) = SecretKey::from_bytes(&scenario.alice_secret) else {
        panic!("32 bytes is always a valid secret key");
    };
    let Ok(bob_secret) = SecretKey::from_bytes(&scenario.bob_secret) else {
        panic!("32 bytes is always a valid secret key");
    };
    let alice_public = alice_secret.public_key();
    let bob_public = bob_secret.public_key();

    let context = Context::from_label(&scenario.context);
    let from_id = scenario.from_id.value();
    let to_id = scenario.to_id.value();

    let alice_version = prid_derive(&alice_secret, &bob_public, from_id, to_id, &context);
    let bob_version = prid_derive(&bob_secret, &alice_public, from_id, to_id, &context);

    // INVARIANT 1: Range enforcement on the KDF sub-key index
    if to_id > MAX_SUBKEY_ID {
        assert_eq!(alice_version, Err(PridError::IdOutOfRange { max: MAX_SUBKEY_ID }));
        assert_eq!(bob_version, Err(PridError::IdOutOfRange { max: MAX_SUBKEY_ID }));
        return;
    }

    let alice_version = alice_version.expect("in-range derivation must succeed");
    let bob_version = bob_version.expect("in-range derivation must succeed");

    // INVARIANT 2: Symmetry
    assert_eq!(alice_version, bob_version, "both parties must derive the same PRId");

    // INVARIANT 3: Determinism
    let again = prid_derive(&alice_secret, &bob_public, from_id, to_id, &context);
    assert_eq!(again, Ok(alice_version), "derivation must be deterministic");

    // INVARIANT 4: Staged derivation matches one-shot derivation
    let alice_shared = context_shared_secret(&alice_secret, &bob_public, to_id, &context)
        .expect("in-range derivation must succeed");
    let bob_shared = context_shared_secret(&bob_secret, &alice_public, to_id, &context)
        .expect("in-range derivation must succeed");
    assert_eq!(alice_shared, bob_shared, "both parties must derive the same context secret");
    assert_eq!(prid_from_shared(&alice_shared, from_id, to_id), Ok(alice_version));

    // INVARIANT 5: Direction sensitivity
    if from_id != to_id && from_id <= MAX_SUBKEY_ID {
        let swapped = prid_derive(&alice_secret, &bob_public, to_id, from_id, &context)
            .expect("in-range derivation must succeed");
        assert_ne!(alice_version, swapped, "swapping ids must change the PRId");
    }

    // INVARIANT 6: Textual form round-trips
    let parsed: Prid = alice_version.to_string().parse().expect("display form must parse");
    assert_eq!(parsed, alice_version);
});
