//! Fuzz target for caller-supplied key, context and id input
//!
//! # Strategy
//!
//! - Arbitrary strings as hex keys, with and without `0x` prefix
//! - Arbitrary byte slices as raw keys (any length)
//! - Arbitrary byte slices as context labels
//! - Arbitrary strings as decimal ids and PRIds
//!
//! # Invariants
//!
//! - Parsing never panics
//! - Wrong-length input is rejected with a length error, never padded
//! - Malformed input maps to an input error variant

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prid_crypto::{
    CTX_CONNECTION, Context, ContextSecret, KEY_SIZE, Prid, PridError, PublicKey, SecretKey,
    parse_id, prid_derive,
};

#[derive(Debug, Clone, Arbitrary)]
struct InputScenario {
    secret_hex: String,
    public_bytes: Vec<u8>,
    prefix: bool,
    context: Vec<u8>,
    id_text: String,
    prid_text: String,
}

fuzz_target!(|scenario: InputScenario| {
    let secret_hex = if scenario.prefix {
        format!("0x{}", scenario.secret_hex)
    } else {
        scenario.secret_hex.clone()
    };

    // INVARIANT 1: Hex keys either parse or fail with an input error
    if let Err(err) = SecretKey::from_hex(&secret_hex) {
        assert!(matches!(
            err,
            PridError::MalformedHexInput | PridError::InvalidKeyLength { expected: KEY_SIZE, .. }
        ));
    }

    // INVARIANT 2: Raw keys are exactly KEY_SIZE bytes or a length error
    match PublicKey::from_bytes(&scenario.public_bytes) {
        Ok(_) => assert_eq!(scenario.public_bytes.len(), KEY_SIZE),
        Err(err) => assert_eq!(
            err,
            PridError::InvalidKeyLength { expected: KEY_SIZE, actual: scenario.public_bytes.len() }
        ),
    }

    // INVARIANT 3: Context secrets follow the same length rule
    match ContextSecret::from_bytes(&scenario.public_bytes) {
        Ok(_) => assert_eq!(scenario.public_bytes.len(), 32),
        Err(err) => assert!(matches!(err, PridError::InvalidKeyLength { .. })),
    }

    // INVARIANT 4: Contexts are exactly eight bytes
    match Context::new(&scenario.context) {
        Ok(context) => assert_eq!(context.as_bytes().as_slice(), scenario.context.as_slice()),
        Err(err) => assert!(matches!(err, PridError::InvalidContextLength { .. })),
    }

    // INVARIANT 5: Id and PRId parsing never panic
    if let Ok(id) = parse_id(&scenario.id_text) {
        assert_eq!(parse_id(&id.to_string()), Ok(id));
    }
    if let Ok(prid) = scenario.prid_text.parse::<Prid>() {
        assert_eq!(prid.to_string().len(), 18);
    }

    // INVARIANT 6: Mixed inputs through the one-shot API never panic
    let _ = prid_derive(
        secret_hex.as_str(),
        scenario.public_bytes.as_slice(),
        0,
        0,
        &CTX_CONNECTION,
    );
});
