//! Shared fixtures for capability integration tests

use serde_json::{json, Value};
use subtlecaps_crypto::{AlgorithmFamily, CurveName, KeyReference};

/// Every operation name the resolver recognizes.
pub const OPERATIONS: [&str; 12] = [
    "encrypt",
    "decrypt",
    "sign",
    "verify",
    "digest",
    "generateKey",
    "deriveKey",
    "deriveBits",
    "importKey",
    "exportKey",
    "wrapKey",
    "unwrapKey",
];

/// Operation names that must never be supported.
pub const BOGUS_OPERATIONS: [&str; 5] = ["", "Sign", "SIGN", "unsupported operation", "derive"];

/// One well-formed descriptor per algorithm family, plus values that are not
/// algorithms at all.
pub fn algorithm_shapes() -> Vec<Value> {
    let block = json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    vec![
        json!("RSASSA-PKCS1-v1_5"),
        json!({ "name": "RSA-PSS", "saltLength": 32, "hash": "SHA-256" }),
        json!({ "name": "RSA-OAEP", "hash": "SHA-256", "modulusLength": 2048, "publicExponent": [1, 0, 1] }),
        json!({ "name": "ECDSA", "hash": "SHA-384", "namedCurve": "P-384" }),
        json!("Ed25519"),
        json!({ "name": "Ed448", "context": [] }),
        json!({ "name": "HMAC", "hash": "SHA-512" }),
        json!({ "name": "AES-CTR", "counter": block, "length": 64 }),
        json!({ "name": "AES-CBC", "iv": block, "length": 256 }),
        json!({ "name": "AES-GCM", "iv": { "byteLength": 12 }, "length": 128 }),
        json!({ "name": "AES-KW", "length": 192 }),
        hkdf(),
        pbkdf2(1000),
        json!({ "name": "ECDH", "namedCurve": "P-256", "public": ecdh_public(CurveName::P256) }),
        json!({ "name": "X25519", "public": public_key(AlgorithmFamily::X25519) }),
        json!({ "name": "X448", "public": public_key(AlgorithmFamily::X448) }),
        json!("SHA-1"),
        json!("SHA-256"),
        json!({ "name": "SHA-384" }),
        json!("SHA-512"),
        json!("Invalid"),
        json!(""),
        json!("ed25519"),
        json!(null),
        json!(42),
        json!([1, 2, 3]),
        json!({}),
        json!({ "name": 7 }),
        json!({ "name": "HKDF", "hash": null, "salt": [], "info": [] }),
    ]
}

/// Secondary arguments in every shape a caller might pass.
pub fn secondary_shapes() -> Vec<Option<Value>> {
    vec![
        None,
        Some(Value::Null),
        Some(json!(0)),
        Some(json!(7)),
        Some(json!(8)),
        Some(json!(256)),
        Some(json!(-8)),
        Some(json!(8.5)),
        Some(json!("AES-GCM")),
        Some(json!({ "name": "AES-GCM", "length": 256 })),
        Some(json!({ "name": "HMAC", "hash": "SHA-256" })),
        Some(json!({ "family": "ECDH", "role": "public" })),
        Some(json!({ "type": "private", "algorithm": { "name": "X25519" } })),
        Some(json!([8])),
        Some(json!(true)),
    ]
}

pub fn hkdf() -> Value {
    json!({ "name": "HKDF", "hash": "SHA-256", "salt": [], "info": [] })
}

pub fn pbkdf2(iterations: u32) -> Value {
    json!({ "name": "PBKDF2", "hash": "SHA-256", "salt": { "byteLength": 16 }, "iterations": iterations })
}

pub fn public_key(family: AlgorithmFamily) -> Value {
    KeyReference::public(family).to_json()
}

pub fn ecdh_public(curve: CurveName) -> Value {
    KeyReference::public(AlgorithmFamily::Ecdh)
        .with_curve(curve)
        .to_json()
}

/// Install a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
