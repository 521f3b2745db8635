//! Property tests over the whole query space
//!
//! Every operation is crossed with every algorithm shape and every secondary
//! argument shape. The resolver must answer all of them, and the answers must
//! respect the aliasing and length rules.

use crate::test_utils::{
    algorithm_shapes, ecdh_public, hkdf, init_tracing, pbkdf2, public_key, secondary_shapes,
    BOGUS_OPERATIONS, OPERATIONS,
};
use serde_json::{json, Value};
use subtlecaps_crypto::{
    explain, supports_json, AlgorithmFamily, AlgorithmInput, CurveName, SecondaryArg,
};

fn explain_json(operation: &str, algorithm: &Value, secondary: Option<&Value>) -> Option<&'static str> {
    explain(
        operation,
        &AlgorithmInput::Json(algorithm.clone()),
        &SecondaryArg::from_json(secondary),
    )
    .err()
    .map(|reason| reason.code())
}

#[test]
fn test_every_query_shape_answers() {
    init_tracing();

    let mut supported = 0usize;
    let mut total = 0usize;

    for operation in OPERATIONS.iter().chain(BOGUS_OPERATIONS.iter()) {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                let answer = supports_json(operation, &algorithm, secondary.as_ref());
                let reason = explain_json(operation, &algorithm, secondary.as_ref());
                assert_eq!(answer, reason.is_none(), "{} {} {:?}", operation, algorithm, secondary);

                total += 1;
                supported += usize::from(answer);
            }
        }
    }

    tracing::info!(total, supported, "query space covered");
    assert!(supported > 0);
    assert!(supported < total);
}

#[test]
fn test_unknown_operations_are_never_supported() {
    for operation in BOGUS_OPERATIONS {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                assert!(!supports_json(operation, &algorithm, secondary.as_ref()));
                assert_eq!(
                    explain_json(operation, &algorithm, secondary.as_ref()),
                    Some("unknown_operation")
                );
            }
        }
    }
}

#[test]
fn test_unknown_algorithms_are_never_supported() {
    let unknown = [json!("Invalid"), json!(""), json!("ed25519"), json!(null), json!(42), json!({})];

    for operation in OPERATIONS {
        for algorithm in &unknown {
            for secondary in secondary_shapes() {
                assert!(!supports_json(operation, algorithm, secondary.as_ref()));
                assert_eq!(
                    explain_json(operation, algorithm, secondary.as_ref()),
                    Some("unknown_algorithm"),
                    "{} {}",
                    operation,
                    algorithm
                );
            }
        }
    }
}

#[test]
fn test_aliases_answer_identically() {
    let pairs = [("sign", "verify"), ("encrypt", "decrypt"), ("wrapKey", "unwrapKey")];

    for (primary, alias) in pairs {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                assert_eq!(
                    supports_json(primary, &algorithm, secondary.as_ref()),
                    supports_json(alias, &algorithm, secondary.as_ref()),
                    "{}/{} {} {:?}",
                    primary,
                    alias,
                    algorithm,
                    secondary
                );
            }
        }
    }
}

#[test]
fn test_repeated_queries_are_stable() {
    for operation in OPERATIONS {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                let first = supports_json(operation, &algorithm, secondary.as_ref());
                for _ in 0..3 {
                    assert_eq!(first, supports_json(operation, &algorithm, secondary.as_ref()));
                }
            }
        }
    }
}

#[test]
fn test_kdf_lengths_must_be_whole_bytes() {
    for kdf in [hkdf(), pbkdf2(1000)] {
        for bits in 0u32..=1024 {
            assert_eq!(
                supports_json("deriveBits", &kdf, Some(&json!(bits))),
                bits % 8 == 0,
                "{} {}",
                kdf,
                bits
            );
        }
        assert!(!supports_json("deriveBits", &kdf, None));
        assert!(!supports_json("deriveBits", &kdf, Some(&Value::Null)));
    }
}

#[test]
fn test_digest_is_only_for_hashes() {
    for algorithm in algorithm_shapes() {
        let is_hash = match &algorithm {
            Value::String(name) => name.starts_with("SHA-"),
            Value::Object(fields) => fields
                .get("name")
                .and_then(Value::as_str)
                .map_or(false, |name| name.starts_with("SHA-")),
            _ => false,
        };
        assert_eq!(supports_json("digest", &algorithm, None), is_hash, "{}", algorithm);
    }
}

#[test]
fn test_key_agreement_peers() {
    let x25519 = json!({ "name": "X25519", "public": public_key(AlgorithmFamily::X25519) });
    assert!(supports_json("deriveBits", &x25519, None));
    assert!(supports_json("deriveBits", &x25519, Some(&json!(256))));
    assert!(supports_json("deriveBits", &x25519, Some(&json!(12))));
    assert!(!supports_json("deriveBits", &x25519, Some(&json!(264))));

    let mismatched = json!({ "name": "X25519", "public": public_key(AlgorithmFamily::X448) });
    assert_eq!(explain_json("deriveBits", &mismatched, None), Some("key_mismatch"));

    let ecdh = |curve| json!({ "name": "ECDH", "public": ecdh_public(curve) });
    assert!(supports_json("deriveBits", &ecdh(CurveName::P384), Some(&json!(384))));
    assert!(!supports_json("deriveBits", &ecdh(CurveName::P384), Some(&json!(392))));
    assert!(supports_json("deriveBits", &ecdh(CurveName::P521), Some(&json!(528))));
    assert!(!supports_json("deriveBits", &ecdh(CurveName::X448), None));

    assert_eq!(explain_json("deriveBits", &json!("ECDH"), None), Some("missing_parameter"));
}

#[test]
fn test_derive_key_targets() {
    let cases = [
        (json!({ "name": "AES-GCM", "length": 128 }), true),
        (json!({ "name": "AES-CTR", "length": 192 }), true),
        (json!({ "name": "AES-KW", "length": 256 }), true),
        (json!({ "name": "AES-CBC", "length": 25 }), false),
        (json!({ "name": "AES-GCM" }), false),
        (json!({ "name": "HMAC", "hash": "SHA-256" }), true),
        (json!({ "name": "HMAC", "hash": "SHA-256", "length": 256 }), true),
        (json!({ "name": "HMAC", "hash": "SHA-256", "length": 25 }), false),
        (json!({ "name": "HMAC" }), false),
        (json!("HKDF"), false),
        (json!("PBKDF2"), false),
        (json!("Ed25519"), false),
        (json!("SHA-256"), false),
        (json!("Invalid"), false),
    ];

    for kdf in [hkdf(), pbkdf2(1000)] {
        for (target, expected) in &cases {
            assert_eq!(
                supports_json("deriveKey", &kdf, Some(target)),
                *expected,
                "{} -> {}",
                kdf,
                target
            );
        }
        assert!(!supports_json("deriveKey", &kdf, None));
        assert!(!supports_json("deriveKey", &kdf, Some(&json!(128))));
    }

    // X25519 yields 256 bits, enough for AES-256 but not a SHA-384 HMAC key
    let x25519 = json!({ "name": "X25519", "public": public_key(AlgorithmFamily::X25519) });
    assert!(supports_json("deriveKey", &x25519, Some(&json!({ "name": "AES-GCM", "length": 256 }))));
    assert!(!supports_json("deriveKey", &x25519, Some(&json!({ "name": "HMAC", "hash": "SHA-384" }))));
}

#[test]
fn test_explain_reason_codes() {
    let cases = [
        ("sign", json!("Nope"), None, "unknown_algorithm"),
        ("digest", json!("Ed25519"), None, "operation_not_supported"),
        ("generateKey", json!("HKDF"), None, "operation_not_supported"),
        ("sign", json!("RSA-PSS"), None, "missing_parameter"),
        ("sign", json!({ "name": "ECDSA", "hash": "Ed25519" }), None, "invalid_parameter"),
        ("deriveBits", hkdf(), Some(json!(7)), "invalid_parameter"),
        ("deriveBits", hkdf(), None, "missing_parameter"),
        ("frobnicate", json!("Ed25519"), None, "unknown_operation"),
    ];

    for (operation, algorithm, secondary, code) in cases {
        assert_eq!(
            explain_json(operation, &algorithm, secondary.as_ref()),
            Some(code),
            "{} {}",
            operation,
            algorithm
        );
    }
}
