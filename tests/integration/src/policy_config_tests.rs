//! Policy narrowing and config-driven resolvers

use crate::test_utils::{algorithm_shapes, pbkdf2, secondary_shapes, OPERATIONS};
use serde_json::json;
use subtlecaps_core::{Config, CoreError, ResolverPolicy};
use subtlecaps_crypto::{default_resolver, AlgorithmInput, CapabilityResolver, SecondaryArg};

const STRICT_CONFIG: &str = r#"
[resolver]
allow_sha1 = false
min_pbkdf2_iterations = 600000
min_rsa_modulus_length = 3072

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_policy_only_narrows() {
    let config = Config::from_toml_str(STRICT_CONFIG).expect("valid config");
    let strict = CapabilityResolver::new(config.resolver);

    for operation in OPERATIONS {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                if strict.supports_json(operation, &algorithm, secondary.as_ref()) {
                    assert!(
                        default_resolver().supports_json(operation, &algorithm, secondary.as_ref()),
                        "policy widened {} {} {:?}",
                        operation,
                        algorithm,
                        secondary
                    );
                }
            }
        }
    }
}

#[test]
fn test_config_driven_resolver() {
    let config = Config::from_toml_str(STRICT_CONFIG).expect("valid config");
    let strict = CapabilityResolver::new(config.resolver);

    assert!(!strict.supports_json("digest", &json!("SHA-1"), None));
    assert!(strict.supports_json("digest", &json!("SHA-256"), None));
    assert!(!strict.supports_json("sign", &json!({ "name": "ECDSA", "hash": "SHA-1" }), None));

    assert!(!strict.supports_json("deriveBits", &pbkdf2(1000), Some(&json!(256))));
    assert!(strict.supports_json("deriveBits", &pbkdf2(600_000), Some(&json!(256))));

    let rsa = |bits: u32| {
        json!({ "name": "RSA-PSS", "hash": "SHA-256", "modulusLength": bits, "publicExponent": [1, 0, 1] })
    };
    assert!(!strict.supports_json("generateKey", &rsa(2048), None));
    assert!(strict.supports_json("generateKey", &rsa(4096), None));

    let refused = strict
        .explain("digest", &AlgorithmInput::from("SHA-1"), &SecondaryArg::None)
        .expect_err("SHA-1 disabled");
    assert_eq!(refused.code(), "policy_refused");
}

#[test]
fn test_empty_config_matches_default_resolver() {
    let config = Config::from_toml_str("").expect("empty config");
    assert_eq!(config.resolver, ResolverPolicy::default());

    let resolver = CapabilityResolver::new(config.resolver);
    for operation in OPERATIONS {
        for algorithm in algorithm_shapes() {
            assert_eq!(
                resolver.supports_json(operation, &algorithm, None),
                default_resolver().supports_json(operation, &algorithm, None)
            );
        }
    }
}

#[test]
fn test_invalid_config_rejected() {
    let zero_iterations = "[resolver]\nmin_pbkdf2_iterations = 0\n";
    assert!(matches!(
        Config::from_toml_str(zero_iterations),
        Err(CoreError::InvalidConfig { .. })
    ));

    let bad_type = "[resolver]\nallow_sha1 = \"maybe\"\n";
    assert!(matches!(
        Config::from_toml_str(bad_type),
        Err(CoreError::ConfigParse(_))
    ));
}
