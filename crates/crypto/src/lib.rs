//! WebCrypto capability queries for the SubtleCaps workspace.
//!
//! This crate predicts whether a WebCrypto-style provider supports an
//! operation for a given algorithm descriptor, so callers can fail fast
//! before generating keys, signing, deriving or wrapping.
//!
//! # Core Capabilities
//!
//! - **Registry**: the closed set of algorithm families and the operations
//!   each may appear under
//! - **Normalization**: bare names, JSON descriptors and Rust-built
//!   descriptors all reduce to one typed record
//! - **Resolution**: `supports` returns a `bool` and never fails; `explain`
//!   gives the reason for a `false`
//!
//! # Supported Algorithms
//!
//! - **Signatures**: RSASSA-PKCS1-v1_5, RSA-PSS, ECDSA, Ed25519, Ed448, HMAC
//! - **Encryption / key wrap**: RSA-OAEP, AES-CTR, AES-CBC, AES-GCM, AES-KW
//! - **Derivation**: HKDF, PBKDF2, ECDH, X25519, X448
//! - **Digests**: SHA-1, SHA-256, SHA-384, SHA-512
//!
//! # Security Principles
//!
//! - No key material is ever inspected or logged, only declared metadata
//! - Hash, curve and algorithm names live in separate name spaces
//! - A [`subtlecaps_core::ResolverPolicy`] can only narrow support

pub mod capability;
pub mod keys;


pub use capability::{
    default_resolver, explain, normalize, supports, supports_json, AlgorithmDescriptor,
    AlgorithmFamily, AlgorithmInput, CapabilityResolver, CapabilityResult, CurveName, HashName,
    Operation, Param, SecondaryArg, Unsupported,
};

pub use keys::{KeyReference, KeyRole};
