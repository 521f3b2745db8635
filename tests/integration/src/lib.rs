//! Integration tests for capability queries
//!
//! This test suite validates:
//! - Totality: every query shape answers with a `bool`
//! - Alias symmetry between sign/verify, encrypt/decrypt, wrapKey/unwrapKey
//! - KDF output lengths and `deriveKey` composition
//! - Concurrent use of one resolver from many threads
//! - Policy narrowing and config-driven resolvers

pub mod test_utils;

#[cfg(test)]
mod capability_property_tests;

#[cfg(test)]
mod concurrency_tests;

#[cfg(test)]
mod policy_config_tests;
