//! Capability Resolver
//!
//! Public query entry point. A query is evaluated strictly top-down:
//! normalize the algorithm, reject the `Invalid` family, check the family's
//! operation set, then run the family+operation validator. No step calls
//! back into an earlier one except `deriveKey`, which evaluates its target
//! algorithm as an independent `importKey` query.

use serde_json::Value;
use std::sync::OnceLock;
use subtlecaps_core::ResolverPolicy;
use tracing::trace;

use super::descriptor::{json_u32, normalize, AlgorithmDescriptor, AlgorithmInput, Param};
use super::error::{CapabilityResult, Unsupported};
use super::registry::{supports_operation, AlgorithmFamily, Operation};
use super::validate::{derived_key_length, validator_for, Check, OutputLength};
use crate::keys::KeyReference;

/// Argument following the algorithm in a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SecondaryArg {
    /// Not given, or `null`
    #[default]
    None,
    /// `deriveBits` output length in bits
    Length(u32),
    /// `deriveKey` target key algorithm
    Target(Box<AlgorithmInput>),
    /// Peer key for `deriveBits` on a key-agreement family, when the
    /// algorithm does not carry it as `public`
    Key(KeyReference),
    /// Given, but neither a length nor an algorithm
    Malformed,
}

impl SecondaryArg {
    pub fn target(input: impl Into<AlgorithmInput>) -> Self {
        SecondaryArg::Target(Box::new(input.into()))
    }

    /// Numbers are lengths. Objects shaped like a key (`{type, algorithm}`
    /// or `{family, role}`) are peer keys. Other strings and objects are
    /// target algorithms.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SecondaryArg::None,
            Some(number @ Value::Number(_)) => match json_u32(number) {
                Some(bits) => SecondaryArg::Length(bits),
                None => SecondaryArg::Malformed,
            },
            Some(object @ Value::Object(_)) => match KeyReference::from_json(object) {
                Some(key) => SecondaryArg::Key(key),
                None => SecondaryArg::Target(Box::new(AlgorithmInput::Json(object.clone()))),
            },
            Some(name @ Value::String(_)) => {
                SecondaryArg::Target(Box::new(AlgorithmInput::Json(name.clone())))
            }
            Some(_) => SecondaryArg::Malformed,
        }
    }

    fn peer_key(&self) -> Option<&KeyReference> {
        match self {
            SecondaryArg::Key(key) => Some(key),
            _ => None,
        }
    }

    fn output_length(&self) -> OutputLength {
        match self {
            SecondaryArg::None | SecondaryArg::Key(_) => OutputLength::Omitted,
            SecondaryArg::Length(bits) => OutputLength::Bits(*bits),
            SecondaryArg::Target(_) | SecondaryArg::Malformed => OutputLength::Malformed,
        }
    }
}

impl From<u32> for SecondaryArg {
    fn from(bits: u32) -> Self {
        SecondaryArg::Length(bits)
    }
}

impl From<KeyReference> for SecondaryArg {
    fn from(key: KeyReference) -> Self {
        SecondaryArg::Key(key)
    }
}

impl From<Option<u32>> for SecondaryArg {
    fn from(bits: Option<u32>) -> Self {
        bits.map_or(SecondaryArg::None, SecondaryArg::Length)
    }
}

/// Answers capability queries under one immutable [`ResolverPolicy`].
#[derive(Debug, Clone, Default)]
pub struct CapabilityResolver {
    policy: ResolverPolicy,
}

impl CapabilityResolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// `true` iff `operation` with `algorithm` is supported. Never fails.
    pub fn supports(
        &self,
        operation: &str,
        algorithm: &AlgorithmInput,
        secondary: &SecondaryArg,
    ) -> bool {
        match self.explain(operation, algorithm, secondary) {
            Ok(()) => true,
            Err(reason) => {
                trace!(operation, code = reason.code(), %reason, "capability query rejected");
                false
            }
        }
    }

    /// [`Self::supports`] for dynamically shaped arguments.
    pub fn supports_json(&self, operation: &str, algorithm: &Value, secondary: Option<&Value>) -> bool {
        self.supports(
            operation,
            &AlgorithmInput::Json(algorithm.clone()),
            &SecondaryArg::from_json(secondary),
        )
    }

    /// Same decision as [`Self::supports`], with the reason for a `false`.
    pub fn explain(
        &self,
        operation: &str,
        algorithm: &AlgorithmInput,
        secondary: &SecondaryArg,
    ) -> CapabilityResult {
        let op = Operation::from_name(operation).ok_or_else(|| Unsupported::UnknownOperation {
            name: operation.to_string(),
        })?;
        self.explain_operation(op, algorithm, secondary)
    }

    pub fn explain_operation(
        &self,
        op: Operation,
        algorithm: &AlgorithmInput,
        secondary: &SecondaryArg,
    ) -> CapabilityResult {
        let desc = normalize(algorithm);
        self.check_descriptor(op, &desc, secondary)
    }

    pub fn supports_operation(
        &self,
        op: Operation,
        algorithm: &AlgorithmInput,
        secondary: &SecondaryArg,
    ) -> bool {
        self.explain_operation(op, algorithm, secondary).is_ok()
    }

    fn check_descriptor(
        &self,
        op: Operation,
        desc: &AlgorithmDescriptor,
        secondary: &SecondaryArg,
    ) -> CapabilityResult {
        if desc.family == AlgorithmFamily::Invalid {
            return Err(Unsupported::UnknownAlgorithm);
        }
        if !supports_operation(desc.family, op) {
            return Err(Unsupported::OperationNotSupported {
                family: desc.family,
                operation: op,
            });
        }

        let length = match op {
            Operation::DeriveBits => secondary.output_length(),
            Operation::DeriveKey => OutputLength::Bits(self.derive_key_target(secondary)?),
            _ => OutputLength::Omitted,
        };

        match secondary.peer_key() {
            Some(key) if desc.family.is_key_agreement() && desc.public.is_absent() => {
                let desc = AlgorithmDescriptor {
                    public: Param::Present(key.clone()),
                    ..desc.clone()
                };
                self.run(op, &desc, length)
            }
            _ => self.run(op, desc, length),
        }
    }

    /// `deriveKey` is `deriveBits` of the target's key length, provided the
    /// target algorithm could be imported.
    fn derive_key_target(&self, secondary: &SecondaryArg) -> Result<u32, Unsupported> {
        let target = match secondary {
            SecondaryArg::Target(input) => normalize(input),
            SecondaryArg::None => return Err(Unsupported::missing("derivedKeyType")),
            SecondaryArg::Length(_) | SecondaryArg::Key(_) | SecondaryArg::Malformed => {
                return Err(Unsupported::invalid("derivedKeyType", "not an algorithm"))
            }
        };

        self.check_descriptor(Operation::ImportKey, &target, &SecondaryArg::None)?;
        derived_key_length(&target)
    }

    fn run(&self, op: Operation, desc: &AlgorithmDescriptor, length: OutputLength) -> CapabilityResult {
        let validator = validator_for(desc.family, op).ok_or(Unsupported::OperationNotSupported {
            family: desc.family,
            operation: op,
        })?;

        validator(&Check {
            desc,
            length,
            policy: &self.policy,
        })
    }
}

/// Resolver with the default policy, built on first use.
pub fn default_resolver() -> &'static CapabilityResolver {
    static DEFAULT: OnceLock<CapabilityResolver> = OnceLock::new();
    DEFAULT.get_or_init(CapabilityResolver::default)
}

/// Capability query against the default resolver.
///
/// ```
/// use subtlecaps_crypto::{supports, AlgorithmInput, SecondaryArg};
///
/// assert!(supports("sign", &AlgorithmInput::from("Ed25519"), &SecondaryArg::None));
/// assert!(!supports("digest", &AlgorithmInput::from("Ed25519"), &SecondaryArg::None));
/// ```
pub fn supports(operation: &str, algorithm: &AlgorithmInput, secondary: &SecondaryArg) -> bool {
    default_resolver().supports(operation, algorithm, secondary)
}

/// JSON capability query against the default resolver.
///
/// ```
/// use serde_json::json;
/// use subtlecaps_crypto::supports_json;
///
/// let hkdf = json!({ "name": "HKDF", "hash": "SHA-256", "salt": [], "info": [] });
/// assert!(supports_json("deriveBits", &hkdf, Some(&json!(8))));
/// assert!(!supports_json("deriveBits", &hkdf, Some(&json!(null))));
/// ```
pub fn supports_json(operation: &str, algorithm: &Value, secondary: Option<&Value>) -> bool {
    default_resolver().supports_json(operation, algorithm, secondary)
}

/// Explain-mode query against the default resolver.
pub fn explain(operation: &str, algorithm: &AlgorithmInput, secondary: &SecondaryArg) -> CapabilityResult {
    default_resolver().explain(operation, algorithm, secondary)
}
