//! Algorithm-capability resolver.
//!
//! Answers "is operation *O* supported with algorithm *A*?" from descriptor
//! shape and declared key metadata alone, without running any cryptography.
//! The answer is a plain `bool`; unknown operations, unknown algorithms,
//! wrong operations and bad parameters are all `false`. [`explain`] returns
//! the reason for callers that need diagnostics.

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod resolver;
mod validate;

pub use descriptor::{normalize, normalize_json, AlgorithmDescriptor, AlgorithmInput, ByteLength, Param};
pub use error::{CapabilityResult, Unsupported};
pub use registry::{
    families, family_of, operations_of, supports_operation, AlgorithmFamily, CurveName, HashName,
    Operation, OperationSet,
};
pub use resolver::{
    default_resolver, explain, supports, supports_json, CapabilityResolver, SecondaryArg,
};
