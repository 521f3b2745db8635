//! Reasons a capability query is answered with `false`.

use serde::Serialize;
use thiserror::Error;

use super::registry::{AlgorithmFamily, Operation};

/// Result type for explain-mode queries
pub type CapabilityResult = std::result::Result<(), Unsupported>;

/// Why a combination is not supported.
///
/// Only [`crate::capability::explain`] exposes this. The boolean query path
/// collapses every variant to `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unsupported {
    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("unrecognized algorithm")]
    UnknownAlgorithm,

    #[error("{family} cannot be used for {operation}")]
    OperationNotSupported {
        family: AlgorithmFamily,
        operation: Operation,
    },

    #[error("missing required parameter '{field}'")]
    MissingParameter { field: &'static str },

    #[error("invalid parameter '{field}': {detail}")]
    InvalidParameter { field: &'static str, detail: String },

    #[error("key mismatch: {detail}")]
    KeyMismatch { detail: String },

    #[error("refused by policy: {detail}")]
    PolicyRefused { detail: String },
}

impl Unsupported {
    pub(crate) fn missing(field: &'static str) -> Self {
        Unsupported::MissingParameter { field }
    }

    pub(crate) fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        Unsupported::InvalidParameter {
            field,
            detail: detail.into(),
        }
    }

    /// Stable snake_case code, matching the serialized `reason` tag.
    pub fn code(&self) -> &'static str {
        match self {
            Unsupported::UnknownOperation { .. } => "unknown_operation",
            Unsupported::UnknownAlgorithm => "unknown_algorithm",
            Unsupported::OperationNotSupported { .. } => "operation_not_supported",
            Unsupported::MissingParameter { .. } => "missing_parameter",
            Unsupported::InvalidParameter { .. } => "invalid_parameter",
            Unsupported::KeyMismatch { .. } => "key_mismatch",
            Unsupported::PolicyRefused { .. } => "policy_refused",
        }
    }
}
