//! Key references used by capability queries.
//!
//! The resolver never touches key material. A [`KeyReference`] carries only
//! the metadata a `CryptoKey` declares: its algorithm family, whether it is
//! the public or private half, and its curve when the family is curve based.

use serde::Serialize;
use serde_json::Value;

use crate::capability::registry::{family_of, AlgorithmFamily, CurveName};

/// `CryptoKey.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Public,
    Private,
    Secret,
}

impl KeyRole {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "public" => Some(KeyRole::Public),
            "private" => Some(KeyRole::Private),
            "secret" => Some(KeyRole::Secret),
            _ => None,
        }
    }
}

/// Declared metadata of a key handed to a capability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReference {
    pub family: AlgorithmFamily,
    pub role: KeyRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_curve: Option<CurveName>,
}

impl KeyReference {
    pub fn new(family: AlgorithmFamily, role: KeyRole) -> Self {
        Self {
            family,
            role,
            named_curve: default_curve(family),
        }
    }

    pub fn public(family: AlgorithmFamily) -> Self {
        Self::new(family, KeyRole::Public)
    }

    pub fn private(family: AlgorithmFamily) -> Self {
        Self::new(family, KeyRole::Private)
    }

    pub fn with_curve(mut self, curve: CurveName) -> Self {
        self.named_curve = Some(curve);
        self
    }

    /// Curve that bounds key agreement with this key, if known.
    pub fn curve(&self) -> Option<CurveName> {
        self.named_curve.or_else(|| default_curve(self.family))
    }

    /// Reads a key reference from JSON.
    ///
    /// Two shapes are accepted: the `CryptoKey` shape
    /// `{"type": "public", "algorithm": {"name": "ECDH", "namedCurve": "P-256"}}`
    /// and the flat shape produced by serializing a [`KeyReference`],
    /// `{"family": "ECDH", "role": "public", "namedCurve": "P-256"}`.
    ///
    /// Returns `None` when the value is not recognizably a key. An unknown
    /// family name is kept as [`AlgorithmFamily::Invalid`] so the caller can
    /// report a mismatch instead of a malformed key.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let (family_name, role_name, algorithm) = match (object.get("algorithm"), object.get("type")) {
            (Some(algorithm), Some(role)) => {
                (algorithm.get("name")?.as_str()?, role.as_str()?, algorithm)
            }
            _ => (
                object.get("family")?.as_str()?,
                object.get("role")?.as_str()?,
                value,
            ),
        };

        let role = KeyRole::from_name(role_name)?;
        let family = family_of(family_name);

        let named_curve = match algorithm.get("namedCurve") {
            None => default_curve(family),
            Some(curve) => Some(CurveName::from_name(curve.as_str()?)?),
        };

        Some(Self {
            family,
            role,
            named_curve,
        })
    }

    pub fn to_json(&self) -> Value {
        // Serialization of plain enums and an optional curve cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn default_curve(family: AlgorithmFamily) -> Option<CurveName> {
    match family {
        AlgorithmFamily::X25519 => Some(CurveName::X25519),
        AlgorithmFamily::X448 => Some(CurveName::X448),
        _ => None,
    }
}
