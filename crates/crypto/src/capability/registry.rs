//! Algorithm Registry
//!
//! Static, immutable table of the algorithm families the resolver knows
//! about, the operations each family may appear under, and the closed name
//! spaces (operations, hashes, curves) used by descriptors.
//!
//! Hash names, curve names and family names are separate enums. A string
//! that is valid in one name space never satisfies a check in another, so
//! `"Ed25519"` used as a hash parameter is rejected even though it is a
//! valid family name.

use serde::{Serialize, Serializer};
use std::fmt;

/// WebCrypto operation a capability query is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Sign,
    Verify,
    Digest,
    Encrypt,
    Decrypt,
    GenerateKey,
    DeriveKey,
    DeriveBits,
    ImportKey,
    ExportKey,
    WrapKey,
    UnwrapKey,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Sign,
        Operation::Verify,
        Operation::Digest,
        Operation::Encrypt,
        Operation::Decrypt,
        Operation::GenerateKey,
        Operation::DeriveKey,
        Operation::DeriveBits,
        Operation::ImportKey,
        Operation::ExportKey,
        Operation::WrapKey,
        Operation::UnwrapKey,
    ];

    /// Parses a WebCrypto method name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Digest => "digest",
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::GenerateKey => "generateKey",
            Operation::DeriveKey => "deriveKey",
            Operation::DeriveBits => "deriveBits",
            Operation::ImportKey => "importKey",
            Operation::ExportKey => "exportKey",
            Operation::WrapKey => "wrapKey",
            Operation::UnwrapKey => "unwrapKey",
        }
    }

    /// Collapses an operation onto the one whose rules it shares.
    ///
    /// `Verify` follows `Sign`, `Decrypt` follows `Encrypt` and `UnwrapKey`
    /// follows `WrapKey`. Every other operation is its own canonical form.
    pub fn canonical(self) -> Self {
        match self {
            Operation::Verify => Operation::Sign,
            Operation::Decrypt => Operation::Encrypt,
            Operation::UnwrapKey => Operation::WrapKey,
            other => other,
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of canonical operations a family may appear under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSet(u16);

impl OperationSet {
    pub const EMPTY: OperationSet = OperationSet(0);

    const fn of(ops: &[Operation]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < ops.len() {
            bits |= ops[i].bit();
            i += 1;
        }
        OperationSet(bits)
    }

    /// Membership is checked on the canonical form, so a set holding `Sign`
    /// also answers for `Verify`.
    pub fn contains(self, op: Operation) -> bool {
        self.0 & op.canonical().bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Operation> {
        Operation::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}

/// Named class of algorithm with its own parameter shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Sentinel for anything unrecognized. Never supported.
    #[default]
    Invalid,
    RsassaPkcs1V15,
    RsaPss,
    RsaOaep,
    Ecdsa,
    Ed25519,
    Ed448,
    Hmac,
    AesCtr,
    AesCbc,
    AesGcm,
    AesKw,
    Hkdf,
    Pbkdf2,
    Ecdh,
    X25519,
    X448,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl AlgorithmFamily {
    /// Canonical WebCrypto name. `Invalid` has no registered name.
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmFamily::Invalid => "Invalid",
            AlgorithmFamily::RsassaPkcs1V15 => "RSASSA-PKCS1-v1_5",
            AlgorithmFamily::RsaPss => "RSA-PSS",
            AlgorithmFamily::RsaOaep => "RSA-OAEP",
            AlgorithmFamily::Ecdsa => "ECDSA",
            AlgorithmFamily::Ed25519 => "Ed25519",
            AlgorithmFamily::Ed448 => "Ed448",
            AlgorithmFamily::Hmac => "HMAC",
            AlgorithmFamily::AesCtr => "AES-CTR",
            AlgorithmFamily::AesCbc => "AES-CBC",
            AlgorithmFamily::AesGcm => "AES-GCM",
            AlgorithmFamily::AesKw => "AES-KW",
            AlgorithmFamily::Hkdf => "HKDF",
            AlgorithmFamily::Pbkdf2 => "PBKDF2",
            AlgorithmFamily::Ecdh => "ECDH",
            AlgorithmFamily::X25519 => "X25519",
            AlgorithmFamily::X448 => "X448",
            AlgorithmFamily::Sha1 => "SHA-1",
            AlgorithmFamily::Sha256 => "SHA-256",
            AlgorithmFamily::Sha384 => "SHA-384",
            AlgorithmFamily::Sha512 => "SHA-512",
        }
    }

    pub fn is_aes(&self) -> bool {
        matches!(
            self,
            AlgorithmFamily::AesCtr
                | AlgorithmFamily::AesCbc
                | AlgorithmFamily::AesGcm
                | AlgorithmFamily::AesKw
        )
    }

    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            AlgorithmFamily::RsassaPkcs1V15 | AlgorithmFamily::RsaPss | AlgorithmFamily::RsaOaep
        )
    }

    pub fn is_key_agreement(&self) -> bool {
        matches!(
            self,
            AlgorithmFamily::Ecdh | AlgorithmFamily::X25519 | AlgorithmFamily::X448
        )
    }

    /// The hash this family computes, for digest families only.
    pub fn digest(&self) -> Option<HashName> {
        match self {
            AlgorithmFamily::Sha1 => Some(HashName::Sha1),
            AlgorithmFamily::Sha256 => Some(HashName::Sha256),
            AlgorithmFamily::Sha384 => Some(HashName::Sha384),
            AlgorithmFamily::Sha512 => Some(HashName::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hash algorithm accepted in `hash` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashName {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashName {
    pub const ALL: [HashName; 4] = [
        HashName::Sha1,
        HashName::Sha256,
        HashName::Sha384,
        HashName::Sha512,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|h| h.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashName::Sha1 => "SHA-1",
            HashName::Sha256 => "SHA-256",
            HashName::Sha384 => "SHA-384",
            HashName::Sha512 => "SHA-512",
        }
    }

    /// Block size in bits; the default HMAC key length for this hash.
    pub fn block_size_bits(&self) -> u32 {
        match self {
            HashName::Sha1 | HashName::Sha256 => 512,
            HashName::Sha384 | HashName::Sha512 => 1024,
        }
    }
}

impl fmt::Display for HashName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Curve identifier carried by `namedCurve` parameters and key references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveName {
    P256,
    P384,
    P521,
    X25519,
    X448,
}

impl CurveName {
    pub const ALL: [CurveName; 5] = [
        CurveName::P256,
        CurveName::P384,
        CurveName::P521,
        CurveName::X25519,
        CurveName::X448,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveName::P256 => "P-256",
            CurveName::P384 => "P-384",
            CurveName::P521 => "P-521",
            CurveName::X25519 => "X25519",
            CurveName::X448 => "X448",
        }
    }

    /// NIST curves usable by ECDSA and ECDH.
    pub fn is_ec(&self) -> bool {
        matches!(self, CurveName::P256 | CurveName::P384 | CurveName::P521)
    }

    /// Size of the raw shared secret produced by key agreement on this curve.
    pub fn shared_secret_bits(&self) -> u32 {
        match self {
            CurveName::P256 => 256,
            CurveName::P384 => 384,
            CurveName::P521 => 528,
            CurveName::X25519 => 256,
            CurveName::X448 => 448,
        }
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! serialize_as_name {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.name())
                }
            }
        )+
    };
}

serialize_as_name!(Operation, AlgorithmFamily, HashName, CurveName);

/// One registry row.
#[derive(Debug, Clone, Copy)]
pub struct FamilyEntry {
    pub family: AlgorithmFamily,
    pub operations: OperationSet,
}

use Operation::{
    Digest, DeriveBits, DeriveKey, Encrypt, ExportKey, GenerateKey, ImportKey, Sign, WrapKey,
};

const SIGNATURE_OPS: OperationSet = OperationSet::of(&[Sign, GenerateKey, ImportKey, ExportKey]);
const CIPHER_OPS: OperationSet =
    OperationSet::of(&[Encrypt, WrapKey, GenerateKey, ImportKey, ExportKey]);
const KEY_WRAP_OPS: OperationSet = OperationSet::of(&[WrapKey, GenerateKey, ImportKey, ExportKey]);
const KDF_OPS: OperationSet = OperationSet::of(&[DeriveBits, DeriveKey, ImportKey]);
const KEY_AGREEMENT_OPS: OperationSet =
    OperationSet::of(&[DeriveBits, DeriveKey, GenerateKey, ImportKey, ExportKey]);
const DIGEST_OPS: OperationSet = OperationSet::of(&[Digest]);

macro_rules! entry {
    ($family:ident, $ops:expr) => {
        FamilyEntry {
            family: AlgorithmFamily::$family,
            operations: $ops,
        }
    };
}

static REGISTRY: [FamilyEntry; 20] = [
    entry!(RsassaPkcs1V15, SIGNATURE_OPS),
    entry!(RsaPss, SIGNATURE_OPS),
    entry!(RsaOaep, CIPHER_OPS),
    entry!(Ecdsa, SIGNATURE_OPS),
    entry!(Ed25519, SIGNATURE_OPS),
    entry!(Ed448, SIGNATURE_OPS),
    entry!(Hmac, SIGNATURE_OPS),
    entry!(AesCtr, CIPHER_OPS),
    entry!(AesCbc, CIPHER_OPS),
    entry!(AesGcm, CIPHER_OPS),
    entry!(AesKw, KEY_WRAP_OPS),
    entry!(Hkdf, KDF_OPS),
    entry!(Pbkdf2, KDF_OPS),
    entry!(Ecdh, KEY_AGREEMENT_OPS),
    entry!(X25519, KEY_AGREEMENT_OPS),
    entry!(X448, KEY_AGREEMENT_OPS),
    entry!(Sha1, DIGEST_OPS),
    entry!(Sha256, DIGEST_OPS),
    entry!(Sha384, DIGEST_OPS),
    entry!(Sha512, DIGEST_OPS),
];

/// All registered families, in registry order. `Invalid` is not included.
pub fn families() -> impl Iterator<Item = AlgorithmFamily> {
    REGISTRY.iter().map(|entry| entry.family)
}

/// Exact, case-sensitive lookup. Unknown names map to [`AlgorithmFamily::Invalid`].
pub fn family_of(name: &str) -> AlgorithmFamily {
    REGISTRY
        .iter()
        .find(|entry| entry.family.name() == name)
        .map(|entry| entry.family)
        .unwrap_or(AlgorithmFamily::Invalid)
}

/// Operations the family may legally appear under.
pub fn operations_of(family: AlgorithmFamily) -> OperationSet {
    REGISTRY
        .iter()
        .find(|entry| entry.family == family)
        .map(|entry| entry.operations)
        .unwrap_or(OperationSet::EMPTY)
}

/// Static membership check. Always `false` for [`AlgorithmFamily::Invalid`].
pub fn supports_operation(family: AlgorithmFamily, operation: Operation) -> bool {
    operations_of(family).contains(operation)
}
