//! Per-family, per-operation parameter validators.
//!
//! [`validator_for`] is the dispatch table indexed by the two enums. Every
//! `(family, operation)` pair the registry admits has exactly one entry
//! here; the `registry_and_dispatch_agree` test keeps the two in lockstep.

use subtlecaps_core::ResolverPolicy;

use super::descriptor::{AlgorithmDescriptor, Param};
use super::error::{CapabilityResult, Unsupported};
use super::registry::{AlgorithmFamily, CurveName, HashName, Operation};
use crate::keys::KeyRole;

/// Output length argument of `deriveBits`, or the target key length of
/// `deriveKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputLength {
    /// `null` or not given
    Omitted,
    Bits(u32),
    Malformed,
}

pub(crate) struct Check<'a> {
    pub desc: &'a AlgorithmDescriptor,
    pub length: OutputLength,
    pub policy: &'a ResolverPolicy,
}

pub(crate) type Validator = fn(&Check<'_>) -> CapabilityResult;

const AES_KEY_LENGTHS: [u32; 3] = [128, 192, 256];
const GCM_TAG_LENGTHS: [u32; 7] = [32, 64, 96, 104, 112, 120, 128];
const AES_BLOCK_BYTES: usize = 16;

pub(crate) fn validator_for(family: AlgorithmFamily, op: Operation) -> Option<Validator> {
    use AlgorithmFamily::*;
    use Operation::*;

    let validator: Validator = match (family, op.canonical()) {
        (RsassaPkcs1V15 | Ed25519 | Hmac, Sign) => accept,
        (RsaPss, Sign) => rsa_pss_sign,
        (Ecdsa, Sign) => ecdsa_sign,
        (Ed448, Sign) => ed448_sign,

        (Sha1 | Sha256 | Sha384 | Sha512, Digest) => digest,

        (RsaOaep, Encrypt | WrapKey) => rsa_oaep_encrypt,
        (AesCtr, Encrypt | WrapKey) => aes_ctr_encrypt,
        (AesCbc, Encrypt | WrapKey) => aes_cbc_encrypt,
        (AesGcm, Encrypt | WrapKey) => aes_gcm_encrypt,
        (AesKw, WrapKey) => accept,

        (RsassaPkcs1V15 | RsaPss | RsaOaep, GenerateKey) => rsa_generate_key,
        (Ecdsa | Ecdh, GenerateKey) => ec_key_params,
        (Ed25519 | Ed448 | X25519 | X448, GenerateKey) => accept,
        (Hmac, GenerateKey) => hmac_key_params,
        (AesCtr | AesCbc | AesGcm | AesKw, GenerateKey) => aes_generate_key,

        (RsassaPkcs1V15 | RsaPss | RsaOaep, ImportKey) => rsa_import_key,
        (Ecdsa | Ecdh, ImportKey) => ec_key_params,
        (Ed25519 | Ed448 | X25519 | X448 | Hkdf | Pbkdf2, ImportKey) => accept,
        (Hmac, ImportKey) => hmac_key_params,
        (AesCtr | AesCbc | AesGcm | AesKw, ImportKey) => aes_import_key,

        (
            RsassaPkcs1V15 | RsaPss | RsaOaep | Ecdsa | Ed25519 | Ed448 | Hmac | AesCtr | AesCbc
            | AesGcm | AesKw | Ecdh | X25519 | X448,
            ExportKey,
        ) => accept,

        (Hkdf, DeriveBits | DeriveKey) => hkdf_derive_bits,
        (Pbkdf2, DeriveBits | DeriveKey) => pbkdf2_derive_bits,
        (Ecdh | X25519 | X448, DeriveBits | DeriveKey) => key_agreement_derive_bits,

        _ => return None,
    };

    Some(validator)
}

/// Length in bits a `deriveKey` call must produce for `target`.
///
/// `target` has already passed the `importKey` rules for its family.
pub(crate) fn derived_key_length(target: &AlgorithmDescriptor) -> Result<u32, Unsupported> {
    match target.family {
        family if family.is_aes() => match target.length {
            Param::Present(bits) => Ok(bits),
            _ => Err(Unsupported::missing("length")),
        },
        AlgorithmFamily::Hmac => match (&target.length, &target.hash) {
            (Param::Present(bits), _) => Ok(*bits),
            (Param::Absent, Param::Present(hash)) => Ok(hash.block_size_bits()),
            _ => Err(Unsupported::missing("hash")),
        },
        family => Err(Unsupported::invalid(
            "derivedKeyType",
            format!("{} keys have no derivable length", family),
        )),
    }
}

fn accept(_: &Check<'_>) -> CapabilityResult {
    Ok(())
}

// Shared field rules

fn require_hash(check: &Check<'_>) -> Result<HashName, Unsupported> {
    match check.desc.hash {
        Param::Present(hash) => {
            hash_allowed(hash, check.policy)?;
            Ok(hash)
        }
        Param::Absent => Err(Unsupported::missing("hash")),
        Param::Malformed => Err(Unsupported::invalid("hash", "not a supported hash algorithm")),
    }
}

fn hash_allowed(hash: HashName, policy: &ResolverPolicy) -> CapabilityResult {
    if hash == HashName::Sha1 && !policy.allow_sha1 {
        return Err(Unsupported::PolicyRefused {
            detail: "SHA-1 is disabled".to_string(),
        });
    }
    Ok(())
}

fn require_buffer(param: &Param<usize>, field: &'static str) -> Result<usize, Unsupported> {
    match param {
        Param::Present(len) => Ok(*len),
        Param::Absent => Err(Unsupported::missing(field)),
        Param::Malformed => Err(Unsupported::invalid(field, "not a byte buffer")),
    }
}

fn optional_buffer(param: &Param<usize>, field: &'static str) -> CapabilityResult {
    match param {
        Param::Malformed => Err(Unsupported::invalid(field, "not a byte buffer")),
        _ => Ok(()),
    }
}

fn require_u32(param: &Param<u32>, field: &'static str) -> Result<u32, Unsupported> {
    match param {
        Param::Present(value) => Ok(*value),
        Param::Absent => Err(Unsupported::missing(field)),
        Param::Malformed => Err(Unsupported::invalid(field, "not a non-negative integer")),
    }
}

/// KDF output lengths: present, non-negative, whole bytes. Zero is allowed.
fn require_byte_aligned_output(length: OutputLength) -> CapabilityResult {
    match length {
        OutputLength::Bits(bits) if bits % 8 == 0 => Ok(()),
        OutputLength::Bits(bits) => Err(Unsupported::invalid(
            "length",
            format!("{} is not a multiple of 8", bits),
        )),
        OutputLength::Omitted => Err(Unsupported::missing("length")),
        OutputLength::Malformed => Err(Unsupported::invalid("length", "not a non-negative integer")),
    }
}

// sign / verify

fn rsa_pss_sign(check: &Check<'_>) -> CapabilityResult {
    require_u32(&check.desc.salt_length, "saltLength").map(|_| ())
}

fn ecdsa_sign(check: &Check<'_>) -> CapabilityResult {
    require_hash(check).map(|_| ())
}

/// Ed448 signing is only available without a context string. A zero-length
/// context is the same as none.
fn ed448_sign(check: &Check<'_>) -> CapabilityResult {
    match check.desc.context {
        Param::Absent | Param::Present(0) => Ok(()),
        Param::Present(_) => Err(Unsupported::invalid(
            "context",
            "non-empty Ed448 context is not supported",
        )),
        Param::Malformed => Err(Unsupported::invalid("context", "not a byte buffer")),
    }
}

// digest

fn digest(check: &Check<'_>) -> CapabilityResult {
    match check.desc.family.digest() {
        Some(hash) => hash_allowed(hash, check.policy),
        None => Err(Unsupported::OperationNotSupported {
            family: check.desc.family,
            operation: Operation::Digest,
        }),
    }
}

// encrypt / decrypt, and the wrapKey fallback

fn rsa_oaep_encrypt(check: &Check<'_>) -> CapabilityResult {
    optional_buffer(&check.desc.label, "label")
}

fn aes_ctr_encrypt(check: &Check<'_>) -> CapabilityResult {
    let counter = require_buffer(&check.desc.counter, "counter")?;
    if counter != AES_BLOCK_BYTES {
        return Err(Unsupported::invalid(
            "counter",
            format!("must be {} bytes, got {}", AES_BLOCK_BYTES, counter),
        ));
    }

    let length = require_u32(&check.desc.length, "length")?;
    if length == 0 || length > 128 {
        return Err(Unsupported::invalid(
            "length",
            format!("counter bits must be in 1..=128, got {}", length),
        ));
    }
    Ok(())
}

fn aes_cbc_encrypt(check: &Check<'_>) -> CapabilityResult {
    let iv = require_buffer(&check.desc.iv, "iv")?;
    if iv != AES_BLOCK_BYTES {
        return Err(Unsupported::invalid(
            "iv",
            format!("must be {} bytes, got {}", AES_BLOCK_BYTES, iv),
        ));
    }
    Ok(())
}

fn aes_gcm_encrypt(check: &Check<'_>) -> CapabilityResult {
    if require_buffer(&check.desc.iv, "iv")? == 0 {
        return Err(Unsupported::invalid("iv", "must not be empty"));
    }

    match check.desc.tag_length {
        Param::Absent => {}
        Param::Present(bits) if GCM_TAG_LENGTHS.contains(&bits) => {}
        Param::Present(bits) => {
            return Err(Unsupported::invalid(
                "tagLength",
                format!("{} is not a GCM tag length", bits),
            ))
        }
        Param::Malformed => {
            return Err(Unsupported::invalid("tagLength", "not a non-negative integer"))
        }
    }

    optional_buffer(&check.desc.additional_data, "additionalData")
}

// generateKey / importKey

fn rsa_generate_key(check: &Check<'_>) -> CapabilityResult {
    require_hash(check)?;

    let modulus = require_u32(&check.desc.modulus_length, "modulusLength")?;
    if modulus == 0 {
        return Err(Unsupported::invalid("modulusLength", "must be greater than 0"));
    }
    if modulus < check.policy.min_rsa_modulus_length {
        return Err(Unsupported::PolicyRefused {
            detail: format!(
                "modulusLength {} is below the minimum of {}",
                modulus, check.policy.min_rsa_modulus_length
            ),
        });
    }

    match &check.desc.public_exponent {
        Param::Present(exponent) => public_exponent(exponent),
        Param::Absent => Err(Unsupported::missing("publicExponent")),
        Param::Malformed => Err(Unsupported::invalid("publicExponent", "not a byte buffer")),
    }
}

/// Imported RSA keys carry their own modulus and exponent. Generation
/// parameters are tolerated when well formed.
fn rsa_import_key(check: &Check<'_>) -> CapabilityResult {
    require_hash(check)?;

    if check.desc.modulus_length == Param::Malformed {
        return Err(Unsupported::invalid("modulusLength", "not a non-negative integer"));
    }
    match &check.desc.public_exponent {
        Param::Present(exponent) => public_exponent(exponent),
        Param::Absent => Ok(()),
        Param::Malformed => Err(Unsupported::invalid("publicExponent", "not a byte buffer")),
    }
}

/// Big-endian exponent: odd, at least 3, at most 32 significant bits.
fn public_exponent(bytes: &[u8]) -> CapabilityResult {
    let significant: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > 4 {
        return Err(Unsupported::invalid("publicExponent", "wider than 32 bits"));
    }

    let value = significant
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
    if value < 3 || value % 2 == 0 {
        return Err(Unsupported::invalid(
            "publicExponent",
            format!("{} is not an odd exponent of at least 3", value),
        ));
    }
    Ok(())
}

fn ec_key_params(check: &Check<'_>) -> CapabilityResult {
    match check.desc.named_curve {
        Param::Present(curve) if curve.is_ec() => Ok(()),
        Param::Present(curve) => Err(Unsupported::invalid(
            "namedCurve",
            format!("{} is not usable with {}", curve, check.desc.family),
        )),
        Param::Absent => Err(Unsupported::missing("namedCurve")),
        Param::Malformed => Err(Unsupported::invalid("namedCurve", "not a supported curve")),
    }
}

/// HMAC `length` is optional; when given it must be a positive whole number
/// of bytes.
fn hmac_key_params(check: &Check<'_>) -> CapabilityResult {
    require_hash(check)?;

    match check.desc.length {
        Param::Absent => Ok(()),
        Param::Present(bits) if bits > 0 && bits % 8 == 0 => Ok(()),
        Param::Present(bits) => Err(Unsupported::invalid(
            "length",
            format!("{} is not a positive multiple of 8", bits),
        )),
        Param::Malformed => Err(Unsupported::invalid("length", "not a non-negative integer")),
    }
}

fn aes_length(param: &Param<u32>) -> CapabilityResult {
    match param {
        Param::Present(bits) if AES_KEY_LENGTHS.contains(bits) => Ok(()),
        Param::Present(bits) => Err(Unsupported::invalid(
            "length",
            format!("{} is not 128, 192 or 256", bits),
        )),
        Param::Absent => Err(Unsupported::missing("length")),
        Param::Malformed => Err(Unsupported::invalid("length", "not a non-negative integer")),
    }
}

fn aes_generate_key(check: &Check<'_>) -> CapabilityResult {
    aes_length(&check.desc.length)
}

/// The raw key material fixes the AES key size on import, so `length` may
/// be omitted.
fn aes_import_key(check: &Check<'_>) -> CapabilityResult {
    if check.desc.length.is_absent() {
        return Ok(());
    }
    aes_length(&check.desc.length)
}

// deriveBits / deriveKey

fn hkdf_derive_bits(check: &Check<'_>) -> CapabilityResult {
    require_hash(check)?;
    require_buffer(&check.desc.salt, "salt")?;
    require_buffer(&check.desc.info, "info")?;
    require_byte_aligned_output(check.length)
}

fn pbkdf2_derive_bits(check: &Check<'_>) -> CapabilityResult {
    require_hash(check)?;
    require_buffer(&check.desc.salt, "salt")?;

    let iterations = require_u32(&check.desc.iterations, "iterations")?;
    if iterations == 0 {
        return Err(Unsupported::invalid("iterations", "must be greater than 0"));
    }
    if iterations < check.policy.min_pbkdf2_iterations {
        return Err(Unsupported::PolicyRefused {
            detail: format!(
                "{} iterations is below the minimum of {}",
                iterations, check.policy.min_pbkdf2_iterations
            ),
        });
    }

    require_byte_aligned_output(check.length)
}

/// ECDH, X25519 and X448 need the peer's public key of the same family.
/// The output may be omitted (the full secret) or truncated to any length up
/// to the curve's secret size.
fn key_agreement_derive_bits(check: &Check<'_>) -> CapabilityResult {
    let family = check.desc.family;
    let key = match &check.desc.public {
        Param::Present(key) => key,
        Param::Absent => return Err(Unsupported::missing("public")),
        Param::Malformed => return Err(Unsupported::invalid("public", "not a key")),
    };

    if key.family != family {
        return Err(Unsupported::KeyMismatch {
            detail: format!("{} key given for {}", key.family, family),
        });
    }
    if key.role != KeyRole::Public {
        return Err(Unsupported::KeyMismatch {
            detail: "peer key must be a public key".to_string(),
        });
    }

    let curve: Option<CurveName> = key.curve();
    if family == AlgorithmFamily::Ecdh {
        if let Some(curve) = curve.filter(|c| !c.is_ec()) {
            return Err(Unsupported::KeyMismatch {
                detail: format!("{} is not an ECDH curve", curve),
            });
        }
    }

    match check.length {
        OutputLength::Omitted => Ok(()),
        OutputLength::Malformed => {
            Err(Unsupported::invalid("length", "not a non-negative integer"))
        }
        OutputLength::Bits(bits) => match curve {
            Some(curve) if bits > curve.shared_secret_bits() => Err(Unsupported::invalid(
                "length",
                format!(
                    "{} bits exceeds the {}-bit {} secret",
                    bits,
                    curve.shared_secret_bits(),
                    curve
                ),
            )),
            _ => Ok(()),
        },
    }
}
