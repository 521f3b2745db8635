//! Descriptor Normalizer
//!
//! Turns the caller's algorithm argument (a bare name, a JSON object, or an
//! already built descriptor) into one closed [`AlgorithmDescriptor`] record.
//! Normalization never fails: shapes it cannot read collapse to the
//! [`AlgorithmFamily::Invalid`] family, and fields of the wrong type are kept
//! as [`Param::Malformed`] for the validators to reject. The normalizer has no
//! family-specific knowledge.

use serde_json::{Map, Value};

use super::registry::{family_of, AlgorithmFamily, CurveName, HashName};
use crate::keys::KeyReference;

/// Three-state optional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param<T> {
    Absent,
    Present(T),
    /// Supplied, but with a type or range the field cannot hold.
    Malformed,
}

impl<T> Default for Param<T> {
    fn default() -> Self {
        Param::Absent
    }
}

impl<T> Param<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Param::Absent)
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Param::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Param<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Param::Present(value),
            None => Param::Malformed,
        }
    }
}

/// Byte length of a buffer parameter. Only presence and size are checked.
pub type ByteLength = usize;

/// Normalized algorithm parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub family: AlgorithmFamily,
    pub hash: Param<HashName>,
    pub length: Param<u32>,
    pub named_curve: Param<CurveName>,
    pub salt_length: Param<u32>,
    pub context: Param<ByteLength>,
    pub salt: Param<ByteLength>,
    pub info: Param<ByteLength>,
    pub iterations: Param<u32>,
    pub modulus_length: Param<u32>,
    pub public_exponent: Param<Vec<u8>>,
    pub public: Param<KeyReference>,
    pub iv: Param<ByteLength>,
    pub counter: Param<ByteLength>,
    pub additional_data: Param<ByteLength>,
    pub tag_length: Param<u32>,
    pub label: Param<ByteLength>,
}

impl AlgorithmDescriptor {
    /// Descriptor for a bare algorithm name: every field absent.
    pub fn new(family: AlgorithmFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, hash: HashName) -> Self {
        self.hash = Param::Present(hash);
        self
    }

    pub fn with_length(mut self, bits: u32) -> Self {
        self.length = Param::Present(bits);
        self
    }

    pub fn with_named_curve(mut self, curve: CurveName) -> Self {
        self.named_curve = Param::Present(curve);
        self
    }

    pub fn with_salt_length(mut self, bytes: u32) -> Self {
        self.salt_length = Param::Present(bytes);
        self
    }

    pub fn with_context(mut self, context: &[u8]) -> Self {
        self.context = Param::Present(context.len());
        self
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Param::Present(salt.len());
        self
    }

    pub fn with_info(mut self, info: &[u8]) -> Self {
        self.info = Param::Present(info.len());
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Param::Present(iterations);
        self
    }

    pub fn with_modulus_length(mut self, bits: u32) -> Self {
        self.modulus_length = Param::Present(bits);
        self
    }

    pub fn with_public_exponent(mut self, exponent: &[u8]) -> Self {
        self.public_exponent = Param::Present(exponent.to_vec());
        self
    }

    pub fn with_public(mut self, key: KeyReference) -> Self {
        self.public = Param::Present(key);
        self
    }

    pub fn with_iv(mut self, iv: &[u8]) -> Self {
        self.iv = Param::Present(iv.len());
        self
    }

    pub fn with_counter(mut self, counter: &[u8]) -> Self {
        self.counter = Param::Present(counter.len());
        self
    }

    pub fn with_additional_data(mut self, data: &[u8]) -> Self {
        self.additional_data = Param::Present(data.len());
        self
    }

    pub fn with_tag_length(mut self, bits: u32) -> Self {
        self.tag_length = Param::Present(bits);
        self
    }

    pub fn with_label(mut self, label: &[u8]) -> Self {
        self.label = Param::Present(label.len());
        self
    }
}

/// The algorithm argument of a capability query, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmInput {
    /// Bare algorithm name, e.g. `"Ed25519"`.
    Name(String),
    /// Any JSON value: a name, an `{ "name": ..., ... }` object, or garbage.
    Json(Value),
    /// Parameters already built in Rust.
    Descriptor(AlgorithmDescriptor),
}

impl From<&str> for AlgorithmInput {
    fn from(name: &str) -> Self {
        AlgorithmInput::Name(name.to_string())
    }
}

impl From<String> for AlgorithmInput {
    fn from(name: String) -> Self {
        AlgorithmInput::Name(name)
    }
}

impl From<Value> for AlgorithmInput {
    fn from(value: Value) -> Self {
        AlgorithmInput::Json(value)
    }
}

impl From<AlgorithmDescriptor> for AlgorithmInput {
    fn from(descriptor: AlgorithmDescriptor) -> Self {
        AlgorithmInput::Descriptor(descriptor)
    }
}

/// Normalizes any algorithm argument into a descriptor.
pub fn normalize(input: &AlgorithmInput) -> AlgorithmDescriptor {
    match input {
        AlgorithmInput::Name(name) => AlgorithmDescriptor::new(family_of(name)),
        AlgorithmInput::Json(value) => normalize_json(value),
        AlgorithmInput::Descriptor(descriptor) => descriptor.clone(),
    }
}

/// Normalizes a JSON algorithm argument.
///
/// A string is a bare name. An object must carry a string `name`. Anything
/// else, including `null`, yields the `Invalid` family.
pub fn normalize_json(value: &Value) -> AlgorithmDescriptor {
    match value {
        Value::String(name) => AlgorithmDescriptor::new(family_of(name)),
        Value::Object(fields) => match fields.get("name") {
            Some(Value::String(name)) => from_fields(family_of(name), fields),
            _ => AlgorithmDescriptor::invalid(),
        },
        _ => AlgorithmDescriptor::invalid(),
    }
}

fn from_fields(family: AlgorithmFamily, fields: &Map<String, Value>) -> AlgorithmDescriptor {
    let field = |name: &str| fields.get(name);

    AlgorithmDescriptor {
        family,
        hash: read(field("hash"), hash_param),
        length: read(field("length"), json_u32),
        named_curve: read(field("namedCurve"), |v| {
            v.as_str().and_then(CurveName::from_name)
        }),
        salt_length: read(field("saltLength"), json_u32),
        context: read(field("context"), byte_length),
        salt: read(field("salt"), byte_length),
        info: read(field("info"), byte_length),
        iterations: read(field("iterations"), json_u32),
        modulus_length: read(field("modulusLength"), json_u32),
        public_exponent: read(field("publicExponent"), json_bytes),
        public: read(field("public"), KeyReference::from_json),
        iv: read(field("iv"), byte_length),
        counter: read(field("counter"), byte_length),
        additional_data: read(field("additionalData"), byte_length),
        tag_length: read(field("tagLength"), json_u32),
        label: read(field("label"), byte_length),
    }
}

fn read<T>(value: Option<&Value>, parse: impl Fn(&Value) -> Option<T>) -> Param<T> {
    match value {
        None => Param::Absent,
        Some(value) => parse(value).into(),
    }
}

/// `"SHA-256"` or `{ "name": "SHA-256" }`.
fn hash_param(value: &Value) -> Option<HashName> {
    let name = match value {
        Value::Object(fields) => fields.get("name")?.as_str()?,
        other => other.as_str()?,
    };
    HashName::from_name(name)
}

/// Non-negative integral number that fits in 32 bits. `8.0` is accepted,
/// `8.5`, `-8` and `"8"` are not.
pub(crate) fn json_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let n = value.as_f64()?;
    if n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n) {
        Some(n as u32)
    } else {
        None
    }
}

/// Byte buffer given as an array of octets or as `{ "byteLength": n }`.
fn byte_length(value: &Value) -> Option<ByteLength> {
    match value {
        Value::Array(_) => json_bytes(value).map(|bytes| bytes.len()),
        Value::Object(fields) => {
            let n = fields.get("byteLength")?.as_u64()?;
            usize::try_from(n).ok()
        }
        _ => None,
    }
}

fn json_bytes(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|octet| octet.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}
