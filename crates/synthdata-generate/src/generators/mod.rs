use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, RngCore};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::params::{ParamMap, ParamSpec, validate_params};

pub mod address;
pub mod company;
pub mod datetime;
pub mod finance;
pub mod identifier;
pub mod internet;
pub mod personal;
pub mod text;

/// Generated value for a field.
///
/// Generators never produce `Null`; it only appears after masking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GeneratedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            GeneratedValue::Null => Value::Null,
            GeneratedValue::Bool(value) => Value::Bool(*value),
            GeneratedValue::Int(value) => Value::Number(Number::from(*value)),
            GeneratedValue::Text(value) => Value::String(value.clone()),
        }
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedValue::Null => Ok(()),
            GeneratedValue::Bool(value) => write!(f, "{value}"),
            GeneratedValue::Int(value) => write!(f, "{value}"),
            GeneratedValue::Text(value) => f.write_str(value),
        }
    }
}

/// Produces one random value of a semantic domain per call.
pub trait Generator: Send + Sync {
    fn id(&self) -> TypeId;

    /// Options accepted by this generator.
    fn params(&self) -> &'static [ParamSpec] {
        &[]
    }

    /// Reject option combinations that would fail on every call.
    fn check(&self, _params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Ok(())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError>;
}

/// Registry mapping each type id to its generator.
pub struct GeneratorRegistry {
    generators: BTreeMap<TypeId, Box<dyn Generator>>,
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Registry with every built-in generator.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        identifier::register(&mut registry);
        personal::register(&mut registry);
        address::register(&mut registry);
        datetime::register(&mut registry);
        finance::register(&mut registry);
        internet::register(&mut registry);
        company::register(&mut registry);
        text::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// Register a generator, replacing any previous one for the same id.
    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.id(), generator);
    }

    pub fn generator(&self, type_id: &str) -> Option<&dyn Generator> {
        let id = type_id.parse::<TypeId>().ok()?;
        self.generators.get(&id).map(|generator| generator.as_ref())
    }

    /// Look up a generator, failing with `UnknownType`.
    pub fn resolve(&self, type_id: &str) -> Result<&dyn Generator, GenerationError> {
        self.generator(type_id)
            .ok_or_else(|| GenerationError::UnknownType(type_id.to_string()))
    }

    pub fn generator_ids(&self) -> Vec<TypeId> {
        self.generators.keys().copied().collect()
    }

    /// Generate a single value for `type_id` with the given options.
    pub fn generate(
        &self,
        type_id: &str,
        options: &Map<String, Value>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let generator = self.resolve(type_id)?;
        let params = validate_params(options, generator.params(), type_id)?;
        generator.check(&params)?;
        generator.generate(&params, rng)
    }
}

pub(crate) fn pick<'a>(values: &[&'a str], rng: &mut dyn RngCore) -> &'a str {
    values[rng.random_range(0..values.len())]
}

pub(crate) fn random_digits(len: usize, rng: &mut dyn RngCore) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub(crate) fn random_alphanumeric(len: usize, rng: &mut dyn RngCore) -> String {
    (0..len)
        .map(|_| char::from(ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn registry_covers_every_type() {
        let registry = GeneratorRegistry::new();
        assert_eq!(registry.generator_ids(), TypeId::ALL.to_vec());
        for id in TypeId::ALL {
            assert!(registry.generator(id.as_str()).is_some(), "missing {id}");
        }
    }

    #[test]
    fn unknown_type_is_reported() {
        let registry = GeneratorRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = registry
            .generate("bogus", &Map::new(), &mut rng)
            .expect_err("unknown type");
        assert!(matches!(err, GenerationError::UnknownType(ref id) if id == "bogus"));
    }

    #[test]
    fn values_render_as_plain_text() {
        assert_eq!(GeneratedValue::Bool(true).to_string(), "true");
        assert_eq!(GeneratedValue::Int(42).to_string(), "42");
        assert_eq!(GeneratedValue::Text("x".into()).to_string(), "x");
        assert_eq!(GeneratedValue::Null.to_string(), "");
        assert_eq!(GeneratedValue::Null.to_json(), Value::Null);
        assert_eq!(
            serde_json::to_value(GeneratedValue::Int(7)).expect("serialize"),
            serde_json::json!(7)
        );
    }
}
