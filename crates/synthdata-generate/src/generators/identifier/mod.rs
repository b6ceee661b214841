use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, random_alphanumeric};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_NUMBER_MIN: i64 = 1;
const DEFAULT_NUMBER_MAX: i64 = 100_000;
const DEFAULT_STRING_LEN: i64 = 10;
/// Longest `string` value a field may request.
const MAX_STRING_LEN: i64 = 10_000;
const DEFAULT_TRUE_RATE: f64 = 0.5;

const NUMBER_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int),
    ParamSpec::new("max", ParamKind::Int),
];
const STRING_PARAMS: &[ParamSpec] = &[ParamSpec::new("length", ParamKind::Int)];
const BOOLEAN_PARAMS: &[ParamSpec] = &[ParamSpec::new("true_rate", ParamKind::Float)];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(UuidGenerator));
    registry.register_generator(Box::new(NumberGenerator));
    registry.register_generator(Box::new(StringGenerator));
    registry.register_generator(Box::new(BooleanGenerator));
}

struct UuidGenerator;

impl Generator for UuidGenerator {
    fn id(&self) -> TypeId {
        TypeId::Uuid
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let bytes: [u8; 16] = rng.random();
        let value = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(GeneratedValue::Text(value.to_string()))
    }
}

struct NumberGenerator;

impl Generator for NumberGenerator {
    fn id(&self) -> TypeId {
        TypeId::Number
    }

    fn params(&self) -> &'static [ParamSpec] {
        NUMBER_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        params
            .int_range("number", "min", "max", (DEFAULT_NUMBER_MIN, DEFAULT_NUMBER_MAX))
            .map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (min, max) =
            params.int_range("number", "min", "max", (DEFAULT_NUMBER_MIN, DEFAULT_NUMBER_MAX))?;
        Ok(GeneratedValue::Int(rng.random_range(min..=max)))
    }
}

struct StringGenerator;

impl StringGenerator {
    fn length(params: &ParamMap<'_>) -> Result<usize, GenerationError> {
        let length = params.get_i64("length").unwrap_or(DEFAULT_STRING_LEN);
        if !(1..=MAX_STRING_LEN).contains(&length) {
            return Err(GenerationError::InvalidOptions(format!(
                "string: length must be between 1 and {MAX_STRING_LEN}"
            )));
        }
        Ok(length as usize)
    }
}

impl Generator for StringGenerator {
    fn id(&self) -> TypeId {
        TypeId::String
    }

    fn params(&self) -> &'static [ParamSpec] {
        STRING_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Self::length(params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let length = Self::length(params)?;
        Ok(GeneratedValue::Text(random_alphanumeric(length, rng)))
    }
}

struct BooleanGenerator;

impl BooleanGenerator {
    fn true_rate(params: &ParamMap<'_>) -> Result<f64, GenerationError> {
        let rate = params.get_f64("true_rate").unwrap_or(DEFAULT_TRUE_RATE);
        if !(0.0..=1.0).contains(&rate) {
            return Err(GenerationError::InvalidOptions(
                "boolean: true_rate must be within [0, 1]".to_string(),
            ));
        }
        Ok(rate)
    }
}

impl Generator for BooleanGenerator {
    fn id(&self) -> TypeId {
        TypeId::Boolean
    }

    fn params(&self) -> &'static [ParamSpec] {
        BOOLEAN_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Self::true_rate(params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let rate = Self::true_rate(params)?;
        Ok(GeneratedValue::Bool(rng.random_bool(rate)))
    }
}
