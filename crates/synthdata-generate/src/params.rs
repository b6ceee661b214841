use serde_json::{Map, Value};

use crate::errors::GenerationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    String,
}

/// Declared option accepted by a generator.
#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind) -> Self {
        Self { key, kind }
    }
}

/// Field options that passed validation against a generator's specs.
#[derive(Clone, Copy, Debug)]
pub struct ParamMap<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl ParamMap<'static> {
    pub fn empty() -> Self {
        Self { map: None }
    }
}

/// Check every option key against `specs`; unknown keys and wrongly-typed
/// values are rejected.
pub fn validate_params<'a>(
    options: &'a Map<String, Value>,
    specs: &[ParamSpec],
    ctx: &str,
) -> Result<ParamMap<'a>, GenerationError> {
    for (key, value) in options {
        let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
            return Err(GenerationError::InvalidOptions(format!(
                "{ctx}: unknown option '{key}'"
            )));
        };
        validate_kind(ctx, key, spec.kind, value)?;
    }

    Ok(ParamMap {
        map: if options.is_empty() {
            None
        } else {
            Some(options)
        },
    })
}

impl<'a> ParamMap<'a> {
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_i64())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_f64())
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_str())
    }

    /// Inclusive integer range from `min`/`max` options.
    pub fn int_range(
        &self,
        ctx: &str,
        min_key: &str,
        max_key: &str,
        defaults: (i64, i64),
    ) -> Result<(i64, i64), GenerationError> {
        let min = self.get_i64(min_key).unwrap_or(defaults.0);
        let max = self.get_i64(max_key).unwrap_or(defaults.1);
        if min > max {
            return Err(GenerationError::InvalidOptions(format!(
                "{ctx}: {min_key} must be <= {max_key}"
            )));
        }
        Ok((min, max))
    }
}

fn validate_kind(
    ctx: &str,
    key: &str,
    kind: ParamKind,
    value: &Value,
) -> Result<(), GenerationError> {
    let valid = match kind {
        ParamKind::Int => value.as_i64().is_some(),
        ParamKind::Float => value.as_f64().is_some(),
        ParamKind::String => value.is_string(),
    };

    if valid {
        Ok(())
    } else {
        Err(GenerationError::InvalidOptions(format!(
            "{ctx}: invalid value for option '{key}'"
        )))
    }
}
