use chrono::Utc;
use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_MIN_YEAR: i64 = 2020;
const DEFAULT_MAX_YEAR: i64 = 2024;
const DEFAULT_MAX_DAYS_AGO: i64 = 365;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const DATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_year", ParamKind::Int),
    ParamSpec::new("max_year", ParamKind::Int),
];
const TIMESTAMP_PARAMS: &[ParamSpec] = &[ParamSpec::new("max_days_ago", ParamKind::Int)];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(DateGenerator));
    registry.register_generator(Box::new(DatetimeGenerator));
    registry.register_generator(Box::new(TimestampGenerator));
}

fn year_range(ctx: &str, params: &ParamMap<'_>) -> Result<(i64, i64), GenerationError> {
    let (min, max) =
        params.int_range(ctx, "min_year", "max_year", (DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR))?;
    if min < 1 || max > 9999 {
        return Err(GenerationError::InvalidOptions(format!(
            "{ctx}: years must be within 1..=9999"
        )));
    }
    Ok((min, max))
}

/// Day is capped at 28 so every month is valid.
fn random_date(years: (i64, i64), rng: &mut dyn RngCore) -> String {
    let year = rng.random_range(years.0..=years.1);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    format!("{year:04}-{month:02}-{day:02}")
}

struct DateGenerator;

impl Generator for DateGenerator {
    fn id(&self) -> TypeId {
        TypeId::Date
    }

    fn params(&self) -> &'static [ParamSpec] {
        DATE_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        year_range("date", params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let years = year_range("date", params)?;
        Ok(GeneratedValue::Text(random_date(years, rng)))
    }
}

struct DatetimeGenerator;

impl Generator for DatetimeGenerator {
    fn id(&self) -> TypeId {
        TypeId::Datetime
    }

    fn params(&self) -> &'static [ParamSpec] {
        DATE_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        year_range("datetime", params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let years = year_range("datetime", params)?;
        let date = random_date(years, rng);
        let hour = rng.random_range(0..=23);
        let minute = rng.random_range(0..=59);
        let second = rng.random_range(0..=59);
        Ok(GeneratedValue::Text(format!(
            "{date} {hour:02}:{minute:02}:{second:02}"
        )))
    }
}

/// Unix epoch milliseconds within the last `max_days_ago` days.
struct TimestampGenerator;

impl TimestampGenerator {
    fn max_days_ago(params: &ParamMap<'_>) -> Result<i64, GenerationError> {
        let days = params.get_i64("max_days_ago").unwrap_or(DEFAULT_MAX_DAYS_AGO);
        if !(0..=36_500).contains(&days) {
            return Err(GenerationError::InvalidOptions(
                "timestamp: max_days_ago must be within 0..=36500".to_string(),
            ));
        }
        Ok(days)
    }
}

impl Generator for TimestampGenerator {
    fn id(&self) -> TypeId {
        TypeId::Timestamp
    }

    fn params(&self) -> &'static [ParamSpec] {
        TIMESTAMP_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Self::max_days_ago(params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let window = Self::max_days_ago(params)? * MS_PER_DAY;
        let now = Utc::now().timestamp_millis();
        let offset = rng.random_range(0..=window);
        Ok(GeneratedValue::Text((now - offset).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::{Map, Value, json};

    use crate::params::validate_params;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn date_respects_year_options() {
        let opts = options(json!({"min_year": 1999, "max_year": 1999}));
        let params = validate_params(&opts, DATE_PARAMS, "date").expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let value = DateGenerator.generate(&params, &mut rng).expect("date");
        assert!(value.as_str().expect("text").starts_with("1999-"));
    }

    #[test]
    fn timestamp_is_not_in_the_future() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let before = Utc::now().timestamp_millis();
        let value = TimestampGenerator
            .generate(&ParamMap::empty(), &mut rng)
            .expect("timestamp");
        let millis: i64 = value.as_str().expect("text").parse().expect("millis");
        assert!(millis <= Utc::now().timestamp_millis());
        assert!(millis >= before - DEFAULT_MAX_DAYS_AGO * MS_PER_DAY);
    }

    #[test]
    fn negative_window_is_rejected() {
        let opts = options(json!({"max_days_ago": -1}));
        let params = validate_params(&opts, TIMESTAMP_PARAMS, "timestamp").expect("valid kind");
        assert!(TimestampGenerator.check(&params).is_err());
    }
}
