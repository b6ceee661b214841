use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, pick, random_digits};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_AMOUNT_MIN: f64 = 100.0;
const DEFAULT_AMOUNT_MAX: f64 = 100_000.0;
const DEFAULT_SYMBOL: &str = "¥";

const AMOUNT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Float),
    ParamSpec::new("max", ParamKind::Float),
    ParamSpec::new("symbol", ParamKind::String),
];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(BankCardGenerator));
    registry.register_generator(Box::new(AmountGenerator));
}

struct BankCardGenerator;

impl Generator for BankCardGenerator {
    fn id(&self) -> TypeId {
        TypeId::BankCard
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let prefix = pick(CARD_PREFIXES, rng);
        let rest = random_digits(12, rng);
        Ok(GeneratedValue::Text(format!("{prefix}{rest}")))
    }
}

/// Currency amount in `[min, max)` rendered with two decimals and
/// comma-grouped thousands.
struct AmountGenerator;

impl AmountGenerator {
    /// Bounds in cents, upper bound exclusive.
    fn cents_range(params: &ParamMap<'_>) -> Result<(i64, i64), GenerationError> {
        let min = params.get_f64("min").unwrap_or(DEFAULT_AMOUNT_MIN);
        let max = params.get_f64("max").unwrap_or(DEFAULT_AMOUNT_MAX);
        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(GenerationError::InvalidOptions(
                "amount: min and max must be finite and non-negative".to_string(),
            ));
        }
        let low = (min * 100.0).round() as i64;
        let high = (max * 100.0).round() as i64;
        if low >= high {
            return Err(GenerationError::InvalidOptions(
                "amount: min must be < max".to_string(),
            ));
        }
        Ok((low, high))
    }
}

impl Generator for AmountGenerator {
    fn id(&self) -> TypeId {
        TypeId::Amount
    }

    fn params(&self) -> &'static [ParamSpec] {
        AMOUNT_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Self::cents_range(params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (low, high) = Self::cents_range(params)?;
        let symbol = params.get_str("symbol").unwrap_or(DEFAULT_SYMBOL);
        let cents = rng.random_range(low..high);
        Ok(GeneratedValue::Text(format!("{symbol}{}", format_cents(cents))))
    }
}

fn format_cents(cents: i64) -> String {
    let units = (cents / 100).to_string();
    let fraction = cents % 100;
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (idx, ch) in units.chars().enumerate() {
        if idx > 0 && (units.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{fraction:02}")
}

const CARD_PREFIXES: &[&str] = &["6222", "6227", "6228", "9558", "6216"];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::{Map, Value, json};

    use crate::params::validate_params;

    #[test]
    fn cents_are_grouped_by_thousands() {
        assert_eq!(format_cents(10_000), "100.00");
        assert_eq!(format_cents(1_234_567), "12,345.67");
        assert_eq!(format_cents(9_999_999), "99,999.99");
        assert_eq!(format_cents(100_000_005), "1,000,000.05");
        assert_eq!(format_cents(5), "0.05");
    }

    #[test]
    fn amount_honours_symbol_and_range() {
        let opts: Map<String, Value> = json!({"min": 1.0, "max": 2.0, "symbol": "$"})
            .as_object()
            .cloned()
            .expect("object");
        let params = validate_params(&opts, AMOUNT_PARAMS, "amount").expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let value = AmountGenerator.generate(&params, &mut rng).expect("amount");
            let text = value.as_str().expect("text");
            assert!(text.starts_with("$1."), "{text}");
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let opts: Map<String, Value> = json!({"min": 10.0, "max": 1.0})
            .as_object()
            .cloned()
            .expect("object");
        let params = validate_params(&opts, AMOUNT_PARAMS, "amount").expect("valid kinds");
        let err = AmountGenerator.check(&params).expect_err("inverted");
        assert_eq!(err.kind(), "invalid_options");
    }
}
