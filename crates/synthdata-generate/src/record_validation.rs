//! Rule-based checks over generated records.
//!
//! Rules are declared per column (`{"email": [{"type": "preset",
//! "preset_name": "email"}]}`), compiled once, then evaluated row by row.
//! A missing column reads as null. Only `required` and `type` reject nulls.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::GeneratedTable;
use crate::errors::GenerationError;
use crate::generators::GeneratedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    String,
    Integer,
    /// Integers count as floats.
    Float,
    Boolean,
}

impl ExpectedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedType::String => "string",
            ExpectedType::Integer => "integer",
            ExpectedType::Float => "float",
            ExpectedType::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &GeneratedValue) -> bool {
        matches!(
            (self, value),
            (ExpectedType::String, GeneratedValue::Text(_))
                | (ExpectedType::Integer, GeneratedValue::Int(_))
                | (ExpectedType::Float, GeneratedValue::Int(_))
                | (ExpectedType::Boolean, GeneratedValue::Bool(_))
        )
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named format checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPreset {
    Email,
    Phone,
    IdCard,
    Url,
    Ip,
    Date,
    Datetime,
    Chinese,
    Alphanumeric,
    Username,
    /// At least 8 characters with a lowercase letter, an uppercase letter and a digit.
    Password,
    PositiveInteger,
    Decimal,
}

impl ValidationPreset {
    fn compile(&self) -> Result<Check, GenerationError> {
        let pattern = match self {
            ValidationPreset::Email => r"^[\w.-]+@[\w.-]+\.\w+$",
            ValidationPreset::Phone => r"^1[3-9]\d{9}$",
            ValidationPreset::IdCard => r"^\d{17}[\dXx]$",
            ValidationPreset::Url => r"^https?://[\w.-]+",
            ValidationPreset::Ip => r"^(\d{1,3}\.){3}\d{1,3}$",
            ValidationPreset::Date => r"^\d{4}-\d{2}-\d{2}$",
            ValidationPreset::Datetime => r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}",
            ValidationPreset::Chinese => r"^[\x{4e00}-\x{9fa5}]+$",
            ValidationPreset::Alphanumeric => r"^[a-zA-Z0-9]+$",
            ValidationPreset::Username => r"^[a-zA-Z][a-zA-Z0-9_]{2,19}$",
            ValidationPreset::Password => return Ok(Check::StrongPassword),
            ValidationPreset::PositiveInteger => r"^[1-9]\d*$",
            ValidationPreset::Decimal => r"^-?\d+(\.\d+)?$",
        };
        Ok(Check::Pattern(compile_pattern(pattern)?))
    }

    fn message(&self) -> &'static str {
        match self {
            ValidationPreset::Email => "invalid email address",
            ValidationPreset::Phone => "invalid phone number",
            ValidationPreset::IdCard => "invalid id card number",
            ValidationPreset::Url => "invalid url",
            ValidationPreset::Ip => "invalid ip address",
            ValidationPreset::Date => "invalid date (YYYY-MM-DD)",
            ValidationPreset::Datetime => "invalid datetime",
            ValidationPreset::Chinese => "must contain only Chinese characters",
            ValidationPreset::Alphanumeric => "must contain only letters and digits",
            ValidationPreset::Username => {
                "username must start with a letter and have 3-20 letters, digits or underscores"
            }
            ValidationPreset::Password => {
                "password needs 8+ characters with upper and lower case letters and a digit"
            }
            ValidationPreset::PositiveInteger => "must be a positive integer",
            ValidationPreset::Decimal => "must be a number",
        }
    }
}

/// What a rule checks, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Not null and not empty text.
    Required,
    Type {
        expected_type: ExpectedType,
    },
    /// Character count of the rendered value.
    Length {
        #[serde(default)]
        min_len: Option<usize>,
        #[serde(default)]
        max_len: Option<usize>,
        #[serde(default)]
        exact_len: Option<usize>,
    },
    /// Numeric bounds; numeric text is parsed.
    Range {
        #[serde(default)]
        min_val: Option<f64>,
        #[serde(default)]
        max_val: Option<f64>,
    },
    /// Regex that must match at the start of the value; empty text passes.
    Pattern { pattern: String },
    Enum { allowed_values: Vec<Value> },
    /// No earlier row holds the same value.
    Unique,
    Preset { preset_name: ValidationPreset },
}

/// One check on a column, with an optional message replacing the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(flatten)]
    pub check: RuleCheck,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldRule {
    pub fn new(check: RuleCheck) -> Self {
        Self {
            check,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

static MISSING: GeneratedValue = GeneratedValue::Null;

/// Rules keyed by column name.
pub type FieldRules = BTreeMap<String, Vec<FieldRule>>;

/// Outcome for one record; `errors` maps column names to failed checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordValidation {
    pub index: usize,
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Percentage of valid records, rounded to two decimals.
    pub valid_rate: f64,
    pub field_error_counts: BTreeMap<String, usize>,
}

#[derive(Debug)]
enum Check {
    Required,
    Type(ExpectedType),
    Length {
        min: Option<usize>,
        max: Option<usize>,
        exact: Option<usize>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    Pattern(Regex),
    StrongPassword,
    Enum(Vec<Value>),
    Unique,
}

#[derive(Debug)]
struct CompiledRule {
    check: Check,
    message: Option<String>,
    preset_message: Option<&'static str>,
}

impl CompiledRule {
    fn compile(rule: &FieldRule) -> Result<Self, GenerationError> {
        let mut preset_message = None;
        let check = match &rule.check {
            RuleCheck::Required => Check::Required,
            RuleCheck::Type { expected_type } => Check::Type(*expected_type),
            RuleCheck::Length {
                min_len,
                max_len,
                exact_len,
            } => Check::Length {
                min: *min_len,
                max: *max_len,
                exact: *exact_len,
            },
            RuleCheck::Range { min_val, max_val } => Check::Range {
                min: *min_val,
                max: *max_val,
            },
            RuleCheck::Pattern { pattern } => {
                Check::Pattern(compile_pattern(&format!("^(?:{pattern})"))?)
            }
            RuleCheck::Enum { allowed_values } => Check::Enum(allowed_values.clone()),
            RuleCheck::Unique => Check::Unique,
            RuleCheck::Preset { preset_name } => {
                preset_message = Some(preset_name.message());
                preset_name.compile()?
            }
        };
        Ok(Self {
            check,
            message: rule.message.clone(),
            preset_message,
        })
    }

    /// `None` when the value passes; otherwise the failure message.
    fn evaluate(
        &self,
        value: &GeneratedValue,
        seen: Option<&HashSet<GeneratedValue>>,
    ) -> Option<String> {
        let failure = match &self.check {
            Check::Required => match value {
                GeneratedValue::Null => Some("this field is required".to_string()),
                GeneratedValue::Text(text) if text.is_empty() => {
                    Some("this field is required".to_string())
                }
                _ => None,
            },
            Check::Type(expected) => {
                (!expected.accepts(value)).then(|| format!("type must be {expected}"))
            }
            Check::Length { min, max, exact } => {
                if value.is_null() {
                    return None;
                }
                let len = value.to_string().chars().count();
                if let Some(exact) = exact
                    && len != *exact
                {
                    Some(format!("length must be {exact}"))
                } else if let Some(min) = min
                    && len < *min
                {
                    Some(format!("length must be at least {min}"))
                } else if let Some(max) = max
                    && len > *max
                {
                    Some(format!("length must be at most {max}"))
                } else {
                    None
                }
            }
            Check::Range { min, max } => match numeric(value) {
                _ if value.is_null() => None,
                None => Some("value must be numeric".to_string()),
                Some(number) => {
                    if let Some(min) = min
                        && number < *min
                    {
                        Some(format!("value must be at least {min}"))
                    } else if let Some(max) = max
                        && number > *max
                    {
                        Some(format!("value must be at most {max}"))
                    } else {
                        None
                    }
                }
            },
            Check::Pattern(pattern) => {
                let text = value.to_string();
                (!text.is_empty() && !pattern.is_match(&text)).then(|| "invalid format".to_string())
            }
            Check::StrongPassword => {
                let text = value.to_string();
                (!text.is_empty() && !is_strong_password(&text)).then(|| "invalid format".to_string())
            }
            Check::Enum(allowed) => {
                (!value.is_null() && !allowed.iter().any(|candidate| same_value(value, candidate)))
                    .then(|| {
                        let listed: Vec<String> = allowed.iter().map(render_json).collect();
                        format!("value must be one of: {}", listed.join(", "))
                    })
            }
            Check::Unique => (!value.is_null() && seen.is_some_and(|seen| seen.contains(value)))
                .then(|| "value must be unique".to_string()),
        };
        failure.map(|default| {
            self.message
                .clone()
                .or_else(|| self.preset_message.map(str::to_string))
                .unwrap_or(default)
        })
    }
}

/// Check a single value. `unique` rules always pass without other rows.
pub fn validate_value(
    value: &GeneratedValue,
    rules: &[FieldRule],
) -> Result<Vec<String>, GenerationError> {
    let compiled = rules
        .iter()
        .map(CompiledRule::compile)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(compiled
        .iter()
        .filter_map(|rule| rule.evaluate(value, None))
        .collect())
}

/// Check every record of `table`, in row order.
///
/// `unique` rules compare against the values of earlier rows, so the first
/// occurrence of a duplicate passes and later ones fail.
pub fn validate_table(
    table: &GeneratedTable,
    rules: &FieldRules,
) -> Result<Vec<RecordValidation>, GenerationError> {
    let mut compiled = Vec::with_capacity(rules.len());
    for (field, field_rules) in rules {
        let field_rules = field_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| match err {
                GenerationError::InvalidOptions(message) => {
                    GenerationError::InvalidOptions(format!("rules for '{field}': {message}"))
                }
                other => other,
            })?;
        let tracks_unique = field_rules
            .iter()
            .any(|rule| matches!(rule.check, Check::Unique));
        compiled.push((field.as_str(), field_rules, tracks_unique));
    }

    let mut seen: BTreeMap<&str, HashSet<GeneratedValue>> = BTreeMap::new();
    let mut results = Vec::with_capacity(table.len());
    for (index, row) in table.rows().iter().enumerate() {
        let mut errors = BTreeMap::new();
        for (field, field_rules, _) in &compiled {
            let value = row.get(*field).unwrap_or(&MISSING);
            let field_errors: Vec<String> = field_rules
                .iter()
                .filter_map(|rule| rule.evaluate(value, seen.get(field)))
                .collect();
            if !field_errors.is_empty() {
                errors.insert(field.to_string(), field_errors);
            }
        }

        for (field, _, tracks_unique) in &compiled {
            if *tracks_unique
                && let Some(value) = row.get(*field)
                && !value.is_null()
            {
                seen.entry(*field).or_default().insert(value.clone());
            }
        }

        results.push(RecordValidation {
            index,
            valid: errors.is_empty(),
            errors,
        });
    }
    Ok(results)
}

pub fn validation_summary(results: &[RecordValidation]) -> ValidationSummary {
    let total = results.len();
    let valid_count = results.iter().filter(|result| result.valid).count();
    let mut field_error_counts = BTreeMap::new();
    for result in results {
        for (field, errors) in &result.errors {
            *field_error_counts.entry(field.clone()).or_insert(0) += errors.len();
        }
    }
    let valid_rate = if total == 0 {
        0.0
    } else {
        (valid_count as f64 / total as f64 * 10_000.0).round() / 100.0
    };
    ValidationSummary {
        total,
        valid_count,
        invalid_count: total - valid_count,
        valid_rate,
        field_error_counts,
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, GenerationError> {
    Regex::new(pattern)
        .map_err(|err| GenerationError::InvalidOptions(format!("invalid pattern: {err}")))
}

fn numeric(value: &GeneratedValue) -> Option<f64> {
    match value {
        GeneratedValue::Int(number) => Some(*number as f64),
        GeneratedValue::Text(text) => text.trim().parse().ok(),
        GeneratedValue::Bool(_) | GeneratedValue::Null => None,
    }
}

fn same_value(value: &GeneratedValue, candidate: &Value) -> bool {
    match (value, candidate) {
        (GeneratedValue::Int(number), Value::Number(other)) => {
            other.as_f64() == Some(*number as f64)
        }
        _ => value.to_json() == *candidate,
    }
}

fn render_json(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_strong_password(text: &str) -> bool {
    text.chars().count() >= 8
        && text.chars().any(|ch| ch.is_lowercase())
        && text.chars().any(|ch| ch.is_uppercase())
        && text.chars().any(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: &str) -> GeneratedValue {
        GeneratedValue::Text(value.to_string())
    }

    fn rule(value: Value) -> FieldRule {
        serde_json::from_value(value).expect("parse rule")
    }

    #[test]
    fn rules_parse_with_type_tag() {
        assert_eq!(
            rule(json!({"type": "length", "max_len": 4, "message": "too long"})),
            FieldRule::new(RuleCheck::Length {
                min_len: None,
                max_len: Some(4),
                exact_len: None,
            })
            .with_message("too long")
        );
        assert_eq!(
            rule(json!({"type": "preset", "preset_name": "id_card"})).check,
            RuleCheck::Preset {
                preset_name: ValidationPreset::IdCard
            }
        );
    }

    #[test]
    fn required_rejects_null_and_empty_text() {
        let rules = [rule(json!({"type": "required"}))];
        assert_eq!(
            validate_value(&GeneratedValue::Null, &rules).expect("validate"),
            vec!["this field is required"]
        );
        assert_eq!(validate_value(&text(""), &rules).expect("validate").len(), 1);
        assert!(validate_value(&text("x"), &rules).expect("validate").is_empty());
    }

    #[test]
    fn type_float_accepts_integers() {
        let rules = [rule(json!({"type": "type", "expected_type": "float"}))];
        assert!(validate_value(&GeneratedValue::Int(3), &rules).expect("validate").is_empty());
        assert_eq!(
            validate_value(&text("3"), &rules).expect("validate"),
            vec!["type must be float"]
        );
    }

    #[test]
    fn length_and_range_report_the_violated_bound() {
        let length = [rule(json!({"type": "length", "min_len": 2, "max_len": 3}))];
        assert_eq!(
            validate_value(&text("张三丰李"), &length).expect("validate"),
            vec!["length must be at most 3"]
        );
        assert!(validate_value(&text("张三"), &length).expect("validate").is_empty());

        let range = [rule(json!({"type": "range", "min_val": 18, "max_val": 65}))];
        assert_eq!(
            validate_value(&GeneratedValue::Int(70), &range).expect("validate"),
            vec!["value must be at most 65"]
        );
        assert!(validate_value(&text("42.5"), &range).expect("validate").is_empty());
        assert_eq!(
            validate_value(&text("¥1,000.00"), &range).expect("validate"),
            vec!["value must be numeric"]
        );
    }

    #[test]
    fn pattern_matches_at_start_and_skips_empty() {
        let rules = [rule(json!({"type": "pattern", "pattern": "[0-9]{3}"}))];
        assert!(validate_value(&text("123abc"), &rules).expect("validate").is_empty());
        assert!(validate_value(&text(""), &rules).expect("validate").is_empty());
        assert_eq!(
            validate_value(&text("ab123"), &rules).expect("validate"),
            vec!["invalid format"]
        );
    }

    #[test]
    fn enum_compares_json_values() {
        let rules = [rule(json!({"type": "enum", "allowed_values": ["男", "女", 1]}))];
        assert!(validate_value(&text("女"), &rules).expect("validate").is_empty());
        assert!(validate_value(&GeneratedValue::Int(1), &rules).expect("validate").is_empty());
        assert_eq!(
            validate_value(&text("x"), &rules).expect("validate"),
            vec!["value must be one of: 男, 女, 1"]
        );
    }

    #[test]
    fn presets_use_their_own_messages() {
        let email = [rule(json!({"type": "preset", "preset_name": "email"}))];
        assert_eq!(
            validate_value(&text("not-an-email"), &email).expect("validate"),
            vec!["invalid email address"]
        );

        let password = [rule(json!({"type": "preset", "preset_name": "password"}))
            .with_message("weak password")];
        assert_eq!(
            validate_value(&text("password"), &password).expect("validate"),
            vec!["weak password"]
        );
        assert!(validate_value(&text("Passw0rdX"), &password).expect("validate").is_empty());

        let chinese = [rule(json!({"type": "preset", "preset_name": "chinese"}))];
        assert!(validate_value(&text("中文"), &chinese).expect("validate").is_empty());
    }

    #[test]
    fn invalid_pattern_is_rejected_up_front() {
        let err = validate_value(&text("x"), &[rule(json!({"type": "pattern", "pattern": "("}))])
            .expect_err("bad regex");
        assert_eq!(err.kind(), "invalid_options");
    }

    #[test]
    fn summary_rounds_the_valid_rate() {
        let results: Vec<RecordValidation> = (0..3)
            .map(|index| RecordValidation {
                index,
                valid: index == 0,
                errors: if index == 0 {
                    BTreeMap::new()
                } else {
                    BTreeMap::from([("age".to_string(), vec!["bad".to_string()])])
                },
            })
            .collect();
        let summary = validation_summary(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.valid_count, 1);
        assert_eq!(summary.invalid_count, 2);
        assert_eq!(summary.valid_rate, 33.33);
        assert_eq!(summary.field_error_counts["age"], 2);
        assert_eq!(validation_summary(&[]).valid_rate, 0.0);
    }
}
