//! Column masking for generated tables.
//!
//! A [`MaskRule`] either names a [`MaskPreset`] or a [`MaskStrategy`] with
//! options. Rules are compiled and checked before any value changes, so a bad
//! rule leaves the table untouched.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::dataset::GeneratedTable;
use crate::errors::GenerationError;
use crate::generators::GeneratedValue;
use crate::params::{ParamKind, ParamMap, ParamSpec, validate_params};

const DEFAULT_MASK_CHAR: char = '*';
const DEFAULT_HASH_LEN: i64 = 8;
const SHA256_HEX_LEN: i64 = 64;
const DEFAULT_TRUNCATE_LEN: i64 = 5;
const DEFAULT_TRUNCATE_SUFFIX: &str = "...";
const DEFAULT_REPLACEMENT: &str = "***";

const MASK_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("mask_char", ParamKind::String),
    ParamSpec::new("start", ParamKind::Int),
    ParamSpec::new("end", ParamKind::Int),
];
const HASH_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("algorithm", ParamKind::String),
    ParamSpec::new("length", ParamKind::Int),
];
const TRUNCATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("length", ParamKind::Int),
    ParamSpec::new("suffix", ParamKind::String),
];
const REPLACE_PARAMS: &[ParamSpec] = &[ParamSpec::new("replacement", ParamKind::String)];
const PARTIAL_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("pattern", ParamKind::String),
    ParamSpec::new("replacement", ParamKind::String),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStrategy {
    /// Overwrite characters `start..end` with `mask_char`.
    #[default]
    Mask,
    /// Hex SHA-256 digest, cut to `length` characters (0 keeps all 64).
    Hash,
    /// Keep the first `length` characters and append `suffix`.
    Truncate,
    /// Fixed `replacement` text.
    Replace,
    /// Characters in random order.
    Shuffle,
    Null,
    /// Regex substitution; `replacement` refers to groups as `$1` or `${1}`.
    Partial,
}

impl MaskStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskStrategy::Mask => "mask",
            MaskStrategy::Hash => "hash",
            MaskStrategy::Truncate => "truncate",
            MaskStrategy::Replace => "replace",
            MaskStrategy::Shuffle => "shuffle",
            MaskStrategy::Null => "null",
            MaskStrategy::Partial => "partial",
        }
    }

    fn params(&self) -> &'static [ParamSpec] {
        match self {
            MaskStrategy::Mask => MASK_PARAMS,
            MaskStrategy::Hash => HASH_PARAMS,
            MaskStrategy::Truncate => TRUNCATE_PARAMS,
            MaskStrategy::Replace => REPLACE_PARAMS,
            MaskStrategy::Partial => PARTIAL_PARAMS,
            MaskStrategy::Shuffle | MaskStrategy::Null => &[],
        }
    }
}

impl fmt::Display for MaskStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ready-made rules for common personal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPreset {
    /// `13812345678` -> `138****5678`
    Phone,
    /// `ab123456@qq.com` -> `ab***@qq.com`
    Email,
    /// first 6 and last 4 characters kept
    IdCard,
    /// first 4 and last 4 characters kept
    BankCard,
    /// first character kept
    Name,
    /// first 10 characters plus `***`
    Address,
    /// always `******`
    Password,
    /// first two octets kept
    Ip,
}

impl MaskPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskPreset::Phone => "phone",
            MaskPreset::Email => "email",
            MaskPreset::IdCard => "id_card",
            MaskPreset::BankCard => "bank_card",
            MaskPreset::Name => "name",
            MaskPreset::Address => "address",
            MaskPreset::Password => "password",
            MaskPreset::Ip => "ip",
        }
    }

    fn op(&self) -> Result<MaskOp, GenerationError> {
        let partial = |pattern: &str, replacement: &str| -> Result<MaskOp, GenerationError> {
            Ok(MaskOp::Partial {
                pattern: compile_pattern(self.as_str(), pattern)?,
                replacement: replacement.to_string(),
            })
        };
        match self {
            MaskPreset::Phone => partial(r"^(\d{3})\d{4}(\d{4})$", "${1}****${2}"),
            MaskPreset::Email => partial(r"^(.{2}).*(@.*)$", "${1}***${2}"),
            MaskPreset::IdCard => partial(r"^(.{6}).*(.{4})$", "${1}********${2}"),
            MaskPreset::BankCard => partial(r"^(.{4}).*(.{4})$", "${1}********${2}"),
            MaskPreset::Name => partial(r"^(.).*$", "${1}**"),
            MaskPreset::Address => Ok(MaskOp::Truncate {
                length: 10,
                suffix: "***".to_string(),
            }),
            MaskPreset::Password => Ok(MaskOp::Replace("******".to_string())),
            MaskPreset::Ip => partial(r"^(\d+\.\d+)\.\d+\.\d+$", "${1}.*.*"),
        }
    }
}

impl fmt::Display for MaskPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Masking rule for one column, e.g. `{"preset": "phone"}` or
/// `{"strategy": "mask", "start": 3, "end": 7}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MaskStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<MaskPreset>,
    /// Strategy options; presets take none.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl MaskRule {
    pub fn preset(preset: MaskPreset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    pub fn strategy(strategy: MaskStrategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Rules keyed by column name.
pub type MaskRules = BTreeMap<String, MaskRule>;

#[derive(Debug)]
enum MaskOp {
    Mask {
        mask_char: char,
        start: usize,
        end: Option<usize>,
    },
    Hash {
        length: usize,
    },
    Truncate {
        length: usize,
        suffix: String,
    },
    Replace(String),
    Shuffle,
    Null,
    Partial {
        pattern: Regex,
        replacement: String,
    },
}

impl MaskOp {
    fn compile(field: &str, rule: &MaskRule) -> Result<Self, GenerationError> {
        if let Some(preset) = rule.preset {
            if rule.strategy.is_some() || !rule.options.is_empty() {
                return Err(GenerationError::InvalidOptions(format!(
                    "mask {field}: preset '{preset}' takes no strategy or options"
                )));
            }
            return preset.op();
        }

        let strategy = rule.strategy.unwrap_or_default();
        let ctx = format!("mask {field} ({strategy})");
        let params = validate_params(&rule.options, strategy.params(), &ctx)?;
        match strategy {
            MaskStrategy::Mask => {
                let mask_char = match params.get_str("mask_char") {
                    Some(text) => text.chars().next().ok_or_else(|| {
                        GenerationError::InvalidOptions(format!("{ctx}: mask_char is empty"))
                    })?,
                    None => DEFAULT_MASK_CHAR,
                };
                let start = non_negative(&ctx, "start", params.get_i64("start").unwrap_or(0))?;
                let end = params
                    .get_i64("end")
                    .map(|end| non_negative(&ctx, "end", end))
                    .transpose()?;
                if end.is_some_and(|end| end < start) {
                    return Err(GenerationError::InvalidOptions(format!(
                        "{ctx}: end must be >= start"
                    )));
                }
                Ok(MaskOp::Mask {
                    mask_char,
                    start,
                    end,
                })
            }
            MaskStrategy::Hash => {
                if let Some(algorithm) = params.get_str("algorithm")
                    && !algorithm.eq_ignore_ascii_case("sha256")
                {
                    return Err(GenerationError::InvalidOptions(format!(
                        "{ctx}: unsupported algorithm '{algorithm}'"
                    )));
                }
                let length = params.get_i64("length").unwrap_or(DEFAULT_HASH_LEN);
                if !(0..=SHA256_HEX_LEN).contains(&length) {
                    return Err(GenerationError::InvalidOptions(format!(
                        "{ctx}: length must be between 0 and {SHA256_HEX_LEN}"
                    )));
                }
                Ok(MaskOp::Hash {
                    length: length as usize,
                })
            }
            MaskStrategy::Truncate => Ok(MaskOp::Truncate {
                length: non_negative(
                    &ctx,
                    "length",
                    params.get_i64("length").unwrap_or(DEFAULT_TRUNCATE_LEN),
                )?,
                suffix: params
                    .get_str("suffix")
                    .unwrap_or(DEFAULT_TRUNCATE_SUFFIX)
                    .to_string(),
            }),
            MaskStrategy::Replace => Ok(MaskOp::Replace(
                params
                    .get_str("replacement")
                    .unwrap_or(DEFAULT_REPLACEMENT)
                    .to_string(),
            )),
            MaskStrategy::Shuffle => Ok(MaskOp::Shuffle),
            MaskStrategy::Null => Ok(MaskOp::Null),
            MaskStrategy::Partial => {
                let pattern = required_str(&ctx, &params, "pattern")?;
                let replacement = required_str(&ctx, &params, "replacement")?;
                Ok(MaskOp::Partial {
                    pattern: compile_pattern(&ctx, pattern)?,
                    replacement: replacement.to_string(),
                })
            }
        }
    }

    fn apply(&self, value: &GeneratedValue, rng: &mut dyn RngCore) -> GeneratedValue {
        if value.is_null() {
            return GeneratedValue::Null;
        }
        let text = value.to_string();
        let masked = match self {
            MaskOp::Mask {
                mask_char,
                start,
                end,
            } => {
                let len = text.chars().count();
                let end = end.unwrap_or(len).min(len);
                text.chars()
                    .enumerate()
                    .map(|(idx, ch)| {
                        if (*start..end).contains(&idx) {
                            *mask_char
                        } else {
                            ch
                        }
                    })
                    .collect()
            }
            MaskOp::Hash { length } => {
                let mut digest = hex::encode(Sha256::digest(text.as_bytes()));
                if *length > 0 {
                    digest.truncate(*length);
                }
                digest
            }
            MaskOp::Truncate { length, suffix } => {
                if text.chars().count() <= *length {
                    text
                } else {
                    let kept: String = text.chars().take(*length).collect();
                    format!("{kept}{suffix}")
                }
            }
            MaskOp::Replace(replacement) => replacement.clone(),
            MaskOp::Shuffle => {
                let mut chars: Vec<char> = text.chars().collect();
                chars.shuffle(rng);
                chars.into_iter().collect()
            }
            MaskOp::Null => return GeneratedValue::Null,
            MaskOp::Partial {
                pattern,
                replacement,
            } => pattern.replace_all(&text, replacement.as_str()).into_owned(),
        };
        GeneratedValue::Text(masked)
    }
}

/// Mask a single value with `rule`.
pub fn mask_value(
    value: &GeneratedValue,
    rule: &MaskRule,
    rng: &mut dyn RngCore,
) -> Result<GeneratedValue, GenerationError> {
    let op = MaskOp::compile("value", rule)?;
    Ok(op.apply(value, rng))
}

/// Apply a preset rule to a single value. Presets never draw randomness.
pub fn apply_preset(
    value: &GeneratedValue,
    preset: MaskPreset,
) -> Result<GeneratedValue, GenerationError> {
    Ok(preset.op()?.apply(value, &mut rand::rng()))
}

/// Detect the kind of personal data in `value` and mask it with the matching
/// preset. Unrecognized values come back unchanged with no preset.
pub fn auto_detect_and_mask(value: &str) -> Result<(String, Option<MaskPreset>), GenerationError> {
    let detectors = [
        (MaskPreset::Phone, r"^1[3-9]\d{9}$"),
        (MaskPreset::Email, r"^[\w.-]+@[\w.-]+\.\w+$"),
        (MaskPreset::IdCard, r"^\d{17}[\dXx]$"),
        (MaskPreset::BankCard, r"^\d{16,19}$"),
        (MaskPreset::Ip, r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$"),
    ];
    for (preset, pattern) in detectors {
        if compile_pattern("auto_detect", pattern)?.is_match(value) {
            let masked = apply_preset(&GeneratedValue::Text(value.to_string()), preset)?;
            return Ok((masked.to_string(), Some(preset)));
        }
    }
    Ok((value.to_string(), None))
}

/// Mask the listed columns of `table` in place.
///
/// Every rule is compiled first; rules for columns the table lacks are
/// ignored. Returns the number of values rewritten.
pub fn mask_table(
    table: &mut GeneratedTable,
    rules: &MaskRules,
    rng: &mut dyn RngCore,
) -> Result<u64, GenerationError> {
    let mut ops = Vec::with_capacity(rules.len());
    for (field, rule) in rules {
        let op = MaskOp::compile(field, rule)?;
        if table.has_column(field) {
            ops.push((field.as_str(), op));
        }
    }

    let mut masked = 0u64;
    for row in table.rows_mut() {
        for (field, op) in &ops {
            if let Some(value) = row.get_mut(*field) {
                *value = op.apply(value, rng);
                masked += 1;
            }
        }
    }

    info!(columns = ops.len(), values = masked, "table masked");
    Ok(masked)
}

/// [`mask_table`] with a ChaCha8 stream seeded from `seed`, so a seeded run
/// masks `shuffle` columns the same way every time.
pub fn mask_table_seeded(
    table: &mut GeneratedTable,
    rules: &MaskRules,
    seed: u64,
) -> Result<u64, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    mask_table(table, rules, &mut rng)
}

fn compile_pattern(ctx: &str, pattern: &str) -> Result<Regex, GenerationError> {
    Regex::new(pattern)
        .map_err(|err| GenerationError::InvalidOptions(format!("{ctx}: invalid pattern: {err}")))
}

fn non_negative(ctx: &str, key: &str, value: i64) -> Result<usize, GenerationError> {
    usize::try_from(value)
        .map_err(|_| GenerationError::InvalidOptions(format!("{ctx}: {key} must be >= 0")))
}

fn required_str<'a>(
    ctx: &str,
    params: &ParamMap<'a>,
    key: &str,
) -> Result<&'a str, GenerationError> {
    params
        .get_str(key)
        .ok_or_else(|| GenerationError::InvalidOptions(format!("{ctx}: {key} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: &str) -> GeneratedValue {
        GeneratedValue::Text(value.to_string())
    }

    fn masked(value: &str, rule: MaskRule) -> String {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        mask_value(&text(value), &rule, &mut rng)
            .expect("mask")
            .to_string()
    }

    #[test]
    fn presets_keep_the_documented_characters() {
        let cases = [
            (MaskPreset::Phone, "13812345678", "138****5678"),
            (MaskPreset::Email, "ab123456@qq.com", "ab***@qq.com"),
            (MaskPreset::IdCard, "110101199001011234", "110101********1234"),
            (MaskPreset::BankCard, "6222123412341234", "6222********1234"),
            (MaskPreset::Name, "张三丰", "张**"),
            (MaskPreset::Address, "北京市朝阳区建国路88号院", "北京市朝阳区建国路8***"),
            (MaskPreset::Password, "hunter2", "******"),
            (MaskPreset::Ip, "192.168.1.20", "192.168.*.*"),
        ];
        for (preset, input, expected) in cases {
            let value = apply_preset(&text(input), preset).expect("preset");
            assert_eq!(value.to_string(), expected, "{preset}");
        }
    }

    #[test]
    fn mask_covers_the_requested_span() {
        let rule = MaskRule::strategy(MaskStrategy::Mask)
            .with_option("start", json!(1))
            .with_option("end", json!(4))
            .with_option("mask_char", json!("#"));
        assert_eq!(masked("abcdef", rule), "a###ef");
        assert_eq!(masked("abc", MaskRule::default()), "***");
    }

    #[test]
    fn hash_is_stable_and_cut() {
        let rule = MaskRule::strategy(MaskStrategy::Hash);
        let first = masked("alice", rule.clone());
        assert_eq!(first.len(), 8);
        assert_eq!(first, masked("alice", rule));

        let full = MaskRule::strategy(MaskStrategy::Hash).with_option("length", json!(0));
        assert_eq!(
            masked("abc", full),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn truncate_only_shortens_long_values() {
        let rule = MaskRule::strategy(MaskStrategy::Truncate);
        assert_eq!(masked("abc", rule.clone()), "abc");
        assert_eq!(masked("abcdefgh", rule), "abcde...");
    }

    #[test]
    fn shuffle_keeps_the_characters() {
        let shuffled = masked("abcdefghij", MaskRule::strategy(MaskStrategy::Shuffle));
        let mut chars: Vec<char> = shuffled.chars().collect();
        chars.sort_unstable();
        assert_eq!(chars.into_iter().collect::<String>(), "abcdefghij");
    }

    #[test]
    fn null_strategy_clears_any_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rule = MaskRule::strategy(MaskStrategy::Null);
        let value = mask_value(&GeneratedValue::Int(7), &rule, &mut rng).expect("null");
        assert_eq!(value, GeneratedValue::Null);
    }

    #[test]
    fn bad_rules_are_invalid_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = [
            MaskRule::strategy(MaskStrategy::Partial).with_option("pattern", json!("(")),
            MaskRule::strategy(MaskStrategy::Partial).with_option("pattern", json!("a")),
            MaskRule::strategy(MaskStrategy::Hash).with_option("algorithm", json!("md5")),
            MaskRule::strategy(MaskStrategy::Mask).with_option("start", json!(-1)),
            MaskRule::strategy(MaskStrategy::Shuffle).with_option("length", json!(2)),
            MaskRule::preset(MaskPreset::Phone).with_option("start", json!(1)),
        ];
        for rule in rules {
            let err = mask_value(&text("x"), &rule, &mut rng).expect_err("invalid rule");
            assert_eq!(err.kind(), "invalid_options", "{rule:?}");
        }
    }

    #[test]
    fn auto_detect_picks_the_first_matching_preset() {
        let cases = [
            ("13912345678", "139****5678", Some(MaskPreset::Phone)),
            ("ab123456@qq.com", "ab***@qq.com", Some(MaskPreset::Email)),
            ("11010119900101123X", "110101********123X", Some(MaskPreset::IdCard)),
            ("6222123412341234", "6222********1234", Some(MaskPreset::BankCard)),
            ("10.0.0.1", "10.0.*.*", Some(MaskPreset::Ip)),
            ("hello", "hello", None),
        ];
        for (input, expected, preset) in cases {
            let (value, detected) = auto_detect_and_mask(input).expect("detect");
            assert_eq!(value, expected);
            assert_eq!(detected, preset);
        }
    }

    #[test]
    fn rules_parse_from_json() {
        let rules: MaskRules = serde_json::from_value(json!({
            "phone": {"preset": "phone"},
            "card": {"strategy": "mask", "start": 4}
        }))
        .expect("parse rules");
        assert_eq!(rules["phone"], MaskRule::preset(MaskPreset::Phone));
        assert_eq!(
            rules["card"],
            MaskRule::strategy(MaskStrategy::Mask).with_option("start", json!(4))
        );
    }
}
