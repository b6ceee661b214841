use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, pick};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_MIN_SENTENCES: i64 = 3;
const DEFAULT_MAX_SENTENCES: i64 = 5;
/// Upper bound for `max_sentences`.
const MAX_SENTENCES: i64 = 1_000;

const PARAGRAPH_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_sentences", ParamKind::Int),
    ParamSpec::new("max_sentences", ParamKind::Int),
];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(ParagraphGenerator));
    registry.register_generator(Box::new(SentenceGenerator));
    registry.register_generator(Box::new(WordGenerator));
}

/// Sentences are drawn with replacement and concatenated without separators.
struct ParagraphGenerator;

impl ParagraphGenerator {
    fn sentence_range(params: &ParamMap<'_>) -> Result<(i64, i64), GenerationError> {
        let (min, max) = params.int_range(
            "paragraph",
            "min_sentences",
            "max_sentences",
            (DEFAULT_MIN_SENTENCES, DEFAULT_MAX_SENTENCES),
        )?;
        if min < 1 {
            return Err(GenerationError::InvalidOptions(
                "paragraph: min_sentences must be >= 1".to_string(),
            ));
        }
        if max > MAX_SENTENCES {
            return Err(GenerationError::InvalidOptions(format!(
                "paragraph: max_sentences must be <= {MAX_SENTENCES}"
            )));
        }
        Ok((min, max))
    }
}

impl Generator for ParagraphGenerator {
    fn id(&self) -> TypeId {
        TypeId::Paragraph
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAGRAPH_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        Self::sentence_range(params).map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (min, max) = Self::sentence_range(params)?;
        let count = rng.random_range(min..=max);
        let mut paragraph = String::new();
        for _ in 0..count {
            paragraph.push_str(pick(SENTENCES, rng));
        }
        Ok(GeneratedValue::Text(paragraph))
    }
}

struct SentenceGenerator;

impl Generator for SentenceGenerator {
    fn id(&self) -> TypeId {
        TypeId::Sentence
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(SENTENCES, rng).to_string()))
    }
}

struct WordGenerator;

impl Generator for WordGenerator {
    fn id(&self) -> TypeId {
        TypeId::Word
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(WORDS, rng).to_string()))
    }
}

const SENTENCES: &[&str] = &[
    "这是一个用于测试的示例数据。",
    "系统正在处理相关请求。",
    "数据已成功生成并保存。",
    "用户信息已更新完成。",
    "订单处理中，请稍候。",
];

const WORDS: &[&str] = &[
    "测试", "数据", "系统", "平台", "服务", "管理", "开发", "技术", "产品", "项目",
];
