use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorRegistry, pick, random_alphanumeric, random_digits,
};
use crate::params::{ParamKind, ParamMap, ParamSpec};

const DEFAULT_AGE_MIN: i64 = 18;
const DEFAULT_AGE_MAX: i64 = 65;
const EMAIL_LOCAL_LEN: usize = 8;

const AGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int),
    ParamSpec::new("max", ParamKind::Int),
];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(ChineseNameGenerator));
    registry.register_generator(Box::new(EnglishNameGenerator));
    registry.register_generator(Box::new(EmailGenerator));
    registry.register_generator(Box::new(ChinesePhoneGenerator));
    registry.register_generator(Box::new(PhoneGenerator));
    registry.register_generator(Box::new(ChineseIdCardGenerator));
    registry.register_generator(Box::new(AgeGenerator));
    registry.register_generator(Box::new(GenderGenerator));
}

struct ChineseNameGenerator;

impl Generator for ChineseNameGenerator {
    fn id(&self) -> TypeId {
        TypeId::ChineseName
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let surname = pick(CHINESE_SURNAMES, rng);
        let given = pick(CHINESE_GIVEN_NAMES, rng);
        Ok(GeneratedValue::Text(format!("{surname}{given}")))
    }
}

struct EnglishNameGenerator;

impl Generator for EnglishNameGenerator {
    fn id(&self) -> TypeId {
        TypeId::EnglishName
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let first = pick(ENGLISH_FIRST_NAMES, rng);
        let last = pick(ENGLISH_LAST_NAMES, rng);
        Ok(GeneratedValue::Text(format!("{first} {last}")))
    }
}

struct EmailGenerator;

impl Generator for EmailGenerator {
    fn id(&self) -> TypeId {
        TypeId::Email
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let local = random_alphanumeric(EMAIL_LOCAL_LEN, rng);
        let domain = pick(EMAIL_DOMAINS, rng);
        Ok(GeneratedValue::Text(format!("{local}@{domain}")))
    }
}

struct ChinesePhoneGenerator;

impl Generator for ChinesePhoneGenerator {
    fn id(&self) -> TypeId {
        TypeId::ChinesePhone
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let prefix = pick(MOBILE_PREFIXES, rng);
        let rest = random_digits(8, rng);
        Ok(GeneratedValue::Text(format!("{prefix}{rest}")))
    }
}

struct PhoneGenerator;

impl Generator for PhoneGenerator {
    fn id(&self) -> TypeId {
        TypeId::Phone
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let area = rng.random_range(200..=999);
        let exchange = rng.random_range(100..=999);
        let line = rng.random_range(1000..=9999);
        Ok(GeneratedValue::Text(format!("+1 {area}-{exchange}-{line}")))
    }
}

/// 18-character resident id. The last character is random, not a checksum.
struct ChineseIdCardGenerator;

impl Generator for ChineseIdCardGenerator {
    fn id(&self) -> TypeId {
        TypeId::ChineseIdCard
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let area = pick(ID_AREA_CODES, rng);
        let year = rng.random_range(1970..=2005);
        let month = rng.random_range(1..=12);
        let day = rng.random_range(1..=28);
        let sequence = rng.random_range(100..=999);
        let check = rng.random_range(0..=9);
        Ok(GeneratedValue::Text(format!(
            "{area}{year}{month:02}{day:02}{sequence}{check}"
        )))
    }
}

struct AgeGenerator;

impl Generator for AgeGenerator {
    fn id(&self) -> TypeId {
        TypeId::Age
    }

    fn params(&self) -> &'static [ParamSpec] {
        AGE_PARAMS
    }

    fn check(&self, params: &ParamMap<'_>) -> Result<(), GenerationError> {
        params
            .int_range("age", "min", "max", (DEFAULT_AGE_MIN, DEFAULT_AGE_MAX))
            .map(|_| ())
    }

    fn generate(
        &self,
        params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (min, max) = params.int_range("age", "min", "max", (DEFAULT_AGE_MIN, DEFAULT_AGE_MAX))?;
        Ok(GeneratedValue::Int(rng.random_range(min..=max)))
    }
}

struct GenderGenerator;

impl Generator for GenderGenerator {
    fn id(&self) -> TypeId {
        TypeId::Gender
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(GENDERS, rng).to_string()))
    }
}

const CHINESE_SURNAMES: &[&str] = &[
    "王", "李", "张", "刘", "陈", "杨", "黄", "赵", "周", "吴", "徐", "孙", "马", "胡", "朱", "郭",
    "何", "罗", "高", "林",
];

const CHINESE_GIVEN_NAMES: &[&str] = &[
    "伟", "芳", "娜", "敏", "静", "丽", "强", "磊", "军", "洋", "勇", "艳", "杰", "娟", "涛", "明",
    "超", "秀英", "华", "慧",
];

const ENGLISH_FIRST_NAMES: &[&str] = &[
    "James",
    "John",
    "Robert",
    "Michael",
    "David",
    "Mary",
    "Patricia",
    "Jennifer",
    "Linda",
    "Elizabeth",
];

const ENGLISH_LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "163.com",
    "qq.com",
    "outlook.com",
    "company.com",
];

const MOBILE_PREFIXES: &[&str] = &[
    "138", "139", "150", "151", "152", "158", "159", "186", "187", "188",
];

const ID_AREA_CODES: &[&str] = &["110101", "310101", "440106", "330102", "320102"];

const GENDERS: &[&str] = &["男", "女"];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn id_card_has_eighteen_digits() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let value = ChineseIdCardGenerator
                .generate(&ParamMap::empty(), &mut rng)
                .expect("id card");
            let text = value.as_str().expect("text");
            assert_eq!(text.len(), 18);
            assert!(text.chars().all(|c| c.is_ascii_digit()));
            assert!(ID_AREA_CODES.contains(&&text[..6]));
            let year: u32 = text[6..10].parse().expect("year");
            assert!((1970..=2005).contains(&year));
        }
    }

    #[test]
    fn chinese_name_uses_known_parts() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let value = ChineseNameGenerator
            .generate(&ParamMap::empty(), &mut rng)
            .expect("name");
        let text = value.as_str().expect("text");
        let surname: String = text.chars().take(1).collect();
        assert!(CHINESE_SURNAMES.contains(&surname.as_str()));
        let given: String = text.chars().skip(1).collect();
        assert!(CHINESE_GIVEN_NAMES.contains(&given.as_str()));
    }
}
