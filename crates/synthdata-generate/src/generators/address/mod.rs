use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, pick};
use crate::params::ParamMap;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(ChineseAddressGenerator));
    registry.register_generator(Box::new(ProvinceGenerator));
    registry.register_generator(Box::new(CityGenerator));
    registry.register_generator(Box::new(ZipcodeGenerator));
}

struct ChineseAddressGenerator;

impl Generator for ChineseAddressGenerator {
    fn id(&self) -> TypeId {
        TypeId::ChineseAddress
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let province = pick(PROVINCES, rng);
        let city = pick(CITIES, rng);
        let district = pick(DISTRICTS, rng);
        let street = pick(STREETS, rng);
        let number = rng.random_range(1..=999);
        Ok(GeneratedValue::Text(format!(
            "{province}{city}{district}{street}{number}号"
        )))
    }
}

struct ProvinceGenerator;

impl Generator for ProvinceGenerator {
    fn id(&self) -> TypeId {
        TypeId::Province
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(PROVINCES, rng).to_string()))
    }
}

struct CityGenerator;

impl Generator for CityGenerator {
    fn id(&self) -> TypeId {
        TypeId::City
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(CITIES, rng).to_string()))
    }
}

struct ZipcodeGenerator;

impl Generator for ZipcodeGenerator {
    fn id(&self) -> TypeId {
        TypeId::Zipcode
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let code: u32 = rng.random_range(100_000..=999_999);
        Ok(GeneratedValue::Text(code.to_string()))
    }
}

const PROVINCES: &[&str] = &[
    "北京市", "上海市", "广东省", "江苏省", "浙江省", "山东省", "河南省", "四川省", "湖北省",
    "湖南省", "福建省", "安徽省", "河北省", "陕西省", "辽宁省",
];

const CITIES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "南京", "成都", "武汉", "西安", "重庆", "苏州", "天津",
    "青岛", "长沙", "郑州",
];

const DISTRICTS: &[&str] = &[
    "朝阳区",
    "海淀区",
    "浦东新区",
    "天河区",
    "南山区",
    "江干区",
    "鼓楼区",
    "武侯区",
    "江汉区",
    "雁塔区",
];

const STREETS: &[&str] = &[
    "中山路",
    "人民路",
    "解放路",
    "建设路",
    "和平路",
    "文化路",
    "科技路",
    "创新大道",
    "学院路",
    "商业街",
];
