use rand::RngCore;

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, pick};
use crate::params::ParamMap;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(CompanyGenerator));
    registry.register_generator(Box::new(JobTitleGenerator));
}

/// Two prefix characters followed by a company-type suffix.
struct CompanyGenerator;

impl Generator for CompanyGenerator {
    fn id(&self) -> TypeId {
        TypeId::Company
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let first = pick(COMPANY_PREFIXES, rng);
        let second = pick(COMPANY_PREFIXES, rng);
        let suffix = pick(COMPANY_SUFFIXES, rng);
        Ok(GeneratedValue::Text(format!("{first}{second}{suffix}")))
    }
}

struct JobTitleGenerator;

impl Generator for JobTitleGenerator {
    fn id(&self) -> TypeId {
        TypeId::JobTitle
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(pick(JOB_TITLES, rng).to_string()))
    }
}

const COMPANY_PREFIXES: &[&str] = &[
    "华", "中", "东", "南", "北", "新", "创", "智", "云", "数", "信", "科", "盛", "通", "达", "恒",
    "博",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "科技有限公司",
    "网络科技有限公司",
    "信息技术有限公司",
    "电子商务有限公司",
    "软件开发有限公司",
    "数据服务有限公司",
    "智能科技有限公司",
    "云计算有限公司",
];

const JOB_TITLES: &[&str] = &[
    "高级工程师",
    "产品经理",
    "项目经理",
    "技术总监",
    "运营经理",
    "市场经理",
    "人力资源经理",
    "财务经理",
    "销售经理",
    "测试工程师",
    "前端工程师",
    "后端工程师",
    "全栈工程师",
    "数据分析师",
    "UI设计师",
];
