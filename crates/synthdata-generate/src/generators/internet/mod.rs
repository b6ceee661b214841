use rand::{Rng, RngCore};

use synthdata_core::TypeId;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorRegistry, pick};
use crate::params::ParamMap;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(UrlGenerator));
    registry.register_generator(Box::new(Ipv4Generator));
    registry.register_generator(Box::new(Ipv6Generator));
    registry.register_generator(Box::new(MacGenerator));
    registry.register_generator(Box::new(DomainGenerator));
}

struct UrlGenerator;

impl Generator for UrlGenerator {
    fn id(&self) -> TypeId {
        TypeId::Url
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let host = pick(URL_HOSTS, rng);
        let path = pick(URL_PATHS, rng);
        Ok(GeneratedValue::Text(format!("https://{host}{path}")))
    }
}

struct Ipv4Generator;

impl Generator for Ipv4Generator {
    fn id(&self) -> TypeId {
        TypeId::Ip
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let a: u8 = rng.random_range(1..=255);
        let b: u8 = rng.random();
        let c: u8 = rng.random();
        let d: u8 = rng.random_range(1..=254);
        Ok(GeneratedValue::Text(format!("{a}.{b}.{c}.{d}")))
    }
}

struct Ipv6Generator;

impl Generator for Ipv6Generator {
    fn id(&self) -> TypeId {
        TypeId::Ipv6
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let groups: Vec<String> = (0..8)
            .map(|_| format!("{:04x}", rng.random::<u16>()))
            .collect();
        Ok(GeneratedValue::Text(groups.join(":")))
    }
}

struct MacGenerator;

impl Generator for MacGenerator {
    fn id(&self) -> TypeId {
        TypeId::Mac
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let octets: Vec<String> = (0..6)
            .map(|_| format!("{:02X}", rng.random::<u8>()))
            .collect();
        Ok(GeneratedValue::Text(octets.join(":")))
    }
}

struct DomainGenerator;

impl Generator for DomainGenerator {
    fn id(&self) -> TypeId {
        TypeId::Domain
    }

    fn generate(
        &self,
        _params: &ParamMap<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let name = pick(DOMAIN_NAMES, rng);
        let tld = pick(DOMAIN_TLDS, rng);
        Ok(GeneratedValue::Text(format!("{name}{tld}")))
    }
}

const URL_HOSTS: &[&str] = &["example.com", "test.com", "demo.org", "sample.net"];
const URL_PATHS: &[&str] = &["/api/v1", "/user", "/data", "/product", "/service"];
const DOMAIN_NAMES: &[&str] = &["example", "test", "demo", "sample", "mysite"];
const DOMAIN_TLDS: &[&str] = &[".com", ".net", ".org", ".io", ".cn"];
