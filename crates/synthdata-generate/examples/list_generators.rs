use synthdata_generate::generators::GeneratorRegistry;

fn main() {
    let registry = GeneratorRegistry::new();
    for id in registry.generator_ids() {
        let info = id.info();
        println!("{id}\t{}\t{}", info.category, info.name);
    }
}
