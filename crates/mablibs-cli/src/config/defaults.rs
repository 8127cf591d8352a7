use mablibs::core::codons::Species;
use mablibs::engine::config::{DEFAULT_RESTRICTION_ENZYMES, DESIGN_GC_CONTENT_THRESHOLD};

pub struct DefaultsConfig {
    pub species: Species,
    pub nmer_size: usize,
    pub optimization_enabled: bool,
    pub restriction_enzymes: Vec<String>,
    pub forbid_repeats: bool,
    pub gc_content_threshold: f64,
    pub forbid_self_complementary: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            species: Species::Human,
            nmer_size: 1,
            optimization_enabled: true,
            restriction_enzymes: DEFAULT_RESTRICTION_ENZYMES
                .iter()
                .map(|e| e.to_string())
                .collect(),
            forbid_repeats: false,
            gc_content_threshold: DESIGN_GC_CONTENT_THRESHOLD,
            forbid_self_complementary: true,
        }
    }
}
