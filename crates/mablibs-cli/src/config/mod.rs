pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{DesignOverrides, build_app_config, build_design_config};
