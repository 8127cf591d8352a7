use crate::cli::OutputFormat;
use mablibs::engine::config::DesignConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub core_config: DesignConfig,
}
