//! Configuration file loading for wikiqa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `WIKIQA_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./wikiqa.toml` or `./.wikiqa.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/wikiqa/config.toml`
//! 5. Default values
//!
//! Command line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_PREDICT_ENDPOINT, DEFAULT_WIKIPEDIA_ENDPOINT, FileConfig,
    FileInferenceConfig, FileOutputConfig, FileOutputFormat, FileReaderConfig, FileReplConfig,
    FileRetrievalConfig,
};
pub use loader::ConfigLoader;
