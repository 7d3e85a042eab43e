//! Application-level configuration.
//!
//! - [`ReaderConfig`] - retrieval size, chunk budget, fan-out and timeouts

pub mod reader_config;

pub use reader_config::ReaderConfig;
