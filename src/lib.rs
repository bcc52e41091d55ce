pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types
pub use error::{ParseError, ParseErrorReason, SelectiveCopyError};
pub use models::{parse_identifier, CandidateFile};
pub use services::{
    run_selective_copy, run_selective_copy_with_output, CopiedFile, SelectiveCopyConfig,
    SelectiveCopyReport,
};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub selective_copy: SelectiveCopyConfig,
    pub report_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            selective_copy: SelectiveCopyConfig::default(),
            report_path: None,
            log_level: "info".to_string(),
        }
    }
}
