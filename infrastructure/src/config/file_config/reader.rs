//! Reader configuration from TOML (`[reader]` section)

use serde::{Deserialize, Serialize};
use wikiqa_domain::{DEFAULT_SAFETY_MARGIN, DecisionBaseline, SpanPolicy};

/// Raw reader configuration from TOML
///
/// Enum-like fields are kept as strings so unknown values can be reported
/// by [`FileConfig::validate`](super::FileConfig::validate) instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReaderConfig {
    /// Model positions held back from the context budget
    pub safety_margin: usize,
    /// "legacy" or "best"
    pub decision: String,
    /// "clamp" or "reject"
    pub span_policy: String,
}

impl Default for FileReaderConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
            decision: "legacy".to_string(),
            span_policy: "clamp".to_string(),
        }
    }
}

impl FileReaderConfig {
    pub fn parse_decision(&self) -> Result<DecisionBaseline, String> {
        self.decision.parse()
    }

    pub fn parse_span_policy(&self) -> Result<SpanPolicy, String> {
        self.span_policy.parse()
    }
}
