use serde::{Deserialize, Serialize};

/// Default cap on raw query text length. Keeps worst-case predicate
/// parsing cost linear; a tunable constant, not a protocol guarantee.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 8192;

/// Query engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    pub max_query_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

/// CSV loader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: true,
        }
    }
}
