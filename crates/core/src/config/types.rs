use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
}

/// Fuzzy matching thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Minimum similarity (0-1] for a parsed name to resolve to an author
    #[serde(default = "default_author_threshold")]
    pub author_threshold: f64,
    /// Minimum similarity (0-1] for a parsed title to resolve to a book
    #[serde(default = "default_book_threshold")]
    pub book_threshold: f64,
    /// Extra tokens tried on each side of an author name's length when
    /// searching a release title for it
    #[serde(default = "default_author_window_slack")]
    pub author_window_slack: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            author_threshold: default_author_threshold(),
            book_threshold: default_book_threshold(),
            author_window_slack: default_author_window_slack(),
        }
    }
}

fn default_author_threshold() -> f64 {
    0.65
}

fn default_book_threshold() -> f64 {
    0.70
}

fn default_author_window_slack() -> usize {
    1
}

/// Release-level limits used by the decision specifications
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecisionConfig {
    /// Minimum release size in MB (0 = no minimum)
    #[serde(default)]
    pub min_size_mb: u64,
    /// Maximum release size in MB (0 = no maximum)
    #[serde(default)]
    pub max_size_mb: u64,
    /// Minimum seeders for torrent releases
    #[serde(default = "default_min_seeders")]
    pub min_seeders: u32,
    /// Evaluate candidates on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_size_mb: 0,
            max_size_mb: 0,
            min_seeders: default_min_seeders(),
            parallel: false,
        }
    }
}

fn default_min_seeders() -> u32 {
    1
}

impl DecisionConfig {
    pub fn min_size_bytes(&self) -> Option<u64> {
        (self.min_size_mb > 0).then(|| self.min_size_mb * 1024 * 1024)
    }

    pub fn max_size_bytes(&self) -> Option<u64> {
        (self.max_size_mb > 0).then(|| self.max_size_mb * 1024 * 1024)
    }
}
