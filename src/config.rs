use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the VOD search and playback core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search aggregation cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Episode pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of distinct queries kept in the cache
    pub max_entries: usize,

    /// Entry lifetime in hours; expired entries are dropped on read
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Optional bound on the number of history items (unbounded when absent)
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Viewport breakpoint bands as `(min_width, episodes_per_page)`,
    /// ordered widest first
    pub breakpoints: Vec<(u32, usize)>,

    /// Episodes per page below the narrowest band
    pub fallback_page_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot file path; persistence is disabled when absent
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            expiry_hours: 24,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: None }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            // 8x5, 6x6, 3x8 grids depending on viewport width
            breakpoints: vec![(1024, 40), (768, 36), (640, 24)],
            // 2x8 grid on narrow screens
            fallback_page_size: 16,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime in milliseconds
    pub fn expiry_ms(&self) -> i64 {
        self.expiry_hours as i64 * 3_600_000
    }
}

impl PaginationConfig {
    /// Resolve the page size for a viewport width using the breakpoint bands
    pub fn episodes_per_page(&self, viewport_width: u32) -> usize {
        for &(min_width, page_size) in &self.breakpoints {
            if viewport_width >= min_width {
                return page_size;
            }
        }
        self.fallback_page_size
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_entries == 0 {
            return Err(anyhow!("cache.max_entries must be at least 1"));
        }
        if self.cache.expiry_hours == 0 {
            return Err(anyhow!("cache.expiry_hours must be at least 1"));
        }
        if self.pagination.fallback_page_size == 0 {
            return Err(anyhow!("pagination.fallback_page_size must be at least 1"));
        }
        let mut last_width = u32::MAX;
        for &(min_width, page_size) in &self.pagination.breakpoints {
            if page_size == 0 {
                return Err(anyhow!("pagination breakpoint at width {} has a zero page size", min_width));
            }
            if min_width >= last_width {
                return Err(anyhow!("pagination.breakpoints must be ordered widest first"));
            }
            last_width = min_width;
        }
        if let Some(max) = self.history.max_entries {
            if max == 0 {
                return Err(anyhow!("history.max_entries must be at least 1 when set"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.expiry_hours, 24);
        assert_eq!(config.cache.expiry_ms(), 24 * 3_600_000);
        assert!(config.history.max_entries.is_none());
        assert!(config.snapshot.path.is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut bad = Config::default();
        bad.cache.max_entries = 0;
        assert!(bad.validate().is_err());

        let mut unordered = Config::default();
        unordered.pagination.breakpoints = vec![(640, 24), (1024, 40)];
        assert!(unordered.validate().is_err());
    }

    #[test]
    fn test_episodes_per_page_bands() {
        let pagination = PaginationConfig::default();
        assert_eq!(pagination.episodes_per_page(1920), 40);
        assert_eq!(pagination.episodes_per_page(1024), 40);
        assert_eq!(pagination.episodes_per_page(1023), 36);
        assert_eq!(pagination.episodes_per_page(768), 36);
        assert_eq!(pagination.episodes_per_page(700), 24);
        assert_eq!(pagination.episodes_per_page(639), 16);
        assert_eq!(pagination.episodes_per_page(320), 16);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[cache]\nmax_entries = 5\nexpiry_hours = 12\n").unwrap();
        assert_eq!(config.cache.max_entries, 5);
        assert_eq!(config.cache.expiry_hours, 12);
        assert_eq!(config.pagination.fallback_page_size, 16);
    }
}
