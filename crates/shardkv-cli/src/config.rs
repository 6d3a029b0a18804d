//! TOML configuration for the `shardkv` CLI.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below. Command-line flags override file values.

use std::path::Path;

use serde::Deserialize;
use shardkv_engine::ShardSetConfig;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Shard layout of the cache.
    pub cache: ShardSetConfig,
    /// Load-generation settings.
    pub bench: BenchSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[bench]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BenchSection {
    /// Operations issued by `bench`, and keys inserted by `distribution`.
    pub operations: usize,
    /// Worker threads. Defaults to the available parallelism.
    pub workers: Option<usize>,
}

impl Default for BenchSection {
    fn default() -> Self {
        Self {
            operations: 100_000,
            workers: None,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective worker thread count.
    pub fn workers(&self) -> usize {
        self.bench.workers.filter(|&w| w > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}
