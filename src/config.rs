//! Configuration for the ttlkv shell
//!
//! Centralized configuration with sensible defaults.

use crate::clock::Instant;
use crate::error::{KvError, Result};

/// Main configuration for a shell session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Clock Configuration
    // -------------------------------------------------------------------------
    /// Where the store reads time from
    pub clock: ClockSource,

    // -------------------------------------------------------------------------
    // Reclamation Configuration
    // -------------------------------------------------------------------------
    /// Run a purge after every N executed commands (0 = never)
    pub reap_every: u64,

    /// Max entries reclaimed by one automatic purge
    pub reap_batch: usize,

    // -------------------------------------------------------------------------
    // Interface Configuration
    // -------------------------------------------------------------------------
    /// Print a prompt before reading each line
    pub prompt: bool,
}

/// Clock backing the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// Wall-clock seconds since the UNIX epoch
    System,

    /// Manual clock starting at `start`, moved only by ADVANCE
    Manual { start: Instant },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock: ClockSource::System,
            reap_every: 0,
            reap_batch: 64,
            prompt: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the settings are usable together
    pub fn validate(&self) -> Result<()> {
        if self.reap_every > 0 && self.reap_batch == 0 {
            return Err(KvError::Config(
                "reap_batch must be at least 1 when reap_every is set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the clock source
    pub fn clock(mut self, clock: ClockSource) -> Self {
        self.config.clock = clock;
        self
    }

    /// Purge expired entries after every `n` commands (0 disables)
    pub fn reap_every(mut self, n: u64) -> Self {
        self.config.reap_every = n;
        self
    }

    /// Set the per-purge reclamation limit
    pub fn reap_batch(mut self, n: usize) -> Self {
        self.config.reap_batch = n;
        self
    }

    /// Enable or disable the interactive prompt
    pub fn prompt(mut self, enabled: bool) -> Self {
        self.config.prompt = enabled;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clock, ClockSource::System);
        assert_eq!(config.reap_every, 0);
    }

    #[test]
    fn test_builder_rejects_empty_reap_batch() {
        let result = Config::builder().reap_every(10).reap_batch(0).build();
        assert!(matches!(result, Err(KvError::Config(_))));
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = Config::builder()
            .clock(ClockSource::Manual { start: Instant::from_secs(5) })
            .reap_every(3)
            .reap_batch(8)
            .prompt(true)
            .build()
            .unwrap();

        assert_eq!(config.clock, ClockSource::Manual { start: Instant::from_secs(5) });
        assert_eq!(config.reap_every, 3);
        assert_eq!(config.reap_batch, 8);
        assert!(config.prompt);
    }
}
