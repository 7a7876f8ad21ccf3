//! Engine tuning knobs.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Default cap, in bytes, on a single hardware read.
pub const DEFAULT_READ_CHUNK_BYTES: usize = 1024;

/// Default capacity of the scratch buffer handed to attribute reads.
pub const DEFAULT_ATTR_BUF_SIZE: usize = 1024;

/// Tuning knobs for the streaming engine.
///
/// The read chunk budget bounds per-iteration memory and keeps join/leave
/// latency low on large requests; it is policy, not correctness. Values are
/// validated at build time, so an `EngineConfig` in hand is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound, in bytes, on the data pulled from a device in one read.
    pub read_chunk_bytes: usize,
    /// Capacity of the buffer attribute reads are performed into.
    pub attr_buf_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
            attr_buf_size: DEFAULT_ATTR_BUF_SIZE,
        }
    }
}

impl EngineConfig {
    /// Create a new builder for engine configuration.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_bytes == 0 {
            return Err(Error::Config("read_chunk_bytes must be > 0".into()));
        }
        if self.attr_buf_size == 0 {
            return Err(Error::Config("attr_buf_size must be > 0".into()));
        }
        Ok(())
    }

    /// Per-read sample cap for a device with the given sample size.
    ///
    /// Never zero: a sample wider than the chunk budget is still read one
    /// sample at a time.
    pub fn max_samples_per_read(&self, sample_size: usize) -> usize {
        (self.read_chunk_bytes / sample_size).max(1)
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the per-read byte budget.
    pub fn read_chunk_bytes(mut self, bytes: usize) -> Self {
        self.config.read_chunk_bytes = bytes;
        self
    }

    /// Set the attribute read buffer capacity.
    pub fn attr_buf_size(mut self, bytes: usize) -> Self {
        self.config.attr_buf_size = bytes;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
