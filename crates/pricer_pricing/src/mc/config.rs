//! Simulation configuration.

use super::error::ConfigError;

/// Maximum number of simulated factor paths.
pub const MAX_PATHS: usize = 10_000_000;

/// Immutable simulation parameters for one engine invocation.
///
/// Built with [`SimulationConfigBuilder`], which validates at build time.
///
/// # Examples
///
/// ```
/// use pricer_pricing::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_paths(10_000)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    n_paths: usize,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Seed for reproducible runs; `None` draws from system entropy.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPathCount`] when `n_paths` is 0 or above
    /// [`MAX_PATHS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of simulated paths (required).
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the RNG seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingParameter`] when `n_paths` is unset, or the
    /// validation errors of [`SimulationConfig::validate`].
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self
            .n_paths
            .ok_or(ConfigError::MissingParameter { name: "n_paths" })?;
        let config = SimulationConfig {
            n_paths,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_valid() {
        let config = SimulationConfig::builder().n_paths(1000).build().unwrap();
        assert_eq!(config.n_paths(), 1000);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn builder_rejects_zero_paths() {
        let result = SimulationConfig::builder().n_paths(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(0))));
    }

    #[test]
    fn builder_rejects_too_many_paths() {
        let result = SimulationConfig::builder().n_paths(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(_))));
    }

    #[test]
    fn builder_requires_paths() {
        let result = SimulationConfig::builder().seed(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter { name: "n_paths" })
        ));
    }
}
