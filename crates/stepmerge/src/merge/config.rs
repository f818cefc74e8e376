//! Merge configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use stepmerge::merge::MergeConfig;
//!
//! // x in column 0, y in column 1, series extend past their last sample
//! let config = MergeConfig::builder().build().unwrap();
//! assert!(!config.early_end);
//!
//! let config = MergeConfig::builder()
//!     .x_dim(2)
//!     .y_dim(0)
//!     .early_end(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.x_dim, 2);
//! ```

use bon::Builder;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The x and y dimensions must be different columns.
    #[error("x_dim and y_dim must differ, both are {0}")]
    SameDimension(usize),
}

// =============================================================================
// MergeConfig
// =============================================================================

/// Which columns to merge and how series end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeConfig {
    /// Column holding the ordinal x values, sorted ascending. Default: 0.
    #[builder(default = 0)]
    pub x_dim: usize,

    /// Column holding the y values. Default: 1.
    #[builder(default = 1)]
    pub y_dim: usize,

    /// Treat a series as finished once its last sample has been emitted.
    ///
    /// When `false` (default), a series keeps reporting its last y for
    /// every later x. When `true`, the last sample of each series is always
    /// a breakpoint and the series drops out of later cross-sections.
    #[builder(default)]
    pub early_end: bool,
}

/// Custom finishing function that validates the config.
impl<S: merge_config_builder::IsComplete> MergeConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SameDimension`] if `x_dim == y_dim`.
    pub fn build(self) -> Result<MergeConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl MergeConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.x_dim == self.y_dim {
            return Err(ConfigError::SameDimension(self.x_dim));
        }
        Ok(())
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MergeConfig::default();
        assert_eq!(config.x_dim, 0);
        assert_eq!(config.y_dim, 1);
        assert!(!config.early_end);
    }

    #[test]
    fn same_dimension_rejected() {
        let result = MergeConfig::builder().x_dim(1).build();
        assert_eq!(result, Err(ConfigError::SameDimension(1)));
    }

    #[test]
    fn swapped_dimensions_allowed() {
        let config = MergeConfig::builder().x_dim(1).y_dim(0).build().unwrap();
        assert_eq!((config.x_dim, config.y_dim), (1, 0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let config = MergeConfig::builder().early_end(true).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<MergeConfig>(&json).unwrap(), config);
    }
}
