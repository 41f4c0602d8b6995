//! Configuration for time series extraction.

use serde::{Deserialize, Serialize};

use crate::format::NumberFormat;

/// Configuration for the extractor and formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Upper bound on raster reads in flight for one request.
    pub max_concurrent_reads: usize,

    /// Number formatting of the CSV table.
    pub number_format: NumberFormat,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
            number_format: NumberFormat::default(),
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SERIES_MAX_CONCURRENT_READS") {
            if let Ok(n) = val.parse() {
                config.max_concurrent_reads = n;
            }
        }

        if let Ok(val) = std::env::var("SERIES_NUMBER_FORMAT") {
            match NumberFormat::parse(&val) {
                Some(format) => config.number_format = format,
                None => tracing::warn!(value = %val, "Ignoring unknown SERIES_NUMBER_FORMAT"),
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_reads == 0 {
            return Err("max_concurrent_reads must be > 0".to_string());
        }

        if let NumberFormat::Fixed { fraction_digits } = self.number_format {
            if fraction_digits > 17 {
                return Err("fraction_digits must be 0-17".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtractorConfig::default();
        assert_eq!(config.max_concurrent_reads, 8);
        assert_eq!(config.number_format, NumberFormat::Fixed { fraction_digits: 3 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = ExtractorConfig {
            max_concurrent_reads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    // Single test so the environment is not mutated concurrently.
    #[test]
    fn test_from_env() {
        std::env::set_var("SERIES_MAX_CONCURRENT_READS", "16");
        std::env::set_var("SERIES_NUMBER_FORMAT", "fixed:5");
        let config = ExtractorConfig::from_env();
        assert_eq!(config.max_concurrent_reads, 16);
        assert_eq!(config.number_format, NumberFormat::Fixed { fraction_digits: 5 });

        std::env::set_var("SERIES_NUMBER_FORMAT", " Legacy ");
        assert_eq!(ExtractorConfig::from_env().number_format, NumberFormat::Legacy);

        // Unparseable values leave the defaults in place.
        std::env::set_var("SERIES_MAX_CONCURRENT_READS", "many");
        std::env::set_var("SERIES_NUMBER_FORMAT", "scientific");
        assert_eq!(ExtractorConfig::from_env(), ExtractorConfig::default());

        std::env::set_var("SERIES_NUMBER_FORMAT", "fixed:");
        assert_eq!(
            ExtractorConfig::from_env().number_format,
            NumberFormat::default()
        );

        std::env::remove_var("SERIES_MAX_CONCURRENT_READS");
        std::env::remove_var("SERIES_NUMBER_FORMAT");
        assert_eq!(ExtractorConfig::from_env(), ExtractorConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ExtractorConfig =
            serde_yaml::from_str("number_format:\n  style: legacy\n").unwrap();
        assert_eq!(config.number_format, NumberFormat::Legacy);
        assert_eq!(config.max_concurrent_reads, 8);
    }
}
