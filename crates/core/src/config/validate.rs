use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Matching thresholds are within (0, 1]
/// - Minimum size does not exceed maximum size (when both are set)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let thresholds = [
        ("matching.author_threshold", config.matching.author_threshold),
        ("matching.book_threshold", config.matching.book_threshold),
    ];
    for (name, value) in thresholds {
        if !(value > 0.0 && value <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be within (0, 1], got {}",
                name, value
            )));
        }
    }

    if let (Some(min), Some(max)) = (
        config.decision.min_size_bytes(),
        config.decision.max_size_bytes(),
    ) {
        if min > max {
            return Err(ConfigError::ValidationError(
                "decision.min_size_mb cannot exceed decision.max_size_mb".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecisionConfig, MatchingConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_threshold_out_of_range_fails() {
        let config = Config {
            matching: MatchingConfig {
                author_threshold: 1.5,
                ..Default::default()
            },
            decision: DecisionConfig::default(),
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let config = Config {
            matching: MatchingConfig {
                book_threshold: 0.0,
                ..Default::default()
            },
            decision: DecisionConfig::default(),
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_min_size_above_max_fails() {
        let config = Config {
            matching: MatchingConfig::default(),
            decision: DecisionConfig {
                min_size_mb: 100,
                max_size_mb: 10,
                ..Default::default()
            },
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_min_size_without_max_ok() {
        let config = Config {
            matching: MatchingConfig::default(),
            decision: DecisionConfig {
                min_size_mb: 100,
                ..Default::default()
            },
        };
        assert!(validate_config(&config).is_ok());
    }
}
