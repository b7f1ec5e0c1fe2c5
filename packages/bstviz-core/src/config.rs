#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::Value;

/// Engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub random: RandomConfig,
}

/// Parameters for random populate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RandomConfig {
    /// Smallest batch size drawn (default: 5).
    pub min_count: usize,
    /// Largest batch size drawn (default: 15). Equal to `min_count` for a fixed-size batch.
    pub max_count: usize,
    /// Lowest value that may be drawn, inclusive (default: 1).
    pub min_value: Value,
    /// Highest value that may be drawn, inclusive (default: 20).
    pub max_value: Value,
    /// Draw budget per requested value. Duplicate draws count against it (default: 8).
    pub max_attempts_per_value: usize,
    /// Seed for the value source. `None` seeds from the clock where one is available.
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            min_count: 5,
            max_count: 15,
            min_value: 1,
            max_value: 20,
            max_attempts_per_value: 8,
            seed: None,
        }
    }
}

impl RandomConfig {
    /// Number of distinct values in `[min_value, max_value]`.
    pub fn value_span(&self) -> u128 {
        (self.max_value as i128 - self.min_value as i128 + 1).max(0) as u128
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_count > self.max_count {
            return Err(Error::InvalidConfig(format!(
                "random.min_count {} exceeds random.max_count {}",
                self.min_count, self.max_count
            )));
        }
        if self.min_value > self.max_value {
            return Err(Error::InvalidConfig(format!(
                "random.min_value {} exceeds random.max_value {}",
                self.min_value, self.max_value
            )));
        }
        if self.max_count as u128 > self.value_span() {
            return Err(Error::InvalidConfig(format!(
                "random.max_count {} exceeds the {} distinct values in [{}, {}]",
                self.max_count,
                self.value_span(),
                self.min_value,
                self.max_value
            )));
        }
        if self.max_attempts_per_value == 0 {
            return Err(Error::InvalidConfig(
                "random.max_attempts_per_value must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.random.validate()
    }

    /// Parse a JSON config; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
        assert_eq!(RandomConfig::default().value_span(), 20);
    }

    #[test]
    fn rejects_inverted_ranges() {
        let config = RandomConfig {
            min_count: 6,
            max_count: 5,
            ..RandomConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = RandomConfig {
            min_value: 10,
            max_value: 1,
            ..RandomConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_batch_larger_than_value_range() {
        let config = RandomConfig {
            min_count: 3,
            max_count: 4,
            min_value: 1,
            max_value: 3,
            ..RandomConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_attempt_budget() {
        let config = RandomConfig {
            max_attempts_per_value: 0,
            ..RandomConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn value_span_handles_extremes() {
        let config = RandomConfig {
            min_value: Value::MIN,
            max_value: Value::MAX,
            ..RandomConfig::default()
        };
        assert_eq!(config.value_span(), 1u128 << 64);
        config.validate().unwrap();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = EngineConfig::from_json(r#"{"random":{"max_count":7,"seed":9}}"#).unwrap();
        assert_eq!(config.random.max_count, 7);
        assert_eq!(config.random.min_count, 5);
        assert_eq!(config.random.seed, Some(9));

        assert!(EngineConfig::from_json(r#"{"random":{"min_count":20,"max_count":3}}"#).is_err());
    }
}
