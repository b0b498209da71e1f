use serde::{Deserialize, Serialize};
use validator::Validate;

/// What to do when a sparse tensor lists the same index more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    LastWins,
    Sum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConvertOptions {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default = "ConvertOptions::default_max_elements")]
    #[validate(range(min = 1, max = 1_099_511_627_776u64))]
    pub max_elements: u64,
}

impl ConvertOptions {
    fn default_max_elements() -> u64 {
        1 << 28
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            max_elements: Self::default_max_elements(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_defaults() {
        let options: ConvertOptions = toml::from_str("").unwrap();
        assert_eq!(options, ConvertOptions::default());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn toml_fields() {
        let options: ConvertOptions =
            toml::from_str("duplicates = \"last_wins\"\nmax_elements = 64\n").unwrap();
        assert_eq!(options.duplicates, DuplicatePolicy::LastWins);
        assert_eq!(options.max_elements, 64);
        let options: ConvertOptions = toml::from_str("duplicates = \"sum\"").unwrap();
        assert_eq!(options.duplicates, DuplicatePolicy::Sum);
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        assert!(toml::from_str::<ConvertOptions>("threads = 4").is_err());
        assert!(toml::from_str::<ConvertOptions>("duplicates = \"max\"").is_err());
    }

    #[test]
    fn validate_range() {
        let options = ConvertOptions {
            max_elements: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
