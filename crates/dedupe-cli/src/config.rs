//! Option loading: TOML file first, command-line flags on top.

use std::fs;
use std::path::Path;

use tracing::debug;

use dedupe_model::{ConflictPolicy, DedupeError, DedupeOptions, DetectionMethod, MergeStrategy};

/// Values given on the command line. Empty lists and `None` leave the file
/// value alone.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub key_columns: Vec<String>,
    pub email_columns: Vec<String>,
    pub detection_types: Vec<DetectionMethod>,
    pub merge_strategy: Option<MergeStrategy>,
    pub conflict_policy: Option<ConflictPolicy>,
}

/// Parse options from TOML text.
///
/// # Errors
///
/// Malformed TOML, bad values and failed validation are all
/// [`DedupeError::InvalidConfig`].
pub fn parse_options(text: &str) -> Result<DedupeOptions, DedupeError> {
    let options: DedupeOptions =
        toml::from_str(text).map_err(|error| DedupeError::InvalidConfig(error.to_string()))?;
    options.validate()?;
    Ok(options)
}

/// Load options from `path`, or defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<DedupeOptions, DedupeError> {
    let Some(path) = path else {
        return Ok(DedupeOptions::default());
    };
    let text = fs::read_to_string(path)?;
    let options = parse_options(&text).map_err(|error| match error {
        DedupeError::InvalidConfig(message) => {
            DedupeError::InvalidConfig(format!("{}: {message}", path.display()))
        }
        other => other,
    })?;
    debug!(path = %path.display(), "loaded options");
    Ok(options)
}

pub fn apply_overrides(mut options: DedupeOptions, overrides: &OptionOverrides) -> DedupeOptions {
    if !overrides.key_columns.is_empty() {
        options.key_columns.clone_from(&overrides.key_columns);
    }
    if !overrides.email_columns.is_empty() {
        options.email_columns.clone_from(&overrides.email_columns);
    }
    if !overrides.detection_types.is_empty() {
        options.detection_types.clone_from(&overrides.detection_types);
    }
    if let Some(strategy) = overrides.merge_strategy {
        options.merge_strategy = strategy;
    }
    if let Some(policy) = overrides.conflict_policy {
        options.conflict_policy = policy;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let options = parse_options(
            r#"
            key_columns = ["customer_id"]
            merge_strategy = "merge_smart"
            "#,
        )
        .expect("options");
        let overrides = OptionOverrides {
            key_columns: vec!["email".to_string()],
            conflict_policy: Some(ConflictPolicy::Include),
            ..OptionOverrides::default()
        };
        let merged = apply_overrides(options, &overrides);
        assert_eq!(merged.key_columns, vec!["email".to_string()]);
        assert_eq!(merged.merge_strategy, MergeStrategy::MergeSmart);
        assert_eq!(merged.conflict_policy, ConflictPolicy::Include);
        assert_eq!(merged.detection_types.len(), 4);
    }

    #[test]
    fn invalid_weights_are_config_errors() {
        let err = parse_options(
            r"
            [scoring]
            dedup_reduction_weight = 1.5
            ",
        )
        .expect_err("invalid");
        assert!(matches!(err, DedupeError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_method_is_a_config_error() {
        let err = parse_options(r#"detection_types = ["fuzzy"]"#).expect_err("invalid");
        assert!(matches!(err, DedupeError::InvalidConfig(_)));
    }
}
