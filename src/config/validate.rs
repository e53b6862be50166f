// src/config/validate.rs

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StageTreeError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StageTreeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.filter, raw.labels, raw.enrich))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_filter_lists(cfg)?;
    validate_labels(cfg)?;
    validate_enrich(cfg)?;
    Ok(())
}

fn validate_filter_lists(cfg: &RawConfigFile) -> Result<()> {
    // An empty entry is a substring of every name.
    if cfg.filter.allow.iter().any(|s| s.is_empty()) {
        return Err(StageTreeError::ConfigError(
            "[filter].allow must not contain an empty string".to_string(),
        ));
    }
    if cfg.filter.block.iter().any(|s| s.is_empty()) {
        return Err(StageTreeError::ConfigError(
            "[filter].block must not contain an empty string".to_string(),
        ));
    }
    Ok(())
}

fn validate_labels(cfg: &RawConfigFile) -> Result<()> {
    if cfg.labels.stage_start_placeholder.is_empty() {
        return Err(StageTreeError::ConfigError(
            "[labels].stage_start_placeholder must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_enrich(cfg: &RawConfigFile) -> Result<()> {
    if cfg.enrich.concurrency == 0 {
        return Err(StageTreeError::ConfigError(
            "[enrich].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Err(e) = Regex::new(&cfg.enrich.strip_description_pattern) {
        return Err(StageTreeError::ConfigError(format!(
            "[enrich].strip_description_pattern is not a valid regex: {e}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_str)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert!(cfg.filter.allow.contains(&"Stage:".to_string()));
        assert!(cfg.filter.block.contains(&"Print Message".to_string()));
        assert_eq!(cfg.labels.stage_label_prefix, "Stage: ");
        assert_eq!(cfg.enrich.concurrency, 5);
        assert!(!cfg.enrich.enabled);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = parse(
            r#"
[filter]
allow = ["Deploy"]

[enrich]
enabled = true
concurrency = 2
"#,
        )
        .unwrap();
        assert_eq!(cfg.filter.allow, vec!["Deploy".to_string()]);
        // Unset list keeps its default.
        assert!(cfg.filter.block.contains(&"Print Message".to_string()));
        assert!(cfg.enrich.enabled);
        assert_eq!(cfg.enrich.concurrency, 2);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = parse("[enrich]\nconcurrency = 0\n").unwrap_err();
        assert!(matches!(err, StageTreeError::ConfigError(ref m) if m.contains("concurrency")));
    }

    #[test]
    fn empty_filter_entry_is_rejected() {
        let err = parse("[filter]\nblock = [\"\"]\n").unwrap_err();
        assert!(matches!(err, StageTreeError::ConfigError(ref m) if m.contains("[filter].block")));
    }

    #[test]
    fn bad_regex_is_rejected() {
        let err = parse("[enrich]\nstrip_description_pattern = \"(\"\n").unwrap_err();
        assert!(matches!(err, StageTreeError::ConfigError(_)));
    }
}
