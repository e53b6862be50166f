// src/config/model.rs

use serde::Deserialize;

use crate::graph::{FilterPolicy, LabelPolicy};

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [filter]
/// allow = ["Start of Pipeline", "Branch:", "Stage : Start", "Stage:"]
/// block = ["Determine current directory", "Print Message"]
///
/// [labels]
/// stage_start_placeholder = "Stage : Start"
/// stage_label_prefix = "Stage: "
///
/// [enrich]
/// enabled = false
/// concurrency = 5
/// ```
///
/// All sections are optional and default to the engine's usual policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub filter: FilterPolicy,

    #[serde(default)]
    pub labels: LabelPolicy,

    #[serde(default)]
    pub enrich: EnrichSection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// (or `Default`, which is valid by construction).
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub filter: FilterPolicy,
    pub labels: LabelPolicy,
    pub enrich: EnrichSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        filter: FilterPolicy,
        labels: LabelPolicy,
        enrich: EnrichSection,
    ) -> Self {
        Self {
            filter,
            labels,
            enrich,
        }
    }
}

/// `[enrich]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnrichSection {
    /// Fetch per-node detail for atomic steps before filtering.
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of detail fetches in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Regex removed from parameter descriptions before they are used as
    /// display names.
    #[serde(default = "default_strip_description_pattern")]
    pub strip_description_pattern: String,
}

fn default_concurrency() -> usize {
    5
}

fn default_strip_description_pattern() -> String {
    r"#!/usr/local/bin/runbld\s+".to_string()
}

impl Default for EnrichSection {
    fn default() -> Self {
        Self {
            enabled: false,
            concurrency: default_concurrency(),
            strip_description_pattern: default_strip_description_pattern(),
        }
    }
}
