//! Picker configuration
//!
//! One YAML document holding the engine options and the host pattern
//! overrides. Missing keys fall back to the built-in defaults.

use std::env;

use anyhow::{Context, Result};
use selector_synth::{PatternOverrides, SelectorSynth, SynthOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ENV_MAX_CANDIDATES: &str = "SELECTOR_PICKER_MAX_CANDIDATES";
pub const ENV_SIMILARITY: &str = "SELECTOR_PICKER_SIMILARITY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub synth: SynthOptions,
    pub patterns: PatternOverrides,
}

impl PickerConfig {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        // an empty file is a valid, all-defaults config
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).context("Failed to parse config file")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    /// Apply `SELECTOR_PICKER_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_CANDIDATES) {
            self.synth.max_candidates = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_CANDIDATES}={raw} is not a count"))?;
            info!(
                "Using max_candidates={} from {}",
                self.synth.max_candidates, ENV_MAX_CANDIDATES
            );
        }
        if let Some(raw) = lookup(ENV_SIMILARITY) {
            self.synth.similarity_threshold = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SIMILARITY}={raw} is not a number"))?;
            info!(
                "Using similarity_threshold={} from {}",
                self.synth.similarity_threshold, ENV_SIMILARITY
            );
        }
        Ok(())
    }

    /// Validate the options, compile the pattern overrides and build an engine.
    pub fn build_engine(&self) -> Result<SelectorSynth> {
        SelectorSynth::with_patterns(self.synth.clone(), &self.patterns)
            .context("Invalid selector configuration")
    }
}
