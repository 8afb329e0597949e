use std::path::{Path, PathBuf};

use anyhow::Result;
use selector_synth::SelectorSynth;

use super::output::OutputFormat;
use crate::config::PickerConfig;

pub struct CliContext {
    config: PickerConfig,
    config_path: PathBuf,
    from_file: bool,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(
        config: PickerConfig,
        config_path: PathBuf,
        from_file: bool,
        output: OutputFormat,
    ) -> Self {
        Self {
            config,
            config_path,
            from_file,
            output,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether the config was read from `config_path` rather than defaulted.
    pub fn config_from_file(&self) -> bool {
        self.from_file
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    pub fn engine(&self) -> Result<SelectorSynth> {
        self.config.build_engine()
    }
}
