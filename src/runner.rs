//! Sequential conversion of a list of targets
//!
//! Targets are processed in order. The first failure aborts the run: later targets
//! are not attempted and files already written stay written.

use crate::convert::{Converter, Strategy};
use crate::file::{convert_file, FileAccessError, FileReport, OutputMode};
use detemplate_config::{DetemplateConfig, OutputModeName, StrategyName};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Printed once every target has been converted.
pub const COMPLETION_MESSAGE: &str = "Conversion complete!";

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn total_spans(&self) -> usize {
        self.files.iter().map(|file| file.spans).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Converts a list of files with one converter and output mode.
#[derive(Debug, Clone)]
pub struct Runner {
    converter: Converter,
    output: OutputMode,
    targets: Vec<PathBuf>,
}

impl Runner {
    pub fn new(converter: Converter, output: OutputMode) -> Self {
        Self {
            converter,
            output,
            targets: Vec::new(),
        }
    }

    /// Build a runner from loaded configuration, targets included.
    pub fn from_config(config: &DetemplateConfig) -> Self {
        let strategy = match config.conversion.strategy {
            StrategyName::Regex => Strategy::Regex,
            StrategyName::Scanner => Strategy::Scanner,
        };
        let output = match config.output.mode {
            OutputModeName::InPlace => OutputMode::InPlace,
            OutputModeName::Suffix => OutputMode::Suffix(config.output.suffix.clone()),
            OutputModeName::Stdout => OutputMode::Stdout,
        };
        let converter = Converter::new()
            .with_strategy(strategy)
            .with_join_indent(config.conversion.join_indent.clone());

        Self::new(converter, output).with_targets(config.targets.paths.clone())
    }

    /// Replace the target list.
    pub fn with_targets<I, P>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn output(&self) -> &OutputMode {
        &self.output
    }

    /// Convert every configured target.
    pub fn run(&self) -> Result<RunReport, FileAccessError> {
        self.run_paths(self.targets.as_slice())
    }

    /// Convert `paths` in order, stopping at the first error.
    pub fn run_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RunReport, FileAccessError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let report = convert_file(path, &self.converter, &self.output).map_err(|e| {
                tracing::error!(path = %e.path().display(), "aborting run: {}", e);
                e
            })?;
            files.push(report);
        }
        Ok(RunReport { files })
    }
}
