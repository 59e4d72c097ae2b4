//! Configuration for detemplate
//!
//! Every key has a value in `defaults/detemplate.default.toml`, which is compiled in.
//! A project may override any of them with a `detemplate.toml` next to the scripts it
//! converts; see [`Loader`] for the full precedence order.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/detemplate.default.toml");

/// Name of the optional project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "detemplate.toml";

/// Top-level configuration consumed by detemplate.
#[derive(Debug, Clone, Deserialize)]
pub struct DetemplateConfig {
    pub targets: TargetsConfig,
    pub conversion: ConversionConfig,
    pub output: OutputConfig,
}

/// Which files a run rewrites.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetsConfig {
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    pub strategy: StrategyName,
    pub join_indent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub mode: OutputModeName,
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    Regex,
    Scanner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputModeName {
    InPlace,
    Suffix,
    Stdout,
}

/// A value the command line may set on top of the file layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Strategy,
    OutputMode,
    Suffix,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::Strategy, Setting::OutputMode, Setting::Suffix];

    /// Long flag name, without the leading `--`.
    pub fn flag(self) -> &'static str {
        match self {
            Setting::Strategy => "strategy",
            Setting::OutputMode => "output",
            Setting::Suffix => "suffix",
        }
    }

    /// Dotted key in the configuration tree.
    pub fn key(self) -> &'static str {
        match self {
            Setting::Strategy => "conversion.strategy",
            Setting::OutputMode => "output.mode",
            Setting::Suffix => "output.suffix",
        }
    }
}

/// Builds a [`DetemplateConfig`] from layers, lowest precedence first:
/// embedded defaults, the project's `detemplate.toml`, an explicit file, then
/// command-line settings.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer `detemplate.toml` from `dir` if it exists there.
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(LOCAL_CONFIG_FILE);
        self.builder = self
            .builder
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false));
        self
    }

    /// Layer a file named with `--config`. It must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(true),
        );
        self
    }

    pub fn with_setting(mut self, setting: Setting, value: &str) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(setting.key(), value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DetemplateConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert_eq!(
            config.targets.paths,
            vec![
                PathBuf::from("scripts/grader.js"),
                PathBuf::from("scripts/ai-detector.js")
            ]
        );
        assert_eq!(config.conversion.strategy, StrategyName::Regex);
        assert_eq!(config.conversion.join_indent, " ".repeat(8));
        assert_eq!(config.output.mode, OutputModeName::InPlace);
        assert_eq!(config.output.suffix, "-fixed");
    }

    #[test]
    fn settings_override_defaults() {
        let config = Loader::new()
            .with_setting(Setting::Strategy, "scanner")
            .expect("setting to apply")
            .with_setting(Setting::OutputMode, "stdout")
            .expect("setting to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.conversion.strategy, StrategyName::Scanner);
        assert_eq!(config.output.mode, OutputModeName::Stdout);
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[targets]\npaths = [\"src/app.js\"]\n\n[output]\nsuffix = \".out\"")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.targets.paths, vec![PathBuf::from("src/app.js")]);
        assert_eq!(config.output.suffix, ".out");
        assert_eq!(config.output.mode, OutputModeName::InPlace);
    }

    #[test]
    fn project_dir_without_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_project_dir(dir.path())
            .build()
            .expect("config to build");
        assert_eq!(config.conversion.strategy, StrategyName::Regex);
    }

    #[test]
    fn project_config_is_read_from_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "[conversion]\nstrategy = \"scanner\"\n",
        )
        .expect("write config");

        let config = Loader::new()
            .with_project_dir(dir.path())
            .build()
            .expect("config to build");
        assert_eq!(config.conversion.strategy, StrategyName::Scanner);
        assert_eq!(config.output.suffix, "-fixed");
    }

    #[test]
    fn explicit_file_wins_over_project_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "[output]\nsuffix = \".local\"\n",
        )
        .expect("write config");
        let explicit = dir.path().join("ci.toml");
        std::fs::write(&explicit, "[output]\nsuffix = \".ci\"\n").expect("write config");

        let config = Loader::new()
            .with_project_dir(dir.path())
            .with_file(&explicit)
            .build()
            .expect("config to build");
        assert_eq!(config.output.suffix, ".ci");
    }

    #[test]
    fn every_setting_names_a_default_key() {
        let mut loader = Loader::new();
        for setting in Setting::ALL {
            let value = match setting {
                Setting::Strategy => "scanner",
                Setting::OutputMode => "suffix",
                Setting::Suffix => "-new",
            };
            loader = loader.with_setting(setting, value).expect("setting to apply");
        }
        let config = loader.build().expect("config to build");
        assert_eq!(config.conversion.strategy, StrategyName::Scanner);
        assert_eq!(config.output.mode, OutputModeName::Suffix);
        assert_eq!(config.output.suffix, "-new");
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new()
            .with_file("/nonexistent/detemplate.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let result = Loader::new()
            .with_setting(Setting::Strategy, "ast")
            .expect("setting to apply")
            .build();
        assert!(result.is_err());
    }
}
