use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use valuegen::{Helpers, SynthOptions};

pub const CONFIG_FILE: &str = "valuegen.toml";

/// Project context for valuegen operations
pub struct ProjectContext {
    /// Directory holding valuegen.toml (or the start directory when there is none)
    pub project_root: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Option<ValuegenConfig>,
}

/// Configuration stored in valuegen.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuegenConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub helpers: Helpers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub skip_to_string: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_models")]
    pub models: Vec<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            skip_to_string: false,
            output_dir: default_output_dir(),
            models: default_models(),
        }
    }
}

fn default_output_dir() -> String {
    "target/generated-sources/valuegen".to_string()
}

fn default_models() -> Vec<String> {
    vec!["schema".to_string()]
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: ValuegenConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            Some(config)
        } else {
            None
        };

        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    /// Walk up until a directory containing valuegen.toml is found
    fn find_project_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).is_file())
            .map(Path::to_path_buf)
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    /// Loaded configuration, or the defaults for an uninitialized project
    pub fn settings(&self) -> ValuegenConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Model locations: explicit paths win over `generator.models`.
    pub fn model_roots(&self, explicit: &[PathBuf]) -> Vec<PathBuf> {
        if !explicit.is_empty() {
            return explicit.to_vec();
        }
        self.settings()
            .generator
            .models
            .iter()
            .map(|model| self.project_root.join(model))
            .collect()
    }

    pub fn output_dir(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(dir) => dir.to_path_buf(),
            None => self.project_root.join(self.settings().generator.output_dir),
        }
    }

    /// Synthesis options from the config file; `skip_to_string` may only be
    /// switched on by the caller, never off.
    pub fn synth_options(&self, skip_to_string: bool) -> SynthOptions {
        let settings = self.settings();
        SynthOptions {
            skip_to_string: settings.generator.skip_to_string || skip_to_string,
            helpers: settings.helpers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValuegenConfig::default();
        assert!(!config.generator.skip_to_string);
        assert_eq!(config.generator.output_dir, "target/generated-sources/valuegen");
        assert_eq!(config.generator.models, vec!["schema".to_string()]);
        assert_eq!(config.helpers.to_string, "com.google.common.base.MoreObjects");
    }

    #[test]
    fn test_config_serialization() {
        let config = ValuegenConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("[helpers]"));

        let parsed: ValuegenConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ValuegenConfig = toml::from_str("[generator]\nskip_to_string = true\n").unwrap();
        assert!(config.generator.skip_to_string);
        assert_eq!(config.generator.models, vec!["schema".to_string()]);
        assert_eq!(config.helpers.objects, "java.util.Objects");
    }

    #[test]
    fn test_find_from_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generator]\noutput_dir = \"gen\"\nmodels = [\"models\"]\n",
        )
        .unwrap();

        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert!(ctx.is_initialized());
        assert_eq!(ctx.project_root, dir.path());
        assert_eq!(ctx.output_dir(None), dir.path().join("gen"));
        assert_eq!(ctx.model_roots(&[]), vec![dir.path().join("models")]);
        assert_eq!(ctx.model_roots(&[PathBuf::from("x.toml")]), vec![PathBuf::from("x.toml")]);
    }

    #[test]
    fn test_uninitialized_project() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::find_from(dir.path()).unwrap();
        assert!(!ctx.is_initialized());
        assert!(ctx.synth_options(true).skip_to_string);
        assert!(!ctx.synth_options(false).skip_to_string);
    }
}
