//! Builder that loads class models, synthesizes methods and writes Java sources.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use valuegen::{
    EmittedFile, GuavaPlugin, Helpers, RunReport, SynthOptions, discover_model_files, emit_sources, load_models,
};

/// Builder for configuring and running the method generator.
pub struct MethodGenerator {
    model_paths: Vec<PathBuf>,
    output_dir: PathBuf,
    plugin_args: Vec<String>,
    skip_to_string: bool,
    helpers: Helpers,
}

/// What a [`MethodGenerator::run`] did.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    /// Model documents that were loaded, sorted per root.
    pub model_files: Vec<PathBuf>,
    pub report: RunReport,
    pub files: Vec<EmittedFile>,
}

impl GenerationSummary {
    /// Number of files created or rewritten.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.changed()).count()
    }
}

impl MethodGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            model_paths: Vec::new(),
            output_dir: PathBuf::from("target/generated-sources/valuegen"),
            plugin_args: Vec::new(),
            skip_to_string: false,
            helpers: Helpers::default(),
        }
    }

    /// Add a model file or a directory to scan for `.toml`/`.json` models.
    ///
    /// Can be called multiple times. Default: `schema/`
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_paths.push(path.into());
        self
    }

    /// Set the root directory for generated sources.
    ///
    /// Default: `target/generated-sources/valuegen`
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Pass a raw plugin argument such as `-Xguava` or `-Xguava:skipToString`.
    pub fn plugin_arg(mut self, arg: impl Into<String>) -> Self {
        self.plugin_args.push(arg.into());
        self
    }

    /// Do not generate `toString` methods.
    pub fn skip_to_string(mut self, skip: bool) -> Self {
        self.skip_to_string = skip;
        self
    }

    /// Override the helper classes the generated bodies call.
    pub fn helpers(mut self, helpers: Helpers) -> Self {
        self.helpers = helpers;
        self
    }

    /// Run the generator.
    ///
    /// Loads every model document found, runs the plugin over the combined
    /// model and writes one `.java` file per class, skipping files whose
    /// content did not change.
    pub fn run(self) -> Result<GenerationSummary> {
        let plugin = self.plugin()?;

        let model_paths = if self.model_paths.is_empty() {
            vec![PathBuf::from("schema/")]
        } else {
            self.model_paths
        };

        let model_files: Vec<PathBuf> = model_paths.iter().flat_map(|p| discover_model_files(p)).collect();
        if model_files.is_empty() {
            warn!("no model files found in {model_paths:?}");
            return Ok(GenerationSummary::default());
        }

        let mut model = load_models(&model_files).context("Failed to load class models")?;
        let report = plugin.run(&mut model);
        for class in &report.classes {
            if class.generated().next().is_none() {
                warn!("{}: no methods generated", class.class);
            }
        }

        let files = emit_sources(&model, &self.output_dir, false)
            .with_context(|| format!("Failed to write sources to {}", self.output_dir.display()))?;

        let summary = GenerationSummary {
            model_files,
            report,
            files,
        };
        if summary.written() > 0 {
            eprintln!(
                "valuegen-build: Wrote {} file(s) to {} ({} methods)",
                summary.written(),
                self.output_dir.display(),
                summary.report.generated_count()
            );
        } else {
            info!("all generated sources in {} are up to date", self.output_dir.display());
        }

        Ok(summary)
    }

    fn plugin(&self) -> Result<GuavaPlugin> {
        let options = SynthOptions {
            skip_to_string: self.skip_to_string,
            helpers: self.helpers.clone(),
        };
        Ok(GuavaPlugin::from_options_and_args(options, &self.plugin_args)?)
    }
}

impl Default for MethodGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_defaults() {
        let plugin = MethodGenerator::new().plugin().unwrap();
        assert!(!plugin.is_skip_to_string_enabled());
    }

    #[test]
    fn test_plugin_args_enable_skip_to_string() {
        let plugin = MethodGenerator::new()
            .plugin_arg("-Xguava")
            .plugin_arg("-Xguava:skipToString")
            .plugin()
            .unwrap();
        assert!(plugin.is_skip_to_string_enabled());
    }

    #[test]
    fn test_plugin_args_must_enable_plugin() {
        assert!(MethodGenerator::new().plugin_arg("-npa").plugin().is_err());
        assert!(MethodGenerator::new().plugin_arg("-Xguava:skipToString").plugin().is_err());
    }

    #[test]
    fn test_missing_models_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let summary = MethodGenerator::new()
            .model_path(dir.path().join("missing"))
            .output_dir(dir.path().join("out"))
            .run()
            .unwrap();
        assert!(summary.model_files.is_empty());
        assert_eq!(summary.written(), 0);
    }
}
