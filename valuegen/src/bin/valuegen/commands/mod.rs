pub mod fields;
pub mod generate;
pub mod init;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use valuegen::{ClassModel, discover_model_files, load_models};

use crate::context::ProjectContext;
use crate::output::OutputManager;

/// Resolve model locations and load every document found into one model.
pub(crate) fn load_project_model(
    ctx: &ProjectContext,
    explicit: &[PathBuf],
    output: &OutputManager,
) -> Result<(ClassModel, Vec<PathBuf>)> {
    let roots = ctx.model_roots(explicit);
    let files: Vec<PathBuf> = roots.iter().flat_map(|root| discover_model_files(root)).collect();

    if files.is_empty() {
        let searched = roots
            .iter()
            .map(|root| root.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!("No model files (.toml or .json) found in {searched}");
    }

    for file in &files {
        output.verbose(&format!("Loading {}", file.display()));
    }

    let model = load_models(&files).context("Failed to load class model")?;
    Ok((model, files))
}
