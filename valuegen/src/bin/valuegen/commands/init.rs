use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::fs;

use crate::context::{CONFIG_FILE, ProjectContext, ValuegenConfig};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Set Up",
        commands: &[
            "valuegen init                          # Write valuegen.toml with defaults",
            "valuegen init --skip-to-string         # Only generate equals and hashCode",
        ],
    },
    ExampleGroup {
        title: "Custom Layout",
        commands: &[
            "valuegen init --models xsd-out --output-dir src/generated/java",
            "valuegen init --force                  # Overwrite an existing valuegen.toml",
        ],
    },
];

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing valuegen.toml
    #[arg(long)]
    pub force: bool,

    /// Disable toString generation in the written config
    #[arg(long)]
    pub skip_to_string: bool,

    /// Directory (relative to the project) holding model files
    #[arg(long, value_name = "DIR")]
    pub models: Option<String>,

    /// Directory (relative to the project) for generated Java sources
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,
}

pub fn handle_init(args: InitArgs, output: &OutputManager) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let ctx = ProjectContext::from_root(current_dir)?;

    output.heading("Initialize valuegen");

    if ctx.config_path.exists() && !args.force {
        output.warning(&format!("{CONFIG_FILE} already exists in {}", ctx.project_root.display()));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    let config = build_config(&args);
    let content = render_config(&config)?;
    fs::write(&ctx.config_path, content)
        .with_context(|| format!("Failed to write {}", ctx.config_path.display()))?;
    output.success(&format!("Created {}", ctx.config_path.display()));

    for model_dir in &config.generator.models {
        let path = ctx.project_root.join(model_dir);
        if !path.exists() {
            fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            output.item("+", &format!("model directory {model_dir}/"));
        }
    }

    output.info("Add .toml or .json class models, then run 'valuegen generate'.");
    Ok(())
}

fn build_config(args: &InitArgs) -> ValuegenConfig {
    let mut config = ValuegenConfig::default();
    config.generator.skip_to_string = args.skip_to_string;
    if let Some(models) = &args.models {
        config.generator.models = vec![models.clone()];
    }
    if let Some(output_dir) = &args.output_dir {
        config.generator.output_dir = output_dir.clone();
    }
    config
}

fn render_config(config: &ValuegenConfig) -> Result<String> {
    let body = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    Ok(format!(
        "# valuegen configuration, created {}\n\n{body}",
        Utc::now().format("%Y-%m-%d")
    ))
}
