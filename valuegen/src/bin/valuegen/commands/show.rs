use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use valuegen::render::render_generated;
use valuegen::{GuavaPlugin, render_class};

use crate::commands::load_project_model;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Preview Generated Code",
    commands: &[
        "valuegen show Order                     # Generated methods of Order",
        "valuegen show com.example.Order --full  # Whole compilation unit",
        "valuegen show Order --output json       # Method trees as JSON",
    ],
}];

#[derive(Args)]
pub struct ShowArgs {
    /// Class to show (simple or qualified name)
    pub class: String,

    /// Model files or directories (defaults to generator.models)
    pub paths: Vec<PathBuf>,

    /// Print the whole compilation unit instead of only the generated methods
    #[arg(long)]
    pub full: bool,

    /// Do not generate toString methods
    #[arg(long)]
    pub skip_to_string: bool,
}

pub fn handle_show(args: ShowArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let (mut model, _) = load_project_model(&ctx, &args.paths, output)?;

    let Some(id) = model.find(&args.class) else {
        anyhow::bail!("Class '{}' not found in the model", args.class);
    };

    let report = GuavaPlugin::with_options(ctx.synth_options(args.skip_to_string)).run(&mut model);
    let descriptor = model.get(id);

    if output.is_json() {
        return output.json(&descriptor.generated_methods());
    }

    output.heading(&descriptor.qualified_name());
    if let Some(class_report) = report.classes.iter().find(|c| c.id == id) {
        for outcome in class_report.methods.iter().filter(|o| !o.is_generated()) {
            if let Some(reason) = outcome.skipped {
                output.key_value(&outcome.method.to_string(), &format!("skipped ({reason})"));
            }
        }
    }

    if args.full {
        output.code(&render_class(&model, id));
    } else if descriptor.generated_methods().is_empty() {
        output.info("No methods were generated for this class.");
    } else {
        output.code(&render_generated(&model, id, 0));
    }
    Ok(())
}
