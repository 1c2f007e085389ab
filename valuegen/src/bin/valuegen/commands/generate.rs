use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::path::PathBuf;
use valuegen::{EmittedFile, GuavaPlugin, MethodKind, RunReport, emit_sources};

use crate::commands::load_project_model;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme::{file_marker, outcome_label};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Generate",
        commands: &[
            "valuegen generate                           # Use models and output_dir from valuegen.toml",
            "valuegen generate schema/orders.toml -o gen # Explicit model file and output directory",
        ],
    },
    ExampleGroup {
        title: "Options",
        commands: &[
            "valuegen generate --skip-to-string          # Only equals and hashCode",
            "valuegen generate --plugin-arg=-Xguava --plugin-arg=-Xguava:skipToString",
            "valuegen generate --dry-run                 # Report changes without writing",
        ],
    },
];

#[derive(Args)]
pub struct GenerateArgs {
    /// Model files or directories (defaults to generator.models)
    pub paths: Vec<PathBuf>,

    /// Output directory for generated sources (defaults to generator.output_dir)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Do not generate toString methods
    #[arg(long)]
    pub skip_to_string: bool,

    /// Raw plugin argument, e.g. -Xguava:skipToString (repeatable)
    #[arg(long = "plugin-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub plugin_args: Vec<String>,
}

#[derive(Serialize)]
struct GenerateSummary {
    generated_at: DateTime<Utc>,
    dry_run: bool,
    model_files: Vec<PathBuf>,
    output_dir: PathBuf,
    report: RunReport,
    files: Vec<EmittedFile>,
}

pub fn handle_generate(args: GenerateArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    if !ctx.is_initialized() && args.paths.is_empty() {
        output.warning("No valuegen.toml found; using default settings.");
    }

    let plugin = GuavaPlugin::from_options_and_args(ctx.synth_options(args.skip_to_string), &args.plugin_args)?;
    let (mut model, model_files) = load_project_model(&ctx, &args.paths, output)?;
    let output_dir = ctx.output_dir(args.out.as_deref());

    let report = plugin.run(&mut model);
    let files = emit_sources(&model, &output_dir, args.dry_run).context("Failed to write generated sources")?;

    if output.is_json() {
        return output.json(&GenerateSummary {
            generated_at: Utc::now(),
            dry_run: args.dry_run,
            model_files,
            output_dir,
            report,
            files,
        });
    }

    output.heading("Synthesized Methods");
    print_report(&report, output);

    output.heading(if args.dry_run { "Planned Files" } else { "Files" });
    for file in files.iter().filter(|f| f.changed()) {
        let path = file.path.strip_prefix(&output_dir).unwrap_or(file.path.as_path());
        output.item(file_marker(file.status), &path.display().to_string());
    }

    let changed = files.iter().filter(|f| f.changed()).count();
    let unchanged = files.len() - changed;
    let verb = if args.dry_run { "Would write" } else { "Wrote" };
    output.success(&format!(
        "{verb} {changed} file(s) to {} ({unchanged} unchanged, {} methods generated)",
        output_dir.display(),
        report.generated_count()
    ));
    Ok(())
}

fn print_report(report: &RunReport, output: &OutputManager) {
    if report.classes.is_empty() {
        output.info("Model contains no classes.");
        return;
    }

    if output.is_compact() {
        for class in &report.classes {
            let generated: Vec<String> = class.generated().map(|kind| kind.to_string()).collect();
            output.item("•", &format!("{}: {}", class.class, generated.join(", ")));
        }
        return;
    }

    let mut table = output.table(&["Class", "toString", "hashCode", "equals"]);
    for class in &report.classes {
        let mut row = vec![Cell::new(&class.class)];
        for kind in MethodKind::ALL {
            row.push(Cell::new(outcome_label(class.outcome(kind).and_then(|o| o.skipped))));
        }
        table.add_row(row);
    }
    output.code(&table.to_string());
}
