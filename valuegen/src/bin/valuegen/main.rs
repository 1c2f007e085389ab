mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Styles};
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;

use commands::{
    fields::{FieldsArgs, handle_fields},
    generate::{GenerateArgs, handle_generate},
    init::{InitArgs, handle_init},
    show::{ShowArgs, handle_show},
};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::Tone;

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Log filter for diagnostic output (e.g. valuegen=debug)"),
    ("NO_COLOR", "Disable colored output when set"),
];

#[derive(Parser)]
#[command(name = "valuegen")]
#[command(version)]
#[command(
    about = "Structural equals, hashCode and toString for generated Java classes",
    long_about = r#"Adds value semantics to generated Java classes:

• equals compares exact runtime type, then every identity field
• hashCode combines the same fields in the same order
• toString lists them with a Guava-style helper, omitting nulls
• Methods the class already declares are never replaced

Commands:
  init      Write a valuegen.toml for this project
  generate  Synthesize methods and write Java sources
  fields    Show the identity fields of each class
  show      Preview the generated methods of one class
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

/// The clap command with styles and the help appendices attached.
fn build_command() -> Command {
    let mut command = Cli::command()
        .styles(help_styles())
        .after_long_help(examples::render_environment(ENVIRONMENT_VARIABLES));
    for example in examples::command_examples() {
        let help = examples::render_examples(example.groups);
        command = command.mut_subcommand(example.name, |subcommand| subcommand.after_long_help(help));
    }
    command
}

#[derive(Subcommand)]
enum Commands {
    /// Write a valuegen.toml in the current directory
    Init(InitArgs),

    /// Synthesize methods for every class and write Java sources
    Generate(GenerateArgs),

    /// List the identity fields of each class
    Fields(FieldsArgs),

    /// Print the generated methods of one class
    Show(ShowArgs),
}

fn main() {
    env_logger::init();

    let matches = build_command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli) {
        let tone = Tone::Error;
        let message = format!("{err:#}");
        eprintln!("{} {}", tone.glyph().color(tone.color()), message.as_str().color(tone.color()));
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    let output = OutputManager::new(global_options);

    match cli.command {
        Commands::Init(args) => handle_init(args, &output),
        Commands::Generate(args) => handle_generate(args, &output),
        Commands::Fields(args) => handle_fields(args, &output),
        Commands::Show(args) => handle_show(args, &output),
    }
}
