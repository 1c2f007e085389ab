//! Terminal output shared by the valuegen commands.

use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, ColoredString, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table, presets};
use serde::Serialize;

use crate::theme::{self, Tone};

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables and headings (default)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// One line per class
    Compact,
}

#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// A command result that can be shown in every [`OutputFormat`].
pub trait TableDisplay: Serialize {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    pub fn is_compact(&self) -> bool {
        self.options.output_format == OutputFormat::Compact
    }

    pub fn display<T: TableDisplay>(&self, data: &T) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        match self.options.output_format {
            OutputFormat::Json => return self.json(data),
            OutputFormat::Table => println!("{}", data.to_table(self)),
            OutputFormat::Compact => println!("{}", data.to_compact()),
        }
        Ok(())
    }

    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        if !self.options.quiet {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if let Some(line) = self.status_line(Tone::Success, message) {
            println!("{line}");
        }
    }

    pub fn warning(&self, message: &str) {
        if let Some(line) = self.status_line(Tone::Warning, message) {
            println!("{line}");
        }
    }

    pub fn info(&self, message: &str) {
        if let Some(line) = self.status_line(Tone::Info, message) {
            println!("{line}");
        }
    }

    /// Progress detail, printed to stderr with `--verbose`.
    pub fn verbose(&self, message: &str) {
        if !self.options.verbose {
            return;
        }
        if let Some(line) = self.status_line(Tone::Detail, message) {
            eprintln!("{line}");
        }
    }

    pub fn heading(&self, text: &str) {
        if !self.options.quiet {
            println!("\n{}", self.paint(text, theme::HEADING).bold());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            println!("{}: {value}", self.paint(key, theme::KEY));
        }
    }

    /// An indented list entry behind `marker`.
    pub fn item(&self, marker: &str, text: &str) {
        if !self.options.quiet {
            println!("  {} {text}", self.paint(marker, theme::MUTED));
        }
    }

    /// Source text or a pre-rendered table, printed as-is.
    pub fn code(&self, text: &str) {
        if self.options.quiet {
            return;
        }
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
    }

    /// An empty table with a bold header row.
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table.set_header(headers.iter().map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if self.options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        }));
        table
    }

    fn status_line(&self, tone: Tone, message: &str) -> Option<String> {
        if self.options.quiet {
            return None;
        }
        Some(format!(
            "{} {}",
            self.paint(tone.glyph(), tone.color()),
            self.paint(message, tone.color())
        ))
    }

    fn paint(&self, text: &str, color: Color) -> ColoredString {
        if self.options.no_color { text.normal() } else { text.color(color) }
    }
}
