//! Colors and glyphs for terminal output.

use colored::Color;
use valuegen::{EmitStatus, SkipReason};

pub const HEADING: Color = Color::BrightBlue;
pub const KEY: Color = Color::BrightCyan;
pub const MUTED: Color = Color::BrightBlack;

/// Kind of a status line; picks its glyph and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Info,
    Error,
    /// Verbose-only detail.
    Detail,
}

impl Tone {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
            Self::Error => "✗",
            Self::Detail => "→",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Info => Color::Blue,
            Self::Error => Color::Red,
            Self::Detail => MUTED,
        }
    }
}

/// Marker in front of a file in the `generate` listing.
pub fn file_marker(status: EmitStatus) -> &'static str {
    match status {
        EmitStatus::Created => "+",
        EmitStatus::Updated => "~",
        EmitStatus::Unchanged => "=",
    }
}

/// Table cell for one method column of the `generate` report.
pub fn outcome_label(skipped: Option<SkipReason>) -> String {
    match skipped {
        None => format!("{} generated", Tone::Success.glyph()),
        Some(reason) => format!("- {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(None), "✓ generated");
        assert_eq!(outcome_label(Some(SkipReason::AlreadyDefined)), "- already defined");
    }

    #[test]
    fn test_file_marker() {
        assert_eq!(file_marker(EmitStatus::Created), "+");
        assert_eq!(file_marker(EmitStatus::Updated), "~");
    }
}
