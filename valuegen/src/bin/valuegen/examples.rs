use std::fmt::Write;

use crate::commands::{fields, generate, init, show};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "init",
            groups: init::EXAMPLES,
        },
        CommandExample {
            name: "generate",
            groups: generate::EXAMPLES,
        },
        CommandExample {
            name: "fields",
            groups: fields::EXAMPLES,
        },
        CommandExample {
            name: "show",
            groups: show::EXAMPLES,
        },
    ]
}

/// `--help` appendix listing the example groups of one command.
pub fn render_examples(groups: &[ExampleGroup]) -> String {
    let mut out = String::from("Examples:\n");
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "  {}", group.title);
        for command in group.commands {
            let _ = writeln!(out, "    $ {command}");
        }
    }
    out
}

/// Top-level `--help` appendix.
pub fn render_environment(variables: &[(&str, &str)]) -> String {
    let width = variables.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::from("Environment:\n");
    for (name, description) in variables {
        let _ = writeln!(out, "  {name:<width$}  {description}");
    }
    out.push_str("\nRun 'valuegen <command> --help' for examples.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_examples() {
        let names: Vec<_> = command_examples().iter().map(|example| example.name).collect();
        assert_eq!(names, ["init", "generate", "fields", "show"]);
        assert!(command_examples().iter().all(|example| !example.groups.is_empty()));
    }

    #[test]
    fn test_render_examples() {
        let groups = [
            ExampleGroup {
                title: "First",
                commands: &["valuegen fields"],
            },
            ExampleGroup {
                title: "Second",
                commands: &["valuegen show Order"],
            },
        ];
        assert_eq!(
            render_examples(&groups),
            "Examples:\n  First\n    $ valuegen fields\n\n  Second\n    $ valuegen show Order\n"
        );
    }

    #[test]
    fn test_render_environment_aligns_names() {
        let text = render_environment(&[("RUST_LOG", "log filter"), ("NO_COLOR", "plain output")]);
        assert!(text.starts_with("Environment:\n  RUST_LOG  log filter\n  NO_COLOR  plain output\n"));
    }
}
