//! The `-Xguava` plugin entry point.
//!
//! Holds the command-line protocol (`-Xguava` enables the plugin,
//! `-Xguava:skipToString` turns off `toString` generation) and drives
//! synthesis over a whole [`ClassModel`], reporting every decision.

use log::info;
use serde::Serialize;

use crate::errors::UsageError;
use crate::model::{ClassId, ClassModel};
use crate::synth::{SkipReason, SynthOptions, synthesize};
use crate::tree::MethodKind;

/// Name the plugin is registered under.
pub const OPTION_NAME: &str = "Xguava";
/// Flag that enables the plugin.
pub const ENABLE_FLAG: &str = "-Xguava";
/// Sub-flag that suppresses `toString` generation.
pub const SKIP_TO_STRING_PARAM: &str = "-Xguava:skipToString";

#[derive(Debug, Clone, Default)]
pub struct GuavaPlugin {
    options: SynthOptions,
}

impl GuavaPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SynthOptions) -> Self {
        Self { options }
    }

    pub fn option_name(&self) -> &'static str {
        OPTION_NAME
    }

    pub fn usage(&self) -> String {
        format!(
            "  {ENABLE_FLAG}\t:  enable generation of guava toString, equals and hashCode methods\n    \
             {SKIP_TO_STRING_PARAM}\t:  do not generate toString methods"
        )
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    pub fn is_skip_to_string_enabled(&self) -> bool {
        self.options.skip_to_string
    }

    pub fn set_skip_to_string(&mut self, skip: bool) {
        self.options.skip_to_string = skip;
    }

    /// Inspect `args[i]` and return how many tokens were consumed.
    ///
    /// Recognizes `-Xguava:skipToString` (consumes 1). The enabling flag and
    /// arguments belonging to someone else consume 0. Any other token starting
    /// with `-Xguava` is rejected.
    pub fn parse_argument<S: AsRef<str>>(&mut self, args: &[S], i: usize) -> Result<usize, UsageError> {
        let Some(arg) = args.get(i) else {
            return Err(UsageError::IndexOutOfRange {
                index: i,
                len: args.len(),
            });
        };
        let arg = arg.as_ref().trim();

        if arg == SKIP_TO_STRING_PARAM {
            self.options.skip_to_string = true;
            return Ok(1);
        }
        if arg != ENABLE_FLAG && arg.starts_with(ENABLE_FLAG) {
            return Err(UsageError::UnknownOption {
                arg: arg.to_string(),
                usage: self.usage(),
            });
        }
        Ok(0)
    }

    /// Build a plugin from a full argument list.
    ///
    /// Returns `None` when `-Xguava` is absent. Sub-options without the
    /// enabling flag are an error.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Option<Self>, UsageError> {
        let enabled = args.iter().any(|arg| arg.as_ref().trim() == ENABLE_FLAG);
        let mut plugin = Self::new();

        for (i, arg) in args.iter().enumerate() {
            let arg = arg.as_ref().trim();
            if arg == ENABLE_FLAG || !arg.starts_with(ENABLE_FLAG) {
                continue;
            }
            plugin.parse_argument(args, i)?;
            if !enabled {
                return Err(UsageError::PluginNotEnabled {
                    arg: arg.to_string(),
                    option: OPTION_NAME,
                });
            }
        }

        Ok(enabled.then_some(plugin))
    }

    /// Start from configured `options` and apply raw plugin arguments on top.
    ///
    /// With no arguments the options are used as they are. Otherwise the
    /// arguments must enable the plugin, and `-Xguava:skipToString` can only
    /// turn `toString` generation off, never back on.
    pub fn from_options_and_args<S: AsRef<str>>(options: SynthOptions, args: &[S]) -> Result<Self, UsageError> {
        let mut plugin = Self::with_options(options);
        if args.is_empty() {
            return Ok(plugin);
        }

        let Some(parsed) = Self::from_args(args)? else {
            return Err(UsageError::NotEnabled {
                args: args.iter().map(|arg| arg.as_ref().to_string()).collect(),
                option: OPTION_NAME,
            });
        };
        if parsed.is_skip_to_string_enabled() {
            plugin.set_skip_to_string(true);
        }
        Ok(plugin)
    }

    /// Synthesize methods for every class of `model`, in model order.
    pub fn run(&self, model: &mut ClassModel) -> RunReport {
        let mut classes = Vec::with_capacity(model.len());

        for id in model.ids() {
            let outcomes = synthesize(model, id, &self.options).apply(model);
            classes.push(ClassReport {
                id,
                class: model.get(id).qualified_name(),
                methods: outcomes
                    .into_iter()
                    .map(|(method, skipped)| MethodOutcome { method, skipped })
                    .collect(),
            });
        }

        let report = RunReport { classes };
        info!(
            "generated {} methods for {} classes ({} skipped)",
            report.generated_count(),
            report.classes.len(),
            report.skipped_count()
        );
        report
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOutcome {
    pub method: MethodKind,
    /// `None` when the method was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl MethodOutcome {
    pub fn is_generated(&self) -> bool {
        self.skipped.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassReport {
    #[serde(skip)]
    pub id: ClassId,
    pub class: String,
    pub methods: Vec<MethodOutcome>,
}

impl ClassReport {
    pub fn outcome(&self, kind: MethodKind) -> Option<&MethodOutcome> {
        self.methods.iter().find(|outcome| outcome.method == kind)
    }

    pub fn generated(&self) -> impl Iterator<Item = MethodKind> + '_ {
        self.methods.iter().filter(|o| o.is_generated()).map(|o| o.method)
    }
}

/// Everything a single [`GuavaPlugin::run`] decided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub classes: Vec<ClassReport>,
}

impl RunReport {
    pub fn generated_count(&self) -> usize {
        self.classes.iter().map(|c| c.generated().count()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| &c.methods)
            .filter(|o| !o.is_generated())
            .count()
    }

    pub fn class(&self, name: &str) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.class == name)
    }
}
