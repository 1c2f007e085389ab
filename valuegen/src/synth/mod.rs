//! Method synthesis: decide per class which of `toString`, `hashCode` and
//! `equals` to generate, and build their bodies.
//!
//! Synthesis only reads the model. The identity fields and the set of methods
//! the class already has are computed once per class and shared by all three
//! generators, so `hashCode` and `equals` always agree on fields and order.

mod equals;
mod hash_code;
mod to_string;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classify::IdentityFields;
use crate::model::{ClassDescriptor, ClassId, ClassModel};
use crate::tree::{GeneratedMethod, MethodKind};

pub use equals::generate_equals;
pub use hash_code::generate_hash_code;
pub use to_string::generate_to_string;

/// Helper classes the generated bodies call into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Helpers {
    /// Provides `toStringHelper(Object)`.
    #[serde(default = "default_to_string_helper")]
    pub to_string: String,
    /// Provides `hash(Object...)` and `equals(Object, Object)`.
    #[serde(default = "default_objects_helper")]
    pub objects: String,
}

impl Default for Helpers {
    fn default() -> Self {
        Self {
            to_string: default_to_string_helper(),
            objects: default_objects_helper(),
        }
    }
}

fn default_to_string_helper() -> String {
    "com.google.common.base.MoreObjects".to_string()
}

fn default_objects_helper() -> String {
    "java.util.Objects".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthOptions {
    /// Suppress `toString` generation for every class.
    pub skip_to_string: bool,
    pub helpers: Helpers,
}

/// Why a method was not generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Turned off by configuration.
    Disabled,
    /// Abstract classes never get generated methods.
    Abstract,
    /// The class already declares the method.
    AlreadyDefined,
    /// No identity fields to compare or hash.
    NoIdentityFields,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Disabled => "disabled",
            Self::Abstract => "abstract class",
            Self::AlreadyDefined => "already defined",
            Self::NoIdentityFields => "no identity fields",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Generate(GeneratedMethod),
    Skip(SkipReason),
}

/// Which of the three base methods a class already declares, taken once
/// before any method is synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MethodPresence {
    to_string: bool,
    hash_code: bool,
    equals: bool,
}

impl MethodPresence {
    fn of(class: &ClassDescriptor) -> Self {
        Self {
            to_string: class.has_method(&MethodKind::ToString.signature()),
            hash_code: class.has_method(&MethodKind::HashCode.signature()),
            equals: class.has_method(&MethodKind::Equals.signature()),
        }
    }

    fn has(self, kind: MethodKind) -> bool {
        match kind {
            MethodKind::ToString => self.to_string,
            MethodKind::HashCode => self.hash_code,
            MethodKind::Equals => self.equals,
        }
    }
}

/// Decisions for one class, in `toString`, `hashCode`, `equals` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSynthesis {
    pub class: ClassId,
    pub decisions: Vec<(MethodKind, Decision)>,
}

impl ClassSynthesis {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedMethod> {
        self.decisions.iter().filter_map(|(_, decision)| match decision {
            Decision::Generate(method) => Some(method),
            Decision::Skip(_) => None,
        })
    }

    pub fn decision(&self, kind: MethodKind) -> Option<&Decision> {
        self.decisions.iter().find(|(k, _)| *k == kind).map(|(_, d)| d)
    }

    /// Attach the generated methods to the class, skipping any kind the class
    /// has gained since synthesis ran.
    pub fn apply(self, model: &mut ClassModel) -> Vec<(MethodKind, Option<SkipReason>)> {
        let class = model.get_mut(self.class);
        self.decisions
            .into_iter()
            .map(|(kind, decision)| match decision {
                Decision::Generate(method) if class.has_method(&method.signature()) => {
                    (kind, Some(SkipReason::AlreadyDefined))
                }
                Decision::Generate(method) => {
                    class.attach(method);
                    (kind, None)
                }
                Decision::Skip(reason) => (kind, Some(reason)),
            })
            .collect()
    }
}

/// Decide and build all three methods for `class`.
pub fn synthesize(model: &ClassModel, class: ClassId, options: &SynthOptions) -> ClassSynthesis {
    let descriptor = model.get(class);
    let presence = MethodPresence::of(descriptor);
    let fields = IdentityFields::of(model, class);

    let decisions = MethodKind::ALL
        .into_iter()
        .map(|kind| {
            let decision = decide(descriptor, &fields, presence, kind, options);
            match &decision {
                Decision::Generate(_) => debug!("{}: generating {kind}", descriptor.qualified_name()),
                Decision::Skip(reason) => {
                    debug!("{}: skipping {kind} ({reason})", descriptor.qualified_name())
                }
            }
            (kind, decision)
        })
        .collect();

    ClassSynthesis { class, decisions }
}

fn decide(
    class: &ClassDescriptor,
    fields: &IdentityFields<'_>,
    presence: MethodPresence,
    kind: MethodKind,
    options: &SynthOptions,
) -> Decision {
    if kind == MethodKind::ToString && options.skip_to_string {
        return Decision::Skip(SkipReason::Disabled);
    }
    if class.is_abstract {
        return Decision::Skip(SkipReason::Abstract);
    }
    if presence.has(kind) {
        return Decision::Skip(SkipReason::AlreadyDefined);
    }

    let method = match kind {
        MethodKind::ToString => Some(generate_to_string(class, fields, &options.helpers)),
        MethodKind::HashCode => generate_hash_code(fields, &options.helpers),
        MethodKind::Equals => generate_equals(class, fields, &options.helpers),
    };
    method.map_or(Decision::Skip(SkipReason::NoIdentityFields), Decision::Generate)
}
