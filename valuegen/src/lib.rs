//! valuegen core library.
//!
//! Synthesizes structural `equals`, `hashCode` and `toString` methods for
//! generated Java classes. A [`ClassModel`] describes the classes (built in
//! code or loaded from a TOML/JSON model file), [`classify`] picks the identity
//! fields, [`synth`] builds the method trees, [`render`] turns them into Java
//! source and [`eval`] runs them against in-memory instances.
//!
//! ```
//! use valuegen::{ClassDescriptor, ClassModel, FieldDescriptor, GuavaPlugin};
//!
//! let mut model = ClassModel::new();
//! model
//!     .add_class(ClassDescriptor::new("Point").with_field(FieldDescriptor::new("x", "int")))
//!     .unwrap();
//!
//! let report = GuavaPlugin::new().run(&mut model);
//! assert_eq!(report.generated_count(), 3);
//! ```

pub mod classify;
pub mod emit;
pub mod errors;
pub mod eval;
pub mod model;
pub mod plugin;
pub mod render;
pub mod synth;
pub mod tree;

pub use classify::IdentityFields;
pub use emit::{EmitStatus, EmittedFile, emit_sources};
pub use errors::*;
pub use model::{
    ClassDescriptor, ClassId, ClassModel, FieldDescriptor, MethodSignature, ModelSchema, Superclass, discover_model_files,
    load_model, load_models,
};
pub use plugin::{ClassReport, GuavaPlugin, MethodOutcome, RunReport};
pub use render::{render_class, render_method, source_path};
pub use synth::{Helpers, SkipReason, SynthOptions, synthesize};
pub use tree::{GeneratedMethod, MethodKind};
