//! Build-time generator for value-object methods.
//!
//! This crate loads class models (`.toml` or `.json`) describing generated
//! Java classes, synthesizes `equals`, `hashCode` and `toString` for them and
//! writes one `.java` file per class.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     let summary = valuegen_build::generate_methods()
//!         .model_path("schema/")
//!         .output_dir("target/generated-sources/valuegen")
//!         .plugin_arg("-Xguava")
//!         .run()
//!         .expect("Failed to generate value methods");
//!
//!     for file in &summary.model_files {
//!         println!("cargo:rerun-if-changed={}", file.display());
//!     }
//! }
//! ```

mod generator;

pub use generator::{GenerationSummary, MethodGenerator};

/// Create a new method generator with default settings.
pub fn generate_methods() -> MethodGenerator {
    MethodGenerator::new()
}
