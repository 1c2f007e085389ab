//! Writing rendered compilation units to an output directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::errors::EmitError;
use crate::model::ClassModel;
use crate::render::{render_class, source_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitStatus {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedFile {
    pub class: String,
    pub path: PathBuf,
    pub status: EmitStatus,
}

impl EmittedFile {
    pub fn changed(&self) -> bool {
        self.status != EmitStatus::Unchanged
    }
}

/// Render every class of `model` below `out_dir`.
///
/// Files whose content is already up to date are left alone so downstream
/// builds do not see a fresh timestamp. With `dry_run` nothing is written and
/// the returned statuses describe what would happen.
///
/// Nothing is written if any class declares a method whose source the model
/// does not carry.
pub fn emit_sources(model: &ClassModel, out_dir: &Path, dry_run: bool) -> Result<Vec<EmittedFile>, EmitError> {
    for (_, class) in model.iter() {
        let missing: Vec<String> = class.methods_without_source().map(ToString::to_string).collect();
        if !missing.is_empty() {
            return Err(EmitError::MissingMethodSource {
                class: class.qualified_name(),
                methods: missing.join(", "),
            });
        }
    }

    let mut emitted = Vec::with_capacity(model.len());

    for (id, class) in model.iter() {
        let path = out_dir.join(source_path(class));
        let source = render_class(model, id);

        let status = match fs::read(&path) {
            Ok(existing) if existing == source.as_bytes() => EmitStatus::Unchanged,
            Ok(_) => EmitStatus::Updated,
            Err(err) if err.kind() == ErrorKind::NotFound => EmitStatus::Created,
            Err(err) => return Err(EmitError::Read { path, source: err }),
        };

        if status != EmitStatus::Unchanged && !dry_run {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| EmitError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, &source).map_err(|source| EmitError::Write {
                path: path.clone(),
                source,
            })?;
        }
        debug!("{}: {status:?}", path.display());

        emitted.push(EmittedFile {
            class: class.qualified_name(),
            path,
            status,
        });
    }

    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDescriptor, FieldDescriptor, MethodSignature};
    use crate::plugin::GuavaPlugin;

    fn model() -> ClassModel {
        let mut model = ClassModel::new();
        model
            .add_class(
                ClassDescriptor::new("Order")
                    .in_package("com.example")
                    .with_field(FieldDescriptor::new("total", "long")),
            )
            .unwrap();
        GuavaPlugin::new().run(&mut model);
        model
    }

    #[test]
    fn test_writes_only_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();

        let first = emit_sources(&model, dir.path(), false).unwrap();
        assert_eq!(first[0].status, EmitStatus::Created);
        let path = dir.path().join("com/example/Order.java");
        assert!(fs::read_to_string(&path).unwrap().contains("public int hashCode()"));

        let second = emit_sources(&model, dir.path(), false).unwrap();
        assert_eq!(second[0].status, EmitStatus::Unchanged);
        assert!(!second[0].changed());

        fs::write(&path, "stale").unwrap();
        let third = emit_sources(&model, dir.path(), false).unwrap();
        assert_eq!(third[0].status, EmitStatus::Updated);
    }

    #[test]
    fn test_unreadable_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the source file should go cannot be read as a file.
        fs::create_dir_all(dir.path().join("com/example/Order.java")).unwrap();

        let err = emit_sources(&model(), dir.path(), false).unwrap_err();
        assert!(matches!(err, EmitError::Read { ref path, .. } if path.ends_with("com/example/Order.java")));
    }

    #[test]
    fn test_declared_equals_is_written_next_to_generated_hash_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = ClassModel::new();
        model
            .add_class(
                ClassDescriptor::new("Money")
                    .in_package("com.example")
                    .with_field(FieldDescriptor::new("amount", "long"))
                    .with_method_source(
                        MethodSignature::equals_method(),
                        "public boolean equals(Object other) {\n    return other instanceof Money;\n}",
                    ),
            )
            .unwrap();
        GuavaPlugin::new().run(&mut model);

        emit_sources(&model, dir.path(), false).unwrap();
        let source = fs::read_to_string(dir.path().join("com/example/Money.java")).unwrap();
        assert!(source.contains("public boolean equals(Object other) {\n        return other instanceof Money;"));
        assert!(source.contains("public int hashCode()"));
    }

    #[test]
    fn test_declared_method_without_source_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model();
        model
            .add_class(
                ClassDescriptor::new("Money")
                    .with_field(FieldDescriptor::new("amount", "long"))
                    .with_method(MethodSignature::equals_method()),
            )
            .unwrap();
        GuavaPlugin::new().run(&mut model);

        let err = emit_sources(&model, dir.path(), false).unwrap_err();
        assert!(matches!(
            err,
            EmitError::MissingMethodSource { ref class, ref methods } if class == "Money" && methods == "equals(Object)"
        ));
        assert!(!dir.path().join("com/example/Order.java").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let emitted = emit_sources(&model(), dir.path(), true).unwrap();
        assert_eq!(emitted[0].status, EmitStatus::Created);
        assert!(!emitted[0].path.exists());
    }
}
