//! Finding and merging model documents on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ClassModel, ModelSchema};
use crate::errors::ModelError;

const MODEL_EXTENSIONS: &[&str] = &["toml", "json"];

/// Collect model files under `root`, sorted by path.
///
/// A file path is returned as-is. Directories are walked recursively, skipping
/// hidden entries and anything under `target/`.
pub fn discover_model_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MODEL_EXTENSIONS.contains(&ext))
        })
        .filter(|path| {
            !path
                .strip_prefix(root)
                .unwrap_or(path.as_path())
                .components()
                .any(|c| {
                    let part = c.as_os_str().to_string_lossy();
                    part.starts_with('.') || part == "target"
                })
        })
        .collect();

    files.sort();
    files
}

/// Load several documents into one model so classes may extend classes from
/// another file.
pub fn load_models<P: AsRef<Path>>(paths: &[P]) -> Result<ClassModel, ModelError> {
    let schemas = paths
        .iter()
        .map(|path| ModelSchema::read(path.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    ModelSchema::merge(schemas).into_model()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_skips_hidden_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("a.toml"), "").unwrap();
        fs::write(root.join("nested/b.json"), "{}").unwrap();
        fs::write(root.join("notes.md"), "").unwrap();
        fs::write(root.join(".cache/c.toml"), "").unwrap();
        fs::write(root.join("target/d.toml"), "").unwrap();

        let files = discover_model_files(root);
        assert_eq!(files, vec![root.join("a.toml"), root.join("nested/b.json")]);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(discover_model_files(&path), vec![path]);
    }

    #[test]
    fn test_load_models_resolves_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.toml");
        let derived = dir.path().join("derived.json");
        fs::write(
            &base,
            "package = \"com.example\"\n[[classes]]\nname = \"Base\"\nfields = [{ name = \"id\", type = \"long\" }]\n",
        )
        .unwrap();
        fs::write(
            &derived,
            r#"{ "package": "com.example", "classes": [{ "name": "Derived", "extends": "Base" }] }"#,
        )
        .unwrap();

        let model = load_models(&[derived, base]).unwrap();
        let child = model.find("com.example.Derived").unwrap();
        let parent = model.find("com.example.Base").unwrap();
        assert_eq!(model.superclass_of(child), Some(parent));
    }
}
