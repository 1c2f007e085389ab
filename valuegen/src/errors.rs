use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`ClassModel`](crate::model::ClassModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two classes in the same model share a name.
    #[error("class '{name}' is defined more than once")]
    DuplicateClass { name: String },

    /// A class declares the same field name twice.
    #[error("class '{class}' declares field '{field}' more than once")]
    DuplicateField { class: String, field: String },

    /// Following superclass links from `class` leads back to `class`.
    #[error("inheritance cycle detected at class '{class}'")]
    InheritanceCycle { class: String },

    /// Model file could not be read.
    #[error("failed to read model file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model file has an extension we do not know how to parse.
    #[error("unsupported model format for {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid TOML model: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected plugin command-line arguments.
#[derive(Debug, Error)]
pub enum UsageError {
    /// `-Xguava:<something>` where `<something>` is not a known sub-option.
    #[error("unrecognized option '{arg}'\nusage:\n{usage}")]
    UnknownOption { arg: String, usage: String },

    /// A sub-option was passed but the plugin itself was never enabled.
    #[error("option '{arg}' requires the plugin to be enabled with '-{option}'")]
    PluginNotEnabled { arg: String, option: &'static str },

    /// Plugin arguments were given but none of them is the enabling flag.
    #[error("plugin arguments {args:?} do not enable the plugin with '-{option}'")]
    NotEnabled { args: Vec<String>, option: &'static str },

    /// `parse_argument` was asked to look past the end of the argument list.
    #[error("argument index {index} must be less than {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures while interpreting generated methods with [`Interpreter`](crate::eval::Interpreter).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("class '{class}' has no instance field '{field}'")]
    NoSuchField { class: String, field: String },

    #[error("unbound local variable '{0}'")]
    UnboundLocal(String),

    #[error("cannot cast {found} to {target}")]
    ClassCast { found: String, target: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("null dereference while evaluating {0}")]
    NullPointer(String),

    #[error("unsupported call '{0}'")]
    UnsupportedCall(String),

    /// The method exists on the class but was written upstream, so there is no body to run.
    #[error("{method} of class '{class}' was not generated and cannot be evaluated")]
    OpaqueMethod { class: String, method: &'static str },

    #[error("method body finished without returning")]
    MissingReturn,
}

/// Failures while writing rendered sources.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The class declares methods the model has no source for, so its file
    /// would silently lose them.
    #[error("class '{class}' declares {methods} without source; add `source` to these methods in the model")]
    MissingMethodSource { class: String, methods: String },

    #[error("failed to read existing {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
