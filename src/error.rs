#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that stop a scaffold run (or a catalog load) as a whole.
#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error("Target root already exists: {path}")]
    #[diagnostic(help("Choose a new directory, remove this one, or pass --skip-existing"))]
    RootAlreadyExists { path: PathBuf },

    #[error("This scaffold run has already been started")]
    AlreadyRun,

    #[error("Catalog not found at {path}")]
    #[diagnostic(help("Pass the path to a catalog .toml or .json file"))]
    CatalogNotFound { path: PathBuf },

    #[error("Failed to parse catalog {path}")]
    #[diagnostic(help("Check the TOML syntax of the catalog"))]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse catalog {path}")]
    #[diagnostic(help("Check the JSON syntax of the catalog"))]
    CatalogParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid catalog: {reason}")]
    CatalogInvalid { reason: String },

    #[error("Invalid parameter name '{name}'")]
    #[diagnostic(help(
        "Parameter names start with a letter or '_' and contain only letters, digits, '_' and '-'"
    ))]
    InvalidParameterName { name: String },

    #[error("Failed to parse user config {path}")]
    #[diagnostic(help("Check the TOML syntax in your scaffolder config.toml"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt cancelled by user")]
    PromptCancelled,
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Errors confined to a single catalog entry. They are recorded in the
/// manifest and never abort the run.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum EntryError {
    #[error("missing parameter '{name}' in {entry}")]
    #[diagnostic(help("Supply it with -p {name}=<value> or add a default to the catalog"))]
    MissingParameter { name: String, entry: String },

    #[error("path '{entry}' escapes the target root")]
    PathTraversal { entry: String },

    #[error("path '{path}' is produced by more than one entry")]
    DuplicateEntry { path: String },

    #[error("malformed template in {entry}: {reason}")]
    MalformedTemplate { entry: String, reason: String },

    #[error("could not write {path}: {cause}")]
    Io { path: String, cause: String },
}

impl EntryError {
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        EntryError::Io {
            path: path.into(),
            cause: err.to_string(),
        }
    }
}
