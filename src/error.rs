//! Error taxonomy for the analysis pipeline.
//!
//! Only `LoadFailure`, `ConfigFailure` and `OutputFailure` abort a run.
//! Per-package and per-file conditions are logged and skipped at the stage
//! that detects them.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The loader produced nothing usable. Fatal.
    #[error("failed to load packages from {path}: {reason}")]
    #[diagnostic(
        code(orphanscan::load_failure),
        help("check that the path exists and contains Go source files")
    )]
    LoadFailure { path: PathBuf, reason: String },

    /// A specific package had errors. Non-fatal; the package is skipped.
    #[error("package {package} has {count} error(s)")]
    #[diagnostic(code(orphanscan::package_error))]
    PackageError { package: String, count: usize },

    /// A syntax tree had no corresponding compiled file entry. Non-fatal;
    /// the file is skipped.
    #[error("package {package}: syntax tree {index} has no matching file entry")]
    #[diagnostic(code(orphanscan::index_mismatch))]
    IndexMismatch { package: String, index: usize },

    /// Serializing or writing results failed. Fatal.
    #[error("failed to write analysis output")]
    #[diagnostic(code(orphanscan::output_failure))]
    OutputFailure(#[from] serde_json::Error),

    /// The configuration file could not be read or parsed. Fatal.
    #[error("failed to load configuration from {path}")]
    #[diagnostic(code(orphanscan::config_failure))]
    ConfigFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
