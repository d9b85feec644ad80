use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ImportSweepError {
    #[error("No analyzable files found in {path}")]
    #[diagnostic(code(importsweep::no_files))]
    NoFiles { path: PathBuf },

    /// The baseline exists but is unparseable or missing load-bearing fields.
    /// Never raised for an absent baseline.
    #[error("Invalid baseline file {path}: {message}")]
    #[diagnostic(
        code(importsweep::baseline_format),
        help("fix or delete the file, then run `importsweep baseline generate`")
    )]
    BaselineFormat { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(importsweep::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An edit batch does not fit the text it is applied to.
    #[error("Cannot apply edit to {path} at line {line}: {reason}")]
    #[diagnostic(
        code(importsweep::stale_edit),
        help("the file changed since it was analyzed; run the command again")
    )]
    StaleEdit {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(importsweep::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(importsweep::stdio))]
    Stdio(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(importsweep::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(importsweep::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(importsweep::watch))]
    Notify(#[from] notify::Error),
}

impl ImportSweepError {
    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportSweepError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn baseline_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ImportSweepError::BaselineFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportSweepError>;
