use std::path::PathBuf;

/// Code generation error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Package parse error in {}: {message}", path.display())]
    PackageParse { path: PathBuf, message: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Format error: {0}")]
    Format(String),
}

impl Error {
    pub(crate) fn package_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::PackageParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::Template(e.to_string())
    }
}

/// Result type alias using the codegen [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
