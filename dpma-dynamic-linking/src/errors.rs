use std::{fmt, path::PathBuf};

use thiserror::Error;

pub type SendableError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Why a single candidate was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    NotFound,
    /// Present on disk but could not be inspected, e.g. permission denied.
    Inaccessible(String),
    SignatureMismatch,
    LoadFailed(String),
}

/// One failed candidate, in the order it was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(path: PathBuf, kind: DiagnosticKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            DiagnosticKind::NotFound => write!(f, "{path} does not exist"),
            DiagnosticKind::Inaccessible(reason) => {
                write!(f, "{path} exists but could not be accessed: {reason}")
            }
            DiagnosticKind::SignatureMismatch => {
                write!(f, "{path} exists but failed signature check")
            }
            DiagnosticKind::LoadFailed(reason) => write!(f, "{path} error on load: {reason}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No library name was given; nothing was looked up.
    #[error("no library specified")]
    MissingLibraryName,

    /// Every candidate was tried and none could be loaded.
    #[error("{library} not available for this platform/architecture ({platform}-{arch}); {} candidate(s) tried", .diagnostics.len())]
    Exhausted {
        library: String,
        platform: String,
        arch: String,
        diagnostics: Vec<Diagnostic>,
    },
}

impl ResolveError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ResolveError::Exhausted { diagnostics, .. } => diagnostics,
            ResolveError::MissingLibraryName => &[],
        }
    }
}
