use std::{io, path::PathBuf};

use crate::config::BuildType;

/// Broad category of a task failure, used by hosts that want to react
/// differently to "configure first" and "bad input".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    ConfigState,
    NotFound,
    TypeMismatch,
    DependencyState,
    ParseFailure,
    UserInputState,
    Io,
}

/// Errors that can occur while assembling a task command
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    ConfigState(String),

    #[error("build type `{0}` cannot be debugged, use Debug or RelWithDebInfo")]
    NotDebuggable(BuildType),

    #[error("no codemodel reply in {}, configure the project first", .0.display())]
    ReplyNotFound(PathBuf),

    #[error("target `{0}` not found in the codemodel")]
    TargetNotFound(String),

    #[error("target `{name}` has no artifacts")]
    NoArtifacts { name: String },

    #[error("target `{name}` is {kind}, not an executable")]
    NotExecutable { name: String, kind: String },

    #[error("{0}")]
    DependencyState(String),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    UserInput(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::ConfigState(_) | Error::NotDebuggable(_) => ErrorClass::ConfigState,
            Error::ReplyNotFound(_) | Error::TargetNotFound(_) | Error::NoArtifacts { .. } => {
                ErrorClass::NotFound
            }
            Error::NotExecutable { .. } => ErrorClass::TypeMismatch,
            Error::DependencyState(_) => ErrorClass::DependencyState,
            Error::Parse { .. } => ErrorClass::ParseFailure,
            Error::UserInput(_) => ErrorClass::UserInputState,
            Error::Io { .. } => ErrorClass::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for task assembly
pub type Result<T> = std::result::Result<T, Error>;
