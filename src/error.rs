use thiserror::Error;
use tracing::{error, warn};

/// Error severity for build output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // informational, nothing skipped
    Warning,  // one readme or example skipped
    Error,    // the build cannot produce this component
}

/// Hard failures while reading a component README.
///
/// Policy skips (hidden playground, unsupported platform) are not errors; they
/// are reported as diagnostics on the parsed readme.
#[derive(Error, Debug)]
pub enum ReadmeError {
    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Frontmatter block is not closed")]
    UnterminatedFrontmatter,

    #[error("Frontmatter is missing a component name")]
    MissingName,
}

/// Failures turning an example fragment into a compiled example.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Unsupported syntax at offset {offset}: {construct}")]
    Unsupported { offset: usize, construct: String },

    #[error("Example references identifiers outside the library: {}", .0.join(", "))]
    UnknownIdentifiers(Vec<String>),
}

/// Failures binding a compiled example to a scope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Scope does not provide: {}", .0.join(", "))]
    Unresolved(Vec<String>),

    #[error("Class base '{0}' is not a component")]
    InvalidBase(String),
}

/// Failures while rendering a bound example.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("'{0}' is not a component")]
    NotAComponent(String),

    #[error("Cannot read property '{property}' of {base}")]
    PropertyOfUndefined { property: String, base: String },

    #[error("Invalid child: {0}")]
    InvalidChild(String),

    #[error("Identifier '{0}' is not bound")]
    Unbound(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("Cannot evaluate {0} while rendering")]
    Unsupported(String),

    #[error("Component '{component}' failed: {message}")]
    Component { component: String, message: String },
}

/// Top-level error for the storybook build.
#[derive(Error, Debug)]
pub enum StorybookError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Readme {
        path: String,
        #[source]
        source: ReadmeError,
    },

    #[error("Failed to bind examples from '{path}': {source}")]
    Hydrate {
        path: String,
        #[source]
        source: BindError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to serialize module: {0}")]
    Emit(#[from] serde_json::Error),

    #[error("Story not found: {0}")]
    StoryNotFound(String),
}

impl StorybookError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Warning,
            Self::Readme { .. } => ErrorSeverity::Warning,
            Self::Hydrate { .. } => ErrorSeverity::Error,
            Self::Render(_) => ErrorSeverity::Error,
            Self::Emit(_) => ErrorSeverity::Error,
            Self::StoryNotFound(_) => ErrorSeverity::Info,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not read {}", path),
            Self::Readme { path, source } => format!("{} is not a valid README: {}", path, source),
            Self::Hydrate { path, source } => {
                format!("Examples in {} cannot be bound: {}", path, source)
            }
            Self::Render(e) => format!("Example failed to render: {}", e),
            Self::Emit(e) => format!("Could not write module: {}", e),
            Self::StoryNotFound(id) => format!("No story with id '{}'", id),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorybookError>;

/// Extension trait for logging recoverable failures with caller location.
///
/// ```ignore
/// use polaris_stories::error::ResultExt;
///
/// // Skip an unreadable README but keep building the rest
/// let Some(source) = std::fs::read_to_string(&path).warn_on_err() else { continue };
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
