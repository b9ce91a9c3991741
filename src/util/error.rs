// SmtpView - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SmtpView operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SmtpViewError {
    /// Logging bridge could not bind to its sink.
    Bridge(BridgeError),

    /// A subscriber failed while handling an event.
    Handler(HandlerError),

    /// Render queue operation failed.
    Render(RenderError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for SmtpViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bridge(e) => write!(f, "Logging bridge error: {e}"),
            Self::Handler(e) => write!(f, "Subscriber error: {e}"),
            Self::Render(e) => write!(f, "Render error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for SmtpViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bridge(e) => Some(e),
            Self::Handler(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge errors
// ---------------------------------------------------------------------------

/// Errors raised while binding the logging bridge to a capture sink.
///
/// Never fatal: the bridge logs the error and stays inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No capture sink is registered under the configured name.
    BindingNotFound { sink: String },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindingNotFound { sink } => {
                write!(f, "Can't find log sink '{sink}'")
            }
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<BridgeError> for SmtpViewError {
    fn from(e: BridgeError) -> Self {
        Self::Bridge(e)
    }
}

// ---------------------------------------------------------------------------
// Render errors
// ---------------------------------------------------------------------------

/// Errors related to the render queue between subscribers and the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The rendering side dropped its receiver.
    QueueClosed { pane: &'static str },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueClosed { pane } => {
                write!(f, "Render queue for pane '{pane}' is closed")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<RenderError> for SmtpViewError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

// ---------------------------------------------------------------------------
// Handler errors
// ---------------------------------------------------------------------------

/// Errors returned by `Subscriber::handle`.
///
/// The publisher logs these per subscriber; they never reach the producer.
#[derive(Debug)]
pub enum HandlerError {
    /// The subscriber applied the event but could not notify the renderer.
    Render(RenderError),

    /// Subscriber-specific failure.
    Other { subscriber: String, reason: String },
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(e) => write!(f, "{e}"),
            Self::Other { subscriber, reason } => {
                write!(f, "Subscriber '{subscriber}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderError> for HandlerError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<HandlerError> for SmtpViewError {
    fn from(e: HandlerError) -> Self {
        Self::Handler(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SmtpViewError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
