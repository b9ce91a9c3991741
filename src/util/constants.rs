// SmtpView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SmtpView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SmtpView";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Logging
// =============================================================================

/// Default diagnostic log level when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level` and `[capture] min_level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Log capture
// =============================================================================

/// Name of the capture sink the logs pane binds to by default.
pub const DEFAULT_SINK_NAME: &str = "smtp-session";

/// Target prefix of the records captured by the default sink.
///
/// Every `tracing` event whose target starts with this prefix (the SMTP
/// session component) is forwarded to the logs pane.
pub const DEFAULT_CAPTURE_COMPONENT: &str = "smtpview::smtp";

/// Lowest level captured by the default sink.
pub const DEFAULT_CAPTURE_MIN_LEVEL: &str = "debug";

/// Maximum length of a sink name or component prefix read from config.
pub const MAX_SINK_NAME_LEN: usize = 128;

/// `chrono` format of the timestamp prefixed to each displayed log line
/// (12-hour clock with AM/PM marker, e.g. `03:04:05 PM`).
pub const LOG_LINE_TIME_FORMAT: &str = "%I:%M:%S %p";

// =============================================================================
// Rendering
// =============================================================================

/// How often the UI re-polls the render queues while idle (ms).
pub const RENDER_POLL_INTERVAL_MS: u64 = 100;

/// Body font size default (points).
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum font size (points).
pub const MIN_FONT_SIZE: f32 = 8.0;

/// Maximum font size (points).
pub const MAX_FONT_SIZE: f32 = 32.0;

// =============================================================================
// Demo producer
// =============================================================================

/// Pause between two simulated SMTP sessions in `--demo` mode (ms).
pub const DEMO_SESSION_INTERVAL_MS: u64 = 3_000;

/// Pause between two log records inside a simulated session (ms).
pub const DEMO_STEP_INTERVAL_MS: u64 = 250;

// =============================================================================
// Configuration
// =============================================================================

/// File name of the optional TOML configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";
