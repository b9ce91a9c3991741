// SmtpView - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use crate::util::logging::{parse_level, CaptureSink, SinkRegistry};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SmtpView configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/smtpview/ or %APPDATA%\SmtpView\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[capture]` section.
    pub capture: CaptureSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[capture]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Name of the sink the logs pane binds to.
    pub sink: Option<String>,
    /// Target prefix of the records to capture.
    pub component: Option<String>,
    /// Lowest captured level.
    pub min_level: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Pane font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Capture --
    /// Sink the logs pane binds to.
    pub sink_name: String,
    /// Target prefix captured by that sink.
    pub capture_component: String,
    /// Lowest captured level name.
    pub capture_min_level: String,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Pane font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sink_name: constants::DEFAULT_SINK_NAME.to_string(),
            capture_component: constants::DEFAULT_CAPTURE_COMPONENT.to_string(),
            capture_min_level: constants::DEFAULT_CAPTURE_MIN_LEVEL.to_string(),
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Build the sink registry described by this configuration.
    ///
    /// The configured sink is always registered under `sink_name`; an
    /// override of the name on the CLI may therefore point at nothing, which
    /// the logging bridge reports.
    pub fn sink_registry(&self) -> SinkRegistry {
        let level = parse_level(&self.capture_min_level).unwrap_or(tracing::Level::DEBUG);
        let mut registry = SinkRegistry::new();
        registry.register(CaptureSink::new(
            self.sink_name.clone(),
            self.capture_component.clone(),
            level,
        ));
        registry
    }
}

/// Read and parse a config file without validating values.
pub fn read_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_config_file(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Capture: sink --
    if let Some(sink) = raw.capture.sink {
        match check_name("[capture] sink", &sink) {
            Ok(()) => config.sink_name = sink,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_SINK_NAME
            )),
        }
    }

    // -- Capture: component --
    if let Some(component) = raw.capture.component {
        match check_name("[capture] component", &component) {
            Ok(()) => config.capture_component = component,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_CAPTURE_COMPONENT
            )),
        }
    }

    // -- Capture: min_level --
    if let Some(level) = raw.capture.min_level {
        if parse_level(&level).is_some() {
            config.capture_min_level = level.to_lowercase();
        } else {
            warnings.push(format!(
                "[capture] min_level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_CAPTURE_MIN_LEVEL,
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[ui] font_size".to_string(),
                    value: size.to_string(),
                    expected: format!(
                        "{}-{} (default {})",
                        constants::MIN_FONT_SIZE,
                        constants::MAX_FONT_SIZE,
                        constants::DEFAULT_FONT_SIZE
                    ),
                }
                .to_string(),
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default (info).",
                constants::VALID_LOG_LEVELS.join(", "),
            ));
        }
    }

    config
}

/// Sink names and component prefixes must be non-empty and bounded.
fn check_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() || value.len() > constants::MAX_SINK_NAME_LEN {
        return Err(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            expected: format!("1-{} characters", constants::MAX_SINK_NAME_LEN),
        });
    }
    Ok(())
}
