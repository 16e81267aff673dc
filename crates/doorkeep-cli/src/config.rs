//! Terminal configuration loaded from TOML.
//!
//! Every section is optional; a missing file section or key falls back to
//! the built-in default. Command line arguments are applied on top in
//! `main`.
//!
//! ```toml
//! log_file = "/var/log/doorkeep.log"
//!
//! [normalizer]
//! strip_header = true
//!
//! [link]
//! port = "/dev/ttyUSB0"
//!
//! [store]
//! database = "/var/lib/doorkeep/doorkeep.db"
//!
//! [display]
//! welcome_lines = ["Welcome to BUILDS", "Please Swipe Your ID"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use doorkeep_core::constants::{
    DEFAULT_AUDIT_TIMEOUT_MS, DEFAULT_BAUD_RATE, DEFAULT_DENIED_DWELL_MS, DEFAULT_DISPLAY_COLUMNS,
    DEFAULT_DISPLAY_ROWS, DEFAULT_ERROR_DWELL_MS, DEFAULT_GRANTED_DWELL_MS,
    DEFAULT_LINK_WRITE_TIMEOUT_MS, DEFAULT_STORE_TIMEOUT_MS, DEFAULT_WELCOME_LINES,
    DEFAULT_WELCOME_ROW,
};
use doorkeep_hardware::ActuatorConfig;
use doorkeep_storage::DatabaseConfig;
use doorkeep_terminal::{NormalizerConfig, SessionConfig, VirtualDisplay};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Log destination, `doorkeep.log` when unset. `-` logs to stderr.
    pub log_file: Option<PathBuf>,
    pub normalizer: NormalizerConfig,
    pub link: LinkConfig,
    pub store: StoreConfig,
    pub session: SessionSection,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial port of the lock controller. The first port found is used
    /// when unset.
    pub port: Option<String>,
    pub baud_rate: u32,
    pub write_timeout_ms: u64,
    /// Use a mock link instead of the serial controller.
    pub dry_run: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            write_timeout_ms: DEFAULT_LINK_WRITE_TIMEOUT_MS,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database: String,
    pub query_timeout_ms: u64,
    pub audit_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default().database_path,
            query_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            audit_timeout_ms: DEFAULT_AUDIT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub granted_dwell_ms: u64,
    pub denied_dwell_ms: u64,
    pub error_dwell_ms: u64,
    pub message_row: u16,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            granted_dwell_ms: DEFAULT_GRANTED_DWELL_MS,
            denied_dwell_ms: DEFAULT_DENIED_DWELL_MS,
            error_dwell_ms: DEFAULT_ERROR_DWELL_MS,
            message_row: SessionConfig::default().message_row,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub rows: usize,
    pub columns: usize,
    pub welcome_lines: Vec<String>,
    pub welcome_row: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_DISPLAY_ROWS,
            columns: DEFAULT_DISPLAY_COLUMNS,
            welcome_lines: DEFAULT_WELCOME_LINES.iter().map(|s| s.to_string()).collect(),
            welcome_row: DEFAULT_WELCOME_ROW,
        }
    }
}

impl TerminalConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            granted_dwell: Duration::from_millis(self.session.granted_dwell_ms),
            denied_dwell: Duration::from_millis(self.session.denied_dwell_ms),
            error_dwell: Duration::from_millis(self.session.error_dwell_ms),
            message_row: self.session.message_row,
        }
    }

    pub fn actuator_config(&self) -> ActuatorConfig {
        ActuatorConfig {
            write_timeout: Duration::from_millis(self.link.write_timeout_ms),
            ..ActuatorConfig::default()
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.store.database.clone()).acquire_timeout(self.query_timeout())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.store.query_timeout_ms)
    }

    pub fn audit_timeout(&self) -> Duration {
        Duration::from_millis(self.store.audit_timeout_ms)
    }

    pub fn virtual_display(&self) -> VirtualDisplay {
        VirtualDisplay::builder()
            .with_size(self.display.rows, self.display.columns)
            .with_welcome_lines(self.display.welcome_lines.clone())
            .with_welcome_row(self.display.welcome_row)
            .build()
    }
}

/// Fail with [`MissingAsset`](doorkeep_core::Error::MissingAsset) naming the
/// first path that is not a regular file.
pub fn require_assets(paths: &[&Path]) -> doorkeep_core::Result<()> {
    match paths.iter().find(|path| !path.is_file()) {
        Some(path) => Err(doorkeep_core::Error::MissingAsset {
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: TerminalConfig = toml::from_str("").unwrap();

        assert!(config.log_file.is_none());
        assert!(!config.normalizer.strip_header);
        assert_eq!(config.link.baud_rate, 9600);
        assert!(!config.link.dry_run);
        assert_eq!(config.store.database, "doorkeep.db");
        assert_eq!(config.audit_timeout(), Duration::from_secs(1));
        assert_eq!(config.session_config(), SessionConfig::default());
        assert_eq!(config.display.welcome_lines.len(), 2);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: TerminalConfig = toml::from_str(
            r#"
            [normalizer]
            strip_header = true
            sentinel = "k"

            [link]
            port = "/dev/ttyUSB1"

            [session]
            denied_dwell_ms = 500
            "#,
        )
        .unwrap();

        assert!(config.normalizer.strip_header);
        assert_eq!(config.normalizer.sentinel, 'k');
        assert_eq!(config.normalizer.header_len, 10);
        assert_eq!(config.link.port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.link.write_timeout_ms, 1000);

        let session = config.session_config();
        assert_eq!(session.denied_dwell, Duration::from_millis(500));
        assert_eq!(session.granted_dwell, Duration::from_secs(5));
    }

    #[test]
    fn test_conversions() {
        let config: TerminalConfig = toml::from_str(
            r#"
            [link]
            write_timeout_ms = 250

            [store]
            database = "/tmp/cards.db"
            query_timeout_ms = 750
            audit_timeout_ms = 200

            [display]
            rows = 6
            columns = 20
            welcome_lines = ["Lab 3"]
            welcome_row = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.actuator_config().write_timeout, Duration::from_millis(250));
        assert_eq!(config.actuator_config().command.as_bytes(), b"u\r");

        let db = config.database_config();
        assert_eq!(db.database_path, "/tmp/cards.db");
        assert_eq!(db.acquire_timeout, Duration::from_millis(750));
        assert_eq!(config.audit_timeout(), Duration::from_millis(200));

        let display = config.virtual_display();
        assert_eq!(display.rows(), 6);
        assert_eq!(display.columns(), 20);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_file = \"doorkeep.log\"\n[link]\ndry_run = true").unwrap();

        let config = TerminalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("doorkeep.log")));
        assert!(config.link.dry_run);
    }

    #[test]
    fn test_missing_file_names_path() {
        let error = TerminalConfig::from_file("/nonexistent/doorkeep.toml").unwrap_err();
        assert!(format!("{error}").contains("/nonexistent/doorkeep.toml"));
    }

    #[test]
    fn test_present_assets_are_accepted() {
        let background = tempfile::NamedTempFile::new().unwrap();
        let foreground = tempfile::NamedTempFile::new().unwrap();

        require_assets(&[background.path(), foreground.path()]).unwrap();
    }

    #[test]
    fn test_missing_asset_is_fatal() {
        let background = tempfile::NamedTempFile::new().unwrap();
        let missing = Path::new("/nonexistent/foreground.png");

        let error = require_assets(&[background.path(), missing]).unwrap_err();
        assert!(error.is_fatal());
        assert!(matches!(
            error,
            doorkeep_core::Error::MissingAsset { ref path } if path == missing
        ));
    }

    #[test]
    fn test_directory_is_not_an_asset() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_assets(&[dir.path()]).is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[link]\nbaud_rate = \"fast\"").unwrap();

        assert!(TerminalConfig::from_file(file.path()).is_err());
    }
}
