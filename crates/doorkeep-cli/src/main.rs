//! doorkeep - badge-swipe door terminal
//!
//! Reads swipes from a keyboard-emulating badge reader, looks the badge up in
//! the SQLite credential store, pulses the door lock over a serial link and
//! shows the outcome on the console.
//!
//! Module structure:
//! - `config` - TOML configuration and startup asset checks
//! - `keyboard` - crossterm key events as terminal input
//! - `console` - terminal setup and display painting

mod config;
mod console;
mod keyboard;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use doorkeep_hardware::mock::MockLink;
use doorkeep_hardware::serial::{self, SerialLink};
use doorkeep_hardware::{Actuator, AnyLockLink};
use doorkeep_storage::{Database, Resolver, SqliteCredentialStore};
use doorkeep_terminal::{Normalizer, Session};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{LinkConfig, TerminalConfig};
use crate::console::{ConsoleDisplay, TerminalGuard};
use crate::keyboard::KeyboardSource;

/// Badge-swipe door terminal
#[derive(Parser, Debug)]
#[command(name = "doorkeep", version, about)]
struct Args {
    /// Idle screen background image
    background: PathBuf,

    /// Idle screen foreground overlay image
    foreground: PathBuf,

    /// Strip the reader header from each swipe and write the class sentinel
    #[arg(long)]
    strip_header: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port of the lock controller
    #[arg(short, long)]
    port: Option<String>,

    /// Credential database file
    #[arg(short, long)]
    database: Option<String>,

    /// Drive a mock lock link instead of the serial controller
    #[arg(long)]
    dry_run: bool,

    /// Log file, or "-" for stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Command line values take precedence over the configuration file.
    fn apply(&self, config: &mut TerminalConfig) {
        if self.strip_header {
            config.normalizer.strip_header = true;
        }
        if let Some(port) = &self.port {
            config.link.port = Some(port.clone());
        }
        if let Some(database) = &self.database {
            config.store.database = database.clone();
        }
        if self.dry_run {
            config.link.dry_run = true;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TerminalConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    init_tracing(config.log_file.as_deref())?;
    info!(version = doorkeep_core::VERSION, "doorkeep starting");

    config::require_assets(&[args.background.as_path(), args.foreground.as_path()])?;

    info!(
        background = %args.background.display(),
        foreground = %args.foreground.display(),
        strip_header = config.normalizer.strip_header,
        database = %config.store.database,
        port = ?config.link.port,
        dry_run = config.link.dry_run,
        "config_loaded"
    );

    let db = Database::connect_lazy(&config.database_config())
        .context("Invalid credential store configuration")?;
    let store = SqliteCredentialStore::new(&db);
    if let Err(e) = store.ensure_schema().await {
        warn!(error = %e, "credential store unreachable, swipes will be refused until it recovers");
    }
    let resolver = Resolver::with_timeout(store, config.query_timeout())
        .with_audit_timeout(config.audit_timeout());

    let actuator = connect_actuator(&config).await;

    let result = {
        let _terminal = TerminalGuard::enter().context("Failed to initialise the console")?;
        let display = ConsoleDisplay::stdout(config.virtual_display());
        let mut keyboard = KeyboardSource::new();

        let mut session = Session::new(
            Normalizer::new(config.normalizer.clone()),
            resolver,
            actuator,
            display,
            config.session_config(),
        );
        session.run(&mut keyboard).await
    };

    db.close().await;

    if let Err(e) = &result {
        error!(error = %e, "session ended");
    }
    result.context("Terminal session failed")?;

    info!("doorkeep stopped");
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // The console owns stdout.
    let path = log_file.unwrap_or(Path::new("doorkeep.log"));
    if path == Path::new("-") {
        builder.with_writer(io::stderr).init();
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    builder.with_ansi(false).with_writer(Mutex::new(file)).init();

    Ok(())
}

/// Build the lock link and try to connect it once.
///
/// A link that cannot be opened leaves the terminal in observation mode:
/// swipes are still resolved and logged but no unlock is sent.
async fn connect_actuator(config: &TerminalConfig) -> Actuator<AnyLockLink> {
    let link = if config.link.dry_run {
        let (link, _handle) = MockLink::new();
        AnyLockLink::Mock(link)
    } else {
        AnyLockLink::Serial(SerialLink::new(
            config.link.baud_rate,
            config.actuator_config().write_timeout,
        ))
    };

    let mut actuator = Actuator::new(link, config.actuator_config());

    match select_port(&config.link) {
        Some(port) => {
            if let Err(e) = actuator.connect(&port).await {
                warn!(port = %port, error = %e, "lock link unavailable");
            }
        }
        None => warn!("no serial port found for the lock controller"),
    }

    actuator
}

/// The configured port, or the first one the system reports.
fn select_port(link: &LinkConfig) -> Option<String> {
    if let Some(port) = &link.port {
        return Some(port.clone());
    }
    if link.dry_run {
        return Some("dry-run".to_string());
    }

    match serial::available_channels() {
        Ok(channels) => channels.into_iter().next(),
        Err(e) => {
            warn!(error = %e, "serial port enumeration failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_require_both_assets() {
        assert!(Args::try_parse_from(["doorkeep", "bg.png"]).is_err());
        assert!(Args::try_parse_from(["doorkeep", "bg.png", "fg.png"]).is_ok());
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::try_parse_from([
            "doorkeep",
            "bg.png",
            "fg.png",
            "--strip-header",
            "--port",
            "/dev/ttyUSB3",
            "--database",
            "cards.db",
            "--dry-run",
        ])
        .unwrap();

        let mut config = TerminalConfig::default();
        args.apply(&mut config);

        assert!(config.normalizer.strip_header);
        assert_eq!(config.link.port.as_deref(), Some("/dev/ttyUSB3"));
        assert_eq!(config.store.database, "cards.db");
        assert!(config.link.dry_run);
    }

    #[test]
    fn test_absent_flags_keep_config_values() {
        let args = Args::try_parse_from(["doorkeep", "bg.png", "fg.png"]).unwrap();

        let mut config = TerminalConfig::default();
        config.normalizer.strip_header = true;
        config.link.port = Some("/dev/ttyS0".to_string());
        args.apply(&mut config);

        assert!(config.normalizer.strip_header);
        assert_eq!(config.link.port.as_deref(), Some("/dev/ttyS0"));
    }

    #[test]
    fn test_dry_run_port_needs_no_hardware() {
        let link = LinkConfig {
            dry_run: true,
            ..LinkConfig::default()
        };
        assert_eq!(select_port(&link).as_deref(), Some("dry-run"));
    }

    #[tokio::test]
    async fn test_dry_run_actuator_connects() {
        let mut config = TerminalConfig::default();
        config.link.dry_run = true;

        let actuator = connect_actuator(&config).await;
        assert!(actuator.is_connected());
    }
}
