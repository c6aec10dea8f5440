use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::controller::NotificationTiming;
use crate::render::PageOptions;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_BASENAME: &str = "bookmydoc";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind the UI on
    #[arg(long, env = "UI_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the appointment backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Directory holding the persisted session
    #[arg(long, env = "STORAGE_DIR")]
    pub storage_dir: Option<String>,

    /// Keep the session in memory only
    #[arg(long, env = "SESSION_EPHEMERAL")]
    pub ephemeral: Option<bool>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub ephemeral: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub htmx_src: String,
    /// Served under `/static`, e.g. for a local copy of htmx.
    pub static_dir: PathBuf,
    pub notification_display_ms: u64,
    pub notification_fade_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag / its env var > `BOOKMYDOC_*` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let defaults = PageOptions::default();
        let timing = NotificationTiming::default();

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("backend.base_url", "http://127.0.0.1:5000")?
            .set_default("storage.dir", ".bookmydoc")?
            .set_default("storage.ephemeral", false)?
            .set_default("ui.htmx_src", defaults.htmx_src)?
            .set_default("ui.static_dir", "static")?
            .set_default("ui.poll_interval_ms", as_config_int(defaults.poll_interval_ms))?
            .set_default("ui.notification_display_ms", as_config_int(millis(timing.display)))?
            .set_default("ui.notification_fade_ms", as_config_int(millis(timing.fade)))?
            .set_default("logging.json", false)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(PathBuf::from(path)).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false)),
        };

        // E.g. BOOKMYDOC_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("BOOKMYDOC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(dir) = cli.storage_dir {
            builder = builder.set_override("storage.dir", dir)?;
        }
        if let Some(ephemeral) = cli.ephemeral {
            builder = builder.set_override("storage.ephemeral", ephemeral)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn notification_timing(&self) -> NotificationTiming {
        NotificationTiming {
            display: Duration::from_millis(self.ui.notification_display_ms),
            fade: Duration::from_millis(self.ui.notification_fade_ms),
        }
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            htmx_src: self.ui.htmx_src.clone(),
            poll_interval_ms: self.ui.poll_interval_ms,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn as_config_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
