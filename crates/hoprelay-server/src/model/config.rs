//! Configuration management for a relay node
//!
//! Sources, lowest precedence first: `conf/application.yml` (optional),
//! `HOPRELAY_*` environment variables with `__` between nested keys, then
//! command line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use hoprelay_common::{
    DEFAULT_FORWARD_CONNECT_TIMEOUT_MS, DEFAULT_FORWARD_TIMEOUT_SECS, DEFAULT_SERVER_PORT,
    default_node_name, non_blank,
};
use hoprelay_core::{DiskLoadSimulator, HopClientConfig};
use hoprelay_persistence::StorageMode;

use crate::startup::LoggingConfig;

pub const NODE_NAME: &str = "node.name";
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_WORKERS: &str = "server.workers";
pub const PERSISTENCE_MODE: &str = "persistence.mode";
pub const PERSISTENCE_DATA_DIR: &str = "persistence.data_dir";
pub const FORWARD_TIMEOUT_SECS: &str = "forward.timeout_secs";
pub const FORWARD_CONNECT_TIMEOUT_MS: &str = "forward.connect_timeout_ms";
pub const SIMULATION_DISK_IO_BYTES: &str = "simulation.disk_io_bytes";
pub const SIMULATION_DISK_IO_DIR: &str = "simulation.disk_io_dir";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "shutdown.timeout_secs";

const DEFAULT_CONFIG_FILE: &str = "conf/application";
const ENV_PREFIX: &str = "HOPRELAY";

/// Command line arguments for a node
#[derive(Debug, Default, Parser)]
#[command(name = "hoprelay-server", version, about = "Hop-by-hop ping relay node")]
pub struct Cli {
    /// Name of this node, compared against `dst_node` of every ping
    #[arg(short = 'n', long = "node-name", env = "HOPRELAY_NODE_NAME")]
    pub node_name: Option<String>,
    /// Configuration file, without extension
    #[arg(short = 'c', long = "config")]
    pub config_file: Option<String>,
    #[arg(long = "address")]
    pub address: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    #[arg(long = "workers")]
    pub workers: Option<usize>,
    /// Rule storage: `memory` or `embedded`
    #[arg(short = 's', long = "storage")]
    pub storage: Option<StorageMode>,
    #[arg(long = "data-dir")]
    pub data_dir: Option<String>,
    /// Bounded wait for one hop, in seconds
    #[arg(long = "forward-timeout")]
    pub forward_timeout: Option<u64>,
    /// Bytes written and deleted per operation to simulate disk load
    #[arg(long = "disk-io-bytes")]
    pub disk_io_bytes: Option<u64>,
}

/// Application configuration loaded from config files, environment and CLI
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_cli(Cli::parse())
    }

    pub fn with_cli(args: Cli) -> anyhow::Result<Self> {
        let config_file = args
            .config_file
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut config_builder = Config::builder()
            .add_source(File::with_name(&config_file).required(args.config_file.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.node_name {
            config_builder = config_builder.set_override(NODE_NAME, v)?;
        }
        if let Some(v) = args.address {
            config_builder = config_builder.set_override(SERVER_ADDRESS, v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT, i64::from(v))?;
        }
        if let Some(v) = args.workers {
            config_builder = config_builder.set_override(SERVER_WORKERS, v as u64)?;
        }
        if let Some(v) = args.storage {
            config_builder = config_builder.set_override(PERSISTENCE_MODE, v.to_string())?;
        }
        if let Some(v) = args.data_dir {
            config_builder = config_builder.set_override(PERSISTENCE_DATA_DIR, v)?;
        }
        if let Some(v) = args.forward_timeout {
            config_builder = config_builder.set_override(FORWARD_TIMEOUT_SECS, v)?;
        }
        if let Some(v) = args.disk_io_bytes {
            config_builder = config_builder.set_override(SIMULATION_DISK_IO_BYTES, v)?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Node
    // ========================================================================

    /// This node's name; falls back to the host name
    pub fn node_name(&self) -> String {
        self.config
            .get_string(NODE_NAME)
            .ok()
            .and_then(non_blank)
            .unwrap_or_else(default_node_name)
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// HTTP worker count; 0 leaves the actix default
    pub fn server_workers(&self) -> usize {
        self.config
            .get_int(SERVER_WORKERS)
            .ok()
            .and_then(|w| usize::try_from(w).ok())
            .unwrap_or(0)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config
                .get_int(SHUTDOWN_TIMEOUT_SECS)
                .ok()
                .and_then(|s| u64::try_from(s).ok())
                .unwrap_or(5),
        )
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn persistence_mode(&self) -> StorageMode {
        self.config
            .get_string(PERSISTENCE_MODE)
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(
            self.config
                .get_string(PERSISTENCE_DATA_DIR)
                .unwrap_or("./data".to_string()),
        )
    }

    // ========================================================================
    // Forwarding
    // ========================================================================

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config
                .get_int(FORWARD_TIMEOUT_SECS)
                .ok()
                .and_then(|s| u64::try_from(s).ok())
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_FORWARD_TIMEOUT_SECS),
        )
    }

    pub fn forward_connect_timeout(&self) -> Duration {
        Duration::from_millis(
            self.config
                .get_int(FORWARD_CONNECT_TIMEOUT_MS)
                .ok()
                .and_then(|ms| u64::try_from(ms).ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_FORWARD_CONNECT_TIMEOUT_MS),
        )
    }

    pub fn hop_client_config(&self) -> HopClientConfig {
        HopClientConfig::default()
            .with_timeouts(self.forward_timeout(), self.forward_connect_timeout())
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    pub fn disk_io_bytes(&self) -> usize {
        self.config
            .get_int(SIMULATION_DISK_IO_BYTES)
            .ok()
            .and_then(|b| usize::try_from(b).ok())
            .unwrap_or(0)
    }

    pub fn disk_io_dir(&self) -> PathBuf {
        self.config
            .get_string(SIMULATION_DISK_IO_DIR)
            .ok()
            .and_then(non_blank)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn disk_load_simulator(&self) -> DiskLoadSimulator {
        DiskLoadSimulator::new(self.disk_io_bytes(), self.disk_io_dir())
    }

    // ========================================================================
    // Logging
    // ========================================================================

    /// Log directory defaults to `logs/<node_name>`
    pub fn logging_config(&self) -> LoggingConfig {
        let log_dir = self
            .config
            .get_string("logging.dir")
            .ok()
            .and_then(non_blank)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs").join(self.node_name()));

        LoggingConfig::from_config(
            log_dir,
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            &self
                .config
                .get_string("logging.level")
                .unwrap_or("info".to_string()),
            &self
                .config
                .get_string("logging.rotation")
                .unwrap_or("daily".to_string()),
        )
    }
}
