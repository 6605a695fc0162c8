//! Configuration management for the Cairn CLI
//!
//! Sources are layered, later ones winning: built-in defaults, the
//! configuration file, `CAIRN_`-prefixed environment variables, then
//! command line flags.

use anyhow::Context;
use cairn_client::{
    Consistency, ConsulConfig,
    config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME},
};
use config::{Config, Environment, File};

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "conf/cairn.yml";

pub const CONSUL_HOST: &str = "consul.host";
pub const CONSUL_PORT: &str = "consul.port";
pub const CONSUL_SCHEME: &str = "consul.scheme";
pub const CONSUL_CONSISTENCY: &str = "consul.consistency";
pub const CONSUL_TOKEN: &str = "consul.token";
pub const CONSUL_DATACENTER: &str = "consul.datacenter";
pub const CONSUL_CONNECT_TIMEOUT_MS: &str = "consul.connect_timeout_ms";
pub const CONSUL_READ_TIMEOUT_MS: &str = "consul.read_timeout_ms";

const DEFAULT_CONNECT_TIMEOUT_MS: i64 = 5000;
const DEFAULT_READ_TIMEOUT_MS: i64 = 30000;

/// Application configuration loaded from defaults, file, environment and flags
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default(CONSUL_HOST, DEFAULT_HOST)?
            .set_default(CONSUL_PORT, i64::from(DEFAULT_PORT))?
            .set_default(CONSUL_SCHEME, DEFAULT_SCHEME)?
            .set_default(CONSUL_CONSISTENCY, "default")?
            .set_default(CONSUL_CONNECT_TIMEOUT_MS, DEFAULT_CONNECT_TIMEOUT_MS)?
            .set_default(CONSUL_READ_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS)?;

        builder = match &args.config {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("cairn")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(v) = &args.host {
            builder = builder.set_override(CONSUL_HOST, v.as_str())?;
        }
        if let Some(v) = args.port {
            builder = builder.set_override(CONSUL_PORT, i64::from(v))?;
        }
        if let Some(v) = &args.consistency {
            builder = builder.set_override(CONSUL_CONSISTENCY, v.as_str())?;
        }
        if let Some(v) = &args.token {
            builder = builder.set_override(CONSUL_TOKEN, v.as_str())?;
        }
        if let Some(v) = &args.datacenter {
            builder = builder.set_override(CONSUL_DATACENTER, v.as_str())?;
        }

        let config = builder.build().context("Failed to build configuration")?;
        Ok(Configuration { config })
    }

    // ========================================================================
    // Consul Connection
    // ========================================================================

    pub fn consul_host(&self) -> String {
        self.config
            .get_string(CONSUL_HOST)
            .unwrap_or(DEFAULT_HOST.to_string())
    }

    pub fn consul_port(&self) -> anyhow::Result<u16> {
        let port = self
            .config
            .get_int(CONSUL_PORT)
            .unwrap_or(i64::from(DEFAULT_PORT));
        u16::try_from(port).with_context(|| format!("{} out of range: {}", CONSUL_PORT, port))
    }

    pub fn consul_scheme(&self) -> String {
        self.config
            .get_string(CONSUL_SCHEME)
            .unwrap_or(DEFAULT_SCHEME.to_string())
    }

    pub fn consul_consistency(&self) -> anyhow::Result<Consistency> {
        let mode = self.config.get_string(CONSUL_CONSISTENCY).unwrap_or_default();
        Ok(mode.parse()?)
    }

    pub fn consul_token(&self) -> Option<String> {
        self.config
            .get_string(CONSUL_TOKEN)
            .ok()
            .filter(|t| !t.is_empty())
    }

    pub fn consul_datacenter(&self) -> Option<String> {
        self.config
            .get_string(CONSUL_DATACENTER)
            .ok()
            .filter(|dc| !dc.is_empty())
    }

    pub fn consul_connect_timeout_ms(&self) -> anyhow::Result<u64> {
        let timeout = self
            .config
            .get_int(CONSUL_CONNECT_TIMEOUT_MS)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
        u64::try_from(timeout)
            .with_context(|| format!("{} out of range: {}", CONSUL_CONNECT_TIMEOUT_MS, timeout))
    }

    pub fn consul_read_timeout_ms(&self) -> anyhow::Result<u64> {
        let timeout = self
            .config
            .get_int(CONSUL_READ_TIMEOUT_MS)
            .unwrap_or(DEFAULT_READ_TIMEOUT_MS);
        u64::try_from(timeout)
            .with_context(|| format!("{} out of range: {}", CONSUL_READ_TIMEOUT_MS, timeout))
    }

    /// Client configuration assembled from the resolved values
    pub fn consul_config(&self) -> anyhow::Result<ConsulConfig> {
        let mut consul = ConsulConfig::new(&self.consul_host(), self.consul_port()?)
            .with_scheme(&self.consul_scheme())
            .with_consistency(self.consul_consistency()?)
            .with_timeouts(
                self.consul_connect_timeout_ms()?,
                self.consul_read_timeout_ms()?,
            );
        if let Some(token) = self.consul_token() {
            consul = consul.with_token(&token);
        }
        if let Some(dc) = self.consul_datacenter() {
            consul = consul.with_datacenter(&dc);
        }
        consul.validate()?;
        Ok(consul)
    }
}
