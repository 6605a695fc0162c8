use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "cairn")]
#[command(version, about = "Idempotent Consul key, service and check management", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared by every subcommand; each overrides the config file
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: conf/cairn.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Consul agent host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Consul agent HTTP port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Read consistency: default, consistent or stale
    #[arg(long, global = true)]
    pub consistency: Option<String>,

    /// ACL token sent as X-Consul-Token
    #[arg(long, global = true, env = "CONSUL_HTTP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Datacenter to target instead of the agent's own
    #[arg(long, alias = "dc", global = true)]
    pub datacenter: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage KV keys
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Manage agent services
    Service {
        #[command(subcommand)]
        action: ServiceCommand,
    },

    /// Manage agent checks
    Check {
        #[command(subcommand)]
        action: CheckCommand,
    },

    /// Inspect catalog nodes
    Node {
        #[command(subcommand)]
        action: NodeCommand,
    },

    /// Inspect datacenters
    Dc {
        #[command(subcommand)]
        action: DcCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Ensure a key holds a value
    Present {
        /// Key name
        name: String,

        /// Literal value, or a file path with --from-file
        value: String,

        /// Read the value from the file at VALUE
        #[arg(long)]
        from_file: bool,

        /// Encoding of the source file
        #[arg(long, default_value = "utf-8", requires = "from_file")]
        encoding: String,
    },

    /// Ensure a key does not exist
    Absent {
        /// Key name
        name: String,

        /// Delete every key under the prefix
        #[arg(long)]
        recurse: bool,
    },

    /// Print a key's value
    Get {
        /// Key name
        name: String,
    },
}

/// Fields of a service definition
#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
    /// Service name
    pub name: String,

    /// Service ID (defaults to the name)
    #[arg(long)]
    pub id: Option<String>,

    /// Service port
    #[arg(long)]
    pub port: Option<u16>,

    /// Service tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Health check script run through /bin/sh
    #[arg(long, requires = "interval", conflicts_with = "ttl")]
    pub script: Option<String>,

    /// Interval between script runs, e.g. 10s
    #[arg(long, requires = "script")]
    pub interval: Option<String>,

    /// TTL for a heartbeat check, e.g. 30s
    #[arg(long)]
    pub ttl: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Ensure a service is registered
    Present(ServiceArgs),

    /// Ensure a service is not registered
    Absent {
        /// Service name
        name: String,
    },

    /// Push a heartbeat to the service's TTL check
    TtlSet {
        /// Service name
        name: String,

        /// passing, warning or failing
        status: String,

        /// Note attached to the status
        #[arg(long)]
        notes: Option<String>,
    },

    /// List service names
    List {
        /// List catalog services instead of the local agent's
        #[arg(long)]
        catalog: bool,
    },

    /// Show per-node check status of a service
    Health {
        /// Service name
        name: String,

        /// Only report passing instances
        #[arg(long)]
        passing: bool,
    },
}

/// Fields of a check definition
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Check name
    pub name: String,

    /// Check ID (defaults to the name)
    #[arg(long)]
    pub id: Option<String>,

    /// Script run through /bin/sh
    #[arg(long, requires = "interval", conflicts_with = "ttl")]
    pub script: Option<String>,

    /// Interval between script runs, e.g. 10s
    #[arg(long, requires = "script")]
    pub interval: Option<String>,

    /// TTL for a heartbeat check, e.g. 30s
    #[arg(long)]
    pub ttl: Option<String>,

    /// Free text for operators
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CheckCommand {
    /// Ensure a check is registered
    Present(CheckArgs),

    /// Ensure a check is not registered
    Absent {
        /// Check name
        name: String,
    },

    /// Push a heartbeat to a TTL check
    TtlSet {
        /// Check name or ID
        name: String,

        /// passing, warning or failing
        status: String,

        /// Note attached to the status
        #[arg(long)]
        notes: Option<String>,
    },

    /// List check IDs registered with the agent
    List,
}

#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// List catalog nodes
    List,

    /// Show a node and its services
    Get {
        /// Node name
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum DcCommand {
    /// List known datacenters
    List,
}
