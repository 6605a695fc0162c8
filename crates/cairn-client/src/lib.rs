// cairn-client: Consul agent/KV/catalog HTTP client

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod model;

pub use client::ConsulClient;
pub use config::{Consistency, ConsulConfig};
pub use error::ClientError;
