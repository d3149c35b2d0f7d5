//! Node startup configuration.
//!
//! Built from `--flag value` command-line arguments by `main`, or directly in
//! tests through [`NodeConfig::coordinator`] and [`NodeConfig::follower`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_ADVERTISE_HOST: &str = "localhost";
const DEFAULT_REGISTER_RETRY_MS: u64 = 1000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required argument {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {flag}")]
    Invalid { flag: &'static str, value: String },

    #[error("a ring needs at least one node")]
    NoNodes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    /// Coordinator `host:port`. Empty when this node is the coordinator.
    #[serde(default)]
    pub master_host_port: String,
    pub num_nodes: usize,
    /// Listen port; `0` picks an ephemeral port.
    pub port: u16,
    pub node_id: u32,
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    /// Host part of the address other nodes and clients use to reach us.
    #[serde(default = "default_advertise_host")]
    pub advertise_host: String,
    #[serde(default = "default_register_retry_ms")]
    pub register_retry_ms: u64,
}

fn default_bind_host() -> String {
    DEFAULT_BIND_HOST.to_string()
}

fn default_advertise_host() -> String {
    DEFAULT_ADVERTISE_HOST.to_string()
}

fn default_register_retry_ms() -> u64 {
    DEFAULT_REGISTER_RETRY_MS
}

impl NodeConfig {
    pub fn coordinator(num_nodes: usize, port: u16, node_id: u32) -> Self {
        Self {
            master_host_port: String::new(),
            num_nodes,
            port,
            node_id,
            bind_host: default_bind_host(),
            advertise_host: default_advertise_host(),
            register_retry_ms: DEFAULT_REGISTER_RETRY_MS,
        }
    }

    pub fn follower(master_host_port: &str, num_nodes: usize, port: u16, node_id: u32) -> Self {
        Self {
            master_host_port: master_host_port.to_string(),
            ..Self::coordinator(num_nodes, port, node_id)
        }
    }

    pub fn with_hosts(mut self, bind_host: &str, advertise_host: &str) -> Self {
        self.bind_host = bind_host.to_string();
        self.advertise_host = advertise_host.to_string();
        self
    }

    pub fn with_register_retry(mut self, interval: Duration) -> Self {
        self.register_retry_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn is_coordinator(&self) -> bool {
        self.master_host_port.trim().is_empty()
    }

    pub fn register_retry_interval(&self) -> Duration {
        Duration::from_millis(self.register_retry_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }
        Ok(())
    }

    /// Parses `--master <host:port> --nodes <n> --port <port> --id <u32>`
    /// plus the optional `--bind`, `--advertise` and `--retry-ms`.
    ///
    /// `args` excludes the program name.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut master = String::new();
        let mut num_nodes: Option<usize> = None;
        let mut port: Option<u16> = None;
        let mut node_id: Option<u32> = None;
        let mut bind_host = default_bind_host();
        let mut advertise_host = default_advertise_host();
        let mut register_retry_ms = DEFAULT_REGISTER_RETRY_MS;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1).cloned();

            match flag {
                "--master" => master = required(value, "--master")?,
                "--nodes" => num_nodes = Some(parse(value, "--nodes")?),
                "--port" => port = Some(parse(value, "--port")?),
                "--id" => node_id = Some(parse(value, "--id")?),
                "--bind" => bind_host = required(value, "--bind")?,
                "--advertise" => advertise_host = required(value, "--advertise")?,
                "--retry-ms" => register_retry_ms = parse(value, "--retry-ms")?,
                _ => {
                    tracing::warn!("Ignoring unknown argument {}", flag);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        let config = Self {
            master_host_port: master,
            num_nodes: num_nodes.ok_or(ConfigError::Missing("--nodes"))?,
            port: port.ok_or(ConfigError::Missing("--port"))?,
            node_id: node_id.ok_or(ConfigError::Missing("--id"))?,
            bind_host,
            advertise_host,
            register_retry_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

fn required(value: Option<String>, flag: &'static str) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::Missing(flag))
}

fn parse<T: std::str::FromStr>(value: Option<String>, flag: &'static str) -> Result<T, ConfigError> {
    let value = required(value, flag)?;
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { flag, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_coordinator_from_args() {
        let config =
            NodeConfig::from_args(&args(&["--nodes", "3", "--port", "9009", "--id", "42"])).unwrap();

        assert!(config.is_coordinator());
        assert_eq!(config.num_nodes, 3);
        assert_eq!(config.port, 9009);
        assert_eq!(config.node_id, 42);
        assert_eq!(config.register_retry_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_follower_from_args() {
        let config = NodeConfig::from_args(&args(&[
            "--master",
            "localhost:9009",
            "--nodes",
            "3",
            "--port",
            "9010",
            "--id",
            "7",
            "--retry-ms",
            "250",
        ]))
        .unwrap();

        assert!(!config.is_coordinator());
        assert_eq!(config.master_host_port, "localhost:9009");
        assert_eq!(config.register_retry_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_port_is_rejected() {
        let err = NodeConfig::from_args(&args(&["--nodes", "2", "--id", "1"])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("--port"));
    }

    #[test]
    fn test_missing_node_count_is_rejected() {
        let err = NodeConfig::from_args(&args(&["--port", "9009", "--id", "1"])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("--nodes"));
    }

    #[test]
    fn test_huge_retry_interval_saturates() {
        let config = NodeConfig::coordinator(1, 0, 1).with_register_retry(Duration::MAX);
        assert_eq!(config.register_retry_ms, u64::MAX);

        let config = NodeConfig::coordinator(1, 0, 1).with_register_retry(Duration::from_millis(75));
        assert_eq!(config.register_retry_interval(), Duration::from_millis(75));
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let err = NodeConfig::from_args(&args(&["--port", "1", "--id", "-3"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                flag: "--id",
                value: "-3".to_string()
            }
        );
    }

    #[test]
    fn test_zero_nodes_is_rejected() {
        let err = NodeConfig::from_args(&args(&["--nodes", "0", "--port", "1", "--id", "1"]))
            .unwrap_err();
        assert_eq!(err, ConfigError::NoNodes);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NodeConfig =
            serde_json::from_str(r#"{"num_nodes": 2, "port": 0, "node_id": 5}"#).unwrap();

        assert!(config.is_coordinator());
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.advertise_host, "localhost");
        assert_eq!(config.register_retry_ms, 1000);
    }
}
