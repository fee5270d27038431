//! Configuration for the endpoint simulator.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl SimulatorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: SimulatorConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.limits.max_body_bytes == 0 {
            anyhow::bail!("limits.max_body_bytes must be greater than zero");
        }

        if self.upload.max_file_bytes == Some(0) {
            anyhow::bail!("upload.max_file_bytes must be greater than zero when set");
        }

        if let Some(ref dir) = self.upload.spool_dir {
            if !dir.is_dir() {
                anyhow::bail!(
                    "upload.spool_dir '{}' does not exist or is not a directory",
                    dir.display()
                );
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ListenConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Values reported by `GET /`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "2026.1.0".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Largest JSON or URL-encoded body accepted by the echo routes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    100 * 1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Write received file bytes to a temporary file for the lifetime of the request
    #[serde(default = "default_spool")]
    pub spool: bool,
    /// Directory for spooled uploads (OS temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spool_dir: Option<PathBuf>,
    /// Per-file size limit in bytes (unlimited when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_bytes: Option<u64>,
}

fn default_spool() -> bool {
    true
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            spool: default_spool(),
            spool_dir: None,
            max_file_bytes: None,
        }
    }
}
