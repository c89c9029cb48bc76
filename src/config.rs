//! # Server configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. command-line flags, each of which can also be set through an `ARTEMIS_*`
//!    environment variable.
//!
//! ```toml
//! [listen]
//! host = "0.0.0.0"
//! port = 30025
//!
//! [site]
//! name = "San Francisco"
//! latitude = 37.7775
//! longitude = -122.416389
//! elevation = 16.0
//!
//! [connection]
//! request_timeout_secs = 30   # 0 disables the deadline
//! max_request_bytes = 4096
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use crate::artemis_errors::ArtemisError;
use crate::constants::{Degree, Meter, DEFAULT_PORT};
use crate::observers::Observer;
use crate::protocol::ConnectionLimits;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        ListenConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Observing site used for rise and set queries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub name: Option<String>,
    pub latitude: Degree,
    pub longitude: Degree,
    pub elevation: Meter,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let site = Observer::san_francisco();
        SiteConfig {
            name: site.name,
            latitude: site.latitude,
            longitude: site.longitude,
            elevation: site.elevation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub request_timeout_secs: u64,
    pub max_request_bytes: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        let limits = ConnectionLimits::default();
        ConnectionConfig {
            request_timeout_secs: limits.timeout.map_or(0, |t| t.as_secs()),
            max_request_bytes: limits.max_request_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtemisConfig {
    pub listen: ListenConfig,
    pub site: SiteConfig,
    pub connection: ConnectionConfig,
}

/// Command-line overrides, each also readable from the environment.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct ConfigOverrides {
    /// TOML configuration file
    #[arg(long, short, env = "ARTEMIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "ARTEMIS_BIND")]
    pub host: Option<String>,

    /// TCP port to listen on
    #[arg(long, short, env = "ARTEMIS_PORT")]
    pub port: Option<u16>,

    /// Site name shown in logs
    #[arg(long, env = "ARTEMIS_SITE_NAME")]
    pub site_name: Option<String>,

    /// Site latitude in degrees, north positive
    #[arg(long, env = "ARTEMIS_LATITUDE", allow_negative_numbers = true)]
    pub latitude: Option<Degree>,

    /// Site longitude in degrees, east positive
    #[arg(long, env = "ARTEMIS_LONGITUDE", allow_negative_numbers = true)]
    pub longitude: Option<Degree>,

    /// Site elevation in meters
    #[arg(long, env = "ARTEMIS_ELEVATION", allow_negative_numbers = true)]
    pub elevation: Option<Meter>,

    /// Per-connection read and write deadline in seconds, 0 for none
    #[arg(long, env = "ARTEMIS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Longest request line accepted, in bytes
    #[arg(long, env = "ARTEMIS_MAX_REQUEST_BYTES")]
    pub max_request_bytes: Option<u64>,
}

impl ArtemisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ArtemisError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ArtemisError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ArtemisError::ConfigRead(path.display().to_string(), err))?;
        Self::from_toml_str(&text)
    }

    /// Build the effective configuration: defaults, then the file named by the overrides
    /// (if any), then the overrides themselves. The result is validated.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ArtemisError> {
        let base = match &overrides.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(host) = &overrides.host {
            self.listen.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.listen.port = port;
        }
        if let Some(name) = &overrides.site_name {
            self.site.name = Some(name.clone());
        }
        if let Some(latitude) = overrides.latitude {
            self.site.latitude = latitude;
        }
        if let Some(longitude) = overrides.longitude {
            self.site.longitude = longitude;
        }
        if let Some(elevation) = overrides.elevation {
            self.site.elevation = elevation;
        }
        if let Some(timeout) = overrides.timeout {
            self.connection.request_timeout_secs = timeout;
        }
        if let Some(max_request_bytes) = overrides.max_request_bytes {
            self.connection.max_request_bytes = max_request_bytes;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ArtemisError> {
        if self.listen.host.trim().is_empty() {
            return Err(ArtemisError::InvalidConfig("listen.host is empty".into()));
        }
        if self.connection.max_request_bytes == 0 {
            return Err(ArtemisError::InvalidConfig(
                "connection.max_request_bytes must be positive".into(),
            ));
        }
        self.observer().map(|_| ())
    }

    /// `host:port` to bind, with IPv6 hosts bracketed.
    pub fn listen_addr(&self) -> String {
        let host = &self.listen.host;
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.listen.port)
        } else {
            format!("{host}:{}", self.listen.port)
        }
    }

    pub fn observer(&self) -> Result<Observer, ArtemisError> {
        Observer::new(
            self.site.longitude,
            self.site.latitude,
            self.site.elevation,
            self.site.name.clone(),
        )
    }

    pub fn limits(&self) -> ConnectionLimits {
        let timeout = match self.connection.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ConnectionLimits {
            timeout,
            max_request_bytes: self.connection.max_request_bytes,
        }
    }
}
