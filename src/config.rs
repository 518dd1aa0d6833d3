//! Service configuration. Defaults match the constants the service has
//! always shipped with.

use crate::error::{Error, Result};
use crate::policy::IdPolicy;
use crate::store::ItemStore;
use std::path::PathBuf;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;
/// Default primary store file.
pub const DEFAULT_PRIMARY: &str = "data.json";
/// Default mirror file.
pub const DEFAULT_MIRROR: &str = "parsed_output.json";

/// Everything needed to start the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port; 0 picks a free one.
    pub port: u16,
    /// Authoritative item file.
    pub primary_path: PathBuf,
    /// File overwritten with a copy of the primary after every mutation.
    pub mirror_path: PathBuf,
    /// Indent the JSON files.
    pub pretty: bool,
    /// How new ids are picked.
    pub id_policy: IdPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            primary_path: DEFAULT_PRIMARY.into(),
            mirror_path: DEFAULT_MIRROR.into(),
            pretty: true,
            id_policy: IdPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if self.primary_path.as_os_str().is_empty() || self.mirror_path.as_os_str().is_empty() {
            return Err(Error::Config("data file paths must not be empty".into()));
        }
        if self.primary_path == self.mirror_path {
            return Err(Error::Config(format!(
                "primary and mirror must be different files, both are {}",
                self.primary_path.display()
            )));
        }
        Ok(())
    }

    /// `host:port`, ready for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Validate and open the store this config describes.
    pub fn open_store(&self) -> Result<ItemStore> {
        self.validate()?;
        ItemStore::builder(&self.primary_path, &self.mirror_path)
            .pretty(self.pretty)
            .id_policy(self.id_policy)
            .build()
    }
}
