//! Rewrite configuration.
//!
//! Configuration is loaded from multiple sources with the following priority:
//!
//! 1. Environment variables (`WSLPROXY_*`)
//! 2. `WSL_DISTRO_NAME`, which WSL sets inside every distro
//! 3. Configuration file (`~/.config/wslproxy/config.toml`)
//! 4. Default values (Windows host, no distro)
//!
//! ## Example Configuration File
//!
//! ```toml
//! # Run as the proxy of the Ubuntu distro.
//! distro_name = "Ubuntu"
//! ```

use crate::context::{RewriteContext, RewriteDirection};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable WSL exports with the current distro name.
pub const WSL_DISTRO_ENV: &str = "WSL_DISTRO_NAME";

/// Prefix of proxy-specific environment overrides.
pub const ENV_PREFIX: &str = "WSLPROXY_";

/// Rewrite configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// WSL distro the proxy serves. Empty when running on the Windows host.
    pub distro_name: String,
}

impl RewriteConfig {
    /// Creates a configuration for the given distro.
    #[must_use]
    pub fn for_distro(distro_name: impl Into<String>) -> Self {
        Self {
            distro_name: distro_name.into(),
        }
    }

    /// Loads configuration from files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source cannot be parsed.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(system_config_path()))
                .merge(Toml::file(user_config_path())),
        )
        .extract()
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(path)),
        )
        .extract()
    }

    fn figment(base: Figment) -> Figment {
        base.merge(
            Env::raw()
                .only(&[WSL_DISTRO_ENV])
                .map(|_| "distro_name".into()),
        )
        .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Returns true if the proxy runs on the Windows host.
    #[must_use]
    pub fn is_windows_host(&self) -> bool {
        self.distro_name.is_empty()
    }

    /// Builds the context for one body travelling in `direction`.
    #[must_use]
    pub fn context(&self, direction: RewriteDirection) -> RewriteContext {
        RewriteContext::new(direction, &self.distro_name)
    }
}

fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/wslproxy/config.toml")
}

fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("wslproxy")
        .join("config.toml")
}
