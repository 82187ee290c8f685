//! Configuration file support for Caravel.
//!
//! Caravel supports two configuration file locations:
//! - Global: `~/.caravel/config.toml` - User-wide defaults
//! - Build dir: `caravel.toml` in the binary directory - Project overrides
//!
//! Build-dir config takes precedence over global config. Command-line flags
//! override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Caravel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Conan CLI settings
    pub conan: ConanConfig,

    /// Profile composition settings
    pub profiles: ProfilesConfig,
}

/// Settings controlling how the Conan CLI is invoked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConanConfig {
    /// Path to the conan executable (defaults to PATH lookup)
    pub command: Option<PathBuf>,

    /// Remote to install from (`--remote`)
    pub remote: Option<String>,

    /// Conan generator to request (`--generator`)
    pub generator: Option<String>,

    /// Lockfile to pass to `conan install` (`--lockfile`)
    pub lockfile: Option<PathBuf>,

    /// Extra arguments for `conan install`; replaces the default
    /// `--build=missing` when non-empty
    #[serde(default)]
    pub install_args: Vec<String>,

    /// Downgrade install failures to warnings
    #[serde(default)]
    pub error_quiet: bool,
}

/// Host and build profile lists.
///
/// The literal entry `auto-cmake` stands for the profile generated from the
/// detected CMake state; entries that name an existing file are passed
/// through as paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Host profiles, left to right, later entries override earlier ones
    pub host: Vec<String>,

    /// Build profiles, same precedence rule
    pub build: Vec<String>,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        ProfilesConfig {
            host: vec!["default".to_string(), "auto-cmake".to_string()],
            build: vec!["default".to_string()],
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ProviderConfig) {
        if other.conan.command.is_some() {
            self.conan.command = other.conan.command;
        }
        if other.conan.remote.is_some() {
            self.conan.remote = other.conan.remote;
        }
        if other.conan.generator.is_some() {
            self.conan.generator = other.conan.generator;
        }
        if other.conan.lockfile.is_some() {
            self.conan.lockfile = other.conan.lockfile;
        }
        if !other.conan.install_args.is_empty() {
            self.conan.install_args = other.conan.install_args;
        }
        if other.conan.error_quiet {
            self.conan.error_quiet = true;
        }
        if other.profiles.host != ProfilesConfig::default().host {
            self.profiles.host = other.profiles.host;
        }
        if other.profiles.build != ProfilesConfig::default().build {
            self.profiles.build = other.profiles.build;
        }
    }
}

/// Get the global caravel config path (~/.caravel/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".caravel").join("config.toml"))
}

/// Get the build-dir config path (<build>/caravel.toml).
pub fn build_dir_config_path(build_dir: &Path) -> PathBuf {
    build_dir.join("caravel.toml")
}

/// Load merged configuration from global and build-dir locations.
///
/// Order of precedence (highest to lowest):
/// 1. Build-dir config (<build>/caravel.toml)
/// 2. Global config (~/.caravel/config.toml)
/// 3. Defaults
pub fn load_config(build_dir: &Path) -> ProviderConfig {
    let mut config = ProviderConfig::default();

    if let Some(global) = global_config_path() {
        if global.exists() {
            config.merge(ProviderConfig::load_or_default(&global));
        }
    }

    let project = build_dir_config_path(build_dir);
    if project.exists() {
        config.merge(ProviderConfig::load_or_default(&project));
    }

    config
}
