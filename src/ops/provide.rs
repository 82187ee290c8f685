//! The provider pass: detect, gate, install, expose.
//!
//! This is what the CMake shim runs on every configure. For
//! multi-configuration generators the pass handles each requested
//! configuration independently; a configuration that is already clean is
//! skipped without touching the external tool.

use std::path::PathBuf;

use anyhow::Result;

use crate::detect::BuildState;
use crate::error::ProviderError;
use crate::expose::{self, SearchPaths};
use crate::install::{InstallInvoker, InvocationGate, Session};
use crate::profile::{Profile, SettingKey};
use crate::util::config::ProviderConfig;
use crate::util::fs::write_string;
use crate::util::process::find_conan;

/// Sentinel in profile lists standing for the generated profile.
pub const AUTO_PROFILE_SENTINEL: &str = "auto-cmake";

/// Everything one provider pass needs.
#[derive(Debug, Clone, Default)]
pub struct ProvideOptions {
    /// Project source directory (where the conanfile lives)
    pub source_dir: PathBuf,
    /// CMake binary directory
    pub build_dir: PathBuf,
    /// Detected CMake toolchain state
    pub state: BuildState,
    /// CMAKE_BUILD_TYPE (single-config generators)
    pub build_type: Option<String>,
    /// CMAKE_CONFIGURATION_TYPES
    pub configuration_types: Vec<String>,
    /// Whether the generator is multi-configuration
    pub multi_config: bool,
    /// Merged file configuration
    pub config: ProviderConfig,
    /// Explicit settings overrides; win over every profile source
    pub settings_overrides: Vec<(SettingKey, String)>,
    /// Explicit options overrides
    pub options_overrides: Vec<(String, String)>,
    /// Explicit conf overrides
    pub conf_overrides: Vec<(String, String)>,
    /// Package search path entries the project had already set
    pub existing_prefix_path: Vec<PathBuf>,
}

/// What a provider pass did.
#[derive(Debug, Clone)]
pub struct ProvideSummary {
    /// Configurations installed during this pass
    pub installed: Vec<String>,
    /// Configurations that were already clean
    pub skipped: Vec<String>,
    /// Full search path list, pre-existing entries first
    pub search_paths: SearchPaths,
    /// Where the CMake include snippet was written
    pub snippet_path: PathBuf,
}

/// Run one provider pass.
pub fn provide(opts: &ProvideOptions) -> Result<ProvideSummary> {
    let session = Session::new(&opts.source_dir, &opts.build_dir)?;
    let manifest = session.manifest_path()?;
    let gate = InvocationGate::new(&session);

    let conan = match &opts.config.conan.command {
        Some(command) => command.clone(),
        None => find_conan().ok_or(ProviderError::ToolNotFound)?,
    };

    let configurations = requested_configurations(opts);

    let mut installed = Vec::new();
    let mut skipped = Vec::new();

    for configuration in &configurations {
        if !gate.should_install(configuration)? {
            tracing::info!(
                "found, 'conan install' already ran for {}",
                configuration
            );
            skipped.push(configuration.clone());
            continue;
        }

        tracing::info!(
            "first find_package() found. Installing dependencies with Conan ({})",
            configuration
        );

        let profile = compose_profile(opts, configuration)?;
        let profile_path = session.generated_profile_path();
        write_string(&profile_path, &profile.render())?;

        let mut invoker = InstallInvoker::new(&conan, &manifest)
            .host_profiles(resolve_profile_list(
                &opts.config.profiles.host,
                &profile_path,
            ))
            .build_profiles(resolve_profile_list(
                &opts.config.profiles.build,
                &profile_path,
            ))
            .output_folder(session.output_folder())
            .extra_args(opts.config.conan.install_args.iter().cloned());

        for (key, value) in &opts.settings_overrides {
            invoker = invoker.setting(*key, value.clone());
        }
        for (key, value) in &opts.options_overrides {
            invoker = invoker.option(key.clone(), value.clone());
        }
        for (key, value) in &opts.conf_overrides {
            invoker = invoker.conf(key.clone(), value.clone());
        }
        if let Some(ref lockfile) = opts.config.conan.lockfile {
            invoker = invoker.lockfile(lockfile.clone());
        }
        if let Some(ref remote) = opts.config.conan.remote {
            invoker = invoker.remote(remote.clone());
        }
        if let Some(ref generator) = opts.config.conan.generator {
            invoker = invoker.generator(generator.clone());
        }

        let outcome = invoker.run()?;
        if outcome.success() {
            gate.mark_installed(configuration)?;
            installed.push(configuration.clone());
        } else if opts.config.conan.error_quiet {
            // Gate stays open; the next configure retries.
            tracing::warn!(
                "conan install failed for {}; continuing without dependency resolution",
                configuration
            );
        } else {
            return Err(ProviderError::InvocationFailure {
                code: outcome.output.code,
                stderr: stderr_tail(&outcome.output.stderr),
            }
            .into());
        }
    }

    let mut search_paths = SearchPaths::from_existing(opts.existing_prefix_path.iter().cloned());
    let mut new_entries = Vec::new();
    for dir in expose::discover_package_dirs(&session.output_folder()) {
        if search_paths.append_unique(dir.clone()) {
            new_entries.push(dir);
        }
    }

    let snippet_path = session.state_dir().join("dependency_paths.cmake");
    expose::write_snippet(&snippet_path, &new_entries)?;

    Ok(ProvideSummary {
        installed,
        skipped,
        search_paths,
        snippet_path,
    })
}

/// Configurations this pass must consider.
///
/// Single-config generators install exactly one configuration even when
/// `CMAKE_CONFIGURATION_TYPES` carries several values.
fn requested_configurations(opts: &ProvideOptions) -> Vec<String> {
    if opts.multi_config {
        if opts.configuration_types.is_empty() {
            vec!["Release".to_string(), "Debug".to_string()]
        } else {
            opts.configuration_types.clone()
        }
    } else {
        let configuration = opts
            .build_type
            .clone()
            .unwrap_or_else(|| "Release".to_string());
        if opts.configuration_types.len() > 1 {
            tracing::info!("Installing single configuration {}", configuration);
        }
        vec![configuration]
    }
}

/// Detected fragment merged with explicit overrides; the override value is
/// the only occurrence of its key in the written profile.
fn compose_profile(opts: &ProvideOptions, configuration: &str) -> Result<Profile> {
    let mut profile = opts.state.detect_profile(configuration)?;
    for (key, value) in &opts.settings_overrides {
        profile.set(*key, value.clone());
    }
    for (key, value) in &opts.options_overrides {
        profile.set_option(key.clone(), value.clone());
    }
    for (key, value) in &opts.conf_overrides {
        profile.set_conf(key.clone(), value.clone());
    }
    Ok(profile)
}

/// Replace the `auto-cmake` sentinel with the generated profile path;
/// everything else passes through verbatim (names or file paths).
fn resolve_profile_list(entries: &[String], generated: &std::path::Path) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            if entry == AUTO_PROFILE_SENTINEL {
                generated.display().to_string()
            } else {
                entry.clone()
            }
        })
        .collect()
}

fn stderr_tail(stderr: &str) -> Option<String> {
    if stderr.trim().is_empty() {
        return None;
    }
    let lines: Vec<&str> = stderr.lines().collect();
    let tail = lines[lines.len().saturating_sub(20)..].join("\n");
    Some(tail)
}
