//! Composes and runs the `conan install` command line.
//!
//! Precedence across profile sources is fixed: explicit `--settings`/
//! `--options`/`--conf` overrides beat named profiles, and within the
//! profile lists later entries beat earlier ones. The invoker encodes that
//! by passing profiles left to right and overrides after all profiles,
//! matching how the external CLI resolves them.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::profile::SettingKey;
use crate::util::process::{CommandOutput, ProcessBuilder};

/// Structured result of one install invocation.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// The rendered command line, for logs and diagnostics.
    pub command: String,
    /// Captured subprocess result.
    pub output: CommandOutput,
}

impl InstallOutcome {
    pub fn success(&self) -> bool {
        self.output.success()
    }
}

/// Builder for a single `conan install` invocation.
#[derive(Debug, Clone)]
pub struct InstallInvoker {
    conan: PathBuf,
    conanfile: PathBuf,
    host_profiles: Vec<String>,
    build_profiles: Vec<String>,
    settings: Vec<(SettingKey, String)>,
    options: Vec<(String, String)>,
    conf: Vec<(String, String)>,
    extra_args: Vec<String>,
    lockfile: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    remote: Option<String>,
    generator: Option<String>,
}

impl InstallInvoker {
    /// Create an invoker for a conan executable and a dependency manifest.
    pub fn new(conan: impl AsRef<Path>, conanfile: impl AsRef<Path>) -> Self {
        InstallInvoker {
            conan: conan.as_ref().to_path_buf(),
            conanfile: conanfile.as_ref().to_path_buf(),
            host_profiles: Vec::new(),
            build_profiles: Vec::new(),
            settings: Vec::new(),
            options: Vec::new(),
            conf: Vec::new(),
            extra_args: Vec::new(),
            lockfile: None,
            output_folder: None,
            remote: None,
            generator: None,
        }
    }

    /// Add host profiles, left to right; later entries override earlier ones.
    pub fn host_profiles(mut self, profiles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.host_profiles
            .extend(profiles.into_iter().map(|p| p.into()));
        self
    }

    /// Add build profiles, same precedence rule as host profiles.
    pub fn build_profiles(mut self, profiles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.build_profiles
            .extend(profiles.into_iter().map(|p| p.into()));
        self
    }

    /// Add an explicit settings override; beats every profile entry.
    pub fn setting(mut self, key: SettingKey, value: impl Into<String>) -> Self {
        self.settings.push((key, value.into()));
        self
    }

    /// Add an explicit options override.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Add an explicit conf override.
    pub fn conf(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conf.push((key.into(), value.into()));
        self
    }

    /// Replace the default `--build=missing` with caller-supplied arguments.
    pub fn extra_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    pub fn lockfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.lockfile = Some(path.into());
        self
    }

    pub fn output_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_folder = Some(dir.into());
        self
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Compose the full command line.
    pub fn command(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.conan)
            .arg("install")
            .arg(&self.conanfile);

        for profile in &self.host_profiles {
            cmd = cmd.arg(format!("--profile:host={}", profile));
        }
        for profile in &self.build_profiles {
            cmd = cmd.arg(format!("--profile:build={}", profile));
        }
        for (key, value) in &self.settings {
            cmd = cmd.arg(format!("--settings={}={}", key, value));
        }
        for (key, value) in &self.options {
            cmd = cmd.arg(format!("--options={}={}", key, value));
        }
        for (key, value) in &self.conf {
            cmd = cmd.arg(format!("-c{}={}", key, value));
        }

        if self.extra_args.is_empty() {
            cmd = cmd.arg("--build=missing");
        } else {
            cmd = cmd.args(&self.extra_args);
        }

        if let Some(ref lockfile) = self.lockfile {
            cmd = cmd.arg(format!("--lockfile={}", lockfile.display()));
        }
        if let Some(ref output_folder) = self.output_folder {
            cmd = cmd.arg(format!("--output-folder={}", output_folder.display()));
        }
        if let Some(ref remote) = self.remote {
            cmd = cmd.arg(format!("--remote={}", remote));
        }
        if let Some(ref generator) = self.generator {
            cmd = cmd.arg(format!("--generator={}", generator));
        }

        cmd
    }

    /// Run the install and capture the result.
    pub fn run(&self) -> Result<InstallOutcome> {
        let cmd = self.command();
        let command_display = cmd.display_command();
        tracing::info!("Running: {}", command_display);

        let output = cmd.capture()?;
        if output.success() {
            tracing::debug!("conan install finished");
        } else {
            tracing::debug!("conan install failed with exit code {:?}", output.code);
        }

        Ok(InstallOutcome {
            command: command_display,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(invoker: &InstallInvoker) -> Vec<String> {
        invoker.command().get_args().to_vec()
    }

    #[test]
    fn test_default_build_policy() {
        let invoker = InstallInvoker::new("conan", "conanfile.txt");
        let args = args_of(&invoker);
        assert_eq!(args[0], "install");
        assert_eq!(args[1], "conanfile.txt");
        assert!(args.contains(&"--build=missing".to_string()));
    }

    #[test]
    fn test_extra_args_replace_build_policy() {
        let invoker = InstallInvoker::new("conan", "conanfile.txt")
            .extra_args(["--build=*", "--lockfile-out=conan.lock"]);
        let args = args_of(&invoker);
        assert!(!args.contains(&"--build=missing".to_string()));
        assert!(args.contains(&"--build=*".to_string()));
        assert!(args.contains(&"--lockfile-out=conan.lock".to_string()));
    }

    #[test]
    fn test_profile_order_is_preserved() {
        let invoker = InstallInvoker::new("conan", "conanfile.txt")
            .host_profiles(["default", "/build/conan_host_profile", "foo"])
            .build_profiles(["default", "bar"]);
        let args = args_of(&invoker);

        let host: Vec<&String> = args
            .iter()
            .filter(|a| a.starts_with("--profile:host="))
            .collect();
        assert_eq!(
            host,
            vec![
                "--profile:host=default",
                "--profile:host=/build/conan_host_profile",
                "--profile:host=foo",
            ]
        );

        let build: Vec<&String> = args
            .iter()
            .filter(|a| a.starts_with("--profile:build="))
            .collect();
        assert_eq!(
            build,
            vec!["--profile:build=default", "--profile:build=bar"]
        );
    }

    #[test]
    fn test_overrides_come_after_profiles() {
        let invoker = InstallInvoker::new("conan", "conanfile.txt")
            .host_profiles(["default"])
            .setting(SettingKey::CompilerLibcxx, "libstdc++11")
            .option("hello/*:shared", "True")
            .conf("tools.cmake.cmaketoolchain:generator", "Ninja");
        let args = args_of(&invoker);

        let profile_at = args
            .iter()
            .position(|a| a.starts_with("--profile:host="))
            .unwrap();
        let setting_at = args
            .iter()
            .position(|a| a == "--settings=compiler.libcxx=libstdc++11")
            .unwrap();
        assert!(profile_at < setting_at);
        assert!(args.contains(&"--options=hello/*:shared=True".to_string()));
        assert!(args.contains(&"-ctools.cmake.cmaketoolchain:generator=Ninja".to_string()));
    }

    #[test]
    fn test_optional_flags() {
        let invoker = InstallInvoker::new("conan", "conanfile.txt")
            .lockfile("conan.lock")
            .output_folder("/build/conan")
            .remote("conancenter")
            .generator("CMakeDeps");
        let args = args_of(&invoker);
        assert!(args.contains(&"--lockfile=conan.lock".to_string()));
        assert!(args.contains(&"--output-folder=/build/conan".to_string()));
        assert!(args.contains(&"--remote=conancenter".to_string()));
        assert!(args.contains(&"--generator=CMakeDeps".to_string()));
    }
}
