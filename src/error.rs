//! Error taxonomy for the dependency provider.
//!
//! Every failure here surfaces as a configure-time fatal error by default:
//! a partially configured build is unsafe to proceed with. The one opt-out
//! is error-quiet mode, handled in the ops layer, which downgrades
//! invocation failures to warnings.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while translating CMake state or invoking Conan.
#[derive(Debug, Error, Diagnostic)]
pub enum ProviderError {
    /// A build-system setting could not be mapped to a profile token.
    #[error("unsupported platform: cannot map {what} `{token}` to a Conan settings value")]
    #[diagnostic(
        code(caravel::detect::unsupported_platform),
        help("Pass a full host profile with `--profile-host` to skip auto-detection")
    )]
    UnsupportedPlatform { what: &'static str, token: String },

    /// An override used a key outside the known settings vocabulary.
    #[error("invalid setting `{key}`")]
    #[diagnostic(
        code(caravel::profile::invalid_setting),
        help("Known settings: os, os.version, os.sdk, os.api_level, arch, build_type, \
              compiler, compiler.version, compiler.cppstd, compiler.libcxx, \
              compiler.runtime, compiler.runtime_type")
    )]
    InvalidSetting { key: String },

    /// An override was not in `key=value` form.
    #[error("malformed override `{raw}`, expected key=value")]
    #[diagnostic(code(caravel::profile::malformed_override))]
    MalformedOverride { raw: String },

    /// No conanfile.txt or conanfile.py next to the project.
    #[error("no conanfile.txt or conanfile.py found in {}", dir.display())]
    #[diagnostic(
        code(caravel::session::missing_manifest),
        help("Create a conanfile.txt with a [requires] section in the source directory")
    )]
    MissingManifest { dir: PathBuf },

    /// The `conan` executable could not be located.
    #[error("conan executable not found")]
    #[diagnostic(
        code(caravel::invoke::tool_not_found),
        help("Install Conan 2.x and ensure it is in PATH, or set `command` in caravel.toml")
    )]
    ToolNotFound,

    /// The external CLI returned non-zero.
    #[error("conan install failed (exit code {code:?})")]
    #[diagnostic(code(caravel::invoke::install_failed))]
    InvocationFailure {
        code: Option<i32>,
        #[help]
        stderr: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_failure_message() {
        let err = ProviderError::InvocationFailure {
            code: Some(6),
            stderr: None,
        };
        assert!(err.to_string().contains("conan install failed"));
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn test_unsupported_platform_message() {
        let err = ProviderError::UnsupportedPlatform {
            what: "architecture",
            token: "vax".to_string(),
        };
        assert!(err.to_string().contains("architecture"));
        assert!(err.to_string().contains("`vax`"));
    }
}
