//! Compiler family, version, standard library, and runtime mapping.

use regex::Regex;
use semver::Version;

use crate::error::ProviderError;
use crate::profile::{CompilerFamily, Libcxx, MsvcRuntime, RuntimeType};

use super::BuildState;

/// Map a CMake compiler id to a Conan compiler family.
pub fn family(id: &str) -> Option<CompilerFamily> {
    match id {
        "GNU" => Some(CompilerFamily::Gcc),
        "Clang" => Some(CompilerFamily::Clang),
        "AppleClang" => Some(CompilerFamily::AppleClang),
        "MSVC" => Some(CompilerFamily::Msvc),
        _ => None,
    }
}

/// Derive the `compiler.version` token from the full compiler version.
///
/// gcc/clang use the major component only; MSVC uses the toolset token
/// (`190`..`194`) derived from the 19.x minor range.
pub fn version_token(family: CompilerFamily, raw: &str) -> Option<String> {
    let version = parse_loose_version(raw)?;
    match family {
        CompilerFamily::Msvc => msvc_toolset(&version),
        _ => Some(version.major.to_string()),
    }
}

/// Parse versions that may omit minor/patch components.
fn parse_loose_version(raw: &str) -> Option<Version> {
    let mut parts = raw.trim().splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let patch = parts
        .next()
        .map(|p| {
            p.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// MSVC toolset token from the `19.x` compiler version.
fn msvc_toolset(version: &Version) -> Option<String> {
    if version.major != 19 {
        return None;
    }
    let token = match version.minor {
        0..=9 => "190",
        10..=19 => "191",
        20..=29 => "192",
        30..=39 => "193",
        _ => "194",
    };
    Some(token.to_string())
}

/// Resolve `CMAKE_MSVC_RUNTIME_LIBRARY` for one build configuration.
///
/// Handles the per-config generator expression
/// `MultiThreaded$<$<CONFIG:Debug>:Debug>[DLL]`; when the variable is unset,
/// CMake's documented default applies.
pub fn resolve_msvc_runtime(
    raw: Option<&str>,
    build_type: &str,
) -> Result<(MsvcRuntime, RuntimeType), ProviderError> {
    let raw = raw.unwrap_or("MultiThreaded$<$<CONFIG:Debug>:Debug>DLL");
    let resolved = resolve_config_genex(raw, build_type);

    let (base, linkage) = if let Some(base) = resolved.strip_suffix("DLL") {
        (base, MsvcRuntime::Dynamic)
    } else {
        (resolved.as_str(), MsvcRuntime::Static)
    };

    let runtime_type = match base {
        "MultiThreaded" => RuntimeType::Release,
        "MultiThreadedDebug" => RuntimeType::Debug,
        _ => {
            return Err(ProviderError::UnsupportedPlatform {
                what: "MSVC runtime library",
                token: raw.to_string(),
            })
        }
    };

    Ok((linkage, runtime_type))
}

/// Evaluate `$<$<CONFIG:cfg>:value>` expressions for a given configuration.
fn resolve_config_genex(raw: &str, build_type: &str) -> String {
    let re = Regex::new(r"\$<\$<CONFIG:(\w+)>:(\w*)>").unwrap();
    re.replace_all(raw, |caps: &regex::Captures<'_>| {
        if caps[1].eq_ignore_ascii_case(build_type) {
            caps[2].to_string()
        } else {
            String::new()
        }
    })
    .into_owned()
}

/// Standard library flavor for gcc/clang on non-Apple, non-Android targets.
///
/// The CMake shim probes for libc++ and for the libstdc++ C++11 ABI and
/// feeds the results through [`BuildState`]; absent probes default to the
/// modern ABI.
pub fn gnu_like_libcxx(state: &BuildState) -> Libcxx {
    if state.uses_libcxx == Some(true) {
        return Libcxx::LibCxx;
    }
    match state.libstdcxx_cxx11_abi {
        Some(false) => Libcxx::LibStdCxx,
        _ => Libcxx::LibStdCxx11,
    }
}

/// `compiler.cppstd` token from the standard level and extensions flag.
pub fn cppstd_token(standard: u32, gnu_extensions: bool) -> String {
    if gnu_extensions {
        format!("gnu{}", standard)
    } else {
        standard.to_string()
    }
}

/// JSON value for the `tools.build:compiler_executables` conf entry.
///
/// Missing C compiler is a warning, not an error: C++-only projects are
/// valid, and Conan only needs whichever executables CMake chose.
pub fn compiler_executables_conf(state: &BuildState) -> Option<String> {
    let mut executables = serde_json::Map::new();
    match &state.c_compiler {
        Some(cc) => {
            executables.insert(
                "c".to_string(),
                serde_json::Value::String(cc.display().to_string()),
            );
        }
        None => tracing::warn!("The C compiler is not defined."),
    }
    if let Some(cxx) = &state.cxx_compiler {
        executables.insert(
            "cpp".to_string(),
            serde_json::Value::String(cxx.display().to_string()),
        );
    }
    if executables.is_empty() {
        return None;
    }
    Some(serde_json::Value::Object(executables).to_string())
}
