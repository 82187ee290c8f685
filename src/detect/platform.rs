//! OS and architecture token mapping.

use crate::error::ProviderError;
use crate::profile::{Arch, OsFamily};

use super::BuildState;

/// Map the CMake system name to an OS token.
///
/// Falls back to the host OS when no system name is set (not
/// cross-compiling). Unknown names are fatal, not skipped.
pub fn detect_os(state: &BuildState) -> Result<OsFamily, ProviderError> {
    if state.android.is_cross_compiling() {
        return Ok(OsFamily::Android);
    }

    let name = match state.system_name.as_deref() {
        Some(name) => name.to_string(),
        None => host_os_name(),
    };

    match name.as_str() {
        "Linux" => Ok(OsFamily::Linux),
        "Darwin" | "Macos" => Ok(OsFamily::Macos),
        "Windows" | "WindowsStore" | "CYGWIN" | "MSYS" => Ok(OsFamily::Windows),
        "Android" => Ok(OsFamily::Android),
        "iOS" => Ok(OsFamily::Ios),
        "tvOS" => Ok(OsFamily::Tvos),
        "watchOS" => Ok(OsFamily::Watchos),
        "FreeBSD" => Ok(OsFamily::Freebsd),
        other => Err(ProviderError::UnsupportedPlatform {
            what: "operating system",
            token: other.to_string(),
        }),
    }
}

/// Map a processor or ABI spelling to an architecture token.
pub fn arch_token(raw: &str) -> Option<Arch> {
    match raw.to_lowercase().as_str() {
        "amd64" | "x86_64" | "x64" => Some(Arch::X86_64),
        "arm64" | "aarch64" | "armv8" | "arm64-v8a" => Some(Arch::Armv8),
        "arm" | "armv7" | "armv7-a" | "armv7l" | "armeabi-v7a" => Some(Arch::Armv7),
        "i386" | "i686" | "x86" | "win32" => Some(Arch::X86),
        _ => None,
    }
}

/// Map a Visual Studio generator platform (`-A`) to an architecture token.
pub fn vs_platform_arch(platform: &str) -> Option<Arch> {
    match platform.to_lowercase().as_str() {
        "x64" => Some(Arch::X86_64),
        "win32" => Some(Arch::X86),
        "arm64" => Some(Arch::Armv8),
        "arm" => Some(Arch::Armv7),
        _ => None,
    }
}

/// Detect the target architecture for non-Android targets.
///
/// Priority: explicit Apple architecture list, then the VS generator
/// platform, then the system processor, then the host architecture.
pub fn detect_arch(state: &BuildState) -> Result<Arch, ProviderError> {
    let raw = state
        .osx_architectures
        .first()
        .cloned()
        .or_else(|| state.generator_platform.clone())
        .or_else(|| state.system_processor.clone())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string());

    arch_token(&raw)
        .or_else(|| vs_platform_arch(&raw))
        .ok_or(ProviderError::UnsupportedPlatform {
            what: "architecture",
            token: raw,
        })
}

/// Reduce an SDK path or name to Conan's `os.sdk` token.
///
/// `/Applications/.../iPhoneOS17.0.sdk` and `iphoneos` both map to
/// `iphoneos`.
pub fn apple_sdk_name(sysroot: &str) -> Option<String> {
    let last = sysroot.rsplit(['/', '\\']).next()?;
    let stem = last.strip_suffix(".sdk").unwrap_or(last);
    let name: String = stem
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .collect::<String>()
        .to_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn host_os_name() -> String {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "android" => "Android",
        other => other,
    }
    .to_string()
}
