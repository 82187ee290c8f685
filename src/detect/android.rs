//! Android NDK cross-compilation parameters.
//!
//! Accepts both the NDK toolchain-file spellings (`ANDROID_ABI`,
//! `ANDROID_PLATFORM`, `ANDROID_STL`) and the plain-CMake ones
//! (`CMAKE_ANDROID_ARCH_ABI`, `CMAKE_SYSTEM_VERSION`,
//! `CMAKE_ANDROID_STL_TYPE`), which the CLI normalizes into one state.

use std::path::PathBuf;

use crate::error::ProviderError;
use crate::profile::{Arch, Libcxx};

/// Android cross-compilation inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndroidState {
    /// NDK root directory
    pub ndk_root: Option<PathBuf>,
    /// Target ABI (arm64-v8a, armeabi-v7a, x86, x86_64)
    pub abi: Option<String>,
    /// Platform level: `android-28`, `28`, or a named level like `android-N`
    pub platform: Option<String>,
    /// STL selection (c++_shared, c++_static)
    pub stl: Option<String>,
}

impl AndroidState {
    /// Whether any Android cross parameter is present.
    pub fn is_cross_compiling(&self) -> bool {
        self.ndk_root.is_some() || self.abi.is_some()
    }
}

/// Map an Android ABI to the architecture token.
pub fn arch_from_abi(abi: &str) -> Result<Arch, ProviderError> {
    match abi {
        "arm64-v8a" => Ok(Arch::Armv8),
        "armeabi-v7a" => Ok(Arch::Armv7),
        "x86" => Ok(Arch::X86),
        "x86_64" => Ok(Arch::X86_64),
        other => Err(ProviderError::UnsupportedPlatform {
            what: "Android ABI",
            token: other.to_string(),
        }),
    }
}

/// Resolve a platform string to a numeric API level.
///
/// Named levels follow the NDK's letter aliases (`android-N` is API 24).
pub fn api_level(platform: &str) -> Option<u32> {
    let level = platform.strip_prefix("android-").unwrap_or(platform);
    if let Ok(numeric) = level.parse::<u32>() {
        return Some(numeric);
    }
    match level {
        "L" => Some(21),
        "M" => Some(23),
        "N" => Some(24),
        "O" => Some(26),
        "P" => Some(28),
        "Q" => Some(29),
        "R" => Some(30),
        "S" => Some(31),
        "T" => Some(33),
        "U" => Some(34),
        _ => None,
    }
}

/// Map the STL selection to a libcxx token; unsupported STLs omit the key.
pub fn stl_libcxx(stl: &str) -> Option<Libcxx> {
    match stl {
        "c++_shared" => Some(Libcxx::CxxShared),
        "c++_static" => Some(Libcxx::CxxStatic),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_from_abi() {
        assert_eq!(arch_from_abi("arm64-v8a").unwrap(), Arch::Armv8);
        assert_eq!(arch_from_abi("armeabi-v7a").unwrap(), Arch::Armv7);
        assert_eq!(arch_from_abi("x86").unwrap(), Arch::X86);
        assert_eq!(arch_from_abi("x86_64").unwrap(), Arch::X86_64);
        assert!(arch_from_abi("mips").is_err());
    }

    #[test]
    fn test_api_level_forms() {
        assert_eq!(api_level("android-28"), Some(28));
        assert_eq!(api_level("28"), Some(28));
        assert_eq!(api_level("22"), Some(22));
        assert_eq!(api_level("android-N"), Some(24));
        assert_eq!(api_level("android-S"), Some(31));
        assert_eq!(api_level("android-ZZZ"), None);
    }

    #[test]
    fn test_stl_mapping() {
        assert_eq!(stl_libcxx("c++_shared"), Some(Libcxx::CxxShared));
        assert_eq!(stl_libcxx("c++_static"), Some(Libcxx::CxxStatic));
        assert_eq!(stl_libcxx("system"), None);
    }
}
