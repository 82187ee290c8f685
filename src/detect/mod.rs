//! The settings detector: CMake toolchain state in, profile fragment out.
//!
//! Detection is a pure function of [`BuildState`] and the requested build
//! configuration. Every rule is an independent lookup; a value that cannot
//! be detected omits its key rather than writing a placeholder. Failing to
//! map the OS or architecture at all is fatal.

use std::path::PathBuf;

use crate::error::ProviderError;
use crate::profile::{CompilerFamily, OsFamily, Profile, SettingKey};

pub mod android;
pub mod compiler;
pub mod platform;

pub use android::AndroidState;

/// Typed snapshot of the CMake variables the detector consumes.
///
/// The CMake shim forwards these on the `caravel` command line; none are
/// read from ambient process state.
#[derive(Debug, Clone, Default)]
pub struct BuildState {
    /// CMAKE_SYSTEM_NAME (set implies cross-compiling or explicit platform)
    pub system_name: Option<String>,
    /// CMAKE_SYSTEM_VERSION
    pub system_version: Option<String>,
    /// CMAKE_SYSTEM_PROCESSOR
    pub system_processor: Option<String>,
    /// CMAKE_GENERATOR
    pub generator: Option<String>,
    /// CMAKE_GENERATOR_PLATFORM (the `-A` argument for VS generators)
    pub generator_platform: Option<String>,
    /// CMAKE_C_COMPILER
    pub c_compiler: Option<PathBuf>,
    /// CMAKE_CXX_COMPILER
    pub cxx_compiler: Option<PathBuf>,
    /// CMAKE_CXX_COMPILER_ID (GNU, Clang, AppleClang, MSVC)
    pub compiler_id: Option<String>,
    /// CMAKE_CXX_COMPILER_VERSION
    pub compiler_version: Option<String>,
    /// CMAKE_CXX_STANDARD
    pub cxx_standard: Option<u32>,
    /// CMAKE_CXX_EXTENSIONS
    pub cxx_extensions: Option<bool>,
    /// CMAKE_MSVC_RUNTIME_LIBRARY, may hold a per-config generator expression
    pub msvc_runtime_library: Option<String>,
    /// CMAKE_OSX_DEPLOYMENT_TARGET
    pub osx_deployment_target: Option<String>,
    /// CMAKE_OSX_SYSROOT (SDK name or full path)
    pub osx_sysroot: Option<String>,
    /// CMAKE_OSX_ARCHITECTURES
    pub osx_architectures: Vec<String>,
    /// Android cross parameters
    pub android: AndroidState,
    /// Probe result: is libstdc++ using the C++11 ABI
    pub libstdcxx_cxx11_abi: Option<bool>,
    /// Probe result: is the standard library libc++
    pub uses_libcxx: Option<bool>,
}

impl BuildState {
    /// Translate the state into a profile fragment for one configuration.
    pub fn detect_profile(&self, build_type: &str) -> Result<Profile, ProviderError> {
        let mut profile = Profile::new();

        let os = platform::detect_os(self)?;
        profile.set(SettingKey::Os, os.as_str());
        profile.set(SettingKey::BuildType, build_type);

        if os == OsFamily::Android {
            self.detect_android(&mut profile)?;
        } else {
            let arch = platform::detect_arch(self)?;
            profile.set(SettingKey::Arch, arch.as_str());
        }

        if os.is_apple() {
            self.detect_apple(&mut profile);
        }

        self.detect_compiler(&mut profile, os, build_type)?;

        if let Some(conf) = compiler::compiler_executables_conf(self) {
            profile.set_conf("tools.build:compiler_executables", conf);
        }

        Ok(profile)
    }

    fn detect_android(&self, profile: &mut Profile) -> Result<(), ProviderError> {
        let abi = self
            .android
            .abi
            .as_deref()
            .ok_or(ProviderError::UnsupportedPlatform {
                what: "Android ABI",
                token: "<unset>".to_string(),
            })?;
        profile.set(SettingKey::Arch, android::arch_from_abi(abi)?.as_str());

        let platform_level = self
            .android
            .platform
            .as_deref()
            .or(self.system_version.as_deref());
        if let Some(level) = platform_level.and_then(android::api_level) {
            profile.set(SettingKey::OsApiLevel, level.to_string());
        }

        if let Some(libcxx) = self.android.stl.as_deref().and_then(android::stl_libcxx) {
            profile.set(SettingKey::CompilerLibcxx, libcxx.as_str());
        }

        if let Some(ndk) = &self.android.ndk_root {
            profile.set_conf("tools.android:ndk_path", ndk.display().to_string());
        }

        Ok(())
    }

    fn detect_apple(&self, profile: &mut Profile) {
        if let Some(target) = &self.osx_deployment_target {
            profile.set(SettingKey::OsVersion, target.clone());
        }
        if let Some(sdk) = self
            .osx_sysroot
            .as_deref()
            .and_then(platform::apple_sdk_name)
        {
            profile.set(SettingKey::OsSdk, sdk);
        }
    }

    fn detect_compiler(
        &self,
        profile: &mut Profile,
        os: OsFamily,
        build_type: &str,
    ) -> Result<(), ProviderError> {
        let family = match self.compiler_id.as_deref().and_then(compiler::family) {
            Some(family) => family,
            // No compiler enabled yet; Conan falls back to its own profile.
            None => return Ok(()),
        };
        profile.set(SettingKey::Compiler, family.as_str());

        if let Some(version) = self
            .compiler_version
            .as_deref()
            .and_then(|raw| compiler::version_token(family, raw))
        {
            profile.set(SettingKey::CompilerVersion, version);
        }

        if let Some(standard) = self.cxx_standard {
            let gnu = self.cxx_extensions.unwrap_or(false);
            profile.set(
                SettingKey::CompilerCppstd,
                compiler::cppstd_token(standard, gnu),
            );
        }

        if family == CompilerFamily::Msvc {
            let (runtime, runtime_type) = compiler::resolve_msvc_runtime(
                self.msvc_runtime_library.as_deref(),
                build_type,
            )?;
            profile.set(SettingKey::CompilerRuntime, runtime.as_str());
            profile.set(SettingKey::CompilerRuntimeType, runtime_type.as_str());
        } else if os.is_apple() {
            profile.set(SettingKey::CompilerLibcxx, "libc++");
        } else if os != OsFamily::Android && os != OsFamily::Windows {
            profile.set(
                SettingKey::CompilerLibcxx,
                compiler::gnu_like_libcxx(self).as_str(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SettingKey;

    fn linux_gcc_state() -> BuildState {
        BuildState {
            system_name: Some("Linux".to_string()),
            system_processor: Some("x86_64".to_string()),
            c_compiler: Some(PathBuf::from("/usr/bin/cc")),
            cxx_compiler: Some(PathBuf::from("/usr/bin/c++")),
            compiler_id: Some("GNU".to_string()),
            compiler_version: Some("13.2.0".to_string()),
            cxx_standard: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn test_linux_gcc_release() {
        let profile = linux_gcc_state().detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("Linux"));
        assert_eq!(profile.setting(SettingKey::Arch), Some("x86_64"));
        assert_eq!(profile.setting(SettingKey::BuildType), Some("Release"));
        assert_eq!(profile.setting(SettingKey::Compiler), Some("gcc"));
        assert_eq!(profile.setting(SettingKey::CompilerVersion), Some("13"));
        assert_eq!(profile.setting(SettingKey::CompilerCppstd), Some("17"));
        assert_eq!(
            profile.setting(SettingKey::CompilerLibcxx),
            Some("libstdc++11")
        );
        assert_eq!(
            profile.conf("tools.build:compiler_executables"),
            Some(r#"{"c":"/usr/bin/cc","cpp":"/usr/bin/c++"}"#)
        );
    }

    #[test]
    fn test_linux_old_abi() {
        let mut state = linux_gcc_state();
        state.libstdcxx_cxx11_abi = Some(false);
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(
            profile.setting(SettingKey::CompilerLibcxx),
            Some("libstdc++")
        );
    }

    #[test]
    fn test_android_armv8() {
        let state = BuildState {
            android: AndroidState {
                ndk_root: Some(PathBuf::from("/opt/android-ndk")),
                abi: Some("arm64-v8a".to_string()),
                platform: Some("android-28".to_string()),
                stl: Some("c++_shared".to_string()),
            },
            compiler_id: Some("Clang".to_string()),
            compiler_version: Some("17.0.2".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("Android"));
        assert_eq!(profile.setting(SettingKey::Arch), Some("armv8"));
        assert_eq!(profile.setting(SettingKey::OsApiLevel), Some("28"));
        assert_eq!(
            profile.setting(SettingKey::CompilerLibcxx),
            Some("c++_shared")
        );
        assert_eq!(
            profile.conf("tools.android:ndk_path"),
            Some("/opt/android-ndk")
        );
    }

    #[test]
    fn test_android_named_platform() {
        let state = BuildState {
            android: AndroidState {
                ndk_root: Some(PathBuf::from("/opt/android-ndk")),
                abi: Some("armeabi-v7a".to_string()),
                platform: Some("android-N".to_string()),
                stl: Some("c++_static".to_string()),
            },
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Arch), Some("armv7"));
        assert_eq!(profile.setting(SettingKey::OsApiLevel), Some("24"));
        assert_eq!(
            profile.setting(SettingKey::CompilerLibcxx),
            Some("c++_static")
        );
    }

    #[test]
    fn test_android_plain_cmake_spelling() {
        // CMAKE_SYSTEM_NAME=Android + CMAKE_SYSTEM_VERSION=28, no toolchain file
        let state = BuildState {
            system_name: Some("Android".to_string()),
            system_version: Some("28".to_string()),
            android: AndroidState {
                ndk_root: Some(PathBuf::from("/opt/android-ndk")),
                abi: Some("arm64-v8a".to_string()),
                platform: None,
                stl: Some("c++_static".to_string()),
            },
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("Android"));
        assert_eq!(profile.setting(SettingKey::OsApiLevel), Some("28"));
    }

    #[test]
    fn test_ios() {
        let state = BuildState {
            system_name: Some("iOS".to_string()),
            osx_architectures: vec!["arm64".to_string()],
            osx_sysroot: Some("iphoneos".to_string()),
            osx_deployment_target: Some("11.0".to_string()),
            compiler_id: Some("AppleClang".to_string()),
            compiler_version: Some("15.0.0".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("iOS"));
        assert_eq!(profile.setting(SettingKey::Arch), Some("armv8"));
        assert_eq!(profile.setting(SettingKey::OsSdk), Some("iphoneos"));
        assert_eq!(profile.setting(SettingKey::OsVersion), Some("11.0"));
        assert_eq!(profile.setting(SettingKey::CompilerLibcxx), Some("libc++"));
    }

    #[test]
    fn test_watchos_simulator() {
        let state = BuildState {
            system_name: Some("watchOS".to_string()),
            osx_architectures: vec!["x86_64".to_string()],
            osx_sysroot: Some("watchsimulator".to_string()),
            osx_deployment_target: Some("7.0".to_string()),
            compiler_id: Some("AppleClang".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("watchOS"));
        assert_eq!(profile.setting(SettingKey::Arch), Some("x86_64"));
        assert_eq!(profile.setting(SettingKey::OsSdk), Some("watchsimulator"));
    }

    #[test]
    fn test_macos_no_deployment_target_omits_os_version() {
        let state = BuildState {
            system_name: Some("Darwin".to_string()),
            system_processor: Some("arm64".to_string()),
            compiler_id: Some("AppleClang".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Os), Some("Macos"));
        assert_eq!(profile.setting(SettingKey::OsVersion), None);
        assert_eq!(profile.setting(SettingKey::CompilerLibcxx), Some("libc++"));
    }

    #[test]
    fn test_msvc_per_config_runtime() {
        let state = BuildState {
            system_name: Some("Windows".to_string()),
            generator_platform: Some("x64".to_string()),
            compiler_id: Some("MSVC".to_string()),
            compiler_version: Some("19.38.33134".to_string()),
            msvc_runtime_library: Some("MultiThreaded$<$<CONFIG:Debug>:Debug>".to_string()),
            ..Default::default()
        };

        let release = state.detect_profile("Release").unwrap();
        assert_eq!(release.setting(SettingKey::Arch), Some("x86_64"));
        assert_eq!(release.setting(SettingKey::Compiler), Some("msvc"));
        assert_eq!(release.setting(SettingKey::CompilerVersion), Some("193"));
        assert_eq!(release.setting(SettingKey::CompilerRuntime), Some("static"));
        assert_eq!(
            release.setting(SettingKey::CompilerRuntimeType),
            Some("Release")
        );
        assert_eq!(release.setting(SettingKey::CompilerLibcxx), None);

        let debug = state.detect_profile("Debug").unwrap();
        assert_eq!(debug.setting(SettingKey::CompilerRuntime), Some("static"));
        assert_eq!(
            debug.setting(SettingKey::CompilerRuntimeType),
            Some("Debug")
        );
    }

    #[test]
    fn test_msvc_arm64_generator_platform() {
        let state = BuildState {
            system_name: Some("Windows".to_string()),
            generator_platform: Some("ARM64".to_string()),
            compiler_id: Some("MSVC".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Arch), Some("armv8"));
    }

    #[test]
    fn test_no_compiler_id_omits_compiler_block() {
        let state = BuildState {
            system_name: Some("Linux".to_string()),
            system_processor: Some("x86_64".to_string()),
            ..Default::default()
        };
        let profile = state.detect_profile("Release").unwrap();
        assert_eq!(profile.setting(SettingKey::Compiler), None);
        assert_eq!(profile.setting(SettingKey::CompilerVersion), None);
    }
}
