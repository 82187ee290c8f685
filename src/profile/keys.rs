//! Typed vocabulary for Conan profile settings.
//!
//! The original bug class this guards against is duplicated or misspelled
//! string keys in the generated profile: keys are a closed enum, so a value
//! can exist at most once per section, and unknown keys fail at parse time.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// A key in the `[settings]` section of a profile.
///
/// Variant order is the order keys are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    Os,
    OsVersion,
    OsSdk,
    OsApiLevel,
    Arch,
    BuildType,
    Compiler,
    CompilerVersion,
    CompilerCppstd,
    CompilerLibcxx,
    CompilerRuntime,
    CompilerRuntimeType,
}

impl SettingKey {
    /// The profile-file spelling of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Os => "os",
            SettingKey::OsVersion => "os.version",
            SettingKey::OsSdk => "os.sdk",
            SettingKey::OsApiLevel => "os.api_level",
            SettingKey::Arch => "arch",
            SettingKey::BuildType => "build_type",
            SettingKey::Compiler => "compiler",
            SettingKey::CompilerVersion => "compiler.version",
            SettingKey::CompilerCppstd => "compiler.cppstd",
            SettingKey::CompilerLibcxx => "compiler.libcxx",
            SettingKey::CompilerRuntime => "compiler.runtime",
            SettingKey::CompilerRuntimeType => "compiler.runtime_type",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os" => Ok(SettingKey::Os),
            "os.version" => Ok(SettingKey::OsVersion),
            "os.sdk" => Ok(SettingKey::OsSdk),
            "os.api_level" => Ok(SettingKey::OsApiLevel),
            "arch" => Ok(SettingKey::Arch),
            "build_type" => Ok(SettingKey::BuildType),
            "compiler" => Ok(SettingKey::Compiler),
            "compiler.version" => Ok(SettingKey::CompilerVersion),
            "compiler.cppstd" => Ok(SettingKey::CompilerCppstd),
            "compiler.libcxx" => Ok(SettingKey::CompilerLibcxx),
            "compiler.runtime" => Ok(SettingKey::CompilerRuntime),
            "compiler.runtime_type" => Ok(SettingKey::CompilerRuntimeType),
            other => Err(ProviderError::InvalidSetting {
                key: other.to_string(),
            }),
        }
    }
}

/// Target operating system token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Macos,
    Windows,
    Android,
    Ios,
    Tvos,
    Watchos,
    Freebsd,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Linux => "Linux",
            OsFamily::Macos => "Macos",
            OsFamily::Windows => "Windows",
            OsFamily::Android => "Android",
            OsFamily::Ios => "iOS",
            OsFamily::Tvos => "tvOS",
            OsFamily::Watchos => "watchOS",
            OsFamily::Freebsd => "FreeBSD",
        }
    }

    /// Whether this is an Apple platform (implies libc++).
    pub fn is_apple(&self) -> bool {
        matches!(
            self,
            OsFamily::Macos | OsFamily::Ios | OsFamily::Tvos | OsFamily::Watchos
        )
    }
}

/// Target architecture token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }
}

/// Compiler family token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl CompilerFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::AppleClang => "apple-clang",
            CompilerFamily::Msvc => "msvc",
        }
    }
}

/// C++ standard library flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Libcxx {
    /// LLVM libc++
    LibCxx,
    /// GNU libstdc++ with the pre-C++11 ABI
    LibStdCxx,
    /// GNU libstdc++ with the C++11 ABI
    LibStdCxx11,
    /// Android shared STL
    CxxShared,
    /// Android static STL
    CxxStatic,
}

impl Libcxx {
    pub fn as_str(&self) -> &'static str {
        match self {
            Libcxx::LibCxx => "libc++",
            Libcxx::LibStdCxx => "libstdc++",
            Libcxx::LibStdCxx11 => "libstdc++11",
            Libcxx::CxxShared => "c++_shared",
            Libcxx::CxxStatic => "c++_static",
        }
    }
}

/// MSVC runtime linkage (/MT vs /MD family).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsvcRuntime {
    Static,
    Dynamic,
}

impl MsvcRuntime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MsvcRuntime::Static => "static",
            MsvcRuntime::Dynamic => "dynamic",
        }
    }
}

/// Debug vs release variant of the MSVC runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeType {
    Debug,
    Release,
}

impl RuntimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeType::Debug => "Debug",
            RuntimeType::Release => "Release",
        }
    }
}
