//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Caravel - a CMake dependency provider backed by Conan
#[derive(Parser)]
#[command(name = "caravel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the provider pass: detect, install if stale, expose packages
    Provide(ProvideArgs),

    /// Print the profile detected from the given toolchain state
    Detect(DetectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Toolchain state forwarded from the CMake shim.
///
/// Each flag mirrors the CMake variable it is named after; unset flags
/// simply omit the corresponding profile entries.
#[derive(Args, Default)]
pub struct StateArgs {
    /// CMAKE_SYSTEM_NAME
    #[arg(long)]
    pub system_name: Option<String>,

    /// CMAKE_SYSTEM_VERSION
    #[arg(long)]
    pub system_version: Option<String>,

    /// CMAKE_SYSTEM_PROCESSOR
    #[arg(long)]
    pub system_processor: Option<String>,

    /// CMAKE_GENERATOR
    #[arg(long)]
    pub generator: Option<String>,

    /// CMAKE_GENERATOR_PLATFORM
    #[arg(long)]
    pub generator_platform: Option<String>,

    /// CMAKE_C_COMPILER
    #[arg(long)]
    pub c_compiler: Option<PathBuf>,

    /// CMAKE_CXX_COMPILER
    #[arg(long)]
    pub cxx_compiler: Option<PathBuf>,

    /// CMAKE_CXX_COMPILER_ID
    #[arg(long)]
    pub compiler_id: Option<String>,

    /// CMAKE_CXX_COMPILER_VERSION
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// CMAKE_CXX_STANDARD
    #[arg(long)]
    pub cxx_standard: Option<u32>,

    /// CMAKE_CXX_EXTENSIONS
    #[arg(long)]
    pub cxx_extensions: Option<bool>,

    /// CMAKE_MSVC_RUNTIME_LIBRARY (may hold a generator expression)
    #[arg(long)]
    pub msvc_runtime_library: Option<String>,

    /// CMAKE_OSX_DEPLOYMENT_TARGET
    #[arg(long)]
    pub osx_deployment_target: Option<String>,

    /// CMAKE_OSX_SYSROOT
    #[arg(long)]
    pub osx_sysroot: Option<String>,

    /// CMAKE_OSX_ARCHITECTURES, semicolon-separated as CMake passes it
    #[arg(long, value_delimiter = ';')]
    pub osx_architectures: Vec<String>,

    /// CMAKE_ANDROID_NDK (or ANDROID_NDK from a toolchain file)
    #[arg(long)]
    pub android_ndk: Option<PathBuf>,

    /// CMAKE_ANDROID_ARCH_ABI / ANDROID_ABI
    #[arg(long)]
    pub android_abi: Option<String>,

    /// ANDROID_PLATFORM (e.g. android-28 or android-N)
    #[arg(long)]
    pub android_platform: Option<String>,

    /// CMAKE_ANDROID_STL_TYPE / ANDROID_STL
    #[arg(long)]
    pub android_stl: Option<String>,

    /// Probe result: libstdc++ built with the C++11 ABI
    #[arg(long)]
    pub libstdcxx_cxx11_abi: Option<bool>,

    /// Probe result: the standard library is libc++
    #[arg(long)]
    pub uses_libcxx: Option<bool>,
}

#[derive(Args)]
pub struct ProvideArgs {
    /// Project source directory holding the conanfile
    #[arg(long)]
    pub source_dir: PathBuf,

    /// CMake binary directory
    #[arg(long)]
    pub build_dir: PathBuf,

    /// CMAKE_BUILD_TYPE (single-configuration generators)
    #[arg(long)]
    pub build_type: Option<String>,

    /// CMAKE_CONFIGURATION_TYPES, semicolon-separated
    #[arg(long, value_delimiter = ';')]
    pub configuration_types: Vec<String>,

    /// The generator is multi-configuration
    #[arg(long)]
    pub multi_config: bool,

    /// Conan executable (defaults to CONAN_COMMAND, then PATH)
    #[arg(long, env = "CONAN_COMMAND")]
    pub conan: Option<PathBuf>,

    /// Host profile; repeatable, later entries override earlier ones.
    /// The literal `auto-cmake` stands for the detected profile.
    #[arg(long = "profile-host")]
    pub profile_host: Vec<String>,

    /// Build profile; repeatable
    #[arg(long = "profile-build")]
    pub profile_build: Vec<String>,

    /// Settings override as key=value; beats every profile entry
    #[arg(long = "setting")]
    pub settings: Vec<String>,

    /// Options override as key=value
    #[arg(long = "option")]
    pub options: Vec<String>,

    /// Conf override as key=value
    #[arg(long = "conf")]
    pub conf: Vec<String>,

    /// Extra `conan install` argument; repeatable, replaces the default
    /// `--build=missing`
    #[arg(long = "install-arg", allow_hyphen_values = true)]
    pub install_args: Vec<String>,

    /// Lockfile to pass to `conan install`
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    /// Conan remote to install from
    #[arg(long)]
    pub remote: Option<String>,

    /// Conan generator to request
    #[arg(long)]
    pub conan_generator: Option<String>,

    /// Downgrade install failures to warnings
    #[arg(long)]
    pub error_quiet: bool,

    /// CMAKE_PREFIX_PATH entry the project already set; repeatable
    #[arg(long = "prefix-path")]
    pub prefix_path: Vec<PathBuf>,

    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Configuration to detect for
    #[arg(long, default_value = "Release")]
    pub build_type: String,

    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
