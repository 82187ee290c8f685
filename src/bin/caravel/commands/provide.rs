//! `caravel provide` command

use anyhow::Result;

use crate::cli::{ProvideArgs, StateArgs};
use caravel::detect::{AndroidState, BuildState};
use caravel::ops::{provide, ProvideOptions};
use caravel::profile::{parse_key_value, SettingKey};
use caravel::util::config::load_config;

pub fn execute(args: ProvideArgs) -> Result<()> {
    // Load configuration (global + build dir), then overlay CLI flags
    let mut config = load_config(&args.build_dir);
    if args.conan.is_some() {
        config.conan.command = args.conan.clone();
    }
    if args.remote.is_some() {
        config.conan.remote = args.remote.clone();
    }
    if args.conan_generator.is_some() {
        config.conan.generator = args.conan_generator.clone();
    }
    if args.lockfile.is_some() {
        config.conan.lockfile = args.lockfile.clone();
    }
    if !args.install_args.is_empty() {
        config.conan.install_args = args.install_args.clone();
    }
    if args.error_quiet {
        config.conan.error_quiet = true;
    }
    if !args.profile_host.is_empty() {
        config.profiles.host = args.profile_host.clone();
    }
    if !args.profile_build.is_empty() {
        config.profiles.build = args.profile_build.clone();
    }

    let opts = ProvideOptions {
        source_dir: args.source_dir.clone(),
        build_dir: args.build_dir.clone(),
        state: build_state(args.state),
        build_type: args.build_type.clone(),
        configuration_types: args.configuration_types.clone(),
        multi_config: args.multi_config,
        config,
        settings_overrides: parse_settings(&args.settings)?,
        options_overrides: parse_pairs(&args.options)?,
        conf_overrides: parse_pairs(&args.conf)?,
        existing_prefix_path: args.prefix_path.clone(),
    };

    let summary = provide(&opts)?;

    for config in &summary.installed {
        eprintln!("    Installed dependencies for {}", config);
    }
    // The shim includes this snippet to expose the packages
    println!("{}", summary.snippet_path.display());

    Ok(())
}

/// Map the CLI flags onto the detector's input.
pub fn build_state(state: StateArgs) -> BuildState {
    BuildState {
        system_name: state.system_name,
        system_version: state.system_version,
        system_processor: state.system_processor,
        generator: state.generator,
        generator_platform: state.generator_platform,
        c_compiler: state.c_compiler,
        cxx_compiler: state.cxx_compiler,
        compiler_id: state.compiler_id,
        compiler_version: state.compiler_version,
        cxx_standard: state.cxx_standard,
        cxx_extensions: state.cxx_extensions,
        msvc_runtime_library: state.msvc_runtime_library,
        osx_deployment_target: state.osx_deployment_target,
        osx_sysroot: state.osx_sysroot,
        osx_architectures: state.osx_architectures,
        android: AndroidState {
            ndk_root: state.android_ndk,
            abi: state.android_abi,
            platform: state.android_platform,
            stl: state.android_stl,
        },
        libstdcxx_cxx11_abi: state.libstdcxx_cxx11_abi,
        uses_libcxx: state.uses_libcxx,
    }
}

fn parse_settings(raw: &[String]) -> Result<Vec<(SettingKey, String)>> {
    raw.iter()
        .map(|entry| {
            let (key, value) = parse_key_value(entry)?;
            let key: SettingKey = key.parse()?;
            Ok((key, value.to_string()))
        })
        .collect()
}

fn parse_pairs(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| {
            let (key, value) = parse_key_value(entry)?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
