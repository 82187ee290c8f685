//! Caravel - A typed Conan dependency-provider bridge for CMake
//!
//! This crate provides the core library functionality for Caravel:
//! translating CMake toolchain state into Conan profiles, gating
//! `conan install` invocations per build configuration, and exposing
//! the generated packages back to CMake's `find_package` lookup.

pub mod detect;
pub mod error;
pub mod expose;
pub mod install;
pub mod ops;
pub mod profile;
pub mod util;

pub use detect::BuildState;
pub use error::ProviderError;
pub use install::{gate::InvocationGate, invoker::InstallInvoker, session::Session};
pub use profile::{Profile, SettingKey};
