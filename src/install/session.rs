//! Per-build-directory provider state.
//!
//! All provider state lives under `<build>/.caravel/` and is owned by this
//! session object; nothing is read from ambient globals. The host build
//! system serializes configure passes, so no locking is needed.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::ProviderError;
use crate::util::fs::ensure_dir;

/// Name of the generated host profile, referenced from the profile list
/// through the `auto-cmake` sentinel.
pub const GENERATED_PROFILE_NAME: &str = "conan_host_profile";

/// A provider session keyed by the binary directory.
#[derive(Debug, Clone)]
pub struct Session {
    source_dir: PathBuf,
    build_dir: PathBuf,
}

impl Session {
    /// Open a session for a source/binary directory pair, creating the
    /// state directory on first use.
    pub fn new(source_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Result<Self> {
        let session = Session {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
        };
        ensure_dir(&session.state_dir())?;
        Ok(session)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Directory holding markers and other provider state.
    pub fn state_dir(&self) -> PathBuf {
        self.build_dir.join(".caravel")
    }

    /// The dependency manifest: `conanfile.py` wins over `conanfile.txt`.
    pub fn manifest_path(&self) -> Result<PathBuf, ProviderError> {
        for name in ["conanfile.py", "conanfile.txt"] {
            let candidate = self.source_dir.join(name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(ProviderError::MissingManifest {
            dir: self.source_dir.clone(),
        })
    }

    /// Marker file recording a successful install for one configuration.
    pub fn marker_path(&self, config: &str) -> PathBuf {
        self.state_dir().join(format!("installed-{}.marker", config))
    }

    /// Path of the generated host profile.
    pub fn generated_profile_path(&self) -> PathBuf {
        self.build_dir.join(GENERATED_PROFILE_NAME)
    }

    /// Conan's output folder for generated packages and CMake files.
    pub fn output_folder(&self) -> PathBuf {
        self.build_dir.join("conan")
    }
}
