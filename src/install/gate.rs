//! The invocation gate: decides whether `conan install` must run.
//!
//! Staleness is a file-timestamp comparison between the dependency
//! manifest and a per-configuration marker. The gate only ever moves to
//! `Clean` through [`InvocationGate::mark_installed`], which callers invoke
//! after a successful install; a failed install therefore leaves the next
//! configure pass retrying.

use anyhow::Result;

use crate::util::fs::{modified_time, touch};

use super::session::Session;

/// Gate state for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Install artifacts are current for this configuration.
    Clean,
    /// The external tool must run before configure can proceed.
    NeedsInstall,
}

/// Per-configuration install gate backed by session marker files.
#[derive(Debug)]
pub struct InvocationGate<'a> {
    session: &'a Session,
}

impl<'a> InvocationGate<'a> {
    pub fn new(session: &'a Session) -> Self {
        InvocationGate { session }
    }

    /// Current state for a configuration.
    pub fn state(&self, config: &str) -> Result<GateState> {
        let marker = self.session.marker_path(config);
        if !marker.exists() {
            return Ok(GateState::NeedsInstall);
        }

        let manifest = self.session.manifest_path()?;
        let manifest_mtime = modified_time(&manifest)?;
        let marker_mtime = modified_time(&marker)?;

        if manifest_mtime > marker_mtime {
            Ok(GateState::NeedsInstall)
        } else {
            Ok(GateState::Clean)
        }
    }

    /// Whether the external tool must be invoked for this configuration.
    pub fn should_install(&self, config: &str) -> Result<bool> {
        Ok(self.state(config)? == GateState::NeedsInstall)
    }

    /// Record a successful install for this configuration.
    pub fn mark_installed(&self, config: &str) -> Result<()> {
        touch(&self.session.marker_path(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn session_with_manifest() -> (TempDir, Session) {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("conanfile.txt"), "[requires]\nhello/0.1\n").unwrap();
        let session = Session::new(tmp.path(), tmp.path().join("build")).unwrap();
        (tmp, session)
    }

    #[test]
    fn test_first_configure_needs_install() {
        let (_tmp, session) = session_with_manifest();
        let gate = InvocationGate::new(&session);
        assert!(gate.should_install("Release").unwrap());
    }

    #[test]
    fn test_mark_installed_transitions_to_clean() {
        let (_tmp, session) = session_with_manifest();
        let gate = InvocationGate::new(&session);

        gate.mark_installed("Release").unwrap();
        assert_eq!(gate.state("Release").unwrap(), GateState::Clean);
        assert!(!gate.should_install("Release").unwrap());
    }

    #[test]
    fn test_manifest_touch_reopens_gate() {
        let (tmp, session) = session_with_manifest();
        let gate = InvocationGate::new(&session);

        gate.mark_installed("Release").unwrap();
        assert!(!gate.should_install("Release").unwrap());

        std::thread::sleep(Duration::from_millis(20));
        touch(&tmp.path().join("conanfile.txt")).unwrap();
        assert!(gate.should_install("Release").unwrap());
    }

    #[test]
    fn test_configurations_are_independent() {
        let (_tmp, session) = session_with_manifest();
        let gate = InvocationGate::new(&session);

        gate.mark_installed("Release").unwrap();
        assert!(!gate.should_install("Release").unwrap());
        assert!(gate.should_install("Debug").unwrap());

        gate.mark_installed("Debug").unwrap();
        assert!(!gate.should_install("Debug").unwrap());
        assert!(!gate.should_install("Release").unwrap());
    }

    #[test]
    fn test_rerun_without_changes_stays_clean() {
        let (_tmp, session) = session_with_manifest();
        let gate = InvocationGate::new(&session);

        gate.mark_installed("Release").unwrap();
        // Several plain re-checks with no manifest change
        for _ in 0..3 {
            assert!(!gate.should_install("Release").unwrap());
        }
    }
}
