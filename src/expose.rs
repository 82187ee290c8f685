//! The target exposer: make freshly installed packages visible to
//! `find_package`.
//!
//! After a successful install the generator output folder is appended to
//! the package search path. Entries a consuming project already set are
//! never removed or reordered; new entries only ever go at the end.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::util::fs::write_string;

/// An ordered package-search-path list with set semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    entries: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new() -> Self {
        SearchPaths::default()
    }

    /// Start from the entries the consuming project already configured.
    pub fn from_existing(entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        let mut paths = SearchPaths::new();
        for entry in entries {
            paths.append_unique(entry.into());
        }
        paths
    }

    /// Append a path unless it is already present. Returns whether the
    /// list changed.
    pub fn append_unique(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.entries.contains(&path) {
            false
        } else {
            self.entries.push(path);
            true
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find the directories under the output folder that hold CMake package
/// files (`<pkg>-config.cmake`, `<Pkg>Config.cmake`, or `Find<Pkg>.cmake`).
pub fn discover_package_dirs(output_folder: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(output_folder)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        let is_package_file = name.ends_with("-config.cmake")
            || name.ends_with("Config.cmake")
            || (name.starts_with("Find") && name.ends_with(".cmake"));
        if !is_package_file {
            continue;
        }
        if let Some(parent) = entry.path().parent() {
            let parent = parent.to_path_buf();
            if !dirs.contains(&parent) {
                dirs.push(parent);
            }
        }
    }

    dirs.sort();
    dirs
}

/// Render the CMake snippet the shim includes after a successful install.
///
/// Uses `list(APPEND ...)` so paths the project set before the provider ran
/// stay first in lookup order.
pub fn render_snippet(new_entries: &[PathBuf]) -> String {
    let mut out = String::from("# Generated by caravel. Do not edit.\n");
    for entry in new_entries {
        let path = entry.display().to_string().replace('\\', "/");
        out.push_str(&format!("list(APPEND CMAKE_PREFIX_PATH \"{}\")\n", path));
        out.push_str(&format!("list(APPEND CMAKE_MODULE_PATH \"{}\")\n", path));
    }
    out
}

/// Write the snippet to disk.
pub fn write_snippet(path: &Path, new_entries: &[PathBuf]) -> Result<()> {
    write_string(path, &render_snippet(new_entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preserves_existing_entries() {
        let mut paths = SearchPaths::from_existing(["/opt/mylibs", "/usr/local"]);
        paths.append_unique("/build/conan");

        assert_eq!(
            paths.entries(),
            &[
                PathBuf::from("/opt/mylibs"),
                PathBuf::from("/usr/local"),
                PathBuf::from("/build/conan"),
            ]
        );
    }

    #[test]
    fn test_append_is_idempotent() {
        let mut paths = SearchPaths::from_existing(["/opt/mylibs"]);
        assert!(paths.append_unique("/build/conan"));
        assert!(!paths.append_unique("/build/conan"));
        assert_eq!(paths.entries().len(), 2);
    }

    #[test]
    fn test_discover_package_dirs() {
        let tmp = TempDir::new().unwrap();
        let generators = tmp.path().join("build").join("Release").join("generators");
        std::fs::create_dir_all(&generators).unwrap();
        std::fs::write(generators.join("hello-config.cmake"), "").unwrap();
        std::fs::write(generators.join("hello-targets.cmake"), "").unwrap();
        std::fs::write(generators.join("FindBye.cmake"), "").unwrap();

        let other = tmp.path().join("unrelated");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("notes.txt"), "").unwrap();

        let dirs = discover_package_dirs(tmp.path());
        assert_eq!(dirs, vec![generators]);
    }

    #[test]
    fn test_snippet_appends_only() {
        let snippet = render_snippet(&[PathBuf::from("/build/conan/generators")]);
        assert!(snippet.contains("list(APPEND CMAKE_PREFIX_PATH \"/build/conan/generators\")"));
        assert!(snippet.contains("list(APPEND CMAKE_MODULE_PATH \"/build/conan/generators\")"));
        assert!(!snippet.contains("set(CMAKE_PREFIX_PATH"));
    }
}
