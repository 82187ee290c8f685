//! The Conan profile model.
//!
//! A [`Profile`] is the transient entity built fresh on every configure
//! pass: an ordered mapping from setting keys to values plus auxiliary
//! sections for options, conf entries, environment variables, and tool
//! requirements. Once rendered to disk it is owned by the external tool.

use std::collections::BTreeMap;

use crate::error::ProviderError;

mod keys;

pub use keys::{Arch, CompilerFamily, Libcxx, MsvcRuntime, OsFamily, RuntimeType, SettingKey};

/// A profile fragment, composed from detection and user overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    includes: Vec<String>,
    settings: BTreeMap<SettingKey, String>,
    options: BTreeMap<String, String>,
    conf: BTreeMap<String, String>,
    buildenv: BTreeMap<String, String>,
    runenv: BTreeMap<String, String>,
    tool_requires: Vec<String>,
}

impl Profile {
    pub fn new() -> Self {
        Profile::default()
    }

    /// Set a `[settings]` value. Replaces any previous value for the key,
    /// so a key can never appear twice in the rendered profile.
    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) -> &mut Self {
        self.settings.insert(key, value.into());
        self
    }

    /// Set a `[settings]` value from untrusted `key=value` input.
    pub fn try_set(&mut self, raw: &str) -> Result<&mut Self, ProviderError> {
        let (key, value) = parse_key_value(raw)?;
        let key: SettingKey = key.parse()?;
        Ok(self.set(key, value))
    }

    /// Look up a `[settings]` value.
    pub fn setting(&self, key: SettingKey) -> Option<&str> {
        self.settings.get(&key).map(String::as_str)
    }

    /// Set an `[options]` value.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set a `[conf]` value.
    pub fn set_conf(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.conf.insert(key.into(), value.into());
        self
    }

    /// Look up a `[conf]` value.
    pub fn conf(&self, key: &str) -> Option<&str> {
        self.conf.get(key).map(String::as_str)
    }

    /// Set a `[buildenv]` variable.
    pub fn set_buildenv(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.buildenv.insert(key.into(), value.into());
        self
    }

    /// Set a `[runenv]` variable.
    pub fn set_runenv(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.runenv.insert(key.into(), value.into());
        self
    }

    /// Add a `[tool_requires]` reference.
    pub fn add_tool_require(&mut self, reference: impl Into<String>) -> &mut Self {
        let reference = reference.into();
        if !self.tool_requires.contains(&reference) {
            self.tool_requires.push(reference);
        }
        self
    }

    /// Add an `include(<name>)` directive, rendered before all sections.
    pub fn add_include(&mut self, name: impl Into<String>) -> &mut Self {
        self.includes.push(name.into());
        self
    }

    /// Whether the profile carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
            && self.settings.is_empty()
            && self.options.is_empty()
            && self.conf.is_empty()
            && self.buildenv.is_empty()
            && self.runenv.is_empty()
            && self.tool_requires.is_empty()
    }

    /// Merge `other` into `self`; values from `other` win on key clashes.
    ///
    /// This is the override path: an explicit `compiler.libcxx` replaces the
    /// auto-detected one and the rendered profile holds exactly one
    /// occurrence of the key.
    pub fn merge(&mut self, other: &Profile) {
        for include in &other.includes {
            self.includes.push(include.clone());
        }
        for (key, value) in &other.settings {
            self.settings.insert(*key, value.clone());
        }
        for (key, value) in &other.options {
            self.options.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.conf {
            self.conf.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.buildenv {
            self.buildenv.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.runenv {
            self.runenv.insert(key.clone(), value.clone());
        }
        for reference in &other.tool_requires {
            self.add_tool_require(reference.clone());
        }
    }

    /// Render the profile in Conan's INI-like format.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for include in &self.includes {
            out.push_str(&format!("include({})\n", include));
        }
        if !self.includes.is_empty() {
            out.push('\n');
        }

        out.push_str("[settings]\n");
        for (key, value) in &self.settings {
            out.push_str(&format!("{}={}\n", key, value));
        }

        render_section(&mut out, "options", &self.options);
        render_section(&mut out, "conf", &self.conf);

        if !self.tool_requires.is_empty() {
            out.push_str("\n[tool_requires]\n");
            for reference in &self.tool_requires {
                out.push_str(reference);
                out.push('\n');
            }
        }

        render_section(&mut out, "buildenv", &self.buildenv);
        render_section(&mut out, "runenv", &self.runenv);

        out
    }
}

fn render_section(out: &mut String, name: &str, entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("\n[{}]\n", name));
    for (key, value) in entries {
        out.push_str(&format!("{}={}\n", key, value));
    }
}

/// Split a `key=value` override, rejecting malformed input.
pub fn parse_key_value(raw: &str) -> Result<(&str, &str), ProviderError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ProviderError::MalformedOverride {
            raw: raw.to_string(),
        }),
    }
}
