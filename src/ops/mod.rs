//! High-level operations driven by the CLI.

pub mod provide;

pub use provide::{provide, ProvideOptions, ProvideSummary};
