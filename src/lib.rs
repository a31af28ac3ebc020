//! Core library for `ytool`.
//!
//! A small toolbox with three sub-tools:
//! - `env`: print an environment variable,
//! - `curl`: minimal HTTP GET/POST, optionally seeded from a saved curl command,
//! - `bom`: detect, add or remove a UTF-8 byte order mark.
//!
//! BOM edits go through [`fs_ops::rewrite_head`], which stages the new content in a
//! sibling temp file and swaps it in with a backup/rollback rename protocol, so a
//! failure never leaves the target truncated or half-written.

pub mod bom;
pub mod cli;
pub mod config;
pub mod curl;
pub mod env;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod utils;

pub use bom::{add_marker, detect, remove_marker, BOM};
pub use config::{
    default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel,
};
pub use errors::YtoolError;
pub use fs_ops::{rewrite_head, DurabilityMode, HeaderTransform, RewriteOptions, RewriteOutcome};

/// Commonly used items for quick imports.
pub mod prelude {
    pub use crate::bom::{add_marker, detect, remove_marker, BOM};
    pub use crate::config::{default_config_path, load_config, Config, LogLevel};
    pub use crate::curl::{execute, CurlInvocation, HttpSettings, Method};
    pub use crate::env::lookup as env_lookup;
    pub use crate::errors::YtoolError as Error;
    pub use crate::fs_ops::{rewrite_head, HeaderTransform, RewriteOptions};

    /// Convenience result alias for BOM and rewrite operations.
    pub type YtResult<T> = std::result::Result<T, Error>;
}
