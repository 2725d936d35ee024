//! CLI entrypoint module structure.

pub mod args;
pub mod profile;

pub use args::{SetupArgs, UploadArgs};
pub use profile::{resolve_config_source, select_config_source};
