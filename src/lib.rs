//! Library crate root shared by `upload-to-drive` and `setup-google-drive`.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod app;
pub mod artifact;
pub mod auth;
pub mod cli;
pub mod config;
pub mod drive;
pub mod version;
