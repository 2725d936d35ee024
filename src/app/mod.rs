//! Workflows driven by the two binaries.

mod exit;
pub mod setup;
pub mod upload;

pub use exit::UploadExit;
pub use setup::{run_setup_guide, SetupReport};
pub use upload::{run, run_with_google, upload_artifact, UploadDeps, UploadReceipt};
