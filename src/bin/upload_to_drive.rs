//! Entry point for `upload-to-drive`.
use std::process::ExitCode;

use apk_drive_upload::{
    app::{self, UploadExit},
    cli::{resolve_config_source, UploadArgs},
    config::UploaderConfig,
    lib::{console::Console, telemetry},
};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), UploadExit> {
    telemetry::init_tracing().map_err(UploadExit::from_error)?;
    let args = UploadArgs::parse();
    let source = resolve_config_source(args.config_override).map_err(UploadExit::from_error)?;
    let config = UploaderConfig::load(&source).map_err(UploadExit::from_error)?;

    let mut console = Console::stdout();
    app::run_with_google(&config, &mut console).await?;
    Ok(())
}
