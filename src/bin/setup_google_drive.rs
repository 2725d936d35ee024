//! Entry point for `setup-google-drive`.
use std::process::ExitCode;

use apk_drive_upload::{
    app::{run_setup_guide, UploadExit},
    cli::{resolve_config_source, SetupArgs},
    config::UploaderConfig,
    lib::{browser::SystemBrowser, console::Console, telemetry},
};
use clap::Parser;

fn main() -> ExitCode {
    match bootstrap() {
        Ok(()) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<(), UploadExit> {
    telemetry::init_tracing().map_err(UploadExit::from_error)?;
    let args = SetupArgs::parse();
    let source = resolve_config_source(args.config_override).map_err(UploadExit::from_error)?;
    let config = UploaderConfig::load(&source).map_err(UploadExit::from_error)?;

    run_setup_guide(&config, &SystemBrowser, &mut Console::stdout());
    Ok(())
}
