use std::process::ExitCode;

use anyhow::Error;

/// Carries a failure to `main` together with its exit code.
#[derive(Debug)]
pub struct UploadExit {
    message: Option<String>,
    exit_code: ExitCode,
}

impl UploadExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: Some(format!("{err:?}")),
            exit_code: ExitCode::FAILURE,
        }
    }

    /// The operator has already been told what went wrong on stdout.
    pub fn already_reported() -> Self {
        Self {
            message: None,
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        if let Some(message) = self.message {
            eprintln!("{message}");
        }
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
