//! Telemetry initialization and pipeline step span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs on stderr.
///
/// Stdout is reserved for operator-facing guidance.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of one pipeline step.
pub struct StepSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
    step: &'static str,
}

impl StepSpan {
    /// Start a step span within the given run.
    pub fn start(run_id: Uuid, step: &'static str) -> Self {
        let span = info_span!(
            target: "apk_drive_upload::run",
            "upload_step",
            %run_id,
            step
        );
        Self {
            span,
            started_at: Instant::now(),
            run_id,
            step,
        }
    }

    /// Close the span while recording the step status.
    pub fn finish(self, status: &'static str) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "apk_drive_upload::run",
            run_id = %self.run_id,
            step = self.step,
            status = status,
            elapsed_ms = elapsed_ms,
            "Completed upload step"
        );
    }
}
