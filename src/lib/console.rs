//! Operator-facing output on stdout.

use std::{
    fmt::Display,
    io::{self, Stdout, Write},
};

/// Line-oriented writer for progress, instructions and results.
///
/// Write failures (e.g. a closed pipe) are ignored; they never abort a run.
pub struct Console<W: Write> {
    out: W,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, message: impl Display) {
        let _ = writeln!(self.out, "{message}");
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn rule(&mut self) {
        self.line("=".repeat(50));
    }
}

impl Console<Vec<u8>> {
    /// In-memory console, used by tests.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}
