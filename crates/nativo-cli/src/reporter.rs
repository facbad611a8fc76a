use colored::Colorize;
use std::io::{self, Write};
use std::time::Duration;

use crate::driver::DriverError;

const MARKER: &str = "[+]";

/// Progress and report lines for one run.
pub struct Reporter<W: Write> {
    out: W,
    quiet: bool,
    color: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, quiet: bool, color: bool) -> Self {
        Reporter { out, quiet, color }
    }

    pub fn processing(&mut self, types: usize) -> io::Result<()> {
        self.line(&format!("processing roughly {types} types..."))
    }

    pub fn compiled(&mut self, elapsed: Duration) -> io::Result<()> {
        self.line(&format!("compilation took {} ms!", elapsed.as_millis()))
    }

    pub fn written(&mut self, source_chars: usize, header_chars: usize) -> io::Result<()> {
        self.line(&format!("written {source_chars} source characters!"))?;
        self.line(&format!("written {header_chars} header characters!"))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.color {
            writeln!(self.out, "{} {text}", MARKER.green().bold())
        } else {
            writeln!(self.out, "{MARKER} {text}")
        }
    }
}

/// One-line rendering of a failed run for stderr.
pub fn format_error(err: &DriverError, color: bool) -> String {
    let label = if color {
        "error".red().bold().to_string()
    } else {
        "error".to_string()
    };
    match err {
        DriverError::Translate(err) if color => {
            format!("{label}: {}: {}", err.location.to_string().bold(), err.kind)
        }
        other => format!("{label}: {other}"),
    }
}
