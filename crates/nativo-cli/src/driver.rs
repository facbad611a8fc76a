//! Read → translate → write.
//!
//! Outputs are only written once translation has succeeded, so a failing
//! run leaves no artifacts behind. Both artifacts are staged in sibling
//! temporary files and renamed into place together; a failed write never
//! leaves one without the other.

use anyhow::{Context, anyhow};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use nativo_common::TranslateError;
use nativo_emitter::translate;
use nativo_metadata::read_assembly;

use crate::args::CliArgs;
use crate::reporter::Reporter;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_USAGE: u8 = 1;
pub const EXIT_TRANSLATION: u8 = 2;
pub const EXIT_OUTPUT: u8 = 3;

const HEADER_EXTENSION: &str = "hpp";
const SOURCE_EXTENSION: &str = "cpp";

/// Why a run failed. Each variant maps to its own exit status.
#[derive(Debug)]
pub enum DriverError {
    Usage(anyhow::Error),
    Read(anyhow::Error),
    Translate(TranslateError),
    Output(anyhow::Error),
}

impl DriverError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Usage(_) => EXIT_USAGE,
            DriverError::Read(_) | DriverError::Translate(_) => EXIT_TRANSLATION,
            DriverError::Output(_) => EXIT_OUTPUT,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Usage(err) | DriverError::Read(err) | DriverError::Output(err) => {
                write!(f, "{err:#}")
            }
            DriverError::Translate(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DriverError {}

/// Paths of the two artifacts for `assembly`: same directory and base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub header: PathBuf,
    pub source: PathBuf,
}

impl OutputPaths {
    pub fn for_assembly(assembly: &Path) -> Self {
        Self {
            header: assembly.with_extension(HEADER_EXTENSION),
            source: assembly.with_extension(SOURCE_EXTENSION),
        }
    }

    /// File name the definitions artifact includes.
    fn header_include(&self) -> String {
        self.header
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outputs: OutputPaths,
    pub type_count: usize,
    pub header_chars: usize,
    pub source_chars: usize,
    pub elapsed: Duration,
}

pub fn run<W: Write>(
    args: &CliArgs,
    reporter: &mut Reporter<W>,
) -> Result<RunSummary, DriverError> {
    let assembly = args.assembly.as_path();
    if !assembly.is_file() {
        return Err(DriverError::Usage(anyhow!(
            "assembly '{}' does not exist or is not a file",
            assembly.display()
        )));
    }

    let graph = read_assembly(assembly)
        .with_context(|| format!("failed to read assembly '{}'", assembly.display()))
        .map_err(DriverError::Read)?;
    reporter
        .processing(graph.types().len())
        .map_err(report_failure)?;

    let outputs = OutputPaths::for_assembly(assembly);
    let options = args.translate_options();
    debug!(?options, "translation options");

    let start = Instant::now();
    let translation =
        translate(&graph, &outputs.header_include(), &options).map_err(DriverError::Translate)?;
    let elapsed = start.elapsed();
    reporter.compiled(elapsed).map_err(report_failure)?;

    write_artifacts(&outputs, &translation.header, &translation.source)?;

    let summary = RunSummary {
        type_count: translation.type_count,
        header_chars: translation.header.chars().count(),
        source_chars: translation.source.chars().count(),
        elapsed,
        outputs,
    };
    reporter
        .written(summary.source_chars, summary.header_chars)
        .map_err(report_failure)?;
    info!(
        header = %summary.outputs.header.display(),
        source = %summary.outputs.source.display(),
        "wrote artifacts"
    );
    Ok(summary)
}

fn write_artifacts(outputs: &OutputPaths, header: &str, source: &str) -> Result<(), DriverError> {
    let staged_header = stage(&outputs.header, header)?;
    let staged_source = stage(&outputs.source, source)?;

    persist(staged_header, &outputs.header)?;
    if let Err(err) = persist(staged_source, &outputs.source) {
        if let Err(remove_err) = std::fs::remove_file(&outputs.header) {
            warn!(path = %outputs.header.display(), %remove_err, "cannot remove header");
        }
        return Err(err);
    }
    Ok(())
}

/// Write `contents` to a temporary file in the directory of `path`.
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, DriverError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            Ok(file)
        })
        .with_context(|| format!("failed to write '{}'", path.display()))
        .map_err(DriverError::Output)
}

fn persist(staged: NamedTempFile, path: &Path) -> Result<(), DriverError> {
    staged
        .persist(path)
        .map(drop)
        .with_context(|| format!("failed to write '{}'", path.display()))
        .map_err(DriverError::Output)
}

fn report_failure(err: std::io::Error) -> DriverError {
    DriverError::Output(anyhow::Error::new(err).context("failed to write progress report"))
}
