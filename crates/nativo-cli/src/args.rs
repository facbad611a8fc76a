use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use nativo_emitter::TranslateOptions;

/// CLI arguments for the nativo binary.
#[derive(Parser, Debug)]
#[command(
    name = "nativo",
    version,
    about = "Translate a compiled assembly into C++ declarations and definitions"
)]
pub struct CliArgs {
    /// Metadata dump of the assembly to translate.
    #[arg(value_name = "ASSEMBLY")]
    pub assembly: PathBuf,

    /// Worker threads for the body pass (default: one per core).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Evaluate side-effecting `dup` operands once, through a temporary.
    #[arg(long = "materialize-dup")]
    pub materialize_dup: bool,

    /// Suppress progress and report lines.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Color diagnostics (default: when stderr is a terminal).
    #[arg(long, value_name = "BOOL")]
    pub pretty: Option<bool>,
}

impl CliArgs {
    pub fn translate_options(&self) -> TranslateOptions {
        let options = TranslateOptions::default().with_materialize_dup(self.materialize_dup);
        match self.jobs {
            Some(jobs) => options.with_jobs(jobs.get()),
            None => options,
        }
    }
}
