#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use nativo_cli::args::CliArgs;
use nativo_cli::driver::{self, EXIT_SUCCESS, EXIT_USAGE};
use nativo_cli::reporter::{Reporter, format_error};

fn main() -> ExitCode {
    // Zero cost unless NATIVO_LOG or RUST_LOG is set.
    nativo_cli::tracing_config::init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version also arrive here.
            let code = if err.use_stderr() {
                EXIT_USAGE
            } else {
                EXIT_SUCCESS
            };
            if let Err(print_err) = err.print() {
                eprintln!("{print_err}");
            }
            return ExitCode::from(code);
        }
    };

    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    let mut reporter = Reporter::new(std::io::stdout().lock(), args.quiet, color);
    match driver::run(&args, &mut reporter) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("{}", format_error(&err, color));
            ExitCode::from(err.exit_code())
        }
    }
}
