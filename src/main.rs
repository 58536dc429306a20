// SPDX-License-Identifier: Apache-2.0
//! `gmh-demo` — the classic GMH vendor walkthrough as a console program.
//!
//! Loads the vendor library, runs the fixed open → version → read → decode →
//! close sequence under the best-effort policy, and waits for a keypress so
//! the console stays readable when launched from a file manager.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gmh3x::library::{GmhLibrary, default_library_path};
use gmh3x::report::run_best_effort;

/// Read a GMH handheld instrument through the vendor GMH3x32E library.
#[derive(Parser)]
#[command(name = "gmh-demo", version, about, long_about = None)]
struct Cli {
    /// Path to the vendor library (GMH3x32E.dll / libGMH3x32E.so)
    #[arg(short, long, env = "GMH_PATH", default_value_os_t = default_library_path().to_path_buf())]
    library: PathBuf,

    /// COM port the 3100N adapter cable is attached to
    #[arg(short, long, default_value_t = 1)]
    port: i16,

    /// Measurement channel to read
    #[arg(short, long, default_value_t = 1)]
    channel: i16,

    /// Exit immediately instead of waiting for a keypress
    #[arg(long)]
    no_pause: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            // The library-not-found path is the one fatal branch; everything
            // past a successful load is best-effort and still exits 0.
            ExitCode::FAILURE
        }
    };

    if !cli.no_pause {
        print!("\npress enter to close");
        let _ = io::stdout().flush();
        let _ = io::stdin().lock().read_line(&mut String::new());
    }

    code
}

fn run(cli: &Cli) -> Result<(), gmh3x::GmhError> {
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "loading: {}", cli.library.display())?;

    let mut library = GmhLibrary::load(&cli.library).inspect_err(|_| {
        eprintln!(
            "could not load the GMH library — is '{}' present? \
             Pass --library or set GMH_PATH to its location.",
            cli.library.display()
        );
    })?;

    run_best_effort(&mut library, cli.port, cli.channel, &mut stdout)?;

    Ok(())
}
