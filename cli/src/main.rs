use anyhow::Result;
use clap::Parser;
use log::{error, info};
use rs_import::builder::{AvailabilityCheck, HeadAvailabilityCheck};
use rs_import::config::Config;
use rs_import::import::DataSetImport;
use rs_import::submit::{ConsoleReview, HttpUpdateEndpoint, ReviewGate};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rs-import")]
#[command(
    about = "Takes the contents of the specified import folders, transforms them \
             into SPARQL statements and submits these to a SPARQL endpoint"
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// The path to the configuration file.
    #[clap(long, default_value = "~/.rs-import.yml", value_name = "PATH")]
    config: String,
    /// Verbose mode - sets the RUST_LOG level to debug, defaults to info level
    #[clap(long, short, action, default_value = "false")]
    verbose: bool,
    /// Display each insert command and ask for confirmation before submitting it
    #[clap(long, action, default_value = "false")]
    review: bool,
    /// The folder(s) containing the import data.
    #[clap(required = true, value_name = "IMPORT_PATH")]
    import_folders: Vec<PathBuf>,
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn execute(cmd: &Cli) -> Result<()> {
    let config = Config::from_file(&expand_home(&cmd.config))?;
    if cmd.verbose {
        config.print();
    }
    let endpoint = HttpUpdateEndpoint::new(
        &config.sparql_endpoint,
        &config.username,
        config.password.as_deref(),
    )?;
    let console = ConsoleReview;
    let review: Option<&dyn ReviewGate> =
        (cmd.review || config.review).then_some(&console as &dyn ReviewGate);
    let head_check;
    let availability: Option<&dyn AvailabilityCheck> = if config.check_availability {
        head_check = HeadAvailabilityCheck::new()?;
        Some(&head_check)
    } else {
        None
    };

    // folders are processed strictly in sequence; the first fatal error
    // terminates the whole batch
    for folder in &cmd.import_folders {
        let import = DataSetImport::new(folder, &config)?;
        import.run(&endpoint, review, availability)?;
        info!("Finished import from {}", import.path().display());
    }
    Ok(())
}

/// Exit status mapping: 0 on success, 1 on any reported failure, 3 when the
/// run died of a panic.
fn exit_status<F>(f: F) -> u8
where
    F: FnOnce() -> Result<()>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error!("{:#}", e);
            1
        }
        Err(_) => {
            error!("the import was aborted by an unexpected internal error");
            3
        }
    }
}

fn main() -> ExitCode {
    let cmd = Cli::parse();

    let log_level = if cmd.verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    ExitCode::from(exit_status(|| execute(&cmd)))
}
