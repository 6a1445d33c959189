//! gswitch CLI entry point.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::info;

use gswitch::output::{print_error, print_success, switched_message};
use gswitch::{Args, Outcome, RunOptions, Switcher, SystemRunner};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = init_tracing(&args.log_level) {
        print_error(&e.to_string());
        return ExitCode::FAILURE;
    }

    let options = RunOptions::from_args(args);
    let runner = SystemRunner;
    let mut switcher = Switcher::new(&runner, &options);

    match switcher.run() {
        Ok(Outcome::Switched { project, cluster }) => {
            info!("kubectl now targets {} ({})", cluster.name, cluster.zone);
            print_success(&switched_message(project.as_deref()));
            ExitCode::SUCCESS
        }
        Ok(Outcome::KubectlMissing) | Ok(Outcome::NoClusters { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing subscriber on stderr.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    Ok(())
}
