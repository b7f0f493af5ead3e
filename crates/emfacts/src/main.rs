mod cli;
mod commands;
mod config;
mod error;
mod module_args;
mod output;
mod reporter;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::module_args::ModuleArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Module arguments are read up front: their `debug` switch raises the
    // log level before anything else runs.
    let module_args = match cli.command {
        Command::Gather(ref args) => args
            .args_file
            .as_deref()
            .map(ModuleArgs::from_file)
            .transpose(),
        _ => Ok(None),
    };
    let debug = matches!(module_args, Ok(Some(ModuleArgs { debug: true, .. })));
    init_tracing(cli.global.verbose, debug);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, module_args).await {
        let code = err.exit_code();
        if !err.is_reported() {
            eprintln!("{:?}", miette::Report::new(err));
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, debug: bool) {
    let filter = match (verbosity, debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    };

    // stdout belongs to the module protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, module_args: Result<Option<ModuleArgs>, CliError>) -> Result<(), CliError> {
    match cli.command {
        Command::Gather(ref args) => commands::gather::handle(args, &cli.global, module_args).await,

        // Local commands don't need a controller connection
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),
        Command::Group(ref args) => commands::group::handle(args, &cli.global),

        Command::Completions(ref args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "emfacts", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global).await
        }
    }
}
