use clap::Parser;
mod app;
mod commands;
use commands::cli;
use regcheck_core::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match dispatch(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(target: "regcheck.cli", error = %e, "command failed");
            eprintln!("regcheck: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn dispatch(args: cli::Args) -> Result<i32, error::CliError> {
    let loaded = app::load(args.config.as_deref())?;
    match args.command {
        cli::Commands::List(select) => commands::list::list(&loaded, select),
        cli::Commands::Show(show) => commands::list::show(&loaded, show),
        cli::Commands::Run(run_args) => commands::run::run(loaded, run_args).await,
        cli::Commands::Check(check_args) => commands::check::check(&loaded, check_args),
    }
}
