use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Build, run and check benchmark regression tests")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./regcheck.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the known tests.
    List(SelectArgs),
    /// Print one test's definition, checks and performance functions.
    Show(ShowArgs),
    /// Build and run the selected tests.
    Run(RunArgs),
    /// Evaluate a test against output captured earlier.
    Check(CheckArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Only tests with this exact name. Can be specified multiple times.
    #[arg(long = "name", short = 'n', action = clap::ArgAction::Append)]
    pub names: Vec<String>,

    /// Only tests carrying every given tag. Can be specified multiple times.
    #[arg(long = "tag", short = 't', action = clap::ArgAction::Append)]
    pub tags: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long)]
    pub name: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TargetArgs {
    /// Current system, e.g. `daint:gpu` (overrides harness.system).
    #[arg(long)]
    pub system: Option<String>,

    /// Current programming environment (overrides harness.environ).
    #[arg(long)]
    pub environ: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Base directory for test sources (overrides harness.workdir).
    #[arg(long)]
    pub workdir: Option<String>,

    /// Write lifecycle events as JSON lines to this path (`stdout:` for stdout).
    #[arg(long)]
    pub events: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub name: String,

    /// File holding the program's standard output.
    #[arg(long)]
    pub stdout: PathBuf,

    /// File holding the program's standard error.
    #[arg(long)]
    pub stderr: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_repeated_filters() {
        let args = Args::parse_from([
            "regcheck", "run", "--name", "a", "--name", "b", "--tag", "julia", "--system",
            "daint:gpu", "--format", "json",
        ]);
        let Commands::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.select.names, vec!["a", "b"]);
        assert_eq!(run.select.tags, vec!["julia"]);
        assert_eq!(run.target.system.as_deref(), Some("daint:gpu"));
        assert_eq!(run.target.format, OutputFormat::Json);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = Args::parse_from(["regcheck", "list", "--config", "x.toml", "-v"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn check_requires_stdout_file() {
        assert!(Args::try_parse_from(["regcheck", "check", "--name", "saxpy_test"]).is_err());
    }
}
