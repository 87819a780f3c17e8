mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod prompt;
mod server;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use clap::{Parser, Subcommand};

use crate::cmd::analyze::{self, CombinedArgs, PullRequestArgs, RequirementArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::serve::{self, ServeArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "prlens",
    author,
    version,
    about = "Checks pull requests against their requirements with a language model"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the analysis API over HTTP.
    Serve(ServeArgs),
    /// Analyze a pull request against a requirement.
    Analyze(CombinedArgs),
    /// Fetch a pull request and print its change summary.
    Pr(PullRequestArgs),
    /// Summarize a requirement.
    Requirement(RequirementArgs),
    /// Send a free-form query to the language model.
    Ask {
        query: String,
    },
    /// Inspect configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // A missing .env file is normal in deployed environments. Load it before
    // logging so a RUST_LOG set there takes effect.
    let _ = dotenv::dotenv();
    logging::init(cli.verbose, cli.log_json);
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Config(args) => config_cmd::run(&config, args.command),
        command => run_with_context(AppContext::from_config(config)?, command).await,
    }
}

async fn run_with_context(context: AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Serve(args) => serve::run(context, args).await,
        Commands::Analyze(args) => analyze::run_combined(&context, args).await,
        Commands::Pr(args) => analyze::run_pull_request(&context, args).await,
        Commands::Requirement(args) => analyze::run_requirement(&context, args).await,
        Commands::Ask { query } => analyze::run_ask(&context, &query).await,
        Commands::Config(args) => config_cmd::run(&context.config, args.command),
    }
}
