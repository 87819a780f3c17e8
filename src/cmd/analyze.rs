use clap::Args;
use serde::Serialize;
use tracing::{error, info};

use crate::context::AppContext;
use crate::domain::change::ChangeRequestIdentity;
use crate::domain::requirement::RequirementRecord;
use crate::error::{AppError, AppResult};
use crate::server::responses::{CombinedReport, PullRequestReport, RequirementReport};
use crate::workflow::analysis;

#[derive(Args, Debug, Clone)]
pub struct PullRequestArgs {
    /// Repository owner or organization.
    #[arg(long)]
    pub owner: String,
    /// Repository name.
    #[arg(long)]
    pub repo: String,
    /// Pull request number.
    #[arg(short, long)]
    pub number: u64,
}

#[derive(Args, Debug, Clone)]
pub struct RequirementArgs {
    /// Requirement title.
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub acceptance_criteria: Option<String>,
}

impl RequirementArgs {
    fn into_record(self) -> AppResult<RequirementRecord> {
        RequirementRecord::new(&self.title, self.description, self.acceptance_criteria)
    }
}

#[derive(Args, Debug, Clone)]
pub struct CombinedArgs {
    #[command(flatten)]
    pub pull_request: PullRequestArgs,
    #[command(flatten)]
    pub requirement: RequirementArgs,
}

pub async fn run_combined(ctx: &AppContext, args: CombinedArgs) -> AppResult<()> {
    let requirement = args.requirement.into_record()?;
    let identity = identity(&args.pull_request)?;

    info!(change = %identity, "running combined analysis");
    let result = analysis::run_combined_analysis(ctx, requirement, identity)
        .await
        .into_result()
        .inspect_err(|failure| error!(stage = %failure.stage, "combined analysis failed"))?;
    print_json(&CombinedReport::from(result))
}

pub async fn run_pull_request(ctx: &AppContext, args: PullRequestArgs) -> AppResult<()> {
    let identity = identity(&args)?;
    info!(change = %identity, "fetching pull request");
    let report = analysis::analyze_pull_request(ctx, identity).await?;
    print_json(&PullRequestReport::from(report))
}

pub async fn run_requirement(ctx: &AppContext, args: RequirementArgs) -> AppResult<()> {
    let requirement = args.into_record()?;
    let report = analysis::analyze_requirement(ctx, requirement).await?;
    print_json(&RequirementReport::from(report))
}

pub async fn run_ask(ctx: &AppContext, query: &str) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    let reply = analysis::ask(ctx, query).await?;
    println!("{reply}");
    Ok(())
}

fn identity(args: &PullRequestArgs) -> AppResult<ChangeRequestIdentity> {
    ChangeRequestIdentity::new(&args.owner, &args.repo, args.number)
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
