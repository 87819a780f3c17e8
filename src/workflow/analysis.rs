use crate::context::AppContext;
use crate::domain::bound::{GeneratedText, bound};
use crate::domain::change::{ChangeRequestIdentity, ChangeRequestResources, ChangeSummary};
use crate::domain::requirement::RequirementRecord;
use crate::error::{FetchError, GenerateError, PipelineFailure};
use crate::prompt::{
    COMBINED_SUMMARY_WORD_LIMIT, compose_combined_prompt, compose_requirement_prompt,
};

#[derive(Debug, Clone)]
pub struct PullRequestAnalysis {
    pub identity: ChangeRequestIdentity,
    pub metadata: ChangeSummary,
    pub resources: ChangeRequestResources,
}

#[derive(Debug, Clone)]
pub struct RequirementAnalysis {
    pub requirement: RequirementRecord,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct CombinedAnalysis {
    pub requirement: RequirementRecord,
    pub identity: ChangeRequestIdentity,
    pub resources: ChangeRequestResources,
    pub metadata: ChangeSummary,
    pub summary: GeneratedText,
}

#[derive(Debug, Clone)]
pub enum PipelineResult {
    Success(CombinedAnalysis),
    Failure(PipelineFailure),
}

impl PipelineResult {
    pub fn into_result(self) -> Result<CombinedAnalysis, PipelineFailure> {
        match self {
            PipelineResult::Success(analysis) => Ok(analysis),
            PipelineResult::Failure(failure) => Err(failure),
        }
    }
}

/// Fetches a pull request and reduces it to its change summary.
pub async fn analyze_pull_request(
    ctx: &AppContext,
    identity: ChangeRequestIdentity,
) -> Result<PullRequestAnalysis, FetchError> {
    let resources = ctx.change_tracker.fetch(&identity).await?;
    let metadata = ChangeSummary::from_resources(&resources);

    Ok(PullRequestAnalysis {
        identity,
        metadata,
        resources,
    })
}

pub async fn analyze_requirement(
    ctx: &AppContext,
    requirement: RequirementRecord,
) -> Result<RequirementAnalysis, GenerateError> {
    let prompt = compose_requirement_prompt(&requirement);
    let summary = ctx.language_model.generate(&prompt).await?;

    Ok(RequirementAnalysis {
        requirement,
        summary,
    })
}

pub async fn ask(ctx: &AppContext, query: &str) -> Result<String, GenerateError> {
    ctx.language_model.generate(query).await
}

/// Fetch, summarize, compose, generate, bound. The first failing stage ends
/// the run and nothing fetched so far is returned with the failure.
pub async fn run_combined_analysis(
    ctx: &AppContext,
    requirement: RequirementRecord,
    identity: ChangeRequestIdentity,
) -> PipelineResult {
    match combined_analysis(ctx, requirement, identity).await {
        Ok(analysis) => PipelineResult::Success(analysis),
        Err(failure) => PipelineResult::Failure(failure),
    }
}

async fn combined_analysis(
    ctx: &AppContext,
    requirement: RequirementRecord,
    identity: ChangeRequestIdentity,
) -> Result<CombinedAnalysis, PipelineFailure> {
    let PullRequestAnalysis {
        identity,
        metadata,
        resources,
    } = analyze_pull_request(ctx, identity).await?;

    let prompt = compose_combined_prompt(&requirement, &metadata, &identity);
    let generated = ctx.language_model.generate(&prompt).await?;
    let summary = bound(&generated, COMBINED_SUMMARY_WORD_LIMIT);

    Ok(CombinedAnalysis {
        requirement,
        identity,
        resources,
        metadata,
        summary,
    })
}
