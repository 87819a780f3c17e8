//! HTTP handlers. Each one validates its body, runs a workflow and logs the
//! outcome; the workflows themselves stay silent.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::change::ChangeRequestIdentity;
use crate::domain::requirement::RequirementRecord;
use crate::prompt::PROMPT_VERSION;
use crate::server::error::{ApiError, ApiJson, ApiResult};
use crate::server::responses::{
    CombinedReport, HealthReport, PullRequestReport, QueryReply, RequirementReport,
};
use crate::workflow::analysis::{self, PipelineResult};

#[derive(Debug, Deserialize)]
pub struct AskQueryRequest {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRequest {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub pr_number: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub acceptance_criteria: Option<String>,
}

impl RequirementRequest {
    fn into_record(self) -> ApiResult<RequirementRecord> {
        let title = self.title.unwrap_or_default();
        Ok(RequirementRecord::new(
            &title,
            self.description,
            self.acceptance_criteria,
        )?)
    }
}

/// Accepts both the generic field names and the original Jira/GitHub ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRequest {
    #[serde(alias = "jiraRequirements")]
    pub requirement: Option<RequirementRequest>,
    #[serde(alias = "githubOwner")]
    pub owner: Option<String>,
    #[serde(alias = "githubRepo")]
    pub repository: Option<String>,
    #[serde(alias = "githubPRNumber")]
    pub change_number: Option<u64>,
}

/// GET /health - one round trip to the language model
pub async fn health(State(ctx): State<AppContext>) -> Response {
    match analysis::ask(&ctx, "Hello").await {
        Ok(_) => Json(HealthReport {
            status: "healthy",
            model: Some(ctx.language_model.model_name().to_string()),
            error: None,
        })
        .into_response(),
        Err(err) => {
            warn!("health check failed: {err}");
            let report = HealthReport {
                status: "unhealthy",
                model: None,
                error: Some(err.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(report)).into_response()
        }
    }
}

/// POST /api/ask-query
pub async fn ask_query(
    State(ctx): State<AppContext>,
    ApiJson(body): ApiJson<AskQueryRequest>,
) -> ApiResult<Json<QueryReply>> {
    let query = body
        .query
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: query"))?;

    let reply = analysis::ask(&ctx, &query).await.map_err(|err| {
        error!("query failed: {err}");
        ApiError::from(err)
    })?;
    Ok(Json(QueryReply { reply }))
}

/// POST /api/analyze-github-pr
pub async fn analyze_github_pr(
    State(ctx): State<AppContext>,
    ApiJson(body): ApiJson<PullRequestRequest>,
) -> ApiResult<Json<PullRequestReport>> {
    let (Some(owner), Some(repo), Some(number)) = (body.owner, body.repo, body.pr_number) else {
        return Err(ApiError::bad_request(
            "Missing required parameters: owner, repo, prNumber",
        ));
    };
    let identity = ChangeRequestIdentity::new(&owner, &repo, number)?;

    info!(change = %identity, "fetching pull request");
    let report = analysis::analyze_pull_request(&ctx, identity)
        .await
        .map_err(|err| {
            error!("pull request analysis failed: {err}");
            ApiError::from(err)
        })?;
    Ok(Json(report.into()))
}

/// POST /api/analyze-jira-requirements
pub async fn analyze_jira_requirements(
    State(ctx): State<AppContext>,
    ApiJson(body): ApiJson<RequirementRequest>,
) -> ApiResult<Json<RequirementReport>> {
    if body.title.is_none() {
        return Err(ApiError::bad_request("Missing required parameter: title"));
    }
    let requirement = body.into_record()?;

    info!(title = %requirement.title, "summarizing requirement");
    let report = analysis::analyze_requirement(&ctx, requirement)
        .await
        .map_err(|err| {
            error!("requirement summary failed: {err}");
            ApiError::internal("Error analyzing Jira requirements", err.to_string())
        })?;
    Ok(Json(report.into()))
}

/// POST /api/analyze-combined
pub async fn analyze_combined(
    State(ctx): State<AppContext>,
    ApiJson(body): ApiJson<CombinedRequest>,
) -> ApiResult<Json<CombinedReport>> {
    let (Some(requirement), Some(owner), Some(repository), Some(number)) = (
        body.requirement,
        body.owner,
        body.repository,
        body.change_number,
    ) else {
        return Err(ApiError::bad_request(
            "Missing required parameters: requirement (with title), owner, repository, changeNumber",
        ));
    };
    let requirement = requirement.into_record()?;
    let identity = ChangeRequestIdentity::new(&owner, &repository, number)?;

    info!(change = %identity, prompt_version = PROMPT_VERSION, "running combined analysis");
    match analysis::run_combined_analysis(&ctx, requirement, identity).await {
        PipelineResult::Success(result) => {
            if result.summary.truncated {
                info!(change = %result.identity, "combined summary truncated");
            }
            Ok(Json(result.into()))
        }
        PipelineResult::Failure(failure) => {
            error!(stage = %failure.stage, "combined analysis failed: {}", failure.message);
            Err(ApiError::from_pipeline(
                "Error creating combined analysis",
                failure,
            ))
        }
    }
}
