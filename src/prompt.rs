//! Prompt templates sent to the language model.
//!
//! The wording is the contract with the model: rewording changes its output,
//! so bump [`PROMPT_VERSION`] with any template edit.

use crate::domain::change::{ChangeRequestIdentity, ChangeSummary};
use crate::domain::requirement::RequirementRecord;

pub const PROMPT_VERSION: &str = "2";

/// Word ceiling requested from the model and enforced on its answer.
pub const COMBINED_SUMMARY_WORD_LIMIT: usize = 250;

const REQUIREMENT_SUMMARY_WORD_LIMIT: usize = 100;
const NO_DESCRIPTION: &str = "No description provided";
const NO_ACCEPTANCE_CRITERIA: &str = "No acceptance criteria provided";

pub fn compose_requirement_prompt(requirement: &RequirementRecord) -> String {
    format!(
        "Create a concise summary of this requirement (max {limit} words):\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         Acceptance Criteria: {criteria}\n\
         \n\
         Provide:\n\
         1. Brief summary of the requirement\n\
         2. Key deliverables\n\
         3. Success criteria\n",
        limit = REQUIREMENT_SUMMARY_WORD_LIMIT,
        title = requirement.title,
        description = requirement.description().unwrap_or(NO_DESCRIPTION),
        criteria = requirement
            .acceptance_criteria()
            .unwrap_or(NO_ACCEPTANCE_CRITERIA),
    )
}

pub fn compose_combined_prompt(
    requirement: &RequirementRecord,
    summary: &ChangeSummary,
    identity: &ChangeRequestIdentity,
) -> String {
    format!(
        "Create a concise analysis connecting the requirement with the pull request. \
         STRICTLY limit the answer to {limit} words maximum.\n\
         \n\
         REQUIREMENT:\n\
         Title: {req_title}\n\
         Description: {description}\n\
         Acceptance Criteria: {criteria}\n\
         \n\
         PULL REQUEST:\n\
         Repository: {repository}\n\
         PR Number: {number}\n\
         Title: {pr_title}\n\
         Author: {author}\n\
         State: {state}\n\
         Files Changed: {files}\n\
         Changes: +{additions} -{deletions}\n\
         \n\
         Provide a brief analysis (max {limit} words) covering:\n\
         1. Implementation alignment with the requirement\n\
         2. Key gaps or missing elements\n\
         3. Risk level\n\
         4. Recommendation: exactly one of approve, reject, needs-changes\n\
         5. One summary line for every file changed in the pull request\n\
         \n\
         Be concise and direct.\n",
        limit = COMBINED_SUMMARY_WORD_LIMIT,
        req_title = requirement.title,
        description = requirement.description().unwrap_or(NO_DESCRIPTION),
        criteria = requirement
            .acceptance_criteria()
            .unwrap_or(NO_ACCEPTANCE_CRITERIA),
        repository = identity.repository_slug(),
        number = identity.number(),
        pr_title = summary.title,
        author = summary.author,
        state = summary.state,
        files = summary.files_changed,
        additions = summary.additions,
        deletions = summary.deletions,
    )
}
