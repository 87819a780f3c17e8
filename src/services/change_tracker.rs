use async_trait::async_trait;

use crate::domain::change::{ChangeRequestIdentity, ChangeRequestResources};
use crate::error::FetchError;

/// Read access to pull requests on a hosted tracker.
///
/// `fetch` is all-or-nothing: either metadata, file diffs and comments all
/// arrive, or a single [`FetchError`] names the read that failed.
#[async_trait]
pub trait ChangeRequestTracker: Send + Sync {
    async fn fetch(
        &self,
        identity: &ChangeRequestIdentity,
    ) -> Result<ChangeRequestResources, FetchError>;
}
