use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::change::{ChangeRequestIdentity, ChangeRequestResources, FileDiff};
use crate::error::{FetchError, TrackerResource};
use crate::services::ChangeRequestTracker;

const PER_PAGE: u32 = 100;
/// GitHub stops listing pull request files after 3000 entries. Comment
/// listings have no such cap and are read until a short page.
const MAX_FILE_PAGES: u32 = 30;
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = "prlens";

pub struct GitHubClient {
    http: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: Client, api_base: String, token: Option<String>) -> Self {
        Self {
            http,
            api_base,
            token,
        }
    }

    fn pull_endpoint(&self, identity: &ChangeRequestIdentity, resource: TrackerResource) -> String {
        let base = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_base.trim_end_matches('/'),
            identity.owner(),
            identity.repository(),
            identity.number()
        );
        match resource {
            TrackerResource::Metadata => base,
            TrackerResource::Files => format!("{base}/files"),
            TrackerResource::Comments => format!("{base}/comments"),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        resource: TrackerResource,
        identity: &ChangeRequestIdentity,
    ) -> Result<Response, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::new(resource, identity, format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(resource, identity, status.to_string()));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        resource: TrackerResource,
        identity: &ChangeRequestIdentity,
    ) -> Result<T, FetchError> {
        response.json::<T>().await.map_err(|err| {
            FetchError::new(resource, identity, format!("invalid response body: {err}"))
        })
    }

    async fn fetch_metadata(&self, identity: &ChangeRequestIdentity) -> Result<Value, FetchError> {
        let resource = TrackerResource::Metadata;
        let url = self.pull_endpoint(identity, resource);
        let response = self.send(self.get(&url), resource, identity).await?;
        Self::decode(response, resource, identity).await
    }

    fn page_cap(resource: TrackerResource) -> Option<u32> {
        match resource {
            TrackerResource::Files => Some(MAX_FILE_PAGES),
            TrackerResource::Metadata | TrackerResource::Comments => None,
        }
    }

    /// Walks `page=1..` until a short page comes back or the listing cap is
    /// hit. Any failed page fails the whole listing.
    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        resource: TrackerResource,
        identity: &ChangeRequestIdentity,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.pull_endpoint(identity, resource);
        let cap = Self::page_cap(resource);
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let response = self.send(request, resource, identity).await?;
            let batch: Vec<T> = Self::decode(response, resource, identity).await?;
            let last_page = batch.len() < PER_PAGE as usize;
            items.extend(batch);
            if last_page || cap.is_some_and(|cap| page >= cap) {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl ChangeRequestTracker for GitHubClient {
    async fn fetch(
        &self,
        identity: &ChangeRequestIdentity,
    ) -> Result<ChangeRequestResources, FetchError> {
        let (metadata, file_diffs, comments) = tokio::try_join!(
            self.fetch_metadata(identity),
            self.fetch_all_pages::<FileDiff>(TrackerResource::Files, identity),
            self.fetch_all_pages::<Value>(TrackerResource::Comments, identity),
        )?;

        Ok(ChangeRequestResources {
            metadata,
            file_diffs,
            comments,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
    };
    use serde_json::json;

    use super::*;
    use crate::testing::spawn_server;

    const PULL: &str = "/repos/acme/widgets/pulls/42";

    fn identity() -> ChangeRequestIdentity {
        ChangeRequestIdentity::new("acme", "widgets", 42).expect("valid identity")
    }

    fn client(base: String, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(Client::new(), base, token.map(str::to_string))
    }

    async fn metadata(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({
            "title": "Add login",
            "state": "open",
            "user": { "login": "octocat" },
            "seen_auth": auth
        }))
    }

    async fn two_files() -> Json<Value> {
        Json(json!([
            { "filename": "src/login.rs", "additions": 10, "deletions": 2 },
            { "filename": "README.md", "additions": 5, "deletions": 0 }
        ]))
    }

    async fn one_comment() -> Json<Value> {
        Json(json!([{ "id": 1, "body": "looks good" }]))
    }

    #[tokio::test]
    async fn fetches_all_three_resources() {
        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(two_files))
            .route(&format!("{PULL}/comments"), get(one_comment));
        let base = spawn_server(router).await;

        let resources = client(base, Some("ghp_test"))
            .fetch(&identity())
            .await
            .expect("fetch should succeed");

        assert_eq!(resources.metadata["title"], "Add login");
        assert_eq!(resources.metadata["seen_auth"], "Bearer ghp_test");
        assert_eq!(resources.file_diffs.len(), 2);
        assert_eq!(resources.file_diffs[0].additions(), 10);
        assert_eq!(resources.comments.len(), 1);
    }

    #[tokio::test]
    async fn missing_metadata_fails_whole_fetch() {
        let router = Router::new()
            .route(PULL, get(|| async { StatusCode::NOT_FOUND }))
            .route(&format!("{PULL}/files"), get(two_files))
            .route(&format!("{PULL}/comments"), get(one_comment));
        let base = spawn_server(router).await;

        let error = client(base, None)
            .fetch(&identity())
            .await
            .expect_err("metadata read fails");

        assert_eq!(error.resource, TrackerResource::Metadata);
        assert_eq!(error.status, "404 Not Found");
        assert!(error.to_string().contains("42"));
    }

    #[tokio::test]
    async fn failed_comment_read_is_reported_by_resource() {
        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(two_files))
            .route(
                &format!("{PULL}/comments"),
                get(|| async { StatusCode::FORBIDDEN }),
            );
        let base = spawn_server(router).await;

        let error = client(base, None)
            .fetch(&identity())
            .await
            .expect_err("comment read fails");

        assert_eq!(error.resource, TrackerResource::Comments);
        assert!(error.status.starts_with("403"));
    }

    #[tokio::test]
    async fn follows_file_pages_until_short_page() {
        async fn paged_files(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            let page = params.get("page").map(String::as_str).unwrap_or("1");
            let count = if page == "1" { PER_PAGE as usize } else { 1 };
            let files: Vec<Value> = (0..count)
                .map(|n| json!({ "filename": format!("p{page}/f{n}.rs"), "additions": 1, "deletions": 0 }))
                .collect();
            Json(Value::Array(files))
        }

        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(paged_files))
            .route(&format!("{PULL}/comments"), get(|| async { Json(json!([])) }));
        let base = spawn_server(router).await;

        let resources = client(base, None)
            .fetch(&identity())
            .await
            .expect("fetch should succeed");

        assert_eq!(resources.file_diffs.len(), PER_PAGE as usize + 1);
        assert_eq!(resources.file_diffs[PER_PAGE as usize].path(), "p2/f0.rs");
        assert!(resources.comments.is_empty());
    }

    fn full_page(prefix: &str) -> Value {
        let items: Vec<Value> = (0..PER_PAGE)
            .map(|n| json!({ "filename": format!("{prefix}/f{n}.rs"), "id": n, "additions": 1 }))
            .collect();
        Value::Array(items)
    }

    fn page_number(params: &HashMap<String, String>) -> u32 {
        params
            .get("page")
            .and_then(|page| page.parse().ok())
            .unwrap_or(1)
    }

    #[tokio::test]
    async fn failure_on_later_page_fails_whole_fetch() {
        async fn files(
            Query(params): Query<HashMap<String, String>>,
        ) -> Result<Json<Value>, StatusCode> {
            match page_number(&params) {
                1 => Ok(Json(full_page("p1"))),
                _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
            }
        }

        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(files))
            .route(&format!("{PULL}/comments"), get(one_comment));
        let base = spawn_server(router).await;

        let result = client(base, None).fetch(&identity()).await;

        let error = result.expect_err("second file page fails");
        assert_eq!(error.resource, TrackerResource::Files);
        assert_eq!(error.status, "500 Internal Server Error");
    }

    #[tokio::test]
    async fn file_listing_stops_at_page_cap() {
        async fn endless_files(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            Json(full_page(&format!("p{}", page_number(&params))))
        }

        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(endless_files))
            .route(&format!("{PULL}/comments"), get(one_comment));
        let base = spawn_server(router).await;

        let resources = client(base, None)
            .fetch(&identity())
            .await
            .expect("fetch should succeed");

        assert_eq!(
            resources.file_diffs.len(),
            (MAX_FILE_PAGES * PER_PAGE) as usize
        );
    }

    #[tokio::test]
    async fn comment_listing_reads_past_file_cap() {
        async fn many_comments(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            if page_number(&params) <= MAX_FILE_PAGES + 1 {
                Json(full_page("c"))
            } else {
                Json(json!([]))
            }
        }

        let router = Router::new()
            .route(PULL, get(metadata))
            .route(&format!("{PULL}/files"), get(two_files))
            .route(&format!("{PULL}/comments"), get(many_comments));
        let base = spawn_server(router).await;

        let resources = client(base, None)
            .fetch(&identity())
            .await
            .expect("fetch should succeed");

        assert_eq!(
            resources.comments.len(),
            ((MAX_FILE_PAGES + 1) * PER_PAGE) as usize
        );
    }

    #[tokio::test]
    async fn non_array_listing_is_a_fetch_error() {
        let router = Router::new()
            .route(PULL, get(metadata))
            .route(
                &format!("{PULL}/files"),
                get(|| async { Json(json!({ "message": "nope" })) }),
            )
            .route(&format!("{PULL}/comments"), get(one_comment));
        let base = spawn_server(router).await;

        let error = client(base, None)
            .fetch(&identity())
            .await
            .expect_err("files body is not a list");

        assert_eq!(error.resource, TrackerResource::Files);
        assert!(error.status.starts_with("invalid response body"));
    }

    #[test]
    fn builds_pull_request_endpoints() {
        let client = client("https://api.github.com/".to_string(), None);
        assert_eq!(
            client.pull_endpoint(&identity(), TrackerResource::Files),
            "https://api.github.com/repos/acme/widgets/pulls/42/files"
        );
        assert_eq!(
            client.pull_endpoint(&identity(), TrackerResource::Metadata),
            "https://api.github.com/repos/acme/widgets/pulls/42"
        );
    }
}
