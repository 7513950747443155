//! Profile store REST client.

use async_trait::async_trait;
use reqwest::{Client, Response};

use session_core::{
    BackendError, BackendResult, ProfileCandidate, ProfileLookup, ProfileSnapshot, SummaryWriter,
};

use crate::models::{AppendBlocksRequest, ProfileDto, SearchResponse};

/// Client for the profile store REST API.
pub struct ProfileStoreClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ProfileStoreClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.profilestore.example/v1".to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or self-hosted stores).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn check(&self, response: Response) -> BackendResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;
        log::error!("profile store API error: HTTP {} - {}", status, text);
        Err(BackendError::Api(format!("HTTP {}: {}", status, text)))
    }
}

#[async_trait]
impl ProfileLookup for ProfileStoreClient {
    async fn search_profiles(&self, query: &str) -> BackendResult<Vec<ProfileCandidate>> {
        log::debug!("profile search for {:?}", query);
        let response = self
            .client
            .get(format!("{}/profiles/search", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let body: SearchResponse = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|c| ProfileCandidate {
                id: c.id,
                display_name: c.display_name,
            })
            .collect())
    }

    async fn fetch_profile(&self, id: &str) -> BackendResult<ProfileSnapshot> {
        let response = self
            .client
            .get(format!("{}/profiles/{}", self.base_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let body: ProfileDto = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(ProfileSnapshot {
            id: body.id,
            display_name: body.display_name,
            portrait: body.portrait,
        })
    }
}

#[async_trait]
impl SummaryWriter for ProfileStoreClient {
    async fn write_summary(&self, profile_id: &str, summary: &str) -> BackendResult<()> {
        log::debug!("appending summary to profile {}", profile_id);
        let response = self
            .client
            .post(format!("{}/profiles/{}/blocks", self.base_url, profile_id))
            .bearer_auth(&self.api_key)
            .json(&AppendBlocksRequest::summary(summary))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        self.check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> ProfileStoreClient {
        ProfileStoreClient::new("test-key").with_base_url(format!("{}/v1", server.uri()))
    }

    #[tokio::test]
    async fn test_search_decodes_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/profiles/search"))
            .and(query_param("query", "acme"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "id": "p-1", "display_name": "Acme Corp" },
                    { "id": "p-2", "display_name": "Acme Ltd" }
                ]
            })))
            .mount(&server)
            .await;

        let candidates = client(&server).await.search_profiles("acme").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "p-1");
        assert_eq!(candidates[1].display_name, "Acme Ltd");
    }

    #[tokio::test]
    async fn test_search_can_return_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/profiles/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let candidates = client(&server).await.search_profiles("nobody").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/profiles/p-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p-1",
                "display_name": "Acme Corp",
                "portrait": "Conservative, retirement focus."
            })))
            .mount(&server)
            .await;

        let profile = client(&server).await.fetch_profile("p-1").await.unwrap();
        assert_eq!(profile.display_name, "Acme Corp");
        assert_eq!(profile.portrait, "Conservative, retirement focus.");
    }

    #[tokio::test]
    async fn test_write_summary_sends_block_layout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/profiles/p-1/blocks"))
            .and(body_partial_json(json!({
                "children": [
                    { "type": "heading", "text": "Discussion summary" },
                    { "type": "paragraph", "text": "- key findings" },
                    { "type": "divider" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .await
            .write_summary("p-1", "- key findings")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_success_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/profiles/p-404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such profile"))
            .mount(&server)
            .await;

        let err = client(&server).await.fetch_profile("p-404").await.unwrap_err();
        match err {
            BackendError::Api(msg) => assert!(msg.contains("404")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
