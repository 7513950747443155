//! Knowledge backend REST client.

use async_trait::async_trait;
use reqwest::{Client, Response};

use session_core::{BackendError, BackendResult, KnowledgeBackend};

use crate::protocol::{GenerateRequest, GenerateResponse, SearchRequest, SearchResponse};

/// Client for the knowledge backend API.
pub struct KnowledgeClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl KnowledgeClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://knowledge.example/v1".to_string(),
            model: "recall-flash".to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the generation model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
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
        log::error!("knowledge backend API error: HTTP {} - {}", status, text);

        if status == 401 || status == 403 {
            return Err(BackendError::Api(format!(
                "authentication failed: {}. Check the API key.",
                text
            )));
        }
        Err(BackendError::Api(format!("HTTP {}: {}", status, text)))
    }
}

#[async_trait]
impl KnowledgeBackend for KnowledgeClient {
    async fn generate(&self, context: &str, instruction: &str) -> BackendResult<String> {
        let prompt = format!("{}\n\n{}", context, instruction);
        let request = GenerateRequest::from_prompt(prompt);
        log::debug!("generation request to model {}", self.model);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let body: GenerateResponse = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        body.first_text()
            .ok_or_else(|| BackendError::Api("response contained no candidates".to_string()))
    }

    async fn search(&self, corpus: &str, query: &str) -> BackendResult<String> {
        log::debug!("search in corpus {} for {:?}", corpus, query);
        let url = format!(
            "{}/corpora/{}:search?key={}",
            self.base_url, corpus, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let body: SearchResponse = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(body.answer)
    }
}
