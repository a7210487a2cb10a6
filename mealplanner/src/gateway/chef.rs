use std::time::Duration;

use validator::Validate;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{AskRequest, AskResponse, ChefReply};

/// The AI chef chat endpoint.
#[derive(Debug, Clone)]
pub struct ChefGateway {
    api: ApiClient,
    timeout: Option<Duration>,
}

impl ChefGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api, timeout: None }
    }

    /// Overrides the client-wide timeout for chef requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn ask(&self, question: &str) -> Result<ChefReply> {
        let request = AskRequest {
            question: question.trim().to_string(),
        };
        request.validate()?;

        let mut call = self.api.post("/ask-ai/").json(&request);
        if let Some(timeout) = self.timeout {
            call = call.timeout(timeout);
        }
        let response: AskResponse = call.send_json().await?;
        Ok(ChefReply::from(response))
    }
}
