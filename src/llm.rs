use serde::{Deserialize, Serialize};
use tracing::{error, info_span, instrument};
use ureq::Agent;

use crate::error::AgentError;

const SERVICE: &str = "text generation";

/// A single system + user exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Opaque text-generation capability used for extraction and advice.
pub trait TextGenerator {
    fn complete(&self, prompt: &Prompt) -> Result<String, AgentError>;
}

/// OpenAI-compatible `chat/completions` client.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    base_url: String,
    model: String,
    api_key: Option<String>,
    agent: Agent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            agent: crate::http::agent(),
        }
    }
}

impl TextGenerator for OpenAiChat {
    #[instrument(level = "debug", skip(self, prompt), fields(model = %self.model))]
    fn complete(&self, prompt: &Prompt) -> Result<String, AgentError> {
        let api_key = self.api_key.as_deref().ok_or(AgentError::NotConfigured { service: "OpenAI" })?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: prompt.temperature,
            messages: [
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.user },
            ],
        };

        let response = {
            let _span = info_span!("llm_request", url = %url).entered();
            self.agent
                .post(&url)
                .header("Authorization", format!("Bearer {api_key}"))
                .send_json(&body)
        }
        .map_err(|e| {
            error!(error = %e, "Text generation request failed");
            AgentError::upstream(SERVICE, e)
        })?;

        let parsed: ChatResponse = response.into_body().read_json().map_err(|e| {
            error!(error = %e, "Failed to parse text generation response");
            AgentError::malformed(SERVICE, e)
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(AgentError::malformed(SERVICE, "empty response from model"));
        }
        Ok(content)
    }
}
