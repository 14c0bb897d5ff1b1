// OpenAI-compatible chat-completions labeler.
//
// One request per cluster: a semicolon-separated sample of the cluster's
// member phrases goes in, a strict-JSON {"label": "..."} comes back. The
// model is asked for a short business-friendly noun phrase that generalizes
// across the sample without repeating it.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{LabelError, ThemeLabeler};
use crate::config::Config;

const SYSTEM_PROMPT: &str = "\
You assign a single short, business-friendly theme label for a cluster of survey topics.\n\
You will be given a semicolon-separated sample of topic phrases that all belong to the SAME cluster.\n\
Requirements:\n\
- 2-5 words, noun phrase, business-friendly.\n\
- Generalize across the listed topics (no quotes, no IDs, no counts).\n\
- Avoid product/channel names and sentiment words unless central to the theme.\n\
- Capture the shared theme succinctly; avoid repeating the example phrases verbatim.\n\
Return STRICT JSON only (no markdown fences, no extra text): {\"label\": \"<Label>\"}.\n\
\n\
Example 1:\n\
Topics in cluster: confusing claims process; unclear claim steps; too many claim forms\n\
Output: {\"label\": \"Claims process complexity\"}\n\
\n\
Example 2:\n\
Topics in cluster: long claim processing time; slow payouts\n\
Output: {\"label\": \"Claims turnaround delays\"}";

/// Theme labeler backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiLabeler {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiLabeler {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.label_model.clone(),
        }
    }
}

#[async_trait]
impl ThemeLabeler for OpenAiLabeler {
    async fn label_cluster(&self, sample: &[String]) -> Result<String, LabelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Topics in cluster: {}", sample.join("; ")),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call chat completions API")
            .map_err(LabelError::Provider)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LabelError::Provider(anyhow!(
                "Chat completions API returned {status}: {body}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completions API response")
            .map_err(LabelError::Provider)?;

        let content = result
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| LabelError::Parse("response had no choices".to_string()))?;

        let label = parse_label_content(content)?;

        debug!(sample = sample.len(), label = %label, "Labeled cluster");
        Ok(label)
    }
}

/// Extract the label from the model's content: strip any markdown fences,
/// then require strict JSON with a single non-empty `label` string field.
fn parse_label_content(content: &str) -> Result<String, LabelError> {
    let mut text = content.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    let text = text.trim();

    let value: LabelPayload = serde_json::from_str(text)
        .map_err(|e| LabelError::Parse(format!("not valid label JSON ({e}): {text}")))?;

    let label = value.label.trim().to_string();
    if label.is_empty() {
        return Err(LabelError::Parse("empty label".to_string()));
    }
    Ok(label)
}

// --- Chat completions API request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct LabelPayload {
    label: String,
}
