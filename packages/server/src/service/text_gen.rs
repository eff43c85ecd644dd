use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TextGenConfig;

/// Placeholder returned when the model reply cannot be used.
pub const NO_SUGGESTION: &str = "No value suggested";

#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("text generation is not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub content: String,
}

impl Suggestion {
    fn placeholder() -> Self {
        Self {
            title: NO_SUGGESTION.into(),
            content: NO_SUGGESTION.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_completion_tokens: u32,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct SuggestionReply {
    title: String,
    content: String,
}

/// Client for an OpenAI-compatible chat completion endpoint that drafts posts.
pub struct TextGenerator {
    client: Client,
    config: TextGenConfig,
}

impl TextGenerator {
    pub fn new(config: TextGenConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    #[tracing::instrument(skip_all, fields(model = %self.config.model))]
    pub async fn suggest(
        &self,
        title: &str,
        current_text: &str,
        urls: &[String],
    ) -> Result<Suggestion, TextGenError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(TextGenError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.config.model,
            max_completion_tokens: self.config.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: Some(
                        "Respond strictly with a JSON object of the form \
                         {\"title\": \"...\", \"content\": \"...\"}."
                            .into(),
                    ),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Some(build_prompt(title, current_text, urls)),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::Api { status, body });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        Ok(content
            .as_deref()
            .map(parse_suggestion)
            .unwrap_or_else(Suggestion::placeholder))
    }
}

fn build_prompt(title: &str, current_text: &str, urls: &[String]) -> String {
    let mut prompt = format!(
        "You are a post completion engine in a local community event application. \
         Provide a completed post for the title ```{title}``` and the content ```{current_text}```."
    );
    if !urls.is_empty() {
        prompt.push_str(" The post links to: ");
        prompt.push_str(&urls.join(", "));
        prompt.push('.');
    }
    prompt
}

fn parse_suggestion(raw: &str) -> Suggestion {
    match serde_json::from_str::<SuggestionReply>(raw.trim()) {
        Ok(reply) => Suggestion {
            title: reply.title,
            content: reply.content,
        },
        Err(e) => {
            tracing::warn!(error = %e, "unparsable completion, using placeholder");
            Suggestion::placeholder()
        }
    }
}
