//! Chat and template payloads

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prompt used when a chat request carries no user message
pub const DEFAULT_PROMPT: &str = "Hello";

/// A single chat message
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: Option<String>,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub parts: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub cache: Option<bool>,
}

/// Body of `POST /chat`
///
/// Only the messages are used; the remaining fields are accepted for
/// compatibility with the web client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub is_first_prompt: Option<bool>,
    pub conversation_id: Option<String>,
    pub feature_previews: Option<HashMap<String, bool>>,
    pub error_reasoning: Option<String>,
    pub framework: Option<String>,
    pub prompt_mode: Option<String>,
    pub project_id: Option<String>,
    pub stripe_status: Option<String>,
    pub metrics: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub uses_inspected_element: Option<bool>,
}

impl ChatRequest {
    /// Content of the most recent user message
    pub fn latest_user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == "user")
            .map(|message| message.content.as_str())
            .unwrap_or(DEFAULT_PROMPT)
    }
}

/// One record of a streamed chat response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub text: String,
    pub done: bool,
}

/// Body of `POST /template`
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatePrompt {
    #[serde(default)]
    pub prompt: String,
}
