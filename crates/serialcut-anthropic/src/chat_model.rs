use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use serialcut_core::{ChatModel, ChatRequest, ChatResponse, Message, SerialcutError, TokenUsage};

use serialcut_models::{ProviderBackend, ProviderRequest, ProviderResponse};

/// Model used for boundary analysis when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 2000,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

pub struct AnthropicChatModel {
    config: AnthropicConfig,
    backend: Arc<dyn ProviderBackend>,
}

impl AnthropicChatModel {
    pub fn new(config: AnthropicConfig, backend: Arc<dyn ProviderBackend>) -> Self {
        Self { config, backend }
    }

    fn build_request(&self, request: &ChatRequest) -> ProviderRequest {
        let mut system_text: Option<String> = None;
        let mut messages: Vec<Value> = Vec::new();

        for msg in &request.messages {
            match msg {
                Message::System { content } => {
                    system_text = Some(content.clone());
                }
                Message::Human { content } => {
                    messages.push(json!({
                        "role": "user",
                        "content": content,
                    }));
                }
                Message::AI { content, .. } => {
                    messages.push(json!({
                        "role": "assistant",
                        "content": [{"type": "text", "text": content}],
                    }));
                }
            }
        }

        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "messages": messages,
        });

        if let Some(system) = system_text {
            body["system"] = json!(system);
        }

        ProviderRequest {
            url: format!("{}/v1/messages", self.config.base_url),
            headers: vec![
                ("x-api-key".to_string(), self.config.api_key.clone()),
                ("anthropic-version".to_string(), "2023-06-01".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }
}

fn parse_response(resp: &ProviderResponse) -> Result<ChatResponse, SerialcutError> {
    check_error_status(resp)?;

    let content_blocks = resp.body["content"].as_array().ok_or_else(|| {
        SerialcutError::Parsing("Anthropic response has no content array".to_string())
    })?;

    let mut text = String::new();
    for block in content_blocks {
        if block["type"].as_str() == Some("text") {
            if let Some(t) = block["text"].as_str() {
                text.push_str(t);
            }
        }
    }

    let mut message = Message::ai(text);
    if let Some(stop_reason) = resp.body["stop_reason"].as_str() {
        message = message.with_response_metadata("stop_reason", json!(stop_reason));
    }

    Ok(ChatResponse {
        message,
        usage: parse_usage(&resp.body["usage"]),
    })
}

fn check_error_status(resp: &ProviderResponse) -> Result<(), SerialcutError> {
    if resp.status == 429 {
        let msg = resp.body["error"]["message"]
            .as_str()
            .unwrap_or("rate limited")
            .to_string();
        return Err(SerialcutError::RateLimit(msg));
    }
    if resp.status >= 400 {
        let msg = resp.body["error"]["message"]
            .as_str()
            .unwrap_or("unknown API error")
            .to_string();
        return Err(SerialcutError::Model(format!(
            "Anthropic API error ({}): {}",
            resp.status, msg
        )));
    }
    Ok(())
}

fn parse_usage(usage: &Value) -> Option<TokenUsage> {
    if usage.is_null() {
        return None;
    }
    let input = usage["input_tokens"].as_u64().unwrap_or(0);
    let output = usage["output_tokens"].as_u64().unwrap_or(0);
    Some(TokenUsage {
        input_tokens: input as u32,
        output_tokens: output as u32,
        total_tokens: (input + output) as u32,
    })
}

#[async_trait]
impl ChatModel for AnthropicChatModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, SerialcutError> {
        let provider_req = self.build_request(&request);
        tracing::debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            "sending Anthropic request"
        );
        let resp = self.backend.send(provider_req).await?;
        parse_response(&resp)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
