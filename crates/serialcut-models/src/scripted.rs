use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use serialcut_core::{ChatModel, ChatRequest, ChatResponse, Message, SerialcutError};
use tokio::sync::Mutex;

/// A chat model that replays queued replies in order and remembers the
/// requests it was sent.
#[derive(Clone)]
pub struct ScriptedChatModel {
    responses: Arc<Mutex<VecDeque<Result<ChatResponse, SerialcutError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedChatModel {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shorthand for a model that answers once with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![ChatResponse {
            message: Message::ai(text),
            usage: None,
        }])
    }

    /// A model whose only reply is `error`.
    pub fn failing(error: SerialcutError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from([Err(error)]))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, SerialcutError> {
        self.requests.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        responses.pop_front().unwrap_or_else(|| {
            Err(SerialcutError::Model(
                "scripted model exhausted responses".to_string(),
            ))
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
