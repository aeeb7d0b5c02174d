mod chat_model;

pub use chat_model::{AnthropicChatModel, AnthropicConfig, DEFAULT_MODEL};
