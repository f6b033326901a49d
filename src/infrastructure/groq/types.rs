/// Request and response types for the OpenAI-compatible chat completions API
use serde::{Deserialize, Serialize};

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "llama-3.1-8b-instant")
    pub model: String,

    /// Conversation messages
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a single-turn request carrying `prompt` as one user message
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author ("system", "user" or "assistant")
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Unique completion ID
    pub id: String,

    /// Model that generated the response
    pub model: String,

    /// Generated choices; a normal completion carries exactly one
    pub choices: Vec<ChatChoice>,

    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One generated completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Position of this choice in the response
    pub index: u32,

    /// The generated message
    pub message: ChatMessage,

    /// Reason why generation stopped (e.g., "stop", "length")
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,

    /// Number of completion tokens
    pub completion_tokens: u32,

    /// Total tokens consumed
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest::new("llama-3.1-8b-instant", "What is malaria?")
            .with_temperature(0.0)
            .with_max_tokens(1024);

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("llama-3.1-8b-instant"));
        assert!(json.contains("What is malaria?"));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""temperature":0.0"#));
        assert!(json.contains(r#""max_tokens":1024"#));
    }

    #[test]
    fn test_chat_request_omits_unset_options() {
        let request = ChatRequest::new("llama-3.1-8b-instant", "hi");
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-abc123",
            "object": "chat.completion",
            "created": 1727000000,
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Malaria is caused by parasites."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 25, "completion_tokens": 8, "total_tokens": 33}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "chatcmpl-abc123");
        assert_eq!(
            response.first_content(),
            Some("Malaria is caused by parasites.")
        );
        assert_eq!(response.usage.unwrap().total_tokens, 33);
    }

    #[test]
    fn test_first_content_empty_choices() {
        let response = ChatResponse {
            id: "chatcmpl-empty".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            choices: vec![],
            usage: None,
        };
        assert_eq!(response.first_content(), None);
    }
}
