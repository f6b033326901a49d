use medrag::domain::models::{ApiConfig, RateLimitConfig, RetryConfig};
use medrag::domain::ports::ChatModel;
use medrag::infrastructure::groq::GroqClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_json(id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "object": "chat.completion",
        "created": 1727000000,
        "model": "llama-3.1-8b-instant",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 25, "completion_tokens": 12, "total_tokens": 37}
    })
}

fn test_client(base_url: &str, max_retries: u32) -> GroqClient {
    let api = ApiConfig {
        key: Some("gsk_test_key".to_string()),
        base_url: base_url.to_string(),
        temperature: 0.0,
        max_tokens: 1024,
        timeout_secs: 30,
    };
    let rate_limit = RateLimitConfig {
        requests_per_second: 100.0, // High limit for tests
        burst_size: 10,
    };
    let retry = RetryConfig {
        max_retries,
        initial_backoff_ms: 10,
        max_backoff_ms: 100,
    };
    GroqClient::from_config(&api, &rate_limit, &retry).unwrap()
}

#[tokio::test]
async fn test_successful_chat_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test_key"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json("chatcmpl-abc", "Malaria is parasitic.")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let answer = client
        .generate("llama-3.1-8b-instant", "What causes malaria?")
        .await
        .unwrap();

    assert_eq!(answer, "Malaria is parasitic.");
}

#[tokio::test]
async fn test_request_carries_model_and_sampling_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{"role": "user", "content": "How is cholera treated?"}],
            "temperature": 0.0,
            "max_tokens": 1024
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json("chatcmpl-body", "Rehydration.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let answer = client
        .generate("llama-3.3-70b-versatile", "How is cholera treated?")
        .await
        .unwrap();

    assert_eq!(answer, "Rehydration.");
}

#[tokio::test]
async fn test_retry_on_500_error() {
    let mock_server = MockServer::start().await;

    // First two requests fail with 500
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    // Third request succeeds
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json("chatcmpl-retry", "Success after retry")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let answer = client
        .generate("llama-3.1-8b-instant", "Test retry")
        .await
        .unwrap();

    assert_eq!(answer, "Success after retry");
}

#[tokio::test]
async fn test_retry_on_rate_limit() {
    let mock_server = MockServer::start().await;

    // First request fails with 429
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    // Second request succeeds
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json("chatcmpl-429", "Recovered")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let answer = client
        .generate("llama-3.1-8b-instant", "Test rate limit")
        .await
        .unwrap();

    assert_eq!(answer, "Recovered");
}

#[tokio::test]
async fn test_no_retry_on_400_error() {
    let mock_server = MockServer::start().await;

    // Client errors are permanent, exactly one request must arrive
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let result = client
        .generate("llama-3.1-8b-instant", "Test bad request")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_no_retry_on_401_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let result = client.generate("llama-3.1-8b-instant", "Test").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    // Always fail with 500: initial attempt plus two retries, then give up
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server Error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 2);
    let result = client
        .generate("llama-3.1-8b-instant", "Test max retries")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let mock_server = MockServer::start().await;

    let empty_response = serde_json::json!({
        "id": "chatcmpl-empty",
        "object": "chat.completion",
        "created": 1727000000,
        "model": "llama-3.1-8b-instant",
        "choices": [],
        "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty_response))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 3);
    let result = client.generate("llama-3.1-8b-instant", "Anything").await;

    assert!(result.is_err());
}
