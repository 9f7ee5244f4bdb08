/*!
 * Integration tests for the DeepSeek client against a local HTTP server
 */

use anyhow::Result;
use std::time::Duration;
use xlsxwai::app_config::ProviderConfig;
use xlsxwai::errors::{ConfigError, ProviderError};
use xlsxwai::providers::deepseek::DeepSeek;
use xlsxwai::providers::{Provider, TranslationRequest};
use xlsxwai::translation::{CompletionClient, NoopObserver, XlsxTranslator};
use crate::common::http_server::{completion_body, serve};
use crate::common::{self, Value};

fn client_for(base_url: &str) -> Result<DeepSeek> {
    Ok(DeepSeek::new("sk-test", base_url, "deepseek-chat", 0.3, Duration::from_secs(5))?)
}

/// Test that the request matches the chat completions contract
#[tokio::test]
async fn test_complete_withSuccessResponse_shouldSendExpectedRequest() -> Result<()> {
    let (base_url, server) = serve(200, &completion_body("Bonjour"), 1).await;
    let provider = client_for(&base_url)?;

    let text = provider.complete(&TranslationRequest::new("Hello", "French")).await?;
    let requests = server.await?;

    assert_eq!(text, "Bonjour");
    let request = &requests[0];
    assert_eq!(request.request_line, "POST /v1/chat/completions HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
    assert!(request.header("content-type").unwrap_or_default().starts_with("application/json"));

    let body = request.json();
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Please translate the following text to French, keep the original format, only return the translation result:\nHello"
    );
    assert!((body["temperature"].as_f64().unwrap_or_default() - 0.3).abs() < 1e-6);
    Ok(())
}

/// Test that the client trims whatever the endpoint returns
#[tokio::test]
async fn test_translate_one_withPaddedResponse_shouldTrim() -> Result<()> {
    let (base_url, server) = serve(200, &completion_body("\n  Hola  \n"), 1).await;
    let client = CompletionClient::new(client_for(&base_url)?);

    let text = client.translate_one("Hello", "es").await?;
    let requests = server.await?;

    assert_eq!(text, "Hola");
    assert!(requests[0].json()["messages"][0]["content"]
        .as_str()
        .unwrap_or_default()
        .contains("to Spanish,"));
    Ok(())
}

/// Test that a 401 is reported as an authentication error
#[tokio::test]
async fn test_complete_withUnauthorized_shouldReturnAuthenticationError() -> Result<()> {
    let (base_url, _server) = serve(401, r#"{"error":{"message":"invalid key"}}"#, 1).await;
    let provider = client_for(&base_url)?;

    let result = provider.complete(&TranslationRequest::new("Hello", "French")).await;

    match result {
        Err(ProviderError::AuthenticationError(message)) => assert!(message.contains("invalid key")),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

/// Test that a 429 is reported as rate limiting
#[tokio::test]
async fn test_complete_withTooManyRequests_shouldReturnRateLimitError() -> Result<()> {
    let (base_url, _server) = serve(429, "{}", 1).await;
    let result = client_for(&base_url)?
        .complete(&TranslationRequest::new("Hello", "French"))
        .await;

    assert!(matches!(result, Err(ProviderError::RateLimitExceeded(_))));
    Ok(())
}

/// Test that other failures carry the status code
#[tokio::test]
async fn test_complete_withServerError_shouldReturnApiError() -> Result<()> {
    let (base_url, _server) = serve(500, "boom", 1).await;
    let result = client_for(&base_url)?
        .complete(&TranslationRequest::new("Hello", "French"))
        .await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
    Ok(())
}

/// Test that a response without content is a parse error
#[tokio::test]
async fn test_complete_withMissingContent_shouldReturnParseError() -> Result<()> {
    for body in [r#"{"choices":[]}"#, r#"{"choices":[{"message":{"role":"assistant"}}]}"#, "not json"] {
        let (base_url, _server) = serve(200, body, 1).await;
        let result = client_for(&base_url)?
            .complete(&TranslationRequest::new("Hello", "French"))
            .await;

        assert!(matches!(result, Err(ProviderError::ParseError(_))), "body {}", body);
    }
    Ok(())
}

/// Test that an unreachable endpoint is a connection error
#[tokio::test]
async fn test_complete_withClosedPort_shouldReturnConnectionError() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let result = client_for(&format!("http://127.0.0.1:{}/v1", port))?
        .complete(&TranslationRequest::new("Hello", "French"))
        .await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    Ok(())
}

/// Test that provider construction checks the configuration
#[test]
fn test_from_config_withoutApiKey_shouldFail() {
    let result = DeepSeek::from_config(&ProviderConfig::default());
    assert!(matches!(result, Err(ConfigError::MissingApiKey)));
}

/// Test a whole workbook run against the local endpoint
#[tokio::test]
async fn test_deepseek_translator_withLocalEndpoint_shouldTranslateWorkbook() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_workbook(
        temp_dir.path(),
        "remote.xlsx",
        &[("Sheet1", &[("A1", Value::Text("Hello")), ("A2", Value::Number(5.0)), ("B1", Value::Text("Bye"))])],
    )?;
    let (base_url, server) = serve(200, &completion_body("Salut"), 2).await;

    let config = ProviderConfig {
        api_key: "sk-test".to_string(),
        endpoint: base_url,
        ..ProviderConfig::default()
    };
    let output = XlsxTranslator::deepseek(config)
        .translate(&input, "French", 1, &NoopObserver)
        .await?;
    let requests = server.await?;

    assert_eq!(requests.len(), 2);
    assert_eq!(common::read_cell(&output, 0, "A1")?, "Salut");
    assert_eq!(common::read_cell(&output, 0, "B1")?, "Salut");
    assert_eq!(common::read_cell(&output, 0, "A2")?, "5");
    Ok(())
}
