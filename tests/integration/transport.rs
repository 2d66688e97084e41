//! HTTP transport against a mock completions endpoint

use crate::integration::mock_server::{delta, MockServerFixture, MODEL};
use ai_throughput_bench::transport::Transport;
use ai_throughput_bench::Error;
use mockito::Matcher;
use serde_json::{json, Map, Value};

fn params(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn test_streaming_delivers_raw_sse_bytes() {
    let mut fixture = MockServerFixture::new();
    let hello = delta("Hello");
    let mock = fixture.mock_sse_stream(&[hello.as_str(), "[DONE]"], 1);

    let transport = fixture.transport();
    let mut received = Vec::new();
    transport
        .complete_streaming(MODEL, &params(json!({"prompt": "hi"})), &mut |bytes: &[u8]| {
            received.extend_from_slice(bytes);
            true
        })
        .unwrap();

    let text = String::from_utf8(received).unwrap();
    assert!(text.contains("\"Hello\""));
    assert!(text.ends_with("data: [DONE]\n\n"));
    mock.assert();
}

#[test]
fn test_blocking_sends_params_and_returns_body() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/v1/completions")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!({
            "model": MODEL,
            "stream": false,
            "prompt": "Capital of France?",
            "max_tokens": 4
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"text":"Paris"}]}"#)
        .create();

    let out = fixture
        .transport()
        .complete_blocking(
            MODEL,
            &params(json!({"prompt": "Capital of France?", "max_tokens": 4})),
        )
        .unwrap();

    assert_eq!(out.body, Some(json!({"choices": [{"text": "Paris"}]})));
    mock.assert();
}

#[test]
fn test_non_success_status_is_remote_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response(429, r#"{"error":"rate limited"}"#);

    let err = fixture
        .transport()
        .complete_blocking(MODEL, &params(json!({"prompt": "p"})))
        .unwrap_err();
    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_streaming_non_success_status_skips_handler() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("POST", "/v1/completions")
        .with_status(503)
        .create();

    let mut calls = 0usize;
    let err = fixture
        .transport()
        .complete_streaming(MODEL, &params(json!({"prompt": "p"})), &mut |_: &[u8]| {
            calls += 1;
            true
        })
        .unwrap_err();

    assert_eq!(calls, 0);
    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 503);
            // No body: the status reason stands in.
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_streaming_stops_when_handler_declines() {
    let mut fixture = MockServerFixture::new();
    let chunk = delta("token");
    let payloads: Vec<&str> = std::iter::repeat(chunk.as_str()).take(4_000).collect();
    let mock = fixture.mock_sse_stream(&payloads, 1);

    let mut calls = 0usize;
    let mut received = 0usize;
    fixture
        .transport()
        .complete_streaming(MODEL, &params(json!({"prompt": "p"})), &mut |bytes: &[u8]| {
            calls += 1;
            received += bytes.len();
            false
        })
        .unwrap();

    assert_eq!(calls, 1);
    let full_len = payloads.len() * (chunk.len() + "data: \n\n".len());
    assert!(received < full_len, "read {} of {} bytes", received, full_len);
    mock.assert();
}
