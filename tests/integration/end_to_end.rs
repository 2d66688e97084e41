//! Full runs: dispatch, execution over HTTP, aggregation and the report

use crate::integration::mock_server::{delta, MockServerFixture};
use ai_throughput_bench::{dataset, run_benchmark, RequestDescriptor};
use serde_json::{json, Value};
use std::io::Cursor;

fn requests(n: usize, stream: bool) -> Vec<RequestDescriptor> {
    (0..n)
        .map(|i| {
            RequestDescriptor::from_value(json!({"prompt": format!("p{}", i), "stream": stream}))
                .unwrap()
        })
        .collect()
}

const USAGE_CHUNK: &str = r#"{"choices":[],"usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#;

#[test]
fn test_streaming_run_records_ttft_and_usage() {
    let mut fixture = MockServerFixture::new();
    let (hello, world) = (delta("Hello"), delta(" world"));
    let mock = fixture.mock_sse_stream(&[hello.as_str(), world.as_str(), USAGE_CHUNK, "[DONE]"], 4);

    let reqs = requests(4, true);
    let run = run_benchmark(&reqs, 2, &fixture.executor()).unwrap();
    mock.assert();

    assert_eq!(run.completions.len(), 4);
    for (req, rec) in reqs.iter().zip(&run.completions) {
        assert_eq!(&rec.input, req);
        assert!(rec.success, "{:?}", rec.error_message);
        assert_eq!(rec.output_text, "Hello world");
        assert_eq!(rec.chunk_count, 3);
        let ttft = rec.first_token_time.unwrap();
        assert!(rec.start_time <= ttft && ttft <= rec.end_time.unwrap());
    }
    assert_eq!(run.report.total_requests, 4);
    assert_eq!(run.report.total_failures, 0);
    assert_eq!(run.report.total_tokens, 20);
}

#[test]
fn test_failures_are_counted_not_raised() {
    let mut fixture = MockServerFixture::new();
    let _ok = fixture
        .server
        .mock("POST", "/v1/completions")
        .match_body(mockito::Matcher::PartialJson(json!({"prompt": "good"})))
        .with_status(200)
        .with_body(r#"{"choices":[{"text":"fine"}],"usage":{"prompt_tokens":1,"completion_tokens":1,"total_tokens":2}}"#)
        .expect(2)
        .create();
    let _bad = fixture
        .server
        .mock("POST", "/v1/completions")
        .match_body(mockito::Matcher::PartialJson(json!({"prompt": "bad"})))
        .with_status(500)
        .with_body("internal error")
        .create();

    let reqs: Vec<RequestDescriptor> = ["good", "bad", "good"]
        .iter()
        .map(|p| RequestDescriptor::from_value(json!({"prompt": p, "stream": false})).unwrap())
        .collect();
    let run = run_benchmark(&reqs, 2, &fixture.executor()).unwrap();

    assert_eq!(run.report.total_requests, 3);
    assert_eq!(run.report.total_failures, 1);
    assert_eq!(run.report.total_tokens, 4);
    assert!(!run.completions[1].success);
    assert!(run.completions[1]
        .error_message
        .as_deref()
        .unwrap()
        .contains("500"));
    for i in [0, 2] {
        assert!(run.completions[i].success);
        assert_eq!(run.completions[i].output_text, "fine");
    }
}

#[test]
fn test_totals_do_not_depend_on_concurrency() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response(
        200,
        r#"{"choices":[{"text":"ok"}],"usage":{"prompt_tokens":7,"completion_tokens":3,"total_tokens":10}}"#,
    );

    let reqs = requests(12, false);
    let executor = fixture.executor();
    let serial = run_benchmark(&reqs, 1, &executor).unwrap();
    let parallel = run_benchmark(&reqs, 10, &executor).unwrap();

    for run in [&serial, &parallel] {
        assert_eq!(run.report.total_requests, 12);
        assert_eq!(run.report.total_failures, 0);
        assert_eq!(run.report.total_prompt_tokens, 84);
        assert_eq!(run.report.total_completion_tokens, 36);
        assert_eq!(run.report.total_tokens, 120);
    }
    let inputs = |r: &ai_throughput_bench::BenchmarkRun| {
        r.completions.iter().map(|c| c.input.clone()).collect::<Vec<_>>()
    };
    assert_eq!(inputs(&serial), inputs(&parallel));
}

#[test]
fn test_report_from_loaded_dataset() {
    let mut fixture = MockServerFixture::new();
    let hi = delta("hi");
    let mock = fixture.mock_sse_stream(&[hi.as_str(), "[DONE]"], 2);

    let jsonl = "{\"prompt\": \"a\"}\nnot json\n\n{\"prompt\": \"b\", \"temperature\": 0.3}\n";
    let reqs = dataset::parse_requests(Cursor::new(jsonl)).unwrap();
    assert_eq!(reqs.len(), 2);

    let run = run_benchmark(&reqs, 3, &fixture.executor()).unwrap();
    mock.assert();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("throughput_stats.json");
    run.to_report().write_to_file(&path).unwrap();

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["overall_stats"]["total_number_requests"], json!(2));
    assert_eq!(v["completions"][1]["input"]["temperature"], json!(0.3));
    assert_eq!(v["completions"][0]["output_text"], json!("hi"));
    assert_eq!(v["completions"][0]["number_of_chunks"], json!(1));
    assert!(v["completions"][0]["ttft_time"].is_f64());
}
