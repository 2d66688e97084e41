//! Dataset loading and conversion on real files

use ai_throughput_bench::dataset::{
    convert_all, convert_dataset, load_requests, ConversionStatus, DEFAULT_CONVERT_SEED,
};
use ai_throughput_bench::Error;
use serde_json::{json, Value};
use std::fs;

#[test]
fn test_load_requests_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requests.jsonl");
    fs::write(
        &path,
        "{\"prompt\": \"a\", \"max_tokens\": 16}\n{broken\n\n{\"prompt\": \"b\"}\n",
    )
    .unwrap();

    let reqs = load_requests(&path).unwrap();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].get("max_tokens"), Some(&json!(16)));
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_requests(dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_convert_maps_fields_and_skips_bad_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.jsonl");
    let output = dir.path().join("nested").join("out").join("converted.jsonl");
    fs::write(
        &input,
        concat!(
            "{\"text\": \"Tell me a story\", \"token_length\": 256}\n",
            "{\"text\": \"no length\"}\n",
            "not json at all\n",
            "\n",
            "{\"text\": \"Summarize\", \"token_length\": \"64\"}\n",
        ),
    )
    .unwrap();

    let count = convert_dataset(&input, &output, Some(42)).unwrap();
    assert_eq!(count, 2);

    let lines: Vec<Value> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["prompt"], json!("Tell me a story"));
    assert_eq!(lines[0]["max_tokens"], json!(256));
    assert_eq!(lines[1]["max_tokens"], json!(64));
    for line in &lines {
        let t = line["temperature"].as_f64().unwrap();
        assert!((0.2..=0.7).contains(&t), "temperature {}", t);
        assert!(((t * 10.0).round() - t * 10.0).abs() < 1e-9);
    }

    // Converted lines load as requests.
    assert_eq!(load_requests(&output).unwrap().len(), 2);
}

#[test]
fn test_convert_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.jsonl");
    let body: String = (0..30)
        .map(|i| format!("{{\"text\": \"t{}\", \"token_length\": {}}}\n", i, i + 1))
        .collect();
    fs::write(&input, body).unwrap();

    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    convert_dataset(&input, &a, Some(7)).unwrap();
    convert_dataset(&input, &b, Some(7)).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_convert_all_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("benchmark_1K.jsonl"),
        "{\"text\": \"short\", \"token_length\": 1000}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("benchmark_8K.jsonl"),
        "{\"text\": \"a\", \"token_length\": 8000}\n{\"text\": \"b\", \"token_length\": 8000}\n",
    )
    .unwrap();
    // benchmark_16K.jsonl is left out on purpose.

    let outcomes = convert_all(dir.path(), DEFAULT_CONVERT_SEED);
    assert_eq!(outcomes.len(), 3);

    assert!(matches!(outcomes[0].status, ConversionStatus::Converted(1)));
    assert!(matches!(outcomes[1].status, ConversionStatus::Converted(2)));
    assert!(matches!(outcomes[2].status, ConversionStatus::Missing));
    assert_eq!(outcomes.iter().filter(|o| !o.is_success()).count(), 1);

    let out_1k = dir.path().join("benchmark_1K_converted.jsonl");
    assert_eq!(outcomes[0].output, out_1k);
    assert_eq!(load_requests(&out_1k).unwrap().len(), 1);
    assert!(dir.path().join("benchmark_8K_converted.jsonl").is_file());
    assert!(!dir.path().join("benchmark_16K_converted.jsonl").exists());
}
