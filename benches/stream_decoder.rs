//! Benchmarks for the SSE stream decoder
//!
//! This benchmark measures:
//! - Single payload decoding
//! - Whole-stream decoding at different transport chunk sizes
//! - Batch dispatch overhead with a trivial job

use ai_throughput_bench::batch::Dispatcher;
use ai_throughput_bench::pipeline::{decode_payload, StreamDecoder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Sample SSE frames (OpenAI-compatible completions, delta form)
const SSE_FRAMES: &[&str] = &[
    r#"data: {"id":"cmpl-123","object":"text_completion","created":1694268190,"model":"llama-3.3-70b","choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
    r#"data: {"id":"cmpl-123","object":"text_completion","created":1694268190,"model":"llama-3.3-70b","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
    r#"data: {"id":"cmpl-123","object":"text_completion","created":1694268190,"model":"llama-3.3-70b","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":null}]}"#,
    r#"data: {"id":"cmpl-123","object":"text_completion","created":1694268190,"model":"llama-3.3-70b","choices":[{"index":0,"delta":{"content":"!"},"finish_reason":null}]}"#,
    r#"data: {"id":"cmpl-123","object":"text_completion","created":1694268190,"model":"llama-3.3-70b","choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":4,"total_tokens":16},"time_info":{"queue_time":0.0001,"prompt_time":0.002,"completion_time":0.01,"total_time":0.013,"created":1694268190}}"#,
    "data: [DONE]",
];

fn stream_body(repeat: usize) -> String {
    let mut body = String::new();
    for _ in 0..repeat {
        for frame in &SSE_FRAMES[..SSE_FRAMES.len() - 1] {
            body.push_str(frame);
            body.push_str("\n\n");
        }
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn bench_payload_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_decoding");

    let payload = SSE_FRAMES[1].strip_prefix("data: ").unwrap();
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("decode_delta_payload", |b| {
        b.iter(|| decode_payload(black_box(payload)).unwrap())
    });

    let payload = SSE_FRAMES[4].strip_prefix("data: ").unwrap();
    group.bench_function("decode_metadata_payload", |b| {
        b.iter(|| decode_payload(black_box(payload)).unwrap())
    });

    group.finish();
}

fn bench_stream_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_feed");
    let body = stream_body(50);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [64usize, 1024, 8 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &size| {
                b.iter(|| {
                    let mut decoder = StreamDecoder::new();
                    let mut events = 0usize;
                    for piece in black_box(body.as_bytes()).chunks(size) {
                        let out = decoder.feed(piece);
                        events += out.events.len();
                        if out.terminal {
                            break;
                        }
                    }
                    (events, decoder.chunk_count())
                })
            },
        );
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let items: Vec<u64> = (0..1_000).collect();

    for workers in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &n| {
            let dispatcher = Dispatcher::new(n);
            b.iter(|| dispatcher.run(black_box(&items), |x| x * 2).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_payload_decoding,
    bench_stream_feed,
    bench_dispatch
);
criterion_main!(benches);
