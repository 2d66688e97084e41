//! JSONL request datasets: loading and conversion.

use crate::types::RequestDescriptor;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Temperature range drawn by [`convert_dataset`].
pub const TEMPERATURE_RANGE: (f64, f64) = (0.2, 0.7);

/// Dataset files converted by [`convert_all`], relative to the datasets directory.
pub const BENCHMARK_FILES: &[&str] = &[
    "benchmark_1K.jsonl",
    "benchmark_8K.jsonl",
    "benchmark_16K.jsonl",
];

/// Seed used by [`convert_all`] unless one is given.
pub const DEFAULT_CONVERT_SEED: u64 = 42;

/// Load one request per non-blank line of a JSONL file.
pub fn load_requests(path: impl AsRef<Path>) -> Result<Vec<RequestDescriptor>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let requests = parse_requests(BufReader::new(file))?;
    info!(path = %path.display(), count = requests.len(), "loaded requests");
    Ok(requests)
}

/// Parse JSONL from any reader. Malformed and non-object lines are skipped.
pub fn parse_requests<R: BufRead>(reader: R) -> Result<Vec<RequestDescriptor>> {
    let mut requests = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => match RequestDescriptor::from_value(value) {
                Some(req) => requests.push(req),
                None => warn!(line = line_no, "skipping line: not a JSON object"),
            },
            Err(e) => warn!(line = line_no, error = %e, "skipping malformed JSON line"),
        }
    }
    Ok(requests)
}

#[derive(Serialize)]
struct ConvertedRequest<'a> {
    prompt: &'a Value,
    max_tokens: u64,
    temperature: f64,
}

/// Convert a `{"text", "token_length"}` dataset into request descriptors with a
/// random temperature. Returns the number of lines written.
///
/// `seed` makes the temperatures reproducible. The output's parent directory
/// is created when missing.
pub fn convert_dataset(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<usize> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let reader = BufReader::new(File::open(input)?);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output)?);

    let mut rng = match seed {
        Some(seed) => {
            info!(seed, "using fixed random seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut converted = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed JSON line");
                continue;
            }
        };
        let Some(prompt) = value.get("text") else {
            warn!(line = line_no, "skipping line: missing field \"text\"");
            continue;
        };
        let Some(max_tokens) = value.get("token_length").and_then(token_length) else {
            warn!(line = line_no, "skipping line: missing or invalid \"token_length\"");
            continue;
        };

        let (lo, hi) = TEMPERATURE_RANGE;
        let temperature = (rng.gen_range(lo..=hi) * 10.0).round() / 10.0;
        let row = ConvertedRequest {
            prompt,
            max_tokens,
            temperature,
        };
        serde_json::to_writer(&mut writer, &row)?;
        writer.write_all(b"\n")?;
        converted += 1;
    }
    writer.flush()?;

    info!(
        input = %input.display(),
        output = %output.display(),
        converted,
        "converted dataset"
    );
    Ok(converted)
}

#[derive(Debug)]
pub enum ConversionStatus {
    /// Number of lines written
    Converted(usize),
    Missing,
    Failed(Error),
}

/// What happened to one file of a [`convert_all`] pass.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: ConversionStatus,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ConversionStatus::Converted(_))
    }
}

/// `benchmark_1K.jsonl` -> `benchmark_1K_converted.jsonl`, in the same directory.
pub fn converted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_converted.jsonl", stem))
}

/// Convert every file of [`BENCHMARK_FILES`] found in `datasets_dir`.
///
/// Each file is converted with the same `seed`. Missing or failing files are
/// reported in the outcome and do not stop the pass.
pub fn convert_all(datasets_dir: impl AsRef<Path>, seed: u64) -> Vec<ConversionOutcome> {
    let dir = datasets_dir.as_ref();
    BENCHMARK_FILES
        .iter()
        .map(|name| {
            let input = dir.join(name);
            let output = converted_path(&input);
            let status = if !input.is_file() {
                warn!(path = %input.display(), "input file not found, skipping");
                ConversionStatus::Missing
            } else {
                match convert_dataset(&input, &output, Some(seed)) {
                    Ok(n) => ConversionStatus::Converted(n),
                    Err(e) => {
                        warn!(path = %input.display(), error = %e, "conversion failed");
                        ConversionStatus::Failed(e)
                    }
                }
            };
            ConversionOutcome {
                input,
                output,
                status,
            }
        })
        .collect()
}

/// Accepts integers, floats (truncated) and numeric strings.
fn token_length(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
