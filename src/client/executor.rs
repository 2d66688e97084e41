//! 请求执行器：执行单个请求并生成完成记录。
//!
//! Request execution (single attempt, no retry).
//!
//! [`RequestExecutor::execute`] never fails: every transport or decode error is
//! folded into the returned [`CompletionRecord`].

use crate::pipeline::{extract, StreamDecoder};
use crate::transport::Transport;
use crate::types::{CompletionRecord, RequestDescriptor, StreamEvent};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs one request against a [`Transport`]. Shared by all workers.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    model: String,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Execute `req` and return its fully populated record.
    pub fn execute(&self, req: &RequestDescriptor) -> CompletionRecord {
        let mut record = CompletionRecord::started(req.clone());
        let streaming = req.is_streaming();

        let outcome = if streaming {
            self.execute_streaming(req, &mut record)
        } else {
            self.execute_blocking(req, &mut record)
        };

        match outcome {
            Ok(()) => {
                record.finish(Instant::now());
                debug!(
                    streaming,
                    chunks = record.chunk_count,
                    output_chars = record.output_text.len(),
                    "request completed"
                );
            }
            Err(e) => {
                warn!(streaming, error = %e, "request failed");
                record.fail(e.to_string(), Instant::now());
            }
        }
        record
    }

    fn execute_blocking(&self, req: &RequestDescriptor, record: &mut CompletionRecord) -> Result<()> {
        let response = self
            .transport
            .complete_blocking(&self.model, &req.completion_params())?;
        let end = Instant::now();
        record.finish(end);

        let text = match &response.body {
            Some(body) => extract::completion_text(body).map(str::to_string),
            None => None,
        }
        .unwrap_or(response.content);
        record.append_output(&text, end);

        if let Some(body) = &response.body {
            if let Some(usage) = extract::usage(body) {
                record.usage = usage;
            }
            if let Some(timing) = extract::timing(body) {
                record.timing = timing;
            }
        }
        Ok(())
    }

    fn execute_streaming(&self, req: &RequestDescriptor, record: &mut CompletionRecord) -> Result<()> {
        let mut decoder = StreamDecoder::new();
        let mut failure: Option<Error> = None;

        let call = self.transport.complete_streaming(
            &self.model,
            &req.completion_params(),
            &mut |bytes: &[u8]| {
                let out = decoder.feed(bytes);
                if let Err(e) = apply_events(record, out.events, Instant::now()) {
                    failure = Some(e);
                }
                !out.terminal
            },
        );

        // The server may close the stream without a trailing newline.
        if call.is_ok() && !decoder.is_terminal() {
            let out = decoder.finish();
            if let Err(e) = apply_events(record, out.events, Instant::now()) {
                failure = Some(e);
            }
        }
        record.chunk_count = decoder.chunk_count();

        call?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Fold decoder events observed at `at` into the record.
fn apply_events(record: &mut CompletionRecord, events: Vec<StreamEvent>, at: Instant) -> Result<()> {
    for event in events {
        match event {
            StreamEvent::Delta(delta) => record.append_output(&delta, at),
            StreamEvent::Usage(usage) => record.usage = usage,
            StreamEvent::Timing(timing) => record.timing = timing,
            StreamEvent::Done => record.finish(at),
            StreamEvent::Failed(err) => {
                record.finish(at);
                return Err(err.into());
            }
        }
    }
    Ok(())
}
