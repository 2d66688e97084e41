use super::{BlockingCompletion, ChunkHandler, Transport, TransportError};
use crate::config::HttpSettings;
use crate::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Proxy;
use serde_json::{Map, Value};
use std::io::Read;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const READ_BUF_SIZE: usize = 8 * 1024;

/// Blocking HTTP transport for an OpenAI-compatible `/completions` endpoint.
///
/// One client (and connection pool) is shared by every worker thread.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: Option<String>, settings: &HttpSettings) -> Result<Self> {
        // A zero timeout means "no request timeout"; streaming sessions can be long.
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));

        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &settings.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url)
    }

    fn request(&self, model: &str, params: &Map<String, Value>, stream: bool) -> RequestBuilder {
        let mut body = params.clone();
        body.insert("model".to_string(), Value::String(model.to_string()));
        body.insert("stream".to_string(), Value::Bool(stream));

        let request_id = Uuid::new_v4().to_string();
        debug!(%request_id, stream, "sending completion request");

        let mut req = self
            .client
            .post(self.completions_url())
            .json(&Value::Object(body))
            .header("x-request-id", request_id);

        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if stream {
            req = req.header("accept", "text/event-stream");
        }
        req
    }

    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req
            .send()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            let message = match resp.text() {
                Ok(body) if !body.trim().is_empty() => body,
                Ok(_) => reason.to_string(),
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "error body unreadable");
                    format!("{} (body unreadable: {})", reason, e)
                }
            };
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

impl Transport for HttpTransport {
    fn complete_blocking(
        &self,
        model: &str,
        params: &Map<String, Value>,
    ) -> Result<BlockingCompletion> {
        let resp = self.send(self.request(model, params, false))?;
        let content = resp
            .text()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(BlockingCompletion::from_text(content))
    }

    fn complete_streaming(
        &self,
        model: &str,
        params: &Map<String, Value>,
        on_chunk: &mut ChunkHandler<'_>,
    ) -> Result<()> {
        let mut resp = self.send(self.request(model, params, true))?;
        let mut buf = vec![0u8; READ_BUF_SIZE];
        loop {
            let n = match resp.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Transport(TransportError::Body(e))),
            };
            if !on_chunk(&buf[..n]) {
                debug!("stream stopped by consumer");
                break;
            }
        }
        // Dropping `resp` here releases the connection on every path above.
        Ok(())
    }
}
