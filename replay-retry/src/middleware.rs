//! `RetryReplayMiddleware` implements replaying requests while their response is retryable.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, CONNECTION, TRANSFER_ENCODING, UPGRADE};
use replay_middleware::{
    internal_server_error, Body, Middleware, Next, Request, ResponseWriter, Result,
};

use crate::config::RetryReplayConfig;
use crate::policy::RetryPolicy;
use crate::pool::BufferPool;
use crate::writer::{AttemptOutcome, RetryResponseWriter};

/// `RetryReplayMiddleware` buffers the request body and runs the rest of the chain again, with
/// the same request, for as long as the response is retryable.
///
/// What is retryable is decided per request by its `Retry-Policy` header, e.g.
/// `codes="[500 599] 429", attempts=3`: a response whose status is in `codes` is discarded and
/// the request replayed, up to `attempts` times. The response that is finally forwarded carries
/// a `Retry-Attempt` header with the number of replays.
///
/// Requests without a policy, websocket upgrades and chunked uploads pass straight through.
///
///```rust
///     use replay_middleware::{HandlerBuilder, UpstreamHandler};
///     use replay_retry::RetryReplayMiddleware;
///     use reqwest::{Client, Url};
///
///     let upstream = UpstreamHandler::new(Client::new(), Url::parse("http://localhost:8080").unwrap());
///     let handler = HandlerBuilder::new(upstream)
///         .with(RetryReplayMiddleware::new())
///         .build();
///```
#[derive(Debug)]
pub struct RetryReplayMiddleware {
    config: RetryReplayConfig,
    pool: BufferPool,
}

impl RetryReplayMiddleware {
    pub fn new() -> Self {
        Self::new_with_config(RetryReplayConfig::default())
    }

    pub fn new_with_config(config: RetryReplayConfig) -> Self {
        let pool = BufferPool::new(config.pool_size(), config.buffer_capacity());
        Self { config, pool }
    }

    pub fn config(&self) -> &RetryReplayConfig {
        &self.config
    }

    /// The pool request bodies are buffered in.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Returns true if the request must reach the handler untouched.
    fn bypass(&self, headers: &HeaderMap) -> bool {
        let websocket =
            has_token(headers, &CONNECTION, "upgrade") && has_token(headers, &UPGRADE, "websocket");
        let chunked = has_token(headers, &TRANSFER_ENCODING, "chunked");
        let no_policy = headers
            .get(self.config.policy_header())
            .map_or(true, |value| value.is_empty());

        websocket || chunked || no_policy
    }

    fn policy(&self, headers: &HeaderMap) -> Option<RetryPolicy> {
        match RetryPolicy::from_headers(headers, self.config.policy_header()) {
            Ok(policy) => Some(policy),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed retry policy");
                None
            }
        }
    }
}

impl Default for RetryReplayMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Middleware for RetryReplayMiddleware {
    async fn handle(
        &self,
        req: Request,
        rw: &mut dyn ResponseWriter,
        next: Next<'_>,
    ) -> Result<()> {
        if self.bypass(req.headers()) {
            tracing::debug!("Request is not replayable, passing it through");
            return next.run(req, rw).await;
        }

        let (parts, body) = req.into_parts();

        let mut buffer = self.pool.acquire();
        if let Err(err) = body.read_to_end(&mut buffer).await {
            tracing::warn!(error = %err, "Failed to buffer the request body");
            internal_server_error(rw);
            return Ok(());
        }

        let policy = self.policy(&parts.headers);
        if let Some(policy) = &policy {
            tracing::debug!(%policy, "Replaying request under retry policy");
        }

        let body = Bytes::copy_from_slice(&buffer);
        drop(buffer);

        let mut attempt: u64 = 0;
        loop {
            let mut replay = Request::new(Body::from(body.clone()));
            *replay.method_mut() = parts.method.clone();
            *replay.uri_mut() = parts.uri.clone();
            *replay.version_mut() = parts.version;
            *replay.headers_mut() = parts.headers.clone();
            *replay.extensions_mut() = parts.extensions.clone();

            let mut writer = RetryResponseWriter::new(
                &mut *rw,
                policy.as_ref(),
                attempt,
                self.config.attempt_header(),
            );
            next.clone().run(replay, &mut writer).await?;

            match writer.finish() {
                AttemptOutcome::Retry { status } => {
                    tracing::warn!(
                        attempt,
                        status = status.as_u16(),
                        "Retry attempt #{}. Discarding response with status {}",
                        attempt + 1,
                        status
                    );
                    attempt += 1;
                }
                AttemptOutcome::Forwarded { status } => {
                    tracing::debug!(attempt, status = status.as_u16(), "Response forwarded");
                    return Ok(());
                }
            }
        }
    }
}

/// Whether any comma separated element of any `name` header equals `token`, ignoring case.
fn has_token(headers: &HeaderMap, name: &HeaderName, token: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|element| element.trim().eq_ignore_ascii_case(token))
}
