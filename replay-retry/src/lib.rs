//! Middleware to replay requests whose response is retryable.
//!
//! The client states in a `Retry-Policy` request header which response statuses it considers
//! transient and how many times the request may be replayed:
//!
//! ```text
//! Retry-Policy: codes="[500 599] 429", attempts=3
//! ```
//!
//! [`RetryReplayMiddleware`] buffers the request body so it can send the same request down the
//! chain again, and holds back every response that matches the policy until the attempts run
//! out. `codes` uses the range syntax of [`status_ranges::Range`].
//!
//! ```
//! use replay_middleware::{
//!     Handler, HandlerBuilder, RecordingResponseWriter, Request, ResponseWriter, Result,
//! };
//! use replay_retry::RetryReplayMiddleware;
//!
//! struct Flaky(std::sync::atomic::AtomicU32);
//!
//! #[async_trait::async_trait]
//! impl Handler for Flaky {
//!     async fn handle(&self, _req: Request, rw: &mut dyn ResponseWriter) -> Result<()> {
//!         let calls = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
//!         let status = if calls == 0 { 503 } else { 200 };
//!         rw.write_head(http::StatusCode::from_u16(status).unwrap());
//!         Ok(())
//!     }
//! }
//!
//! async fn run() {
//!     let handler = HandlerBuilder::new(Flaky(Default::default()))
//!         .with(RetryReplayMiddleware::new())
//!         .build();
//!
//!     let mut req = Request::new("payload".into());
//!     req.headers_mut()
//!         .insert("retry-policy", "codes=\"503\", attempts=1".parse().unwrap());
//!
//!     let mut rw = RecordingResponseWriter::new();
//!     handler.serve(req, &mut rw).await.unwrap();
//!     assert_eq!(rw.status(), Some(http::StatusCode::OK));
//!     assert_eq!(rw.headers()["retry-attempt"], "1");
//! }
//!
//! futures::executor::block_on(run());
//! ```

mod config;
mod middleware;
mod policy;
mod pool;
mod writer;

pub use config::RetryReplayConfig;
pub use middleware::RetryReplayMiddleware;
pub use policy::{PolicyError, RetryPolicy};
pub use pool::{BufferPool, PooledBuffer};
pub use writer::{AttemptOutcome, RetryResponseWriter};
