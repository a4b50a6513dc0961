//! This crate provides [`HandlerWithMiddleware`], a wrapper around a [`Handler`] with the ability
//! to attach middleware which runs on every request it serves.
//!
//! Handlers write their response through a [`ResponseWriter`]: headers first, then the status,
//! then the body. Middleware sees the request before the handler does and can hand the handler a
//! writer of its own to observe or hold back what it writes.
//!
//! ```
//! use replay_middleware::{
//!     Handler, HandlerBuilder, Middleware, Next, RecordingResponseWriter, Request,
//!     ResponseWriter, Result,
//! };
//!
//! struct Hello;
//!
//! #[async_trait::async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _req: Request, rw: &mut dyn ResponseWriter) -> Result<()> {
//!         rw.write_all(b"hello")?;
//!         Ok(())
//!     }
//! }
//!
//! struct LoggingMiddleware;
//!
//! #[async_trait::async_trait]
//! impl Middleware for LoggingMiddleware {
//!     async fn handle(
//!         &self,
//!         req: Request,
//!         rw: &mut dyn ResponseWriter,
//!         next: Next<'_>,
//!     ) -> Result<()> {
//!         println!("Request started {:?}", req);
//!         let res = next.run(req, rw).await;
//!         println!("Result: {:?}", res);
//!         res
//!     }
//! }
//!
//! async fn run() {
//!     let handler = HandlerBuilder::new(Hello).with(LoggingMiddleware).build();
//!
//!     let mut rw = RecordingResponseWriter::new();
//!     handler.serve(Request::new("".into()), &mut rw).await.unwrap();
//!     assert_eq!(rw.body(), b"hello");
//! }
//!
//! futures::executor::block_on(run());
//! ```
//!
//! [`UpstreamHandler`] is a handler that forwards requests to an upstream server.
mod body;
mod error;
mod handler;
mod middleware;
mod response;
mod upstream;

pub use body::Body;
pub use error::{Error, Result};
pub use handler::{HandlerBuilder, HandlerWithMiddleware};
pub use middleware::{BoxFuture, Handler, Middleware, Next, Request};
pub use response::{internal_server_error, RecordingResponseWriter, ResponseWriter};
pub use upstream::UpstreamHandler;
