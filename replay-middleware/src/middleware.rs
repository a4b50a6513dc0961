use std::sync::Arc;

use crate::body::Body;
use crate::error::Result;
use crate::response::ResponseWriter;

/// The request type handlers and middleware operate on.
pub type Request = http::Request<Body>;

pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// The innermost step of a chain: turns a request into a response written to `rw`.
///
/// A handler that writes nothing has responded `200 OK` with an empty body.
#[async_trait::async_trait]
pub trait Handler: 'static + Send + Sync {
    async fn handle(&self, req: Request, rw: &mut dyn ResponseWriter) -> Result<()>;
}

/// When attached to a [`HandlerWithMiddleware`] (generally using [`with`]), middleware is run
/// on every request served, in the order it was attached.
///
/// # Example
///
/// ```
/// use replay_middleware::{Middleware, Next, Request, ResponseWriter, Result};
///
/// struct TransparentMiddleware;
///
/// #[async_trait::async_trait]
/// impl Middleware for TransparentMiddleware {
///     async fn handle(
///         &self,
///         req: Request,
///         rw: &mut dyn ResponseWriter,
///         next: Next<'_>,
///     ) -> Result<()> {
///         next.run(req, rw).await
///     }
/// }
/// ```
///
/// [`HandlerWithMiddleware`]: crate::HandlerWithMiddleware
/// [`with`]: crate::HandlerBuilder::with
#[async_trait::async_trait]
pub trait Middleware: 'static + Send + Sync {
    /// Invoked with a request before it reaches the handler. If you want to continue processing
    /// the request, you should explicitly call `next.run(req, rw)`.
    ///
    /// `next` can be cloned to run the rest of the chain more than once, as long as every run
    /// gets its own request.
    async fn handle(
        &self,
        req: Request,
        rw: &mut dyn ResponseWriter,
        next: Next<'_>,
    ) -> Result<()>;
}

#[async_trait::async_trait]
impl<F> Middleware for F
where
    F: Send
        + Sync
        + 'static
        + for<'a> Fn(Request, &'a mut dyn ResponseWriter, Next<'a>) -> BoxFuture<'a, Result<()>>,
{
    async fn handle(
        &self,
        req: Request,
        rw: &mut dyn ResponseWriter,
        next: Next<'_>,
    ) -> Result<()> {
        (self)(req, rw, next).await
    }
}

/// Next encapsulates the remaining middleware chain to run in [`Middleware::handle`]. You can
/// forward the request down the chain with [`run`].
///
/// [`Middleware::handle`]: Middleware::handle
/// [`run`]: Self::run
#[derive(Clone)]
pub struct Next<'a> {
    handler: &'a dyn Handler,
    middlewares: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(handler: &'a dyn Handler, middlewares: &'a [Arc<dyn Middleware>]) -> Self {
        Next {
            handler,
            middlewares,
        }
    }

    pub fn run(mut self, req: Request, rw: &'a mut dyn ResponseWriter) -> BoxFuture<'a, Result<()>> {
        if let Some((current, rest)) = self.middlewares.split_first() {
            self.middlewares = rest;
            Box::pin(current.handle(req, rw, self))
        } else {
            self.handler.handle(req, rw)
        }
    }
}
