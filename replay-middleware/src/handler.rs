use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::{Handler, Middleware, Next, Request};
use crate::response::ResponseWriter;

/// A `HandlerBuilder` is used to build a [`HandlerWithMiddleware`].
///
/// [`HandlerWithMiddleware`]: crate::HandlerWithMiddleware
pub struct HandlerBuilder {
    handler: Arc<dyn Handler>,
    middleware_stack: Vec<Arc<dyn Middleware>>,
}

impl HandlerBuilder {
    pub fn new<H>(handler: H) -> Self
    where
        H: Handler,
    {
        HandlerBuilder {
            handler: Arc::new(handler),
            middleware_stack: Vec::new(),
        }
    }

    /// Convenience method to attach middleware.
    ///
    /// If you need to keep a reference to the middleware after attaching, use [`with_arc`].
    ///
    /// [`with_arc`]: Self::with_arc
    pub fn with<M>(self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.with_arc(Arc::new(middleware))
    }

    /// Add middleware to the chain. [`with`] is more ergonomic if you don't need the `Arc`.
    ///
    /// [`with`]: Self::with
    pub fn with_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware_stack.push(middleware);
        self
    }

    /// Returns a `HandlerWithMiddleware` using this builder configuration.
    pub fn build(self) -> HandlerWithMiddleware {
        HandlerWithMiddleware {
            handler: self.handler,
            middleware_stack: self.middleware_stack.into_boxed_slice(),
        }
    }
}

/// `HandlerWithMiddleware` wraps a [`Handler`] and runs middleware on every request it serves.
#[derive(Clone)]
pub struct HandlerWithMiddleware {
    handler: Arc<dyn Handler>,
    middleware_stack: Box<[Arc<dyn Middleware>]>,
}

impl HandlerWithMiddleware {
    /// See [`HandlerBuilder`] for a more ergonomic way to build `HandlerWithMiddleware` instances.
    pub fn new<T>(handler: Arc<dyn Handler>, middleware_stack: T) -> Self
    where
        T: Into<Box<[Arc<dyn Middleware>]>>,
    {
        HandlerWithMiddleware {
            handler,
            middleware_stack: middleware_stack.into(),
        }
    }

    /// Runs `req` through the middleware chain and the wrapped handler.
    pub async fn serve(&self, req: Request, rw: &mut dyn ResponseWriter) -> Result<()> {
        let next = Next::new(&*self.handler, &self.middleware_stack);
        next.run(req, rw).await
    }
}

#[async_trait::async_trait]
impl Handler for HandlerWithMiddleware {
    async fn handle(&self, req: Request, rw: &mut dyn ResponseWriter) -> Result<()> {
        self.serve(req, rw).await
    }
}

impl fmt::Debug for HandlerWithMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerWithMiddleware")
            .field("middleware_stack", &self.middleware_stack.len())
            .finish_non_exhaustive()
    }
}
