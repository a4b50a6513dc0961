use http::header::HeaderName;

/// Configuration of [`RetryReplayMiddleware`].
///
/// ```
/// use http::header::HeaderName;
/// use replay_retry::RetryReplayConfig;
///
/// let config = RetryReplayConfig::default()
///     .with_policy_header(HeaderName::from_static("x-retry-policy"))
///     .with_pool_size(16);
///
/// assert_eq!(config.policy_header().as_str(), "x-retry-policy");
/// assert_eq!(config.attempt_header().as_str(), "retry-attempt");
/// ```
///
/// [`RetryReplayMiddleware`]: crate::RetryReplayMiddleware
#[derive(Debug, Clone)]
pub struct RetryReplayConfig {
    policy_header: HeaderName,
    attempt_header: HeaderName,
    pool_size: usize,
    buffer_capacity: usize,
}

impl Default for RetryReplayConfig {
    fn default() -> Self {
        RetryReplayConfig {
            policy_header: HeaderName::from_static("retry-policy"),
            attempt_header: HeaderName::from_static("retry-attempt"),
            pool_size: 64,
            buffer_capacity: 512,
        }
    }
}

impl RetryReplayConfig {
    /// The request header carrying the retry policy.
    pub fn with_policy_header(mut self, name: HeaderName) -> Self {
        self.policy_header = name;
        self
    }

    /// The response header carrying the attempt number of a replayed request.
    pub fn with_attempt_header(mut self, name: HeaderName) -> Self {
        self.attempt_header = name;
        self
    }

    /// How many idle body buffers are kept for reuse.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// The initial capacity of a freshly allocated body buffer.
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn policy_header(&self) -> &HeaderName {
        &self.policy_header
    }

    pub fn attempt_header(&self) -> &HeaderName {
        &self.attempt_header
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }
}
