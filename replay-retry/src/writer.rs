use std::io;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use replay_middleware::ResponseWriter;

use crate::policy::RetryPolicy;

/// What became of the response of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The response was written to the client.
    Forwarded { status: StatusCode },
    /// The response was discarded and the request should be replayed.
    Retry { status: StatusCode },
}

#[derive(Debug, Clone, Copy)]
enum State {
    Pending,
    Retrying { status: StatusCode },
    Forwarding { status: StatusCode },
}

/// Wraps the client's [`ResponseWriter`] for a single attempt.
///
/// Headers are staged until the status is known. If the status is retryable under the policy the
/// whole response is swallowed, otherwise the staged headers and everything after them go to the
/// client.
pub struct RetryResponseWriter<'a> {
    rw: &'a mut dyn ResponseWriter,
    policy: Option<&'a RetryPolicy>,
    attempt: u64,
    attempt_header: &'a HeaderName,
    staged: HeaderMap,
    state: State,
}

impl<'a> RetryResponseWriter<'a> {
    pub fn new(
        rw: &'a mut dyn ResponseWriter,
        policy: Option<&'a RetryPolicy>,
        attempt: u64,
        attempt_header: &'a HeaderName,
    ) -> Self {
        RetryResponseWriter {
            rw,
            policy,
            attempt,
            attempt_header,
            staged: HeaderMap::new(),
            state: State::Pending,
        }
    }

    /// Ends the attempt. A handler that wrote nothing responded `200 OK`.
    pub fn finish(mut self) -> AttemptOutcome {
        if let State::Pending = self.state {
            self.write_head(StatusCode::OK);
        }

        match self.state {
            State::Retrying { status } => AttemptOutcome::Retry { status },
            State::Forwarding { status } => AttemptOutcome::Forwarded { status },
            State::Pending => AttemptOutcome::Forwarded {
                status: StatusCode::OK,
            },
        }
    }

    fn retryable(&self, status: StatusCode) -> bool {
        self.policy.map_or(false, |policy| {
            policy.applicable(status) && policy.can_retry(self.attempt)
        })
    }

    fn forward(&mut self, status: StatusCode) {
        let staged = std::mem::take(&mut self.staged);
        let headers = self.rw.headers_mut();
        for name in staged.keys() {
            headers.remove(name);
        }
        for (name, value) in &staged {
            headers.append(name.clone(), value.clone());
        }
        if self.attempt > 0 {
            headers.insert(self.attempt_header.clone(), HeaderValue::from(self.attempt));
        }

        self.rw.write_head(status);
        self.state = State::Forwarding { status };
    }
}

impl ResponseWriter for RetryResponseWriter<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        match self.state {
            State::Forwarding { .. } => self.rw.headers_mut(),
            State::Pending | State::Retrying { .. } => &mut self.staged,
        }
    }

    fn write_head(&mut self, status: StatusCode) {
        if let State::Pending = self.state {
            if self.retryable(status) {
                self.staged.clear();
                self.state = State::Retrying { status };
            } else {
                self.forward(status);
            }
        }
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<usize> {
        if let State::Pending = self.state {
            self.write_head(StatusCode::OK);
        }

        match self.state {
            State::Forwarding { .. } => self.rw.write(chunk),
            State::Retrying { .. } | State::Pending => Ok(chunk.len()),
        }
    }
}
