use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// There was an error running some middleware
    #[error("Middleware error: {0}")]
    Middleware(#[from] anyhow::Error),
    /// Error from the upstream reqwest client
    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Error reading a request body or writing a response
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn middleware<E>(err: E) -> Self
    where
        E: 'static + Send + Sync + std::error::Error,
    {
        Error::Middleware(err.into())
    }

    /// Returns true if the error is related to a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Reqwest(e) => e.is_timeout(),
            Error::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            Error::Middleware(_) => false,
        }
    }

    /// Returns true if the error happened while connecting upstream.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn is_connect(&self) -> bool {
        match self {
            Error::Reqwest(e) => e.is_connect(),
            Error::Middleware(_) | Error::Io(_) => false,
        }
    }

    /// Returns the status code, if the error was generated from an upstream response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Reqwest(e) => e.status(),
            Error::Middleware(_) | Error::Io(_) => None,
        }
    }
}
