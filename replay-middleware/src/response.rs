use std::io;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{Response, StatusCode};

/// The sink a handler writes its response to.
///
/// Headers must be set before [`write_head`](ResponseWriter::write_head) is called; the first
/// call to `write_head` decides the status, later calls are ignored. Writing a body chunk before
/// calling `write_head` implies `200 OK`.
pub trait ResponseWriter: Send {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_head(&mut self, status: StatusCode);

    fn write(&mut self, chunk: &[u8]) -> io::Result<usize>;

    fn write_all(&mut self, mut chunk: &[u8]) -> io::Result<()> {
        while !chunk.is_empty() {
            match self.write(chunk)? {
                0 => return Err(io::ErrorKind::WriteZero.into()),
                n => chunk = &chunk[n..],
            }
        }
        Ok(())
    }
}

/// Writes a plain text `500 Internal Server Error` response.
pub fn internal_server_error(rw: &mut dyn ResponseWriter) {
    let headers = rw.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    rw.write_head(StatusCode::INTERNAL_SERVER_ERROR);
    // Nothing useful can be done if the client is gone.
    let _ = rw.write_all(b"Internal Server Error\n");
}

/// A [`ResponseWriter`] that keeps the whole response in memory.
#[derive(Debug, Default)]
pub struct RecordingResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RecordingResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status written so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the recording into a response. A handler that wrote nothing responded `200 OK`.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for RecordingResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK);
        self.body.extend_from_slice(chunk);
        Ok(chunk.len())
    }
}
