use std::fmt;
use std::io;

use bytes::Bytes;
use futures::io::{AsyncRead, AsyncReadExt};

/// A request body: nothing, bytes already in memory, or a stream that can only be read once.
pub struct Body {
    kind: Kind,
}

enum Kind {
    Empty,
    Full(Bytes),
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl Body {
    pub fn empty() -> Self {
        Body { kind: Kind::Empty }
    }

    /// Wraps a reader, e.g. the connection a request body is being received on.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Body {
            kind: Kind::Stream(Box::new(reader)),
        }
    }

    /// Returns the bytes of an in-memory body, or `None` for a stream.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.kind {
            Kind::Empty => Some(&[]),
            Kind::Full(bytes) => Some(bytes),
            Kind::Stream(_) => None,
        }
    }

    /// Appends the whole body to `buf`, returning the number of bytes read.
    pub async fn read_to_end(self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self.kind {
            Kind::Empty => Ok(0),
            Kind::Full(bytes) => {
                buf.extend_from_slice(&bytes);
                Ok(bytes.len())
            }
            Kind::Stream(mut reader) => reader.read_to_end(buf).await,
        }
    }

    pub async fn into_bytes(self) -> io::Result<Bytes> {
        if let Kind::Full(bytes) = &self.kind {
            return Ok(bytes.clone());
        }

        let mut buf = Vec::new();
        self.read_to_end(&mut buf).await?;
        Ok(buf.into())
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body {
            kind: Kind::Full(bytes),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Bytes::from_static(text.as_bytes()).into()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Bytes::from(text).into()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Empty => f.write_str("Body(Empty)"),
            Kind::Full(bytes) => f.debug_tuple("Body").field(bytes).finish(),
            Kind::Stream(_) => f.write_str("Body(Stream)"),
        }
    }
}
