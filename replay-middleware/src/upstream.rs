use http::header::{self, HeaderMap, HeaderName};
use http::Uri;
use reqwest::{Client, Url};

use crate::error::Result;
use crate::middleware::{Handler, Request};
use crate::response::ResponseWriter;

const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// A [`Handler`] that forwards requests to an upstream server with a [`reqwest::Client`] and
/// streams the upstream response back.
///
/// The path and query of each request are appended to the `base` url.
#[derive(Debug, Clone)]
pub struct UpstreamHandler {
    client: Client,
    base: Url,
}

impl UpstreamHandler {
    pub fn new(client: Client, base: Url) -> Self {
        UpstreamHandler { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, uri: &Uri) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), uri.path());
        url.set_path(&path);
        url.set_query(uri.query());
        url
    }
}

#[async_trait::async_trait]
impl Handler for UpstreamHandler {
    async fn handle(&self, req: Request, rw: &mut dyn ResponseWriter) -> Result<()> {
        let (parts, body) = req.into_parts();
        let body = body.into_bytes().await?;

        let mut request = reqwest::Request::new(parts.method, self.url_for(&parts.uri));
        copy_end_to_end(&parts.headers, request.headers_mut());
        request.headers_mut().remove(header::HOST);
        if !body.is_empty() {
            *request.body_mut() = Some(body.into());
        }

        let mut response = self.client.execute(request).await?;

        copy_end_to_end(response.headers(), rw.headers_mut());
        rw.write_head(response.status());
        while let Some(chunk) = response.chunk().await? {
            rw.write_all(&chunk)?;
        }

        Ok(())
    }
}

fn copy_end_to_end(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if !HOP_BY_HOP.contains(name) {
            to.append(name.clone(), value.clone());
        }
    }
}
