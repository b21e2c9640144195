//! Read only view of the request parts negotiation looks at.

use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri};
use mime::Mime;

/// Borrows the method, URI and headers of an incoming request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'req> {
    method: &'req Method,
    uri: &'req Uri,
    headers: &'req HeaderMap,
}

impl<'req> RequestContext<'req> {
    pub fn new(method: &'req Method, uri: &'req Uri, headers: &'req HeaderMap) -> Self {
        Self { method, uri, headers }
    }

    pub fn from_request<B>(request: &'req Request<B>) -> Self {
        Self::new(request.method(), request.uri(), request.headers())
    }

    pub fn from_parts(parts: &'req Parts) -> Self {
        Self::new(&parts.method, &parts.uri, &parts.headers)
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &'req Method {
        self.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &'req Uri {
        self.uri
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &'req HeaderMap {
        self.headers
    }

    /// Parses the declared `Content-Type`, `None` when absent or malformed.
    pub fn content_type(&self) -> Option<Mime> {
        self.headers.get(http::header::CONTENT_TYPE)?.to_str().ok()?.parse().ok()
    }
}

impl<'req, B> From<&'req Request<B>> for RequestContext<'req> {
    fn from(request: &'req Request<B>) -> Self {
        Self::from_request(request)
    }
}
