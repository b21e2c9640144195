//! The request handler seam negotiation is wired into.
//!
//! Hosts hand requests to a [`Handler`]; [`crate::decorator`] wraps one handler into
//! another that negotiates the language first.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use http::{Request, Response};
use http_body::Body;

#[async_trait]
pub trait Handler<ReqBody>: Send + Sync {
    type RespBody: Body;
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error>;
}

/// A handler backed by an async function.
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[async_trait]
impl<ReqBody, RespBody, Err, F, Fut> Handler<ReqBody> for FnHandler<F>
where
    RespBody: Body,
    ReqBody: Send + 'static,
    F: Fn(Request<ReqBody>) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response<RespBody>, Err>> + Send,
{
    type RespBody = RespBody;
    type Error = Err;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, ReqBody, Ret>(f: F) -> FnHandler<F>
where
    F: Fn(Request<ReqBody>) -> Ret,
    Ret: Future,
{
    FnHandler { f }
}

#[cfg(test)]
mod tests {
    use std::io;

    use http::{Request, Response, StatusCode};

    use super::{make_handler, Handler};

    async fn not_found(req: Request<()>) -> Result<Response<String>, io::Error> {
        let mut resp = Response::new(format!("{} not found", req.uri().path()));
        *resp.status_mut() = StatusCode::NOT_FOUND;
        Ok(resp)
    }

    fn assert_is_handler<H: Handler<()>>(_handler: &H) {
        // no op
    }

    #[tokio::test]
    async fn test_fn_is_handler() {
        let handler = make_handler(not_found);
        assert_is_handler(&handler);

        let resp = handler.call(Request::builder().uri("/missing").body(()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.body(), "/missing not found");
    }
}
