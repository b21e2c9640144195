//! Negotiates the response language around a request handler.
//!
//! For every request the decorated handler:
//! - runs the [`LanguageNegotiator`] with a fresh request scoped kill switch
//! - stores the [`Negotiated`] language in the request extensions for the inner handler
//! - sets `Content-Language` on the response unless the inner handler already did
//! - marks the response `Cache-Control: private, no-store` when negotiation asked for
//!   the page cache to be bypassed

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderValue, Request, Response};
use tracing::warn;

use crate::cache::{CacheBypass, PageCacheKillSwitch};
use crate::decorator::Decorator;
use crate::handler::Handler;
use crate::negotiation::{LanguageNegotiator, Negotiated};
use crate::RequestContext;

#[derive(Clone)]
pub struct LanguageNegotiationDecorator {
    negotiator: Arc<LanguageNegotiator>,
}

impl fmt::Debug for LanguageNegotiationDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageNegotiationDecorator").field("negotiator", &self.negotiator).finish()
    }
}

impl LanguageNegotiationDecorator {
    pub fn new(negotiator: Arc<LanguageNegotiator>) -> Self {
        Self { negotiator }
    }
}

pub struct NegotiatedHandler<H> {
    handler: H,
    negotiator: Arc<LanguageNegotiator>,
}

impl<H> fmt::Debug for NegotiatedHandler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegotiatedHandler").field("negotiator", &self.negotiator).finish_non_exhaustive()
    }
}

impl<H> Decorator<H> for LanguageNegotiationDecorator {
    type Out = NegotiatedHandler<H>;

    fn decorate(&self, raw: H) -> Self::Out {
        NegotiatedHandler { handler: raw, negotiator: Arc::clone(&self.negotiator) }
    }
}

#[async_trait]
impl<H, ReqBody> Handler<ReqBody> for NegotiatedHandler<H>
where
    H: Handler<ReqBody>,
    ReqBody: Send + 'static,
{
    type RespBody = H::RespBody;
    type Error = H::Error;

    async fn call(&self, mut req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        let kill_switch = PageCacheKillSwitch::new();
        let negotiated = self.negotiator.negotiate(Some(&RequestContext::from_request(&req)), &kill_switch);

        let content_language = HeaderValue::from_str(negotiated.langcode());
        req.extensions_mut().insert::<Negotiated>(negotiated);

        let mut resp = self.handler.call(req).await?;

        match content_language {
            Ok(value) => {
                resp.headers_mut().entry(http::header::CONTENT_LANGUAGE).or_insert(value);
            }
            Err(e) => warn!(cause = %e, "negotiated langcode is not a valid header value"),
        }

        if kill_switch.is_triggered() {
            resp.headers_mut().insert(http::header::CACHE_CONTROL, HeaderValue::from_static("private, no-store"));
            resp.extensions_mut().insert(CacheBypass);
        }

        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;

    use http::{HeaderValue, Request, Response};

    use crate::cache::CacheBypass;
    use crate::config::MemoryConfigStore;
    use crate::decorator::{Decorator, LanguageNegotiationDecorator};
    use crate::handler::{make_handler, Handler};
    use crate::mapping::{MappingKey, MappingTable, MappingsConfig};
    use crate::negotiation::{fn_method, HttpHeaderNegotiation, LanguageNegotiator, Negotiated};
    use crate::registry::{ConfigurableLanguageRegistry, LanguageRegistry};

    async fn echo_language(req: Request<()>) -> Result<Response<String>, Infallible> {
        let negotiated = req.extensions().get::<Negotiated>().cloned();
        let body = negotiated.map(|n| format!("{}/{}", n.langcode(), n.method_id())).unwrap_or_default();
        Ok(Response::new(body))
    }

    async fn french_page(_req: Request<()>) -> Result<Response<String>, Infallible> {
        let mut resp = Response::new("bonjour".to_owned());
        resp.headers_mut().insert(http::header::CONTENT_LANGUAGE, HeaderValue::from_static("fr"));
        Ok(resp)
    }

    fn decorator(with_header_method: bool) -> LanguageNegotiationDecorator {
        let registry: Arc<dyn LanguageRegistry> = Arc::new(
            ConfigurableLanguageRegistry::new("en")
                .with_standard_language("en")
                .with_standard_language("de")
                .with_standard_language("fr"),
        );

        let mut table = MappingTable::new();
        table.insert(MappingKey::new("X-Language", "de").unwrap(), "de");
        let store = Arc::new(MemoryConfigStore::with_config(MappingsConfig::new(table)));

        let mut builder = LanguageNegotiator::builder(Arc::clone(&registry))
            .method(fn_method("language-url", 1, |req, _| {
                req.filter(|req| req.uri().path().starts_with("/fr/")).map(|_| "fr".to_owned())
            }));
        if with_header_method {
            builder = builder.method(HttpHeaderNegotiation::new(store, registry));
        }

        LanguageNegotiationDecorator::new(Arc::new(builder.build()))
    }

    #[tokio::test]
    async fn test_header_mapping_selects_language() {
        let handler = decorator(true).decorate(make_handler(echo_language));
        let req = Request::builder().uri("/node/1").header("X-Language", "de").body(()).unwrap();

        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.body(), "de/language-header");
        assert_eq!(resp.headers().get(http::header::CONTENT_LANGUAGE).unwrap(), "de");
        assert_eq!(resp.headers().get(http::header::CACHE_CONTROL).unwrap(), "private, no-store");
        assert_eq!(resp.extensions().get::<CacheBypass>(), Some(&CacheBypass));
    }

    #[tokio::test]
    async fn test_cache_bypassed_without_match() {
        let handler = decorator(true).decorate(make_handler(echo_language));
        let req = Request::builder().uri("/fr/node/1").body(()).unwrap();

        let resp = handler.call(req).await.unwrap();
        // the header method runs first (weight -2) and signals even without a match
        assert_eq!(resp.body(), "fr/language-url");
        assert_eq!(resp.headers().get(http::header::CACHE_CONTROL).unwrap(), "private, no-store");
    }

    #[tokio::test]
    async fn test_cacheable_without_header_method() {
        let handler = decorator(false).decorate(make_handler(echo_language));
        let req = Request::builder().uri("/node/1").header("X-Language", "de").body(()).unwrap();

        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.body(), "en/language-default");
        assert_eq!(resp.headers().get(http::header::CONTENT_LANGUAGE).unwrap(), "en");
        assert!(resp.headers().get(http::header::CACHE_CONTROL).is_none());
        assert!(resp.extensions().get::<CacheBypass>().is_none());
    }

    #[tokio::test]
    async fn test_keeps_content_language_of_inner_handler() {
        let handler = decorator(true).decorate(make_handler(french_page));
        let req = Request::builder().header("X-Language", "de").body(()).unwrap();

        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.headers().get(http::header::CONTENT_LANGUAGE).unwrap(), "fr");
    }
}
