use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::{debug, warn};

use crate::cache::CacheKillSwitch;
use crate::config::ConfigStore;
use crate::negotiation::NegotiationMethod;
use crate::registry::LanguageRegistry;
use crate::RequestContext;

const JSONAPI_PATH_PREFIX: &str = "/jsonapi";
const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Selects the language from administrator configured request header mappings.
///
/// The stored mapping table is walked in stored order and the first entry whose header
/// is present on the request with exactly the mapped value decides the language.
/// Every invocation triggers the page cache kill switch, since the selected language
/// is not reflected in the page cache key.
pub struct HttpHeaderNegotiation {
    config: Arc<dyn ConfigStore>,
    registry: Arc<dyn LanguageRegistry>,
}

impl fmt::Debug for HttpHeaderNegotiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpHeaderNegotiation").finish_non_exhaustive()
    }
}

impl HttpHeaderNegotiation {
    pub const METHOD_ID: &'static str = "language-header";
    pub const WEIGHT: i32 = -2;

    pub fn new(config: Arc<dyn ConfigStore>, registry: Arc<dyn LanguageRegistry>) -> Self {
        Self { config, registry }
    }

    /// Decides the language of `request`, `None` when no mapping applies.
    pub fn decide(&self, request: Option<&RequestContext<'_>>, kill_switch: &dyn CacheKillSwitch) -> Option<String> {
        let langcode = request.and_then(|request| self.select(request));
        kill_switch.trigger();
        langcode
    }

    fn select(&self, request: &RequestContext<'_>) -> Option<String> {
        let config = match self.config.load() {
            Ok(Some(config)) => config,
            Ok(None) => return None,
            Err(e) => {
                warn!(cause = %e, "failed to load header mappings, skip header negotiation");
                return None;
            }
        };

        let (key, langcode) = config.map.find_match(request.headers())?;

        if is_jsonapi_delete(request) {
            let default_language = self.registry.default_language();
            debug!(
                header = key.name(),
                langcode = default_language.id(),
                "header mapping matched a JSON:API delete request, using default language"
            );
            return Some(default_language.id().to_owned());
        }

        debug!(header = key.name(), langcode, "header mapping matched");
        Some(langcode.to_owned())
    }
}

fn is_jsonapi_delete(request: &RequestContext<'_>) -> bool {
    request.method() == Method::DELETE
        && request.uri().path().starts_with(JSONAPI_PATH_PREFIX)
        && request.content_type().is_some_and(|content_type| content_type.essence_str() == JSONAPI_MEDIA_TYPE)
}

impl NegotiationMethod for HttpHeaderNegotiation {
    fn id(&self) -> &str {
        Self::METHOD_ID
    }

    fn weight(&self) -> i32 {
        Self::WEIGHT
    }

    fn langcode(&self, request: Option<&RequestContext<'_>>, kill_switch: &dyn CacheKillSwitch) -> Option<String> {
        self.decide(request, kill_switch)
    }
}
