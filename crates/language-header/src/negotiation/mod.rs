//! Language negotiation pipeline.
//!
//! A [`LanguageNegotiator`] asks its [`NegotiationMethod`]s, lightest weight first,
//! for a language code. The first code naming a configured language wins. When no
//! method decides, the site default language is used.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use language_header::cache::PageCacheKillSwitch;
//! use language_header::negotiation::{fn_method, LanguageNegotiator};
//! use language_header::registry::ConfigurableLanguageRegistry;
//!
//! let registry = ConfigurableLanguageRegistry::new("en").with_standard_language("en").with_standard_language("de");
//!
//! let negotiator = LanguageNegotiator::builder(Arc::new(registry))
//!     .method(fn_method("language-url", 0, |req, _| {
//!         req.filter(|req| req.uri().path().starts_with("/de/")).map(|_| "de".to_owned())
//!     }))
//!     .build();
//!
//! let negotiated = negotiator.negotiate(None, &PageCacheKillSwitch::new());
//! assert_eq!(negotiated.langcode(), "en");
//! ```

mod http_header;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheKillSwitch;
use crate::registry::LanguageRegistry;
use crate::RequestContext;

pub use http_header::HttpHeaderNegotiation;

/// Id reported when no method decided and the default language was used.
pub const LANGUAGE_DEFAULT_METHOD_ID: &str = "language-default";

/// A pluggable strategy deciding the language of a request.
pub trait NegotiationMethod: Send + Sync {
    fn id(&self) -> &str;

    /// Methods with a lower weight are asked first.
    fn weight(&self) -> i32;

    /// Returns the language code for the request, `None` for no decision.
    fn langcode(&self, request: Option<&RequestContext<'_>>, kill_switch: &dyn CacheKillSwitch) -> Option<String>;
}

/// A method that wraps a closure.
struct FnMethod<F> {
    id: String,
    weight: i32,
    f: F,
}

impl<F> NegotiationMethod for FnMethod<F>
where
    F: Fn(Option<&RequestContext<'_>>, &dyn CacheKillSwitch) -> Option<String> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> i32 {
        self.weight
    }

    fn langcode(&self, request: Option<&RequestContext<'_>>, kill_switch: &dyn CacheKillSwitch) -> Option<String> {
        (self.f)(request, kill_switch)
    }
}

/// Creates a negotiation method from a closure.
pub fn fn_method<F>(id: impl Into<String>, weight: i32, f: F) -> impl NegotiationMethod
where
    F: Fn(Option<&RequestContext<'_>>, &dyn CacheKillSwitch) -> Option<String> + Send + Sync,
{
    FnMethod { id: id.into(), weight, f }
}

/// The outcome of negotiation: the selected language and the method which chose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    langcode: String,
    method_id: String,
}

impl Negotiated {
    pub fn new(langcode: impl Into<String>, method_id: impl Into<String>) -> Self {
        Self { langcode: langcode.into(), method_id: method_id.into() }
    }

    pub fn langcode(&self) -> &str {
        &self.langcode
    }

    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    /// Whether the site default was used because no method decided.
    pub fn is_fallback(&self) -> bool {
        self.method_id == LANGUAGE_DEFAULT_METHOD_ID
    }
}

pub struct LanguageNegotiator {
    methods: Vec<Box<dyn NegotiationMethod>>,
    registry: Arc<dyn LanguageRegistry>,
}

impl fmt::Debug for LanguageNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageNegotiator")
            .field("methods", &self.methods.iter().map(|method| method.id()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LanguageNegotiator {
    pub fn builder(registry: Arc<dyn LanguageRegistry>) -> LanguageNegotiatorBuilder {
        LanguageNegotiatorBuilder::new(registry)
    }

    /// Ids of the methods in the order they are asked.
    pub fn method_ids(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|method| method.id())
    }

    pub fn negotiate(&self, request: Option<&RequestContext<'_>>, kill_switch: &dyn CacheKillSwitch) -> Negotiated {
        for method in &self.methods {
            let Some(langcode) = method.langcode(request, kill_switch) else {
                continue;
            };

            if self.registry.is_configured(&langcode) {
                debug!(method = method.id(), langcode = %langcode, "negotiated language");
                return Negotiated::new(langcode, method.id());
            }

            debug!(method = method.id(), langcode = %langcode, "ignoring language which is not configured");
        }

        let default_language = self.registry.default_language();
        debug!(langcode = default_language.id(), "no method decided, using default language");
        Negotiated::new(default_language.id(), LANGUAGE_DEFAULT_METHOD_ID)
    }
}

pub struct LanguageNegotiatorBuilder {
    methods: Vec<Box<dyn NegotiationMethod>>,
    registry: Arc<dyn LanguageRegistry>,
}

impl fmt::Debug for LanguageNegotiatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageNegotiatorBuilder").field("methods", &self.methods.len()).finish_non_exhaustive()
    }
}

impl LanguageNegotiatorBuilder {
    fn new(registry: Arc<dyn LanguageRegistry>) -> Self {
        Self { methods: vec![], registry }
    }

    pub fn method<M: NegotiationMethod + 'static>(mut self, method: M) -> Self {
        self.methods.push(Box::new(method));
        self
    }

    /// Orders the methods by weight. Methods of equal weight keep insertion order.
    pub fn build(mut self) -> LanguageNegotiator {
        self.methods.sort_by_key(|method| method.weight());
        LanguageNegotiator { methods: self.methods, registry: self.registry }
    }
}
