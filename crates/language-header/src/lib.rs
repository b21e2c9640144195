//! Select the response language from HTTP request headers.
//!
//! Site administrators map request header name/value pairs, such as `X-Language: de`,
//! to a configured site language. At request time [`HttpHeaderNegotiation`] walks the
//! stored mappings and picks the language of the first entry the request matches.
//!
//! The crate is made of:
//! - [`mapping`]: the ordered mapping table and its persisted form
//! - [`config`]: storage of the mapping table
//! - [`registry`]: the site languages
//! - [`admin`]: the mapping form, rendering and submission
//! - [`negotiation`]: the negotiation pipeline and the header negotiation method
//! - [`decorator`]: wires negotiation around a request [`handler`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use http::Request;
//! use language_header::admin::{FormSubmission, MappingForm, MappingRow};
//! use language_header::cache::PageCacheKillSwitch;
//! use language_header::config::{ConfigStore, MemoryConfigStore};
//! use language_header::registry::{ConfigurableLanguageRegistry, LanguageRegistry};
//! use language_header::{HttpHeaderNegotiation, RequestContext};
//!
//! let store: Arc<dyn ConfigStore> = Arc::new(MemoryConfigStore::new());
//! let registry: Arc<dyn LanguageRegistry> = Arc::new(ConfigurableLanguageRegistry::new("en").with_standard_language("de"));
//!
//! let form = MappingForm::new(Arc::clone(&store), Arc::clone(&registry));
//! form.submit(&FormSubmission::new(vec![], MappingRow::new("X-Language", "de", "de"))).unwrap();
//!
//! let negotiation = HttpHeaderNegotiation::new(store, registry);
//! let request = Request::builder().header("X-Language", "de").body(()).unwrap();
//! let kill_switch = PageCacheKillSwitch::new();
//!
//! let langcode = negotiation.decide(Some(&RequestContext::from_request(&request)), &kill_switch);
//! assert_eq!(langcode.as_deref(), Some("de"));
//! assert!(kill_switch.is_triggered());
//! ```

mod request;

pub mod admin;
pub mod cache;
pub mod config;
pub mod decorator;
pub mod handler;
pub mod mapping;
pub mod negotiation;
pub mod registry;

pub use negotiation::HttpHeaderNegotiation;
pub use negotiation::LanguageNegotiator;
pub use negotiation::Negotiated;
pub use request::RequestContext;
