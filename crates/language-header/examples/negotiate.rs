use std::convert::Infallible;
use std::sync::Arc;

use http::{Method, Request, Response};
use language_header::admin::MappingForm;
use language_header::config::{ConfigStore, JsonFileConfigStore};
use language_header::decorator::{Decorator, LanguageNegotiationDecorator};
use language_header::handler::{make_handler, Handler};
use language_header::negotiation::fn_method;
use language_header::registry::{ConfigurableLanguageRegistry, LanguageRegistry};
use language_header::{HttpHeaderNegotiation, LanguageNegotiator, Negotiated};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

async fn hello(req: Request<()>) -> Result<Response<String>, Infallible> {
    let langcode = req.extensions().get::<Negotiated>().map(|n| n.langcode().to_owned()).unwrap_or_default();
    let greeting = match langcode.as_str() {
        "de" => "Hallo Welt",
        "fr" => "Bonjour le monde",
        _ => "Hello world",
    };
    Ok(Response::new(format!("{greeting}\r\n")))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            error!(cause = %e, "failed to create config dir");
            return;
        }
    };

    let file_store = JsonFileConfigStore::in_dir(dir.path());
    let path = file_store.path().to_path_buf();
    let store: Arc<dyn ConfigStore> = Arc::new(file_store);
    let registry: Arc<dyn LanguageRegistry> = Arc::new(
        ConfigurableLanguageRegistry::new("en")
            .with_standard_language("en")
            .with_standard_language("de")
            .with_standard_language("fr"),
    );

    // what the admin form posts: two mappings, one incomplete row and an empty new row
    let form = MappingForm::new(Arc::clone(&store), Arc::clone(&registry));
    let body = "mappings[0][header_name]=X-Language&mappings[0][header_value]=de&mappings[0][langcode]=de\
                &mappings[1][header_name]=X-Region&mappings[1][header_value]=ch-fr&mappings[1][langcode]=fr\
                &mappings[2][header_name]=&mappings[2][header_value]=it&mappings[2][langcode]=it\
                &new_mapping[header_name]=&new_mapping[header_value]=&new_mapping[langcode]=en";
    match form.submit_urlencoded(body) {
        Ok(outcome) => info!(dropped = outcome.dropped.len(), path = %path.display(), "mappings saved"),
        Err(e) => {
            error!(cause = %e, "failed to save mappings");
            return;
        }
    }

    let negotiator = LanguageNegotiator::builder(Arc::clone(&registry))
        .method(HttpHeaderNegotiation::new(store, registry))
        .method(fn_method("language-url", 0, |req, _| {
            req.filter(|req| req.uri().path().starts_with("/fr/")).map(|_| "fr".to_owned())
        }))
        .build();
    let handler = LanguageNegotiationDecorator::new(Arc::new(negotiator)).decorate(make_handler(hello));

    let requests = [
        Request::builder().uri("/").header("X-Language", "de").body(()),
        Request::builder().uri("/").header("X-Region", "ch-fr").body(()),
        Request::builder().uri("/fr/about").body(()),
        Request::builder()
            .method(Method::DELETE)
            .uri("/jsonapi/node/article/1")
            .header("X-Language", "de")
            .header(http::header::CONTENT_TYPE, "application/vnd.api+json")
            .body(()),
    ];

    for request in requests {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "invalid request");
                continue;
            }
        };

        let uri = request.uri().clone();
        let Ok(resp) = handler.call(request).await;
        info!(
            %uri,
            content_language = ?resp.headers().get(http::header::CONTENT_LANGUAGE),
            cache_control = ?resp.headers().get(http::header::CACHE_CONTROL),
            body = resp.body().trim_end(),
            "handled request"
        );
    }
}
