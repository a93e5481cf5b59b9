//! Request dispatch: path extraction, registry lookup, handler invocation.

use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::{StatusCode, Uri};

use crate::http::{HttpRequest, HttpResponse};
use crate::routing::{Service, ServiceRegistry};

/// Content type declared for every handled response, whatever the handler
/// actually produced.
const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Resolves incoming requests to registered services and turns handler
/// output (or the absence of a match) into a wire-ready response.
///
/// Handler-level failures are not distinguished here: whatever the service
/// returns goes out with a success status.
#[derive(Default)]
pub struct RestDispatcher {
    registry: ServiceRegistry,
}

impl RestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `pattern`; false if the pattern does not
    /// compile.
    pub fn register_service(&mut self, service: Arc<dyn Service>, pattern: &str) -> bool {
        self.registry.add_service(service, pattern)
    }

    /// Route `request` to the first matching service.
    ///
    /// An undecomposable request target and an unmatched path both produce
    /// 400 Bad Request; a handled request produces 200 with the handler's
    /// body and a JSON content type.
    pub fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let path = match request.target().parse::<Uri>() {
            Ok(uri) => uri.path().to_string(),
            Err(error) => {
                tracing::warn!(target = request.target(), error = %error, "unparseable request target");
                return HttpResponse::empty(StatusCode::BAD_REQUEST);
            }
        };

        let Some((service, captures)) = self.registry.find(&path) else {
            tracing::debug!(path = %path, "no service matches path");
            return HttpResponse::empty(StatusCode::BAD_REQUEST);
        };

        let content = service.handle(request.method(), request.content(), &captures);

        let mut response = HttpResponse::new(StatusCode::OK);
        response.set_header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
        response.set_content(content.into_bytes());
        response.make_start_line();
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ItemService;

    impl Service for ItemService {
        fn handle(&self, method: &Method, content: &[u8], captures: &[String]) -> String {
            format!(
                "{{\"method\":\"{}\",\"id\":\"{}\",\"len\":{}}}",
                method,
                captures.first().map(String::as_str).unwrap_or(""),
                content.len()
            )
        }
    }

    struct CountingService(Arc<AtomicUsize>);

    impl Service for CountingService {
        fn handle(&self, _method: &Method, _content: &[u8], _captures: &[String]) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            String::new()
        }
    }

    fn get(target: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, target)
    }

    #[test]
    fn matched_path_reaches_the_handler_with_captures() {
        let mut dispatcher = RestDispatcher::new();
        assert!(dispatcher.register_service(Arc::new(ItemService), "/items/([0-9]+)"));

        let response = dispatcher.dispatch(&get("/items/42"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), JSON_UTF8);
        assert_eq!(
            response.content(),
            br#"{"method":"GET","id":"42","len":0}"#
        );
    }

    #[test]
    fn query_string_is_not_part_of_the_matched_path() {
        let mut dispatcher = RestDispatcher::new();
        assert!(dispatcher.register_service(Arc::new(ItemService), "/items/([0-9]+)"));

        let response = dispatcher.dispatch(&get("/items/42?verbose=1"));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn empty_registry_means_bad_request() {
        let dispatcher = RestDispatcher::new();
        let response = dispatcher.dispatch(&get("/items/42"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unmatched_path_means_bad_request_and_no_invocation() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = RestDispatcher::new();
        assert!(dispatcher
            .register_service(Arc::new(CountingService(invocations.clone())), "/items/([0-9]+)"));

        let response = dispatcher.dispatch(&get("/orders/42"));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn undecomposable_target_means_bad_request() {
        let dispatcher = RestDispatcher::new();
        let response = dispatcher.dispatch(&get(""));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
