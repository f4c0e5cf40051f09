//! Request tracing middleware.
//!
//! Each request runs inside an `http_request` span that carries the node
//! name and a request id. The id comes from the incoming `x-request-id`
//! header or is generated, is handed to handlers through request extensions,
//! and is echoed on the response so one ping can be followed across nodes.

use std::future::{Ready, ready};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use futures::future::LocalBoxFuture;
use hoprelay_common::REQUEST_ID_HEADER;
use tracing::{Instrument, Span, info, info_span};

/// Request id attached to every request's extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Take the id from the incoming headers, or generate a new one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| RequestId(v.to_string()))
            .unwrap_or_else(|| RequestId(uuid::Uuid::new_v4().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tracing middleware factory
pub struct RequestTracing {
    node: Arc<str>,
}

impl RequestTracing {
    pub fn new(node: Arc<str>) -> Self {
        Self { node }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestTracingService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTracingService {
            service,
            node: self.node.clone(),
        }))
    }
}

pub struct RequestTracingService<S> {
    service: S,
    node: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for RequestTracingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::from_headers(req.headers());
        let method = req.method().to_string();
        let path = req.path().to_string();
        let peer_ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let span = info_span!(
            "http_request",
            node = %self.node,
            request_id = %request_id.as_str(),
            http.method = %method,
            http.target = %path,
            net.peer.ip = %peer_ip,
            http.status_code = tracing::field::Empty,
        );

        let header_value = HeaderValue::from_str(request_id.as_str()).ok();
        req.extensions_mut().insert(request_id);

        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;

                let status = res.status().as_u16();
                Span::current().record("http.status_code", status);
                info!(
                    status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "{} {}",
                    method,
                    path
                );

                if let Some(value) = header_value {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Helper trait to read the request id from a request
pub trait RequestIdExt {
    fn request_id(&self) -> Option<String>;
}

impl RequestIdExt for actix_web::HttpRequest {
    fn request_id(&self) -> Option<String> {
        self.extensions().get::<RequestId>().map(|id| id.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    use super::*;

    #[test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_static("trace-abc"),
        );
        assert_eq!(RequestId::from_headers(&headers).as_str(), "trace-abc");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let headers = HeaderMap::new();
        let first = RequestId::from_headers(&headers);
        let second = RequestId::from_headers(&headers);
        assert!(uuid::Uuid::parse_str(first.as_str()).is_ok());
        assert_ne!(first, second);
    }

    async fn echo_request_id(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(req.request_id().unwrap_or_default())
    }

    #[actix_web::test]
    async fn test_middleware_propagates_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTracing::new(Arc::from("A")))
                .route("/echo", web::get().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header((REQUEST_ID_HEADER, "req-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers()
                .get(REQUEST_ID_HEADER)
                .unwrap()
                .to_str()
                .unwrap(),
            "req-42"
        );
        let body = test::read_body(resp).await;
        assert_eq!(body, "req-42");
    }

    #[actix_web::test]
    async fn test_middleware_generates_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTracing::new(Arc::from("A")))
                .route("/echo", web::get().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::get().uri("/echo").to_request();
        let resp = test::call_service(&app, req).await;
        let header = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = test::read_body(resp).await;
        assert_eq!(body, header.as_bytes());
    }
}
