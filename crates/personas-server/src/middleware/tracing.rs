//! Request tracing middleware.
//!
//! This module provides:
//! - An `http_request` span around every request
//! - `x-request-id` propagation (taken from the request or generated)
//! - HTTP request metrics labelled by matched route pattern

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use tracing::{Instrument, Span, info_span};

use crate::metrics;

/// Request ID header
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request context stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Reuses the caller's request id when present, otherwise generates one.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(generate_request_id);
        Self { request_id }
    }
}

fn generate_request_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

/// Tracing middleware factory
pub struct TracingMiddleware;

impl TracingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for TracingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TracingMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TracingMiddlewareService { service }))
    }
}

/// Tracing middleware service
pub struct TracingMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TracingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let context = RequestContext::from_headers(req.headers());

        let method = req.method().to_string();
        let path = req.path().to_string();
        // Route pattern keeps metric cardinality bounded (`/personas/{id}`).
        let route = req.match_pattern().unwrap_or_else(|| "unmatched".to_string());
        let peer_ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let request_id = context.request_id.clone();

        req.extensions_mut().insert(context);

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            http.method = %method,
            http.target = %path,
            http.route = %route,
            net.peer.ip = %peer_ip,
            http.status_code = tracing::field::Empty,
        );

        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;

                let status = res.status().as_u16();
                Span::current().record("http.status_code", status);
                metrics::record_http_request(
                    &method,
                    &route,
                    status,
                    started.elapsed().as_secs_f64(),
                );
                tracing::debug!(status, "request completed");

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(X_REQUEST_ID), value);
                }

                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Helper trait to read the request context from a request
pub trait RequestContextExt {
    fn request_id(&self) -> Option<String>;
}

impl RequestContextExt for actix_web::HttpRequest {
    fn request_id(&self) -> Option<String> {
        self.extensions()
            .get::<RequestContext>()
            .map(|ctx| ctx.request_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    use super::*;

    #[::core::prelude::v1::test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_REQUEST_ID.parse().unwrap(),
            HeaderValue::from_static("req-42"),
        );

        let ctx = RequestContext::from_headers(&headers);
        assert_eq!(ctx.request_id, "req-42");
    }

    #[::core::prelude::v1::test]
    fn test_request_id_generated_when_missing() {
        let ctx = RequestContext::from_headers(&HeaderMap::new());
        assert_eq!(ctx.request_id.len(), 16);
        assert!(ctx.request_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[::core::prelude::v1::test]
    fn test_blank_request_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_REQUEST_ID.parse().unwrap(),
            HeaderValue::from_static("   "),
        );

        let ctx = RequestContext::from_headers(&headers);
        assert_eq!(ctx.request_id.len(), 16);
    }

    async fn echo_request_id(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(req.request_id().unwrap_or_default())
    }

    #[actix_web::test]
    async fn test_middleware_propagates_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(TracingMiddleware::new())
                .route("/echo", web::get().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header((X_REQUEST_ID, "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
        let body = test::read_body(resp).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_web::test]
    async fn test_middleware_sets_request_id_on_response() {
        let app = test::init_service(
            App::new()
                .wrap(TracingMiddleware::new())
                .route("/echo", web::get().to(echo_request_id)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/echo").to_request()).await;
        assert!(resp.headers().contains_key(X_REQUEST_ID));
    }
}
