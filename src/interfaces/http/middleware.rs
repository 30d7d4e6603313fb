//! Customer context middleware
//!
//! Authentication happens upstream; the gateway forwards who the customer is
//! in `x-customer-*` headers. Requests without an identity browse as
//! [`AnonymousUser`].

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::common::ApiResponse;
use super::modules::products::template::render_error_page;
use crate::domain::{AnonymousUser, Currency, Customer, DomainResult, UserContext};

pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";
pub const CUSTOMER_TIER_HEADER: &str = "x-customer-tier";
pub const CUSTOMER_CURRENCY_HEADER: &str = "x-customer-currency";

/// Tier value that marks a preferred customer
pub const PREFERRED_TIER: &str = "preferred";

/// The pricing context of the current request, stored in request extensions.
///
/// Extract in handlers: `Extension(CurrentUser(user)): Extension<CurrentUser>`
#[derive(Clone)]
pub struct CurrentUser(pub Arc<dyn UserContext>);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build the pricing context from forwarded identity headers.
pub fn user_from_headers(headers: &HeaderMap) -> DomainResult<Arc<dyn UserContext>> {
    let Some(id) = header(headers, CUSTOMER_ID_HEADER) else {
        return Ok(Arc::new(AnonymousUser));
    };

    let preferred = header(headers, CUSTOMER_TIER_HEADER)
        .map(|tier| tier.eq_ignore_ascii_case(PREFERRED_TIER))
        .unwrap_or(false);
    let currency = match header(headers, CUSTOMER_CURRENCY_HEADER) {
        Some(code) => Currency::parse(code)?,
        None => Currency::usd(),
    };

    Ok(Arc::new(Customer::new(id, preferred, currency)))
}

fn attach_customer(request: &mut Request<Body>) -> DomainResult<()> {
    let user = user_from_headers(request.headers()).inspect_err(|e| {
        debug!("Rejecting customer headers: {}", e);
    })?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(())
}

/// Customer context for JSON routes; bad headers get an [`ApiResponse`] error.
pub async fn customer_context_middleware(mut request: Request<Body>, next: Next) -> Response {
    if let Err(e) = attach_customer(&mut request) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response();
    }
    next.run(request).await
}

/// Customer context for HTML pages; bad headers get the error page.
pub async fn customer_page_middleware(mut request: Request<Body>, next: Next) -> Response {
    if attach_customer(&mut request).is_err() {
        return (StatusCode::BAD_REQUEST, Html(render_error_page("Bad request"))).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_missing_identity_is_anonymous() {
        let user = user_from_headers(&HeaderMap::new()).unwrap();
        assert!(!user.is_preferred());
        assert_eq!(user.currency(), Currency::usd());
    }

    #[test]
    fn test_preferred_customer_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static("c-9"));
        headers.insert(CUSTOMER_TIER_HEADER, HeaderValue::from_static("Preferred"));
        headers.insert(CUSTOMER_CURRENCY_HEADER, HeaderValue::from_static("eur"));

        let user = user_from_headers(&headers).unwrap();

        assert!(user.is_preferred());
        assert_eq!(user.currency(), Currency::new("EUR"));
    }

    #[test]
    fn test_tier_and_currency_ignored_without_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(CUSTOMER_TIER_HEADER, HeaderValue::from_static("preferred"));
        headers.insert(CUSTOMER_CURRENCY_HEADER, HeaderValue::from_static("EUR"));

        let user = user_from_headers(&headers).unwrap();

        assert!(!user.is_preferred());
        assert_eq!(user.currency(), Currency::usd());
    }

    #[test]
    fn test_bad_currency_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static("c-9"));
        headers.insert(CUSTOMER_CURRENCY_HEADER, HeaderValue::from_static("EURO$"));

        assert!(user_from_headers(&headers).is_err());
    }
}
