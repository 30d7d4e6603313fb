//! HTTP router and OpenAPI document

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::FromRef, middleware, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::common::ApiResponse;
use super::middleware::{customer_context_middleware, customer_page_middleware};
use super::modules::health::{self, HealthState};
use super::modules::products::{self, FeaturedProductsResponse, ProductResponse, ProductsState};
use super::modules::request_id::request_id_middleware;
use crate::composition::AppServices;

/// Unified router state. Each handler extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct HttpState {
    pub services: AppServices,
    pub health: HealthState,
}

impl FromRef<HttpState> for ProductsState {
    fn from_ref(s: &HttpState) -> Self {
        ProductsState {
            product_service: Arc::clone(&s.services.products),
        }
    }
}

impl FromRef<HttpState> for HealthState {
    fn from_ref(s: &HttpState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        products::handlers::list_featured_products,
    ),
    components(
        schemas(
            ApiResponse<FeaturedProductsResponse>,
            FeaturedProductsResponse,
            ProductResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Products", description = "Featured products priced for the current customer"),
    ),
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Featured products with per-customer currency and discounts",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// `db` is only used by the health check; pass `None` when the catalog is
/// not database-backed.
pub fn create_router(services: AppServices, db: Option<DatabaseConnection>) -> Router {
    let state = HttpState {
        services,
        health: HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        },
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes priced for the caller need the customer context
    let page_routes: Router<HttpState> = Router::new()
        .route("/", get(products::index))
        .layer(middleware::from_fn(customer_page_middleware));
    let api_routes: Router<HttpState> = Router::new()
        .route(
            "/api/v1/products/featured",
            get(products::list_featured_products),
        )
        .layer(middleware::from_fn(customer_context_middleware));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .route("/health", get(health::health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use super::*;
    use crate::composition::pure;
    use crate::domain::{Currency, DomainError, DomainResult, Money, Product, ProductRepository};
    use crate::infrastructure::{FakeCurrencyConverter, InMemoryProductRepository};
    use crate::interfaces::http::middleware::{
        CUSTOMER_CURRENCY_HEADER, CUSTOMER_ID_HEADER, CUSTOMER_TIER_HEADER,
    };
    use crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER;

    struct BrokenRepository;

    #[async_trait]
    impl ProductRepository for BrokenRepository {
        async fn get_featured_products(&self) -> DomainResult<Vec<Product>> {
            Err(DomainError::StorageUnavailable("disk on fire".to_string()))
        }
    }

    fn widget_router() -> Router {
        let repo = Arc::new(InMemoryProductRepository::with_products(vec![
            Product::new(
                "Widget",
                Money::new(Decimal::new(1000, 2), Currency::usd()),
                true,
            ),
            Product::new(
                "Hidden",
                Money::new(Decimal::new(500, 2), Currency::usd()),
                false,
            ),
        ]));
        create_router(pure::build(repo, Arc::new(FakeCurrencyConverter)), None)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_for_anonymous_visitor() {
        let response = widget_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let html = body_text(response).await;
        assert!(html.contains("Widget"));
        assert!(html.contains("10.00USD"));
        assert!(!html.contains("Hidden"));
    }

    #[tokio::test]
    async fn test_index_for_preferred_customer() {
        let request = Request::builder()
            .uri("/")
            .header(CUSTOMER_ID_HEADER, "c-42")
            .header(CUSTOMER_TIER_HEADER, "preferred")
            .header(CUSTOMER_CURRENCY_HEADER, "EUR")
            .body(Body::empty())
            .unwrap();

        let response = widget_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("9.50EUR"));
        assert!(!html.contains("USD"));
    }

    #[tokio::test]
    async fn test_bad_currency_header_on_page_gets_html_error() {
        let request = Request::builder()
            .uri("/")
            .header(CUSTOMER_ID_HEADER, "c-42")
            .header(CUSTOMER_CURRENCY_HEADER, "12")
            .body(Body::empty())
            .unwrap();

        let response = widget_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Bad request"));
    }

    #[tokio::test]
    async fn test_bad_currency_header_on_api_gets_json_error() {
        let request = Request::builder()
            .uri("/api/v1/products/featured")
            .header(CUSTOMER_ID_HEADER, "c-42")
            .header(CUSTOMER_CURRENCY_HEADER, "12")
            .body(Body::empty())
            .unwrap();

        let response = widget_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("alphabetic"));
    }

    #[tokio::test]
    async fn test_featured_products_json() {
        let request = Request::builder()
            .uri("/api/v1/products/featured")
            .header(CUSTOMER_ID_HEADER, "c-42")
            .header(CUSTOMER_TIER_HEADER, "preferred")
            .body(Body::empty())
            .unwrap();

        let response = widget_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], true);
        let products = json["data"]["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Widget");
        assert_eq!(products[0]["unit_price"], "9.50");
        assert_eq!(products[0]["currency"], "USD");
    }

    #[tokio::test]
    async fn test_storage_failure_renders_error_page() {
        let router = create_router(
            pure::build(Arc::new(BrokenRepository), Arc::new(FakeCurrencyConverter)),
            None,
        );

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(response).await;
        assert!(html.contains("Something went wrong"));
        assert!(!html.contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let response = widget_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"]["status"], "not_configured");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_products_path() {
        let response = widget_router()
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["paths"]["/api/v1/products/featured"].is_object());
    }
}
