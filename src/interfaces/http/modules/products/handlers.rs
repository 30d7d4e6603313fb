//! Featured products handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use tracing::error;

use super::dto::FeaturedProductsResponse;
use super::template::{render_error_page, render_product_list};
use super::view_models::FeaturedProductsViewModel;
use crate::application::FeaturedProductsProvider;
use crate::domain::DomainError;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::CurrentUser;

/// State for the product routes: only the injected provider.
#[derive(Clone)]
pub struct ProductsState {
    pub product_service: Arc<dyn FeaturedProductsProvider>,
}

fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::StorageUnavailable(_) | DomainError::ConversionUnavailable { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Failure while rendering an HTML page
pub struct PageError(DomainError);

impl From<DomainError> for PageError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        error!("Featured products page failed: {}", self.0);
        let message = if status == StatusCode::BAD_REQUEST {
            "Bad request"
        } else {
            "Something went wrong"
        };
        (status, Html(render_error_page(message))).into_response()
    }
}

/// `GET /`: featured products page
pub async fn index(
    State(state): State<ProductsState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>, PageError> {
    let products = state
        .product_service
        .get_featured_products(user.as_ref())
        .await?;
    let products_view_model = FeaturedProductsViewModel::from(products);
    Ok(Html(render_product_list(&products_view_model)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/featured",
    tag = "Products",
    params(
        ("x-customer-id" = Option<String>, Header, description = "Customer id forwarded by the gateway"),
        ("x-customer-tier" = Option<String>, Header, description = "\"preferred\" for preferred customers"),
        ("x-customer-currency" = Option<String>, Header, description = "ISO 4217 display currency")
    ),
    responses(
        (status = 200, description = "Featured products priced for the customer", body = ApiResponse<FeaturedProductsResponse>),
        (status = 400, description = "Malformed customer headers"),
        (status = 500, description = "Catalog or currency conversion unavailable")
    )
)]
pub async fn list_featured_products(
    State(state): State<ProductsState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<FeaturedProductsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .product_service
        .get_featured_products(user.as_ref())
        .await
    {
        Ok(products) => {
            let products_view_model = FeaturedProductsViewModel::from(products);
            Ok(Json(ApiResponse::success(FeaturedProductsResponse::from(
                &products_view_model,
            ))))
        }
        Err(e) => {
            error!("Failed to list featured products: {}", e);
            let status = status_for(&e);
            let message = if status == StatusCode::BAD_REQUEST {
                e.to_string()
            } else {
                "Failed to list featured products".to_string()
            };
            Err((status, Json(ApiResponse::error(message))))
        }
    }
}
