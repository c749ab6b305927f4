//! Product CRUD and the stock ledger endpoint.

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use chrono::Utc;

use stockdesk_catalog::{apply_stock_operation, Product, ProductDraft, ProductPatch};
use stockdesk_core::ProductId;
use stockdesk_infra::{PageRequest, ProductFilter};

use crate::app::dto::{
    ListProductsQuery, MessageResponse, ProductListResponse, ProductResponse, StockUpdateRequest,
};
use crate::app::errors::{domain_error, json_error, not_found, store_error};
use crate::app::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/stock", patch(update_stock))
}

fn parse_id(raw: &str) -> Result<ProductId, Response> {
    raw.parse::<ProductId>().map_err(domain_error)
}

async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListProductsQuery>,
) -> Response {
    let status = match query
        .status
        .as_deref()
        .map(str::parse::<stockdesk_catalog::ProductStatus>)
        .transpose()
    {
        Ok(status) => status,
        Err(e) => return domain_error(e),
    };

    let filter = ProductFilter {
        category: query.category.clone(),
        status,
        search: query.search.clone(),
        low_stock: query.wants_low_stock(),
    };

    // page=0 behaves as page 1, matching the offset computation.
    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10),
    };
    if page.limit == 0 {
        return json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "limit must be positive",
        );
    }

    let products = match services.products.find(&filter, page).await {
        Ok(products) => products,
        Err(e) => return store_error(e),
    };
    let total = match services.products.count(&filter).await {
        Ok(total) => total,
        Err(e) => return store_error(e),
    };

    Json(ProductListResponse {
        products: products.into_iter().map(ProductResponse::from).collect(),
        total_pages: total.div_ceil(page.limit),
        current_page: page.page,
        total,
    })
    .into_response()
}

async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.products.get(id).await {
        Ok(Some(product)) => Json(ProductResponse::from(product)).into_response(),
        Ok(None) => not_found("Product not found"),
        Err(e) => store_error(e),
    }
}

async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    let product = match Product::create(draft, Utc::now()) {
        Ok(product) => product,
        Err(e) => return domain_error(e),
    };

    match services.products.insert(product).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
            (StatusCode::CREATED, Json(ProductResponse::from(product))).into_response()
        }
        Err(e) => store_error(e),
    }
}

async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut product = match services.products.get(id).await {
        Ok(Some(product)) => product,
        Ok(None) => return not_found("Product not found"),
        Err(e) => return store_error(e),
    };

    if let Err(e) = product.apply_patch(patch, Utc::now()) {
        return domain_error(e);
    }

    match services.products.update(product).await {
        Ok(Some(product)) => Json(ProductResponse::from(product)).into_response(),
        Ok(None) => not_found("Product not found"),
        Err(e) => store_error(e),
    }
}

async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.products.delete(id).await {
        Ok(true) => {
            tracing::info!(product_id = %id, "product deleted");
            Json(MessageResponse {
                message: "Product deleted successfully",
            })
            .into_response()
        }
        Ok(false) => not_found("Product not found"),
        Err(e) => store_error(e),
    }
}

/// Apply an `add` / `subtract` / `set` operation to the on-hand quantity.
/// An unknown operation token is rejected before any state changes.
async fn update_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(request): Json<StockUpdateRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut product = match services.products.get(id).await {
        Ok(Some(product)) => product,
        Ok(None) => return not_found("Product not found"),
        Err(e) => return store_error(e),
    };

    let quantity = match apply_stock_operation(
        product.stock.quantity,
        &request.operation,
        request.quantity,
    ) {
        Ok(quantity) => quantity,
        Err(e) => return domain_error(e),
    };

    product.write_quantity(quantity, Utc::now());

    match services.products.update(product).await {
        Ok(Some(product)) => {
            tracing::info!(
                product_id = %product.id,
                operation = %request.operation,
                quantity = product.stock.quantity,
                "stock updated"
            );
            Json(ProductResponse::from(product)).into_response()
        }
        Ok(None) => not_found("Product not found"),
        Err(e) => store_error(e),
    }
}
