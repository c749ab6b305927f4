//! Category taxonomy routes: CRUD, embedded subcategories, and the
//! per-category statistics view.
//!
//! Products reference categories by name, so the joins here are
//! case-insensitive name matches rather than foreign keys.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;

use stockdesk_catalog::{
    names_match, summarize, Category, CategoryDraft, CategoryPatch, StockLevel, SubcategoryDraft,
    SubcategoryPatch,
};
use stockdesk_core::{CategoryId, SubcategoryId};

use crate::app::dto::{CategoryDetail, CategoryWithCount, MessageResponse, ProductSummary};
use crate::app::errors::{domain_error, json_error, not_found, store_error};
use crate::app::AppServices;
use crate::authz::require_permission;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/stats/summary", get(stats_summary))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/:id/subcategories", post(add_subcategory))
        .route(
            "/:id/subcategories/:sub_id",
            put(update_subcategory).delete(delete_subcategory),
        )
}

fn parse_id(raw: &str) -> Result<CategoryId, Response> {
    raw.parse::<CategoryId>().map_err(domain_error)
}

fn parse_sub_id(raw: &str) -> Result<SubcategoryId, Response> {
    raw.parse::<SubcategoryId>().map_err(domain_error)
}

async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let categories = match services.categories.list_active().await {
        Ok(categories) => categories,
        Err(e) => return store_error(e),
    };
    let products = match services.products.list().await {
        Ok(products) => products,
        Err(e) => return store_error(e),
    };

    let out: Vec<CategoryWithCount> = categories
        .into_iter()
        .map(|category| {
            let product_count = products
                .iter()
                .filter(|p| p.is_active() && names_match(&p.category, &category.name))
                .count() as u64;
            CategoryWithCount {
                category,
                product_count,
            }
        })
        .collect();

    Json(out).into_response()
}

async fn stats_summary(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let categories = match services.categories.list_active().await {
        Ok(categories) => categories,
        Err(e) => return store_error(e),
    };
    let products = match services.products.list().await {
        Ok(products) => products,
        Err(e) => return store_error(e),
    };

    Json(summarize(&categories, &products)).into_response()
}

async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    let products = match services.products.list().await {
        Ok(products) => products,
        Err(e) => return store_error(e),
    };

    let rows: Vec<ProductSummary> = products
        .iter()
        .filter(|p| p.is_active() && names_match(&p.category, &category.name))
        .map(ProductSummary::from)
        .collect();

    let low_stock_products = rows
        .iter()
        .filter(|r| r.stock_level == StockLevel::LowStock)
        .count() as u64;

    Json(CategoryDetail {
        product_count: rows.len() as u64,
        low_stock_products,
        products: rows,
        category,
    })
    .into_response()
}

async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Json(draft): Json<CategoryDraft>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.manage") {
        return resp;
    }

    let category = match Category::create(draft, ctx.user_id(), Utc::now()) {
        Ok(category) => category,
        Err(e) => return domain_error(e),
    };

    match services.categories.insert(category).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, name = %category.name, "category created");
            (StatusCode::CREATED, Json(category)).into_response()
        }
        Err(e) => store_error(e),
    }
}

async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.manage") {
        return resp;
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    if let Err(e) = category.apply_patch(patch, Utc::now()) {
        return domain_error(e);
    }

    match services.categories.update(category).await {
        Ok(Some(category)) => Json(category).into_response(),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error(e),
    }
}

/// Soft delete. Refused while any active product still references the
/// category name; the record keeps its data with `isActive` flipped off.
async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.delete") {
        return resp;
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    let products = match services.products.list().await {
        Ok(products) => products,
        Err(e) => return store_error(e),
    };
    let active_refs = products
        .iter()
        .filter(|p| p.is_active() && names_match(&p.category, &category.name))
        .count();

    if active_refs > 0 {
        return json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("cannot delete category with {active_refs} active products"),
        );
    }

    category.deactivate(Utc::now());

    match services.categories.update(category).await {
        Ok(Some(category)) => {
            tracing::info!(category_id = %category.id, "category deactivated");
            Json(MessageResponse {
                message: "Category deleted successfully",
            })
            .into_response()
        }
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error(e),
    }
}

async fn add_subcategory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<SubcategoryDraft>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.manage") {
        return resp;
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    if let Err(e) = category.add_subcategory(draft, Utc::now()) {
        return domain_error(e);
    }

    match services.categories.update(category).await {
        Ok(Some(category)) => (StatusCode::CREATED, Json(category)).into_response(),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error(e),
    }
}

async fn update_subcategory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path((id, sub_id)): Path<(String, String)>,
    Json(patch): Json<SubcategoryPatch>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.manage") {
        return resp;
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let sub_id = match parse_sub_id(&sub_id) {
        Ok(sub_id) => sub_id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    if let Err(e) = category.update_subcategory(sub_id, patch, Utc::now()) {
        return match e {
            stockdesk_core::DomainError::NotFound => not_found("Subcategory not found"),
            other => domain_error(other),
        };
    }

    match services.categories.update(category).await {
        Ok(Some(category)) => Json(category).into_response(),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error(e),
    }
}

async fn delete_subcategory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path((id, sub_id)): Path<(String, String)>,
) -> Response {
    if let Err(resp) = require_permission(&ctx, "categories.manage") {
        return resp;
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let sub_id = match parse_sub_id(&sub_id) {
        Ok(sub_id) => sub_id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories.get(id).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error(e),
    };

    category.remove_subcategory(sub_id, Utc::now());

    match services.categories.update(category).await {
        Ok(Some(category)) => Json(category).into_response(),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error(e),
    }
}
