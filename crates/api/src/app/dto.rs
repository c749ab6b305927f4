//! Wire DTOs for the catalog routes.
//!
//! Create/update bodies deserialize straight into the domain draft/patch
//! types; this module holds the query strings and the response envelopes.

use serde::{Deserialize, Serialize};

use stockdesk_catalog::{Category, Product, ProductStatus, Stock, StockLevel};
use stockdesk_core::ProductId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// Flag; only the literal string "true" activates the filter.
    pub low_stock: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListProductsQuery {
    pub fn wants_low_stock(&self) -> bool {
        self.low_stock.as_deref() == Some("true")
    }
}

#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    pub quantity: i64,
    pub operation: String,
}

/// A product plus its derived stock level. The level is never stored, so it
/// is attached at the edge on every read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub stock_level: StockLevel,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let stock_level = product.stock_level();
        Self {
            product,
            stock_level,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: u64,
}

/// Compact product row embedded in the single-category view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub stock: Stock,
    pub status: ProductStatus,
    pub stock_level: StockLevel,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            sku: p.sku.clone(),
            stock: p.stock.clone(),
            status: p.status,
            stock_level: p.stock_level(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<ProductSummary>,
    pub product_count: u64,
    pub low_stock_products: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
