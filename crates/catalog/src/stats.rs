//! Per-category dashboard aggregation.
//!
//! The join between products and categories is by name equality (the
//! product side stores a free-text category name, not a reference), matched
//! case-insensitively. Products whose category name matches nothing simply
//! fall out of every bucket.

use serde::Serialize;

use crate::category::Category;
use crate::product::Product;
use crate::stock::{classify_stock, StockLevel};

/// Case-insensitive exact match between a product's category field and a
/// category name.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Dashboard counters for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub total_products: u64,
    pub active_products: u64,
    pub low_stock_products: u64,
    pub out_of_stock_products: u64,
    pub sub_categories: usize,
}

/// Compute per-category counters.
///
/// O(categories × products); fine at admin-tool scale. Output order follows
/// the input category order.
pub fn summarize(categories: &[Category], products: &[Product]) -> Vec<CategoryStats> {
    categories
        .iter()
        .map(|category| {
            let matching = || {
                products
                    .iter()
                    .filter(|p| names_match(&p.category, &category.name))
            };

            let total_products = matching().count() as u64;
            let active_products = matching().filter(|p| p.is_active()).count() as u64;
            let low_stock_products = matching()
                .filter(|p| {
                    p.is_active()
                        && classify_stock(p.stock.quantity, p.stock.min_stock) == StockLevel::LowStock
                })
                .count() as u64;
            let out_of_stock_products = matching()
                .filter(|p| p.is_active() && p.stock.quantity == 0)
                .count() as u64;

            CategoryStats {
                category: category.name.clone(),
                total_products,
                active_products,
                low_stock_products,
                out_of_stock_products,
                sub_categories: category.sub_categories.len(),
            }
        })
        .collect()
}
