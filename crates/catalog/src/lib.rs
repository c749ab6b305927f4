//! `stockdesk-catalog` — the inventory domain model.
//!
//! Products, the two-level category taxonomy, and the three pieces of
//! behavior worth getting right: the stock ledger operation, the stock
//! status classifier, and the per-category aggregation. Everything here is
//! pure; persistence and transport live elsewhere.

pub mod category;
pub mod product;
pub mod stats;
pub mod stock;

pub use category::{
    Category, CategoryDraft, CategoryPatch, Subcategory, SubcategoryDraft, SubcategoryPatch,
    SubcategorySpecs,
};
pub use product::{Pricing, Product, ProductDraft, ProductPatch, ProductStatus, Specifications, Stock, Supplier};
pub use stats::{names_match, summarize, CategoryStats};
pub use stock::{apply_stock_operation, classify_stock, StockLevel, StockOperation};
