//! Persistence collaborators for the catalog.
//!
//! The API talks to these traits only; the in-memory implementation backs
//! dev/test runs and the Postgres one is selected when `DATABASE_URL` is
//! set. Concurrent writes to the same record are last-write-wins in both —
//! no optimistic locking is layered on top.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use stockdesk_catalog::{Category, Product, ProductStatus};
use stockdesk_core::{CategoryId, ProductId};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCategoryStore, InMemoryProductStore};
pub use postgres::{PostgresCategoryStore, PostgresProductStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (product SKU, category name) is already taken.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    /// Unclassified backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Filter for product listing/counting.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category name.
    pub category: Option<String>,
    /// Lifecycle status.
    pub status: Option<ProductStatus>,
    /// Case-insensitive substring over name/description/sku.
    pub search: Option<String>,
    /// Only products whose classifier reads LowStock (quantity positive and
    /// at or below the minimum).
    pub low_stock: bool,
}

/// Pagination window. `page` is 1-based.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product; fails on duplicate SKU.
    async fn insert(&self, product: Product) -> StoreResult<Product>;

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Replace an existing record; `None` if the id no longer resolves.
    /// Fails on duplicate SKU.
    async fn update(&self, product: Product) -> StoreResult<Option<Product>>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: ProductId) -> StoreResult<bool>;

    /// One page of matches, newest first.
    async fn find(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<Vec<Product>>;

    /// Total matches for a filter.
    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64>;

    /// Every product, for the name-join aggregations.
    async fn list(&self) -> StoreResult<Vec<Product>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a new category; fails on duplicate name.
    async fn insert(&self, category: Category) -> StoreResult<Category>;

    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>>;

    /// Replace an existing record (also how soft deletion is persisted);
    /// `None` if the id no longer resolves. Fails on duplicate name.
    async fn update(&self, category: Category) -> StoreResult<Option<Category>>;

    /// Active categories sorted by name.
    async fn list_active(&self) -> StoreResult<Vec<Category>>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, product: Product) -> StoreResult<Product> {
        (**self).insert(product).await
    }

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).get(id).await
    }

    async fn update(&self, product: Product) -> StoreResult<Option<Product>> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> StoreResult<bool> {
        (**self).delete(id).await
    }

    async fn find(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<Vec<Product>> {
        (**self).find(filter, page).await
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        (**self).count(filter).await
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list().await
    }
}

#[async_trait]
impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    async fn insert(&self, category: Category) -> StoreResult<Category> {
        (**self).insert(category).await
    }

    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        (**self).get(id).await
    }

    async fn update(&self, category: Category) -> StoreResult<Option<Category>> {
        (**self).update(category).await
    }

    async fn list_active(&self) -> StoreResult<Vec<Category>> {
        (**self).list_active().await
    }
}
