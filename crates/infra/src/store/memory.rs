//! In-memory stores for dev/test.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockdesk_catalog::{Category, Product, StockLevel};
use stockdesk_core::{CategoryId, ProductId};

use super::{CategoryStore, PageRequest, ProductFilter, ProductStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(category) = &filter.category {
        if product.category != *category {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if product.status != status {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let haystacks = [&product.name, &product.description, &product.sku];
        if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
            return false;
        }
    }
    if filter.low_stock && product.stock_level() != StockLevel::LowStock {
        return false;
    }
    true
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let mut map = self.inner.write().expect("product store lock poisoned");
        if map.values().any(|p| p.sku == product.sku) {
            return Err(StoreError::Duplicate("sku"));
        }
        map.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let map = self.inner.read().expect("product store lock poisoned");
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, product: Product) -> StoreResult<Option<Product>> {
        let mut map = self.inner.write().expect("product store lock poisoned");
        if !map.contains_key(&product.id) {
            return Ok(None);
        }
        if map
            .values()
            .any(|p| p.id != product.id && p.sku == product.sku)
        {
            return Err(StoreError::Duplicate("sku"));
        }
        map.insert(product.id, product.clone());
        Ok(Some(product))
    }

    async fn delete(&self, id: ProductId) -> StoreResult<bool> {
        let mut map = self.inner.write().expect("product store lock poisoned");
        Ok(map.remove(&id).is_some())
    }

    async fn find(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<Vec<Product>> {
        let map = self.inner.read().expect("product store lock poisoned");
        let mut items: Vec<Product> = map.values().filter(|p| matches(p, filter)).cloned().collect();
        // Newest first.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let map = self.inner.read().expect("product store lock poisoned");
        Ok(map.values().filter(|p| matches(p, filter)).count() as u64)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let map = self.inner.read().expect("product store lock poisoned");
        Ok(map.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    inner: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn insert(&self, category: Category) -> StoreResult<Category> {
        let mut map = self.inner.write().expect("category store lock poisoned");
        if map.values().any(|c| c.name == category.name) {
            return Err(StoreError::Duplicate("name"));
        }
        map.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let map = self.inner.read().expect("category store lock poisoned");
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, category: Category) -> StoreResult<Option<Category>> {
        let mut map = self.inner.write().expect("category store lock poisoned");
        if !map.contains_key(&category.id) {
            return Ok(None);
        }
        if map
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(StoreError::Duplicate("name"));
        }
        map.insert(category.id, category.clone());
        Ok(Some(category))
    }

    async fn list_active(&self) -> StoreResult<Vec<Category>> {
        let map = self.inner.read().expect("category store lock poisoned");
        let mut items: Vec<Category> = map.values().filter(|c| c.is_active).cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockdesk_catalog::{CategoryDraft, ProductDraft, ProductStatus};
    use stockdesk_core::UserId;

    fn product(name: &str, sku: &str, category: &str) -> Product {
        Product::create(
            ProductDraft {
                name: name.to_string(),
                sku: sku.to_string(),
                category: category.to_string(),
                sub_category: "generic".to_string(),
                description: format!("{name} description"),
                ..ProductDraft::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn category(name: &str) -> Category {
        Category::create(
            CategoryDraft {
                name: name.to_string(),
                description: format!("{name} parts"),
                ..CategoryDraft::default()
            },
            UserId::new(),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_sku() {
        let store = InMemoryProductStore::new();
        store.insert(product("Valve A", "V-1", "Valves")).await.unwrap();

        let err = store
            .insert(product("Valve B", "V-1", "Valves"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("sku")));
    }

    #[tokio::test]
    async fn update_rejects_stealing_another_products_sku() {
        let store = InMemoryProductStore::new();
        store.insert(product("Valve A", "V-1", "Valves")).await.unwrap();
        let mut b = store.insert(product("Valve B", "V-2", "Valves")).await.unwrap();

        b.sku = "V-1".to_string();
        assert!(matches!(
            store.update(b).await.unwrap_err(),
            StoreError::Duplicate("sku")
        ));
    }

    #[tokio::test]
    async fn update_of_missing_record_returns_none() {
        let store = InMemoryProductStore::new();
        let p = product("Valve A", "V-1", "Valves");
        assert!(store.update(p).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring_over_text_fields() {
        let store = InMemoryProductStore::new();
        store.insert(product("Gate Valve", "GV-1", "Valves")).await.unwrap();
        store.insert(product("Ball Valve", "BV-1", "Valves")).await.unwrap();
        store.insert(product("Pressure Gauge", "PG-1", "Gauges")).await.unwrap();

        let filter = ProductFilter {
            search: Some("gate".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(store.count(&filter).await.unwrap(), 1);

        // Matches the SKU too.
        let filter = ProductFilter {
            search: Some("pg-".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(store.count(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn low_stock_filter_uses_the_classifier() {
        let store = InMemoryProductStore::new();

        let mut empty = product("Empty", "E-1", "Valves");
        empty.stock.quantity = 0;
        let mut low = product("Low", "L-1", "Valves");
        low.stock.quantity = 5;
        let mut full = product("Full", "F-1", "Valves");
        full.stock.quantity = 50;
        for p in [empty, low, full] {
            store.insert(p).await.unwrap();
        }

        let filter = ProductFilter {
            low_stock: true,
            ..ProductFilter::default()
        };
        let found = store.find(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "L-1");
    }

    #[tokio::test]
    async fn status_and_category_filters_are_exact() {
        let store = InMemoryProductStore::new();
        let mut discontinued = product("Old Valve", "OV-1", "Valves");
        discontinued.status = ProductStatus::Discontinued;
        store.insert(discontinued).await.unwrap();
        store.insert(product("New Valve", "NV-1", "Valves")).await.unwrap();
        store.insert(product("Gauge", "G-1", "Gauges")).await.unwrap();

        let filter = ProductFilter {
            category: Some("Valves".to_string()),
            status: Some(ProductStatus::Active),
            ..ProductFilter::default()
        };
        let found = store.find(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "NV-1");
    }

    #[tokio::test]
    async fn pagination_windows_newest_first() {
        let store = InMemoryProductStore::new();
        for i in 0..5 {
            let mut p = product(&format!("P{i}"), &format!("SKU-{i}"), "Valves");
            p.created_at = Utc::now() + chrono::Duration::seconds(i);
            store.insert(p).await.unwrap();
        }

        let filter = ProductFilter::default();
        let page1 = store
            .find(&filter, PageRequest { page: 1, limit: 2 })
            .await
            .unwrap();
        let page3 = store
            .find(&filter, PageRequest { page: 3, limit: 2 })
            .await
            .unwrap();

        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].name, "P4");
        assert_eq!(page1[1].name, "P3");
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].name, "P0");
    }

    #[tokio::test]
    async fn category_names_are_unique() {
        let store = InMemoryCategoryStore::new();
        store.insert(category("Valves")).await.unwrap();
        assert!(matches!(
            store.insert(category("Valves")).await.unwrap_err(),
            StoreError::Duplicate("name")
        ));
    }

    #[tokio::test]
    async fn list_active_hides_soft_deleted_and_sorts_by_name() {
        let store = InMemoryCategoryStore::new();
        store.insert(category("Valves")).await.unwrap();
        store.insert(category("Actuators")).await.unwrap();
        let mut gone = category("Gauges");
        gone.deactivate(Utc::now());
        store.insert(gone).await.unwrap();

        let names: Vec<String> = store
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Actuators", "Valves"]);
    }
}
