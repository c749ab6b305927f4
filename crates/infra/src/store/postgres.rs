//! Postgres-backed stores.
//!
//! Runtime-bound queries only (no compile-time query macros). The opaque
//! bags (`specifications`, `stock`, `pricing`, `supplier`, embedded
//! subcategories) are stored as JSONB in their wire shape; filterable
//! scalars live in columns. See `migrations/0001_catalog.sql` for the
//! schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use stockdesk_catalog::{
    Category, Pricing, Product, ProductStatus, Specifications, Stock, Subcategory, Supplier,
};
use stockdesk_core::{CategoryId, ProductId, UserId};

use super::{CategoryStore, PageRequest, ProductFilter, ProductStore, StoreError, StoreResult};

pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn map_write_err(e: sqlx::Error, unique_key: &'static str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate(unique_key);
        }
    }
    backend(e)
}

fn to_json<T: Serialize>(value: &T) -> StoreResult<serde_json::Value> {
    serde_json::to_value(value).map_err(backend)
}

fn from_json<T: DeserializeOwned>(row: &PgRow, column: &str) -> StoreResult<T> {
    let value: Option<serde_json::Value> = row.try_get(column).map_err(backend)?;
    serde_json::from_value(value.unwrap_or(serde_json::Value::Null))
        .map_err(|e| StoreError::Backend(format!("{column}: {e}")))
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let id: uuid::Uuid = row.try_get("id").map_err(backend)?;
    let status: String = row.try_get("status").map_err(backend)?;
    let status: ProductStatus = status.parse().map_err(backend)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(backend)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(backend)?;

    let specifications: Specifications = from_json(row, "specifications")?;
    let stock: Stock = from_json(row, "stock")?;
    let pricing: Pricing = from_json(row, "pricing")?;
    let supplier: Option<Supplier> = from_json(row, "supplier")?;
    let images: Option<Vec<String>> = from_json(row, "images")?;
    let documents: Option<Vec<String>> = from_json(row, "documents")?;

    Ok(Product {
        id: ProductId::from_uuid(id),
        name: row.try_get("name").map_err(backend)?,
        sku: row.try_get("sku").map_err(backend)?,
        category: row.try_get("category").map_err(backend)?,
        sub_category: row.try_get("sub_category").map_err(backend)?,
        description: row.try_get("description").map_err(backend)?,
        specifications,
        stock,
        pricing,
        supplier,
        images: images.unwrap_or_default(),
        documents: documents.unwrap_or_default(),
        status,
        created_at,
        updated_at,
    })
}

fn category_from_row(row: &PgRow) -> StoreResult<Category> {
    let id: uuid::Uuid = row.try_get("id").map_err(backend)?;
    let created_by: uuid::Uuid = row.try_get("created_by").map_err(backend)?;
    let sub_categories: Option<Vec<Subcategory>> = from_json(row, "sub_categories")?;

    Ok(Category {
        id: CategoryId::from_uuid(id),
        name: row.try_get("name").map_err(backend)?,
        description: row.try_get("description").map_err(backend)?,
        sub_categories: sub_categories.unwrap_or_default(),
        image: row.try_get("image").map_err(backend)?,
        is_active: row.try_get("is_active").map_err(backend)?,
        created_by: UserId::from_uuid(created_by),
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

const PRODUCT_COLUMNS: &str = "id, name, sku, category, sub_category, description, \
     specifications, stock, pricing, supplier, images, documents, status, created_at, updated_at";

fn push_product_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(search) = &filter.search {
        let pattern = format!(
            "%{}%",
            search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR sku ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if filter.low_stock {
        qb.push(
            " AND (stock->>'quantity')::bigint > 0 \
             AND (stock->>'quantity')::bigint <= (stock->>'minStock')::bigint",
        );
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn insert(&self, product: Product) -> StoreResult<Product> {
        sqlx::query(
            "INSERT INTO products \
             (id, name, sku, category, sub_category, description, specifications, stock, \
              pricing, supplier, images, documents, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.description)
        .bind(to_json(&product.specifications)?)
        .bind(to_json(&product.stock)?)
        .bind(to_json(&product.pricing)?)
        .bind(to_json(&product.supplier)?)
        .bind(to_json(&product.images)?)
        .bind(to_json(&product.documents)?)
        .bind(product.status.as_str())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "sku"))?;

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn update(&self, product: Product) -> StoreResult<Option<Product>> {
        let result = sqlx::query(
            "UPDATE products SET \
             name = $2, sku = $3, category = $4, sub_category = $5, description = $6, \
             specifications = $7, stock = $8, pricing = $9, supplier = $10, images = $11, \
             documents = $12, status = $13, updated_at = $14 \
             WHERE id = $1",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.description)
        .bind(to_json(&product.specifications)?)
        .bind(to_json(&product.stock)?)
        .bind(to_json(&product.pricing)?)
        .bind(to_json(&product.supplier)?)
        .bind(to_json(&product.images)?)
        .bind(to_json(&product.documents)?)
        .bind(product.status.as_str())
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "sku"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(product))
    }

    async fn delete(&self, id: ProductId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<Vec<Product>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
        ));
        push_product_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(backend)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) AS total FROM products WHERE TRUE");
        push_product_filter(&mut qb, filter);

        let row = qb.build().fetch_one(&self.pool).await.map_err(backend)?;
        let total: i64 = row.try_get("total").map_err(backend)?;
        Ok(total as u64)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products"))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(product_from_row).collect()
    }
}

const CATEGORY_COLUMNS: &str =
    "id, name, description, sub_categories, image, is_active, created_by, created_at, updated_at";

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn insert(&self, category: Category) -> StoreResult<Category> {
        sqlx::query(
            "INSERT INTO categories \
             (id, name, description, sub_categories, image, is_active, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(to_json(&category.sub_categories)?)
        .bind(&category.image)
        .bind(category.is_active)
        .bind(category.created_by.as_uuid())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "name"))?;

        Ok(category)
    }

    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(category_from_row).transpose()
    }

    async fn update(&self, category: Category) -> StoreResult<Option<Category>> {
        let result = sqlx::query(
            "UPDATE categories SET \
             name = $2, description = $3, sub_categories = $4, image = $5, is_active = $6, \
             updated_at = $7 \
             WHERE id = $1",
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(to_json(&category.sub_categories)?)
        .bind(&category.image)
        .bind(category.is_active)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "name"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(category))
    }

    async fn list_active(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter().map(category_from_row).collect()
    }
}
