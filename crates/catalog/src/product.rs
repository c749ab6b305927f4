//! Product records for the parts catalog.
//!
//! `category` / `sub_category` are free-text names, not references: the join
//! to the taxonomy happens by name at read time (see [`crate::stats`]), and
//! renaming a category does not touch existing products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, ProductId};

use crate::stock::{classify_stock, StockLevel};

/// Free-form technical attributes. Opaque to business logic; stored and
/// displayed only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub pressure: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default, rename = "IBR_approved")]
    pub ibr_approved: Option<bool>,
}

/// On-hand stock for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default = "Stock::default_min_stock")]
    pub min_stock: i64,
    #[serde(default = "Stock::default_unit")]
    pub unit: String,
}

impl Stock {
    fn default_min_stock() -> i64 {
        10
    }

    fn default_unit() -> String {
        "pcs".to_string()
    }
}

impl Default for Stock {
    fn default() -> Self {
        Self {
            quantity: 0,
            min_stock: Self::default_min_stock(),
            unit: Self::default_unit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub selling_price: Option<f64>,
    #[serde(default = "Pricing::default_currency")]
    pub currency: String,
}

impl Pricing {
    fn default_currency() -> String {
        "INR".to_string()
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            cost: None,
            selling_price: None,
            currency: Self::default_currency(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Product lifecycle status.
///
/// Caller-set; never auto-derived from quantity. The derived
/// [`StockLevel`] can therefore disagree with this field (a product may be
/// `active` with nothing on hand).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Discontinued,
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Discontinued => "discontinued",
            ProductStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl core::str::FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProductStatus::Active),
            "discontinued" => Ok(ProductStatus::Discontinued),
            "out_of_stock" => Ok(ProductStatus::OutOfStock),
            other => Err(DomainError::validation(format!(
                "unknown product status: {other}"
            ))),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub sub_category: String,
    pub description: String,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default)]
    pub stock: Stock,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub supplier: Option<Supplier>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming payload for product creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default)]
    pub stock: Stock,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub supplier: Option<Supplier>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Partial update for an existing product. Absent fields are left untouched;
/// nested objects are replaced wholesale when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<Specifications>,
    pub stock: Option<Stock>,
    pub pricing: Option<Pricing>,
    pub supplier: Option<Supplier>,
    pub images: Option<Vec<String>>,
    pub documents: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
}

impl Product {
    /// Validate a draft and mint a new record.
    pub fn create(draft: ProductDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = required_trimmed("name", &draft.name)?;
        let sku = required_trimmed("sku", &draft.sku)?;
        required_trimmed("category", &draft.category)?;
        required_trimmed("subCategory", &draft.sub_category)?;
        required_trimmed("description", &draft.description)?;

        Ok(Self {
            id: ProductId::new(),
            name,
            sku,
            category: draft.category,
            sub_category: draft.sub_category,
            description: draft.description,
            specifications: draft.specifications,
            stock: draft.stock,
            pricing: draft.pricing,
            supplier: draft.supplier,
            images: draft.images,
            documents: draft.documents,
            status: draft.status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = patch.name {
            self.name = required_trimmed("name", &name)?;
        }
        if let Some(sku) = patch.sku {
            self.sku = required_trimmed("sku", &sku)?;
        }
        if let Some(category) = patch.category {
            required_trimmed("category", &category)?;
            self.category = category;
        }
        if let Some(sub_category) = patch.sub_category {
            required_trimmed("subCategory", &sub_category)?;
            self.sub_category = sub_category;
        }
        if let Some(description) = patch.description {
            required_trimmed("description", &description)?;
            self.description = description;
        }
        if let Some(specifications) = patch.specifications {
            self.specifications = specifications;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(pricing) = patch.pricing {
            self.pricing = pricing;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = Some(supplier);
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(documents) = patch.documents {
            self.documents = documents;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Overwrite the on-hand quantity (the stock ledger operation's side
    /// effect; no other field is touched).
    pub fn write_quantity(&mut self, quantity: i64, now: DateTime<Utc>) {
        self.stock.quantity = quantity;
        self.updated_at = now;
    }

    /// Derived, advisory stock status.
    pub fn stock_level(&self) -> StockLevel {
        classify_stock(self.stock.quantity, self.stock.min_stock)
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

fn required_trimmed(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
