//! Infrastructure layer: persistence collaborators and configuration.

pub mod config;
pub mod store;

pub use config::AppConfig;
pub use store::{
    CategoryStore, InMemoryCategoryStore, InMemoryProductStore, PageRequest, PostgresCategoryStore,
    PostgresProductStore, ProductFilter, ProductStore, StoreError, StoreResult,
};
