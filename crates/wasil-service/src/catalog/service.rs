//! Catalog lookup and pricing.

use serde::Serialize;

use wasil_core::types::Money;
use wasil_core::{AppError, AppResult};
use wasil_entity::catalog::{Category, Priority, ServiceId, ServiceOffering, default_catalog};

/// An offering as shown to customers, with its quoted price.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: ServiceId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Price the customer pays.
    pub price: Money,
    /// Whether the customer supplies the title.
    pub is_custom: bool,
}

/// Read-only catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    offerings: Vec<ServiceOffering>,
    markup_percent: u32,
}

impl CatalogService {
    /// Catalog over explicit offerings.
    pub fn new(offerings: Vec<ServiceOffering>, markup_percent: u32) -> Self {
        Self {
            offerings,
            markup_percent,
        }
    }

    /// The built-in catalog.
    pub fn with_defaults(markup_percent: u32) -> Self {
        Self::new(default_catalog(), markup_percent)
    }

    /// Look up an offering. Unknown slugs are a validation error.
    pub fn get(&self, id: &ServiceId) -> AppResult<&ServiceOffering> {
        self.offerings
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| AppError::validation(format!("Unknown service '{id}'")))
    }

    /// Customer price for an offering.
    pub fn quote(&self, offering: &ServiceOffering) -> Money {
        offering.quote(self.markup_percent)
    }

    /// Every offering, optionally restricted to one category.
    pub fn list(&self, category: Option<Category>) -> Vec<CatalogEntry> {
        self.offerings
            .iter()
            .filter(|o| category.is_none_or(|c| o.category == c))
            .map(|o| CatalogEntry {
                id: o.id.clone(),
                category: o.category,
                title: o.title.clone(),
                description: o.description.clone(),
                priority: o.priority,
                price: self.quote(o),
                is_custom: o.is_custom(),
            })
            .collect()
    }
}
