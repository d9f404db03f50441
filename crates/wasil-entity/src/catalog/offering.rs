//! Catalog offerings and the built-in catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use wasil_core::types::Money;

use super::category::{Category, Priority};

/// Slug of the offering that lets customers describe their own need.
pub const CUSTOM_SERVICE_ID: &str = "custom-request";

/// Catalog slug identifying a service type (e.g. `wifi-fix`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Wrap a slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Return the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the custom-request slug.
    pub fn is_custom(&self) -> bool {
        self.0 == CUSTOM_SERVICE_ID
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A service customers can order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Slug.
    pub id: ServiceId,
    /// Category.
    pub category: Category,
    /// Title shown to customers.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Base price paid out to the dispatcher.
    pub base_price: Money,
    /// Urgency hint.
    pub priority: Priority,
}

impl ServiceOffering {
    /// Build an offering priced in whole dollars.
    pub fn new(
        id: &str,
        category: Category,
        title: &str,
        description: &str,
        base_dollars: i64,
        priority: Priority,
    ) -> Self {
        Self {
            id: ServiceId::new(id),
            category,
            title: title.to_string(),
            description: description.to_string(),
            base_price: Money::from_dollars(base_dollars),
            priority,
        }
    }

    /// Customer-facing price after applying the platform markup.
    pub fn quote(&self, markup_percent: u32) -> Money {
        self.base_price.with_markup(markup_percent)
    }

    /// Whether this is the custom-request offering.
    pub fn is_custom(&self) -> bool {
        self.id.is_custom()
    }
}

/// The built-in service catalog.
pub fn default_catalog() -> Vec<ServiceOffering> {
    use Category::*;
    use Priority::*;

    vec![
        ServiceOffering::new("solar-check", PowerSolar, "Battery Health Check", "Deep diagnostic for UPS/Solar battery banks.", 30, High),
        ServiceOffering::new("inverter-beep", PowerSolar, "Inverter Troubleshooting", "Fixing beeping alarms and transfer errors.", 40, High),
        ServiceOffering::new("panel-clean", PowerSolar, "Solar Panel Cleaning", "Optimizing efficiency with safe cleaning.", 25, Normal),
        ServiceOffering::new("wifi-fix", ItTech, "Wi-Fi Troubleshooting", "Resolving dead zones and router restarts.", 20, Normal),
        ServiceOffering::new("laptop-repair", ItTech, "Laptop & Desktop Repair", "Hardware fixes or software cleanup.", 50, Normal),
        ServiceOffering::new("printer-setup", ItTech, "Printer & Device Setup", "Installing new devices for parents.", 15, Normal),
        ServiceOffering::new("home-chef", Household, "Cooking (Home Chef)", "Home-cooked meals for your parents.", 45, Normal),
        ServiceOffering::new("cleaning", Household, "Home Cleaning", "Deep cleaning and tidying up.", 35, Normal),
        ServiceOffering::new("pet-care", Household, "Pet Care", "Dog walking and pet feeding.", 25, Normal),
        ServiceOffering::new("leak-repair", Plumbing, "Leak Repair", "Fixing pipes, faucets, or boiler issues.", 35, High),
        ServiceOffering::new("tank-fill", Plumbing, "Water Tank Coordination", "Ensuring water delivery and level checks.", 15, Normal),
        ServiceOffering::new("medication", Essentials, "Medication Delivery", "Sourcing and delivery of chronic meds.", 15, High),
        ServiceOffering::new("grocery", Essentials, "Grocery Shopping", "Fresh produce and pantry stocking.", 20, Normal),
        ServiceOffering::new(CUSTOM_SERVICE_ID, Other, "Custom Request", "A unique need not listed above? Describe it and we will handle it.", 50, Normal),
    ]
}
