//! Dispatcher entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::UserId;

use crate::catalog::ServiceId;

/// A field operative listed in the directory.
///
/// The identifier is the dispatcher's user id, so a dispatcher account
/// and its directory entry share the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatcher {
    /// The dispatcher's user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role title, e.g. "IT Technician & Logistics Pro".
    pub role_title: String,
    /// Average rating between 0 and 5.
    pub rating: f32,
    /// Certifications.
    pub certifications: Vec<String>,
    /// Portrait URL.
    pub photo_url: Option<String>,
    /// Photo taken on the job.
    pub field_photo_url: Option<String>,
    /// Short video of the dispatcher at work.
    pub working_video_url: Option<String>,
    /// Catalog slugs this dispatcher can perform.
    pub supported_service_ids: Vec<ServiceId>,
    /// Whether the dispatcher currently takes work.
    pub active: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Dispatcher {
    /// Whether the dispatcher lists `service` among its capabilities.
    pub fn supports(&self, service: &ServiceId) -> bool {
        self.supported_service_ids.contains(service)
    }
}

/// Data required to register a dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDispatcher {
    pub id: UserId,
    pub name: String,
    pub role_title: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub photo_url: Option<String>,
    pub field_photo_url: Option<String>,
    pub working_video_url: Option<String>,
    #[serde(default)]
    pub supported_service_ids: Vec<ServiceId>,
}

impl CreateDispatcher {
    /// Build the stored record.
    pub fn into_dispatcher(self, now: DateTime<Utc>) -> Dispatcher {
        Dispatcher {
            id: self.id,
            name: self.name,
            role_title: self.role_title,
            rating: self.rating.clamp(0.0, 5.0),
            certifications: self.certifications,
            photo_url: self.photo_url,
            field_photo_url: self.field_photo_url,
            working_video_url: self.working_video_url,
            supported_service_ids: self.supported_service_ids,
            active: true,
            created_at: now,
        }
    }
}
