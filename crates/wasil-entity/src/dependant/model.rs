//! Dependant entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::{DependantId, UserId};

use super::location::Location;

/// Gender of a dependant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Return the gender as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// A family member receiving services, owned by one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependant {
    /// Unique identifier.
    pub id: DependantId,
    /// Owning customer.
    pub owner_id: UserId,
    /// Full name.
    pub name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender.
    pub gender: Gender,
    /// Service area.
    pub location: Location,
    /// Street address.
    pub full_address: String,
    /// Known conditions.
    pub medical_conditions: String,
    /// Current medications.
    pub medications: Vec<String>,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a dependant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDependant {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub location: Location,
    pub full_address: String,
    #[serde(default)]
    pub medical_conditions: String,
    #[serde(default)]
    pub medications: Vec<String>,
    pub photo_url: Option<String>,
}

impl CreateDependant {
    /// Build the stored record for `owner`.
    pub fn into_dependant(self, owner: UserId, now: DateTime<Utc>) -> Dependant {
        Dependant {
            id: DependantId::new(),
            owner_id: owner,
            name: self.name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            location: self.location,
            full_address: self.full_address,
            medical_conditions: self.medical_conditions,
            medications: self.medications,
            photo_url: self.photo_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a dependant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDependant {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub location: Option<Location>,
    pub full_address: Option<String>,
    pub medical_conditions: Option<String>,
    pub medications: Option<Vec<String>>,
    pub photo_url: Option<String>,
}

impl UpdateDependant {
    /// Apply the changes.
    pub fn apply(self, dependant: &mut Dependant, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            dependant.name = name.trim().to_string();
        }
        if let Some(dob) = self.date_of_birth {
            dependant.date_of_birth = dob;
        }
        if let Some(gender) = self.gender {
            dependant.gender = gender;
        }
        if let Some(location) = self.location {
            dependant.location = location;
        }
        if let Some(address) = self.full_address {
            dependant.full_address = address;
        }
        if let Some(conditions) = self.medical_conditions {
            dependant.medical_conditions = conditions;
        }
        if let Some(medications) = self.medications {
            dependant.medications = medications;
        }
        if self.photo_url.is_some() {
            dependant.photo_url = self.photo_url;
        }
        dependant.updated_at = now;
    }
}
