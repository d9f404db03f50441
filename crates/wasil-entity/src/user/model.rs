//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::UserId;

use super::plan::SubscriptionPlan;
use super::role::UserRole;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Phone number with country code.
    pub phone: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Subscription plan.
    pub plan: SubscriptionPlan,
    /// Role.
    pub role: UserRole,
    /// Whether the email address was verified.
    pub email_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the account may open a session.
    pub fn can_login(&self) -> bool {
        self.email_verified
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Plan.
    pub plan: SubscriptionPlan,
    /// Role.
    pub role: UserRole,
}

impl CreateUser {
    /// Build the stored record.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            email: self.email.trim().to_lowercase(),
            password_hash: self.password_hash,
            name: self.name,
            phone: self.phone,
            country: self.country,
            address: self.address,
            photo_url: None,
            plan: self.plan,
            role: self.role,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile fields a user may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New photo URL.
    pub photo_url: Option<String>,
    /// New plan.
    pub plan: Option<SubscriptionPlan>,
}

impl UpdateProfile {
    /// Apply the changes to a user record.
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if self.phone.is_some() {
            user.phone = self.phone;
        }
        if self.country.is_some() {
            user.country = self.country;
        }
        if self.address.is_some() {
            user.address = self.address;
        }
        if self.photo_url.is_some() {
            user.photo_url = self.photo_url;
        }
        if let Some(plan) = self.plan {
            user.plan = plan;
        }
        user.updated_at = now;
    }
}
