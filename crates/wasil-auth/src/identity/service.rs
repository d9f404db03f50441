//! Identity service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use wasil_core::config::AuthConfig;
use wasil_core::events::{AccountEvent, DomainEvent, EventPayload, MailboxEvent};
use wasil_core::traits::EventPublisher;
use wasil_core::types::UserId;
use wasil_core::{AppError, AppResult};
use wasil_database::{NotificationStore, UserStore, VerificationToken};
use wasil_entity::notification::Notification;
use wasil_entity::user::{CreateUser, SubscriptionPlan, UpdateProfile, User, UserRole};

use super::token;
use crate::jwt::JwtEncoder;
use crate::password::{PasswordHasher, PasswordValidator};

/// Profile data supplied at sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub plan: SubscriptionPlan,
}

/// Result of a registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The new, unverified account.
    pub user: User,
    /// Token that proves ownership of the email address.
    pub verification_token: String,
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
    /// The signed-in account.
    pub user: User,
}

/// Owns the account lifecycle.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationStore>,
    events: Arc<dyn EventPublisher>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    verification_ttl: chrono::Duration,
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("verification_ttl", &self.verification_ttl)
            .finish()
    }
}

impl IdentityService {
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            users,
            notifications,
            events,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config),
            verification_ttl: chrono::Duration::hours(config.verification_ttl_hours as i64),
        }
    }

    /// Register a customer account.
    pub async fn register(&self, input: RegistrationInput) -> AppResult<Registration> {
        self.register_with_role(input, UserRole::Customer).await
    }

    /// Register an account with an explicit role (administrator tooling).
    pub async fn register_with_role(
        &self,
        input: RegistrationInput,
        role: UserRole,
    ) -> AppResult<Registration> {
        let email = input.email.trim().to_lowercase();
        if !looks_like_email(&email) {
            return Err(AppError::validation("A valid email address is required"));
        }
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        self.validator
            .validate(&input.password, &[email.as_str(), name.as_str()])?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let now = Utc::now();
        let user = CreateUser {
            email,
            password_hash: self.hasher.hash_password(&input.password)?,
            name,
            phone: input.phone,
            country: input.country,
            address: input.address,
            plan: input.plan,
            role,
        }
        .into_user(now);
        self.users.insert(&user).await?;

        let verification_token = token::generate();
        self.users
            .insert_verification(&VerificationToken {
                token_hash: token::digest(&verification_token),
                user_id: user.id,
                expires_at: now + self.verification_ttl,
            })
            .await?;

        info!(user_id = %user.id, role = %role, "Registered account");
        self.events
            .publish(DomainEvent::new(
                Some(user.id.into_uuid()),
                EventPayload::Account(AccountEvent::Registered {
                    user_id: user.id.into_uuid(),
                    role: role.to_string(),
                }),
            ))
            .await;

        Ok(Registration {
            user,
            verification_token,
        })
    }

    /// Consume a verification token and post the welcome notification.
    pub async fn verify_email(&self, verification_token: &str) -> AppResult<User> {
        let stored = self
            .users
            .take_verification(&token::digest(verification_token))
            .await?
            .ok_or_else(|| AppError::validation("Unknown or already used verification token"))?;

        let now = Utc::now();
        if stored.expires_at < now {
            return Err(AppError::validation("Verification token has expired"));
        }

        let mut user = self
            .users
            .find(stored.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", stored.user_id)))?;
        user.email_verified = true;
        user.updated_at = now;
        self.users.update(&user).await?;

        let welcome = Notification::new(
            user.id,
            "Welcome to Wasil",
            format!(
                "Hi {}, your account is ready. Add a family member to request your first service.",
                user.name
            ),
            None,
            now,
        );
        // The account is already verified; a lost welcome message is not fatal.
        match self.notifications.insert(&welcome).await {
            Ok(()) => {
                self.events
                    .publish(DomainEvent::new(
                        None,
                        EventPayload::Mailbox(MailboxEvent::NotificationCreated {
                            notification_id: welcome.id.into_uuid(),
                            recipient_id: user.id.into_uuid(),
                            snapshot: serde_json::to_value(&welcome)?,
                        }),
                    ))
                    .await;
            }
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to post welcome notification"),
        }

        self.events
            .publish(DomainEvent::new(
                Some(user.id.into_uuid()),
                EventPayload::Account(AccountEvent::EmailVerified {
                    user_id: user.id.into_uuid(),
                }),
            ))
            .await;

        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    /// Check credentials and open a session.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Session> {
        let invalid = || AppError::authentication("Invalid email or password");

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }
        if !user.can_login() {
            return Err(AppError::authentication(
                "Email address has not been verified",
            ));
        }

        let (token, expires_at) = self.encoder.issue(user.id, user.role, &user.name)?;
        info!(user_id = %user.id, role = %user.role, "Session opened");
        Ok(Session {
            token,
            expires_at,
            user,
        })
    }

    /// Fetch an account.
    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.users
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Update profile fields of an account.
    pub async fn update_profile(&self, id: UserId, changes: UpdateProfile) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        changes.apply(&mut user, Utc::now());
        self.users.update(&user).await?;
        Ok(user)
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
