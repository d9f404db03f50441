//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

use wasil_auth::RegistrationInput;
use wasil_entity::catalog::Category;
use wasil_entity::request::RequestStatus;
use wasil_entity::user::SubscriptionPlan;

/// Sign-up request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 80))]
    pub country: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[serde(default)]
    pub plan: SubscriptionPlan,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            name: req.name,
            phone: req.phone,
            country: req.country,
            address: req.address,
            plan: req.plan,
        }
    }
}

/// Login request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Email verification request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Verification token is required"))]
    pub token: String,
}

/// Customer cancellation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CancelRequestBody {
    #[validate(length(min = 1, message = "A cancellation reason is required"))]
    pub reason: String,
}

/// Status change by a dispatcher or an admin.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusChangeBody {
    #[validate(custom(function = "reachable_status"))]
    pub status: RequestStatus,
}

/// No transition leads back to `REQUESTED`.
fn reachable_status(status: &RequestStatus) -> Result<(), validator::ValidationError> {
    if *status == RequestStatus::Requested {
        return Err(validator::ValidationError::new("status").with_message("A request cannot move back to requested".into()));
    }
    Ok(())
}

/// Toggle a dispatcher's availability.
#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

/// Catalog filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<Category>,
}

/// Admin request listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilterQuery {
    pub status: Option<RequestStatus>,
}
