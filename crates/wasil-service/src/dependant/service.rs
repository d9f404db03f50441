//! Dependant CRUD scoped to the owning customer.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use wasil_core::types::{DependantId, RequestId};
use wasil_core::{AppError, AppResult};
use wasil_database::{DependantStore, RequestStore};
use wasil_entity::dependant::{CreateDependant, Dependant, UpdateDependant};

use crate::context::RequestContext;

const MAX_NAME_LENGTH: usize = 120;

/// Dependant profiles. Only the owner may write; the owner, admins and the
/// dispatcher assigned to one of the dependant's requests may read.
#[derive(Debug, Clone)]
pub struct DependantService {
    store: Arc<dyn DependantStore>,
    requests: Arc<dyn RequestStore>,
}

impl DependantService {
    pub fn new(store: Arc<dyn DependantStore>, requests: Arc<dyn RequestStore>) -> Self {
        Self { store, requests }
    }

    pub async fn create(&self, ctx: &RequestContext, input: CreateDependant) -> AppResult<Dependant> {
        validate_name(&input.name)?;
        if input.full_address.trim().is_empty() {
            return Err(AppError::validation("Address is required"));
        }
        if input.date_of_birth > ctx.request_time.date_naive() {
            return Err(AppError::validation("Date of birth is in the future"));
        }

        let dependant = input.into_dependant(ctx.user_id, Utc::now());
        self.store.insert(&dependant).await?;
        info!(dependant_id = %dependant.id, owner_id = %ctx.user_id, "Created dependant");
        Ok(dependant)
    }

    /// The caller's dependants.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Dependant>> {
        self.store.list_by_owner(ctx.user_id).await
    }

    /// A dependant owned by the caller, or any dependant for an admin.
    pub async fn get(&self, ctx: &RequestContext, id: DependantId) -> AppResult<Dependant> {
        let dependant = self.find(id).await?;
        if dependant.owner_id == ctx.user_id || ctx.is_admin() {
            Ok(dependant)
        } else {
            Err(not_found(id))
        }
    }

    /// Lookup used by request creation: the dependant must belong to the caller.
    pub async fn owned(&self, ctx: &RequestContext, id: DependantId) -> AppResult<Dependant> {
        let dependant = self.find(id).await?;
        if dependant.owner_id != ctx.user_id {
            return Err(not_found(id));
        }
        Ok(dependant)
    }

    /// The dependant behind a request, for the dispatcher working it.
    pub async fn dossier(&self, ctx: &RequestContext, request_id: RequestId) -> AppResult<Dependant> {
        let request = self
            .requests
            .find(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))?;
        let allowed = request.is_assigned_to(ctx.user_id)
            || request.is_owned_by(ctx.user_id)
            || ctx.is_admin();
        if !allowed {
            return Err(AppError::forbidden("Not assigned to this request"));
        }
        self.find(request.dependant_id).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DependantId,
        changes: UpdateDependant,
    ) -> AppResult<Dependant> {
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        let mut dependant = self.find(id).await?;
        if dependant.owner_id != ctx.user_id {
            return Err(not_found(id));
        }
        changes.apply(&mut dependant, Utc::now());
        self.store.update(&dependant).await?;
        Ok(dependant)
    }

    /// Delete a dependant. Existing requests keep their copied name and location.
    pub async fn delete(&self, ctx: &RequestContext, id: DependantId) -> AppResult<()> {
        let dependant = self.find(id).await?;
        if dependant.owner_id != ctx.user_id {
            return Err(not_found(id));
        }
        self.store.delete(id).await?;
        info!(dependant_id = %id, owner_id = %ctx.user_id, "Deleted dependant");
        Ok(())
    }

    /// Set the photo of a dependant the caller owns.
    pub async fn set_photo(&self, ctx: &RequestContext, id: DependantId, url: String) -> AppResult<Dependant> {
        self.update(
            ctx,
            id,
            UpdateDependant {
                photo_url: Some(url),
                ..Default::default()
            },
        )
        .await
    }

    async fn find(&self, id: DependantId) -> AppResult<Dependant> {
        self.store.find(id).await?.ok_or_else(|| not_found(id))
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation("Name is too long"));
    }
    Ok(())
}

fn not_found(id: DependantId) -> AppError {
    AppError::not_found(format!("Dependant {id} not found"))
}
