//! Stores uploads and links the resulting URL to the owning record.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use wasil_core::types::{DependantId, UserId};
use wasil_core::{AppError, AppResult};
use wasil_database::UserStore;
use wasil_entity::user::UpdateProfile;
use wasil_storage::{MediaKind, MediaObject, StorageManager};

use crate::context::RequestContext;
use crate::dependant::DependantService;
use crate::directory::DispatcherDirectory;

/// Which dispatcher media slot an upload fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherMedia {
    Portrait,
    FieldPhoto,
    WorkingVideo,
}

impl DispatcherMedia {
    fn kind(self) -> MediaKind {
        match self {
            Self::Portrait => MediaKind::DispatcherPhoto,
            Self::FieldPhoto => MediaKind::FieldPhoto,
            Self::WorkingVideo => MediaKind::WorkingVideo,
        }
    }
}

impl std::str::FromStr for DispatcherMedia {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" | "portrait" => Ok(Self::Portrait),
            "field" | "field_photo" => Ok(Self::FieldPhoto),
            "video" | "working_video" => Ok(Self::WorkingVideo),
            other => Err(AppError::validation(format!("Unknown dispatcher media slot '{other}'"))),
        }
    }
}

/// The record an upload belongs to.
#[derive(Debug, Clone, Copy)]
pub enum MediaTarget {
    Dependant(DependantId),
    Profile,
    Dispatcher { id: UserId, slot: DispatcherMedia },
}

#[derive(Debug, Clone)]
pub struct MediaService {
    storage: Arc<StorageManager>,
    dependants: DependantService,
    directory: DispatcherDirectory,
    users: Arc<dyn UserStore>,
}

impl MediaService {
    pub fn new(
        storage: Arc<StorageManager>,
        dependants: DependantService,
        directory: DispatcherDirectory,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            storage,
            dependants,
            directory,
            users,
        }
    }

    /// Store `data` and attach its URL to `target`.
    ///
    /// Ownership is checked before anything is written.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        target: MediaTarget,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<MediaObject> {
        match target {
            MediaTarget::Dependant(id) => {
                let dependant = self.dependants.get(ctx, id).await?;
                if dependant.owner_id != ctx.user_id {
                    return Err(AppError::forbidden("Only the owner can change this photo"));
                }
                let object = self
                    .storage
                    .put(MediaKind::DependantPhoto, &id.to_string(), content_type, data)
                    .await?;
                self.dependants.set_photo(ctx, id, object.url.clone()).await?;
                Ok(object)
            }
            MediaTarget::Profile => {
                let mut user = self
                    .users
                    .find(ctx.user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                let object = self
                    .storage
                    .put(MediaKind::ProfilePhoto, &ctx.user_id.to_string(), content_type, data)
                    .await?;
                UpdateProfile {
                    photo_url: Some(object.url.clone()),
                    ..Default::default()
                }
                .apply(&mut user, Utc::now());
                self.users.update(&user).await?;
                Ok(object)
            }
            MediaTarget::Dispatcher { id, slot } => {
                if !(ctx.is_admin() || ctx.user_id == id) {
                    return Err(AppError::forbidden("Cannot change another dispatcher's media"));
                }
                let mut dispatcher = self.directory.get(id).await?;
                let object = self
                    .storage
                    .put(slot.kind(), &id.to_string(), content_type, data)
                    .await?;
                let url = Some(object.url.clone());
                match slot {
                    DispatcherMedia::Portrait => dispatcher.photo_url = url,
                    DispatcherMedia::FieldPhoto => dispatcher.field_photo_url = url,
                    DispatcherMedia::WorkingVideo => dispatcher.working_video_url = url,
                }
                self.directory.save(&dispatcher).await?;
                Ok(object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasil_core::config::{DirectoryConfig, StorageConfig};
    use wasil_core::error::ErrorKind;
    use wasil_database::Stores;
    use wasil_entity::user::UserRole;
    use wasil_storage::providers::MemoryStorageProvider;

    fn service(stores: &Stores) -> MediaService {
        let storage = StorageManager::new(
            Arc::new(MemoryStorageProvider::new()),
            StorageConfig::default(),
            "http://localhost:8080",
        );
        MediaService::new(
            Arc::new(storage),
            DependantService::new(stores.dependants.clone(), stores.requests.clone()),
            DispatcherDirectory::new(
                &DirectoryConfig::default(),
                stores.dispatchers.clone(),
                stores.users.clone(),
                stores.requests.clone(),
            ),
            stores.users.clone(),
        )
    }

    #[tokio::test]
    async fn test_dependant_photo_is_linked() {
        let stores = Stores::memory();
        let media = service(&stores);
        let owner = RequestContext::new(UserId::new(), UserRole::Customer, "Maya");
        let deps = DependantService::new(stores.dependants.clone(), stores.requests.clone());
        let mom = deps
            .create(&owner, crate::dependant::service::tests::input("Nadia"))
            .await
            .unwrap();

        let object = media
            .upload(&owner, MediaTarget::Dependant(mom.id), "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert!(object.url.starts_with("http://localhost:8080/media/dependants/"));
        assert_eq!(deps.get(&owner, mom.id).await.unwrap().photo_url, Some(object.url));
    }

    #[tokio::test]
    async fn test_other_customer_cannot_upload() {
        let stores = Stores::memory();
        let media = service(&stores);
        let owner = RequestContext::new(UserId::new(), UserRole::Customer, "Maya");
        let other = RequestContext::new(UserId::new(), UserRole::Customer, "Karim");
        let deps = DependantService::new(stores.dependants.clone(), stores.requests.clone());
        let mom = deps
            .create(&owner, crate::dependant::service::tests::input("Nadia"))
            .await
            .unwrap();

        let err = media
            .upload(&other, MediaTarget::Dependant(mom.id), "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[test]
    fn test_slot_parsing() {
        assert_eq!("video".parse::<DispatcherMedia>().unwrap(), DispatcherMedia::WorkingVideo);
        assert!("poster".parse::<DispatcherMedia>().is_err());
    }
}
