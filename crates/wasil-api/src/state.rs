//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use wasil_auth::{IdentityService, JwtDecoder};
use wasil_core::AppResult;
use wasil_core::config::AppConfig;
use wasil_core::traits::{EventPublisher, StorageProvider};
use wasil_database::{DatabasePool, Stores};
use wasil_realtime::RealtimeEngine;
use wasil_service::assignment::policy_for;
use wasil_service::{
    AdminService, CatalogService, DependantService, DispatcherDirectory, GeminiClient,
    MailboxService, MediaService, ReassuranceService, RequestLifecycle, TextGenerator,
};
use wasil_storage::StorageManager;
use wasil_storage::providers::LocalStorageProvider;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Present for the PostgreSQL backend.
    pub db_pool: Option<DatabasePool>,
    pub stores: Stores,
    pub storage: Arc<StorageManager>,
    pub realtime: Arc<RealtimeEngine>,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,
    pub identity: Arc<IdentityService>,

    // ── Services ─────────────────────────────────────────────
    pub lifecycle: Arc<RequestLifecycle>,
    pub catalog: Arc<CatalogService>,
    pub dependants: DependantService,
    pub directory: DispatcherDirectory,
    pub mailbox: MailboxService,
    pub media: MediaService,
    pub admin: AdminService,
}

impl AppState {
    /// Wire the application from configuration: local media storage and,
    /// when an API key is configured, the Gemini text generator.
    pub async fn build(config: AppConfig, stores: Stores, db_pool: Option<DatabasePool>) -> AppResult<Self> {
        let provider = Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);
        let generator: Option<Arc<dyn TextGenerator>> = if config.reassurance.api_key.is_empty() {
            tracing::info!("No text generation key configured; reassurance uses the fallback message");
            None
        } else {
            Some(Arc::new(GeminiClient::new(&config.reassurance)?))
        };
        Ok(Self::assemble(config, stores, db_pool, provider, generator))
    }

    /// Wire the application from explicit collaborators.
    pub fn assemble(
        config: AppConfig,
        stores: Stores,
        db_pool: Option<DatabasePool>,
        provider: Arc<dyn StorageProvider>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone(), stores.requests.clone()));
        let events: Arc<dyn EventPublisher> = realtime.event_bridge.clone();

        let storage = Arc::new(StorageManager::new(
            provider,
            config.storage.clone(),
            &config.server.public_url,
        ));

        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let identity = Arc::new(IdentityService::new(
            &config.auth,
            stores.users.clone(),
            stores.notifications.clone(),
            events.clone(),
        ));

        let catalog = Arc::new(CatalogService::with_defaults(config.lifecycle.markup_percent));
        let dependants = DependantService::new(stores.dependants.clone(), stores.requests.clone());
        let directory = DispatcherDirectory::new(
            &config.directory,
            stores.dispatchers.clone(),
            stores.users.clone(),
            stores.requests.clone(),
        );
        let reassurance = ReassuranceService::new(&config.reassurance, generator);
        let lifecycle = Arc::new(RequestLifecycle::new(
            stores.requests.clone(),
            catalog.clone(),
            dependants.clone(),
            directory.clone(),
            policy_for(config.lifecycle.assignment_strategy),
            reassurance,
            events.clone(),
            config.lifecycle.clone(),
        ));
        let mailbox = MailboxService::new(stores.notifications.clone(), events);
        let media = MediaService::new(
            storage.clone(),
            dependants.clone(),
            directory.clone(),
            stores.users.clone(),
        );
        let admin = AdminService::new(stores.requests.clone(), stores.users.clone(), directory.clone());

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            db_pool,
            stores,
            storage,
            realtime,
            jwt_decoder,
            identity,
            lifecycle,
            catalog,
            dependants,
            directory,
            mailbox,
            media,
            admin,
        }
    }
}
