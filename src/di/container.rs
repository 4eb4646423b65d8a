use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;

use crate::dexscreener::{DexScreenerPriceService, PriceService};
use crate::feed::{create_snapshot_source, SnapshotSource};
use crate::interactor::{
    ReconcileInteractorImpl, RefreshInteractorImpl, SharedTokenStore, Simulator, TokenStore,
};
use crate::presenter::{TrackerPresenter, TrackerPresenterImpl};
use crate::services::TrackerService;
use crate::settings::TrackerSettings;
use crate::view::TokenView;

/// ServiceContainer owns the token store and wires the tracker components
pub struct ServiceContainer {
    // Core services
    http_client: Client,
    store: SharedTokenStore,

    // External collaborators
    price_service: Arc<dyn PriceService>,
    snapshot_source: Arc<dyn SnapshotSource>,

    // Configuration
    settings: TrackerSettings,
}

impl ServiceContainer {
    /// Create a container with the DexScreener price service and configured snapshot source
    pub fn new(settings: TrackerSettings) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(settings.http_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let price_service = Arc::new(DexScreenerPriceService::new(
            http_client.clone(),
            settings.price_api_url.clone(),
        )) as Arc<dyn PriceService>;

        let snapshot_source = create_snapshot_source(http_client.clone(), &settings.backend_source);

        Ok(Self::with_services(
            settings,
            http_client,
            price_service,
            snapshot_source,
        ))
    }

    /// Create a container around custom collaborators
    pub fn with_services(
        settings: TrackerSettings,
        http_client: Client,
        price_service: Arc<dyn PriceService>,
        snapshot_source: Arc<dyn SnapshotSource>,
    ) -> Self {
        Self {
            http_client,
            store: TokenStore::shared(settings.max_tokens),
            price_service,
            snapshot_source,
            settings,
        }
    }

    /// Build the presenter driving both tick loops and rendering into `view`
    pub fn tracker_presenter(&self, view: Arc<dyn TokenView>) -> Arc<dyn TrackerPresenter> {
        let simulator = Arc::new(Simulator::new(
            self.price_service.clone(),
            self.settings.history_points,
        ));

        let reconcile = Arc::new(ReconcileInteractorImpl::new(
            self.store.clone(),
            self.snapshot_source.clone(),
            self.price_service.clone(),
            simulator,
            self.settings.history_points,
        ));

        let refresh = Arc::new(RefreshInteractorImpl::new(
            self.store.clone(),
            self.price_service.clone(),
        ));

        Arc::new(TrackerPresenterImpl::new(
            reconcile,
            refresh,
            view,
            self.store.clone(),
        ))
    }

    /// Background service running the loops on the configured intervals
    pub fn tracker_service(&self, presenter: Arc<dyn TrackerPresenter>) -> TrackerService {
        TrackerService::new(
            presenter,
            self.settings.reconcile_interval(),
            self.settings.refresh_interval(),
        )
    }

    // Accessor methods

    pub fn http_client(&self) -> Client {
        self.http_client.clone()
    }

    pub fn store(&self) -> SharedTokenStore {
        self.store.clone()
    }

    pub fn price_service(&self) -> Arc<dyn PriceService> {
        self.price_service.clone()
    }

    pub fn snapshot_source(&self) -> Arc<dyn SnapshotSource> {
        self.snapshot_source.clone()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }
}
