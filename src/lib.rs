pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::mem_store::MemStore;
use crate::error::Result;
use crate::services::{
    catalog_service::CatalogService, generator_service::GeneratorService,
    scoring_service::ScoringService, session_service::SessionService,
};
use crate::utils::time::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub store: MemStore,
    pub catalog: Arc<CatalogService>,
    pub generator_service: GeneratorService,
    pub scoring_service: ScoringService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let catalog = Arc::new(CatalogService::embedded()?);

        let store = MemStore::new(clock.clone());
        if config.seed_catalog {
            store.seed_catalog(&catalog)?;
        }

        let generator_service = GeneratorService::new(catalog.clone(), clock.clone());
        let scoring_service = ScoringService::new(clock);
        let session_service = SessionService::new(
            generator_service.clone(),
            scoring_service.clone(),
            config.ui_preferences(),
        );

        Ok(Self {
            store,
            catalog,
            generator_service,
            scoring_service,
            session_service,
        })
    }
}
