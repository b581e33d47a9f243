use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::{self, PgStorage, Storage},
    services::{
        generation::{GeminiGenerator, Generator},
        providers::{BackupCatalogProvider, NaverCredentials, NaverSearchProvider, SearchProvider},
        Pipeline, RecommendationSynthesizer, SearchOrchestrator, SearchPolicy,
    },
};

/// Shared application state
///
/// Holds only immutable collaborators; every request builds its own
/// `PipelineState`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// `None` when no database is configured
    pub storage: Option<Arc<dyn Storage>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, storage: Option<Arc<dyn Storage>>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            storage,
        }
    }

    /// Wires the production collaborators described by `config`
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let pipeline = build_pipeline(config)?;

        let storage: Option<Arc<dyn Storage>> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url).await?;
                db::run_migrations(&pool).await?;
                Some(Arc::new(PgStorage::new(pool)))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, persistence disabled");
                None
            }
        };

        Ok(Self::new(pipeline, storage))
    }
}

/// Builds the pipeline with Naver search, the optional backup catalogue and Gemini
pub fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let credentials = NaverCredentials::from_parts(
        config.naver_client_id.clone(),
        config.naver_client_secret.clone(),
    );
    if credentials.is_none() {
        tracing::warn!("Naver credentials not set, web search unavailable");
    }

    let mut providers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(NaverSearchProvider::new(
        http_client.clone(),
        credentials,
        config.naver_api_url.clone(),
        config.naver_display,
    ))];
    if config.use_backup_search {
        providers.push(Arc::new(BackupCatalogProvider::new()));
    }

    let generator: Arc<dyn Generator> = Arc::new(GeminiGenerator::new(
        http_client,
        config.google_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        config.gemini_temperature,
    ));

    let policy = SearchPolicy {
        max_results: config.max_search_results,
        require_results: config.require_search_results,
    };

    Ok(Pipeline::new(
        SearchOrchestrator::new(providers, policy),
        RecommendationSynthesizer::new(generator),
    ))
}
