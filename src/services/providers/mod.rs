/// Restaurant search provider abstraction
///
/// This module provides a pluggable architecture for the data sources the
/// search orchestrator consults (Naver web search, the built-in backup
/// catalogue). Providers are tried in order, so each one only has to answer a
/// single query and report how it failed.
use crate::{error::SearchError, models::SearchResult};

pub mod backup;
pub mod naver;

pub use backup::BackupCatalogProvider;
pub use naver::{NaverCredentials, NaverSearchProvider};

/// Trait for restaurant search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for candidate listings matching a free-text query
    ///
    /// Returns listings in relevance order. An empty list is a valid answer,
    /// distinct from `SearchError`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Provider name for logging and persistence
    fn name(&self) -> &'static str;
}
