pub mod postgres;
pub mod storage;

pub use postgres::{create_pool, run_migrations};
pub use storage::{
    PgStorage, SavedSession, SessionDetail, SessionRecord, Statistics, Storage,
    StoredRecommendation, StoredSearchResult,
};
