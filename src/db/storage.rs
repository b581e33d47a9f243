use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::{
    error::StorageError,
    models::{PipelineState, SearchResult},
};

/// Source label stored when the provider is unknown
const UNKNOWN_SOURCE: &str = "unknown";
/// Rows returned per popularity ranking
const POPULAR_LIMIT: i64 = 5;

/// Identifiers written by `Storage::save_complete`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SavedSession {
    pub session_id: i64,
    pub search_result_ids: Vec<i64>,
    pub recommendation_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: i64,
    pub age: i32,
    pub cuisine_preference: String,
    pub weather: String,
    pub location: String,
    pub companion_type: String,
    pub ambiance: String,
    pub special_requirements: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredSearchResult {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub link: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredRecommendation {
    pub id: i64,
    pub recommendation_text: String,
    pub ai_model: String,
    pub created_at: DateTime<Utc>,
}

/// A stored session with everything recorded against it
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub session: SessionRecord,
    pub search_results: Vec<StoredSearchResult>,
    pub recommendations: Vec<StoredRecommendation>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, PartialEq, Eq)]
pub struct CountEntry {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub total_sessions: i64,
    pub total_recommendations: i64,
    pub popular_cuisines: Vec<CountEntry>,
    pub popular_locations: Vec<CountEntry>,
}

/// Persistence collaborator
///
/// Independent of pipeline success: callers log failures and carry on with
/// the state they already computed.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Writes the session, its listings and its recommendations atomically
    async fn save_complete(&self, state: &PipelineState) -> Result<SavedSession, StorageError>;

    async fn find_session(&self, session_id: i64) -> Result<Option<SessionDetail>, StorageError>;

    async fn statistics(&self) -> Result<Statistics, StorageError>;
}

fn requirements_column(requirements: &[String]) -> String {
    requirements.join(", ")
}

/// Inserts the user's raw preferences and returns the new session id
pub async fn save_session(
    conn: &mut PgConnection,
    state: &PipelineState,
) -> Result<i64, StorageError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO food_reco.user_session
            (age, cuisine_preference, weather, location, companion_type, ambiance, special_requirements)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(i32::try_from(state.age).unwrap_or(i32::MAX))
    .bind(&state.cuisine_preference)
    .bind(&state.weather)
    .bind(&state.location)
    .bind(&state.companion_type)
    .bind(&state.ambiance)
    .bind(requirements_column(&state.special_requirements))
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Inserts listings in relevance order and returns their ids
pub async fn save_search_results(
    conn: &mut PgConnection,
    session_id: i64,
    results: &[SearchResult],
    source: &str,
    cuisine_preference: &str,
) -> Result<Vec<i64>, StorageError> {
    let mut ids = Vec::with_capacity(results.len());

    for result in results {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO food_reco.search_result
                (session_id, title, description, link, source, cuisine_preference)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(session_id)
        .bind(&result.title)
        .bind(&result.description)
        .bind(&result.link)
        .bind(source)
        .bind(cuisine_preference)
        .fetch_one(&mut *conn)
        .await?;
        ids.push(id);
    }

    Ok(ids)
}

pub async fn save_recommendation(
    conn: &mut PgConnection,
    session_id: i64,
    text: &str,
    ai_model: &str,
) -> Result<i64, StorageError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO food_reco.recommendation (session_id, recommendation_text, ai_model)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(session_id)
    .bind(text)
    .bind(ai_model)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn popular(&self, column: &str) -> Result<Vec<CountEntry>, StorageError> {
        // `column` is one of our own column names, never user input
        let sql = format!(
            "SELECT {column} AS name, COUNT(*) AS count \
             FROM food_reco.user_session \
             GROUP BY {column} \
             ORDER BY count DESC, name ASC \
             LIMIT $1"
        );

        let rows = sqlx::query_as::<_, CountEntry>(&sql)
            .bind(POPULAR_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl Storage for PgStorage {
    async fn save_complete(&self, state: &PipelineState) -> Result<SavedSession, StorageError> {
        // Dropping the transaction on an early `?` rolls it back
        let mut tx = self.pool.begin().await?;

        let session_id = save_session(&mut tx, state).await?;
        let search_result_ids = save_search_results(
            &mut tx,
            session_id,
            &state.search_results,
            state.search_source.as_deref().unwrap_or(UNKNOWN_SOURCE),
            &state.cuisine_preference,
        )
        .await?;

        let ai_model = state.generated_by.as_deref().unwrap_or(UNKNOWN_SOURCE);
        let mut recommendation_ids = Vec::with_capacity(state.recommendations.len());
        for text in &state.recommendations {
            recommendation_ids.push(save_recommendation(&mut tx, session_id, text, ai_model).await?);
        }

        tx.commit().await?;

        tracing::info!(
            session_id,
            search_results = search_result_ids.len(),
            recommendations = recommendation_ids.len(),
            "Session persisted"
        );

        Ok(SavedSession {
            session_id,
            search_result_ids,
            recommendation_ids,
        })
    }

    async fn find_session(&self, session_id: i64) -> Result<Option<SessionDetail>, StorageError> {
        let session = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT id, age, cuisine_preference, weather, location, companion_type,
                   ambiance, special_requirements, created_at
            FROM food_reco.user_session
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        let search_results = sqlx::query_as::<_, StoredSearchResult>(
            r#"
            SELECT id, title, description, link, source, created_at
            FROM food_reco.search_result
            WHERE session_id = $1
            ORDER BY id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let recommendations = sqlx::query_as::<_, StoredRecommendation>(
            r#"
            SELECT id, recommendation_text, ai_model, created_at
            FROM food_reco.recommendation
            WHERE session_id = $1
            ORDER BY id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SessionDetail {
            session,
            search_results,
            recommendations,
        }))
    }

    async fn statistics(&self) -> Result<Statistics, StorageError> {
        let total_sessions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM food_reco.user_session")
                .fetch_one(&self.pool)
                .await?;
        let total_recommendations: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM food_reco.recommendation")
                .fetch_one(&self.pool)
                .await?;

        Ok(Statistics {
            total_sessions,
            total_recommendations,
            popular_cuisines: self.popular("cuisine_preference").await?,
            popular_locations: self.popular("location").await?,
        })
    }
}
