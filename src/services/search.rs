use std::sync::Arc;

use crate::{
    error::{PipelineError, SearchError},
    models::{DerivedProfile, PipelineState, SearchResult},
    services::providers::SearchProvider,
};

/// Intent phrase closing every primary query
const PRIMARY_SUFFIX: &str = "맛집 추천";
/// Intent phrase closing the simplified retry query
const SIMPLIFIED_SUFFIX: &str = "맛집";

/// How the orchestrator sizes and judges its outcome
#[derive(Debug, Clone, Copy)]
pub struct SearchPolicy {
    /// Cap on the number of listings handed to the synthesizer
    pub max_results: usize,
    /// Treat an empty outcome as a pipeline error instead of "nothing found"
    pub require_results: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_results: 5,
            require_results: false,
        }
    }
}

/// Listings found for a request plus the provider that found them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub source: Option<&'static str>,
}

enum ProviderOutcome {
    Found(Vec<SearchResult>),
    Empty,
    Failed(SearchError),
}

/// Search modifier keyword for a weather condition
pub fn weather_keyword(weather: &str) -> &'static str {
    match weather {
        "맑음" => "뷰 좋은",
        "흐림" => "아늑한",
        "비" => "실내",
        "더움" => "시원한",
        "추움" => "따뜻한",
        _ => "",
    }
}

fn join_terms<'a>(terms: impl IntoIterator<Item = &'a str>) -> String {
    terms
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full query: location, cuisine, weather modifier and every profile term
pub fn build_query(profile: &DerivedProfile) -> String {
    let mut terms = vec![
        profile.location.as_str(),
        profile.preferred_cuisine.as_str(),
        weather_keyword(&profile.weather_condition),
        profile.companion_type.as_str(),
        profile.preferred_ambiance.as_str(),
    ];
    terms.extend(profile.special_requirements.iter().map(String::as_str));
    terms.push(PRIMARY_SUFFIX);
    join_terms(terms)
}

/// Retry query with every modifier dropped
pub fn build_simplified_query(profile: &DerivedProfile) -> String {
    join_terms([
        profile.location.as_str(),
        profile.preferred_cuisine.as_str(),
        SIMPLIFIED_SUFFIX,
    ])
}

fn check_required(profile: &DerivedProfile) -> Result<(), PipelineError> {
    let missing: Vec<&str> = [
        ("location", profile.location.as_str()),
        ("cuisine_preference", profile.preferred_cuisine.as_str()),
        ("weather", profile.weather_condition.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput(missing.join(", ")))
    }
}

/// Turns a derived profile into a capped, relevance-ordered listing set
///
/// Providers form an ordered chain. Each gets the primary query and, on an
/// empty answer or transport failure, exactly one simplified retry. A
/// provider that is not configured is skipped without a retry. The first
/// non-empty answer wins.
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn SearchProvider>>,
    policy: SearchPolicy,
}

impl SearchOrchestrator {
    /// A zero result cap is raised to one so a winning provider always hands over a listing
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>, mut policy: SearchPolicy) -> Self {
        if policy.max_results == 0 {
            tracing::warn!("max_results of 0 raised to 1");
            policy.max_results = 1;
        }
        Self { providers, policy }
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    async fn query_provider(
        &self,
        provider: &dyn SearchProvider,
        primary: &str,
        simplified: &str,
    ) -> ProviderOutcome {
        match provider.search(primary).await {
            Ok(results) if !results.is_empty() => return ProviderOutcome::Found(results),
            Ok(_) => {
                tracing::info!(
                    provider = provider.name(),
                    query = %simplified,
                    "Primary query found nothing, retrying with simplified query"
                );
            }
            Err(err @ SearchError::Configuration(_)) => {
                tracing::warn!(provider = provider.name(), error = %err, "Skipping provider");
                return ProviderOutcome::Failed(err);
            }
            Err(err) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %err,
                    query = %simplified,
                    "Primary query failed, retrying with simplified query"
                );
            }
        }

        match provider.search(simplified).await {
            Ok(results) if !results.is_empty() => ProviderOutcome::Found(results),
            Ok(_) => ProviderOutcome::Empty,
            Err(err) => {
                tracing::error!(provider = provider.name(), error = %err, "Retry failed");
                ProviderOutcome::Failed(err)
            }
        }
    }

    /// Search stage: runs the provider chain for the state's profile
    pub async fn search(&self, state: &PipelineState) -> Result<SearchOutcome, PipelineError> {
        let profile = state
            .profile
            .as_ref()
            .ok_or_else(|| PipelineError::MissingInput("user profile".to_string()))?;
        check_required(profile)?;

        let primary = build_query(profile);
        let simplified = build_simplified_query(profile);
        tracing::info!(stage = "search", query = %primary, "Searching restaurants");

        let mut answered = false;
        let mut transport_error = None;

        for provider in &self.providers {
            match self
                .query_provider(provider.as_ref(), &primary, &simplified)
                .await
            {
                ProviderOutcome::Found(mut results) => {
                    results.truncate(self.policy.max_results);
                    tracing::info!(
                        stage = "search",
                        provider = provider.name(),
                        results = results.len(),
                        "Search completed"
                    );
                    return Ok(SearchOutcome {
                        results,
                        source: Some(provider.name()),
                    });
                }
                ProviderOutcome::Empty => answered = true,
                ProviderOutcome::Failed(SearchError::Transport(msg)) => {
                    transport_error = Some(msg)
                }
                ProviderOutcome::Failed(SearchError::Configuration(_)) => {}
            }
        }

        tracing::warn!(stage = "search", "No provider returned any listings");

        if self.policy.require_results {
            return Err(match transport_error {
                Some(msg) if !answered => PipelineError::SearchTransport(msg),
                _ => PipelineError::NoResults,
            });
        }

        Ok(SearchOutcome::default())
    }
}
