use std::fmt::Display;

use crate::{
    error::PipelineError,
    models::{PipelineState, Terminal, UserInput},
    services::{profile, recommendation::RecommendationSynthesizer, search::SearchOrchestrator},
};

/// Oldest age accepted at the input boundary
pub const MAX_AGE: u32 = 120;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectInput,
    DeriveProfile,
    Search,
    Recommend,
    HandleError,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CollectInput => "collect_input",
            Stage::DeriveProfile => "derive_profile",
            Stage::Search => "search",
            Stage::Recommend => "recommend",
            Stage::HandleError => "handle_error",
        };
        write!(f, "{}", name)
    }
}

/// Source of the raw user fields for the CollectInput stage
pub trait InputCollector {
    fn collect(&mut self, state: &mut PipelineState) -> Result<(), PipelineError>;
}

/// Input already parsed at the HTTP boundary
impl InputCollector for UserInput {
    fn collect(&mut self, state: &mut PipelineState) -> Result<(), PipelineError> {
        if self.age > MAX_AGE {
            return Err(PipelineError::InvalidInput(format!(
                "나이는 0에서 {} 사이여야 합니다: {}",
                MAX_AGE, self.age
            )));
        }
        state.apply_input(std::mem::take(self));
        Ok(())
    }
}

/// Terminal error stage: makes the failure observable, never alters content
pub fn handle_error(state: &PipelineState) {
    tracing::error!(
        stage = "handle_error",
        error = state.error.as_deref().unwrap_or_default(),
        "Pipeline halted"
    );
}

/// Sequences the stages over one request-scoped state
///
/// `CollectInput → DeriveProfile → Search → {Recommend | HandleError}`.
/// Input failures short-circuit to `HandleError`; after that the Search
/// result alone decides the branch. Both terminal stages are absorbing.
pub struct Pipeline {
    orchestrator: SearchOrchestrator,
    synthesizer: RecommendationSynthesizer,
}

impl Pipeline {
    pub fn new(orchestrator: SearchOrchestrator, synthesizer: RecommendationSynthesizer) -> Self {
        Self {
            orchestrator,
            synthesizer,
        }
    }

    /// Runs every stage to completion and hands the state back
    pub async fn run<C>(&self, collector: &mut C) -> PipelineState
    where
        C: InputCollector + ?Sized,
    {
        let mut state = PipelineState::new();
        let mut next = Some(Stage::CollectInput);

        while let Some(stage) = next {
            tracing::debug!(stage = %stage, "Entering stage");
            next = match stage {
                Stage::CollectInput => match collector.collect(&mut state) {
                    Ok(()) => Some(Stage::DeriveProfile),
                    Err(err) => {
                        state.fail(&err);
                        Some(Stage::HandleError)
                    }
                },
                Stage::DeriveProfile => {
                    profile::derive(&mut state);
                    Some(Stage::Search)
                }
                Stage::Search => match self.orchestrator.search(&state).await {
                    Ok(outcome) => {
                        state.search_results = outcome.results;
                        state.search_source = outcome.source.map(str::to_string);
                        Some(Stage::Recommend)
                    }
                    Err(err) => {
                        state.fail(&err);
                        Some(Stage::HandleError)
                    }
                },
                Stage::Recommend => {
                    self.synthesizer.synthesize(&mut state).await;
                    state.terminal = Some(Terminal::Recommended);
                    None
                }
                Stage::HandleError => {
                    handle_error(&state);
                    state.terminal = Some(Terminal::Failed);
                    None
                }
            };
        }

        state
    }

    /// Runs the pipeline on input parsed at a request boundary
    pub async fn run_input(&self, mut input: UserInput) -> PipelineState {
        self.run(&mut input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::models::{RequirementsInput, SearchResult};
    use crate::services::generation::{Generator, MockGenerator};
    use crate::services::providers::{MockSearchProvider, SearchProvider};
    use crate::services::search::SearchPolicy;
    use std::sync::Arc;

    fn sample_input() -> UserInput {
        UserInput {
            age: 25,
            cuisine_preference: "한식".to_string(),
            weather: "비".to_string(),
            location: "강남".to_string(),
            companion_type: "데이트".to_string(),
            ambiance: "아늑한".to_string(),
            special_requirements: RequirementsInput::Text(String::new()),
        }
    }

    fn three_listings() -> Vec<SearchResult> {
        vec![
            SearchResult::new("강남 한옥집", "김치찜 맛집", "https://a"),
            SearchResult::new("논현 순대국", "비 오는 날 국밥", "https://b"),
            SearchResult::new("역삼 칼국수", "바지락 칼국수", "https://c"),
        ]
    }

    fn pipeline(provider: MockSearchProvider, generator: MockGenerator) -> Pipeline {
        let providers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(provider)];
        let generator: Arc<dyn Generator> = Arc::new(generator);
        Pipeline::new(
            SearchOrchestrator::new(providers, SearchPolicy::default()),
            RecommendationSynthesizer::new(generator),
        )
    }

    #[tokio::test]
    async fn test_happy_path_ends_recommended() {
        let mut provider = MockSearchProvider::new();
        provider.expect_name().return_const("naver");
        provider
            .expect_search()
            .times(1)
            .returning(|_| Ok(three_listings()));

        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|prompt| Ok(prompt.len().to_string()));
        generator.expect_model().returning(|| "stub".to_string());

        let state = pipeline(provider, generator).run_input(sample_input()).await;

        assert!(state.error.is_none());
        assert_eq!(state.recommendations.len(), 1);
        assert_eq!(state.search_results.len(), 3);
        assert_eq!(state.search_source.as_deref(), Some("naver"));
        assert_eq!(state.terminal, Some(Terminal::Recommended));
        assert!(state.profile.is_some());
    }

    #[tokio::test]
    async fn test_missing_location_ends_at_error_terminal() {
        let mut provider = MockSearchProvider::new();
        provider.expect_search().never();
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let mut input = sample_input();
        input.location.clear();
        let state = pipeline(provider, generator).run_input(input).await;

        assert!(state.has_failed());
        assert!(state.search_results.is_empty());
        assert!(state.recommendations.is_empty());
        assert_eq!(state.terminal, Some(Terminal::Failed));
    }

    #[tokio::test]
    async fn test_invalid_age_skips_every_later_stage() {
        let mut provider = MockSearchProvider::new();
        provider.expect_search().never();
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let mut input = sample_input();
        input.age = 300;
        let state = pipeline(provider, generator).run_input(input).await;

        assert!(state.error.as_deref().unwrap().starts_with("입력값 오류"));
        assert!(state.profile.is_none());
        assert_eq!(state.terminal, Some(Terminal::Failed));
    }

    #[tokio::test]
    async fn test_search_outage_yields_placeholder_not_error() {
        let mut provider = MockSearchProvider::new();
        provider.expect_name().return_const("naver");
        provider
            .expect_search()
            .times(2)
            .returning(|_| Err(SearchError::Transport("down".to_string())));
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let state = pipeline(provider, generator).run_input(sample_input()).await;

        assert!(state.error.is_none());
        assert_eq!(
            state.recommendations,
            vec![crate::services::recommendation::NO_RESULTS_PLACEHOLDER.to_string()]
        );
        assert_eq!(state.terminal, Some(Terminal::Recommended));
    }

    #[test]
    fn test_user_input_collector_rejects_out_of_range_age() {
        let mut input = sample_input();
        input.age = MAX_AGE + 1;
        let mut state = PipelineState::new();
        assert!(matches!(
            input.collect(&mut state),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::HandleError.to_string(), "handle_error");
        assert_eq!(Stage::CollectInput.to_string(), "collect_input");
    }
}
