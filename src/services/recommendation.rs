use std::sync::Arc;

use crate::{
    models::{PipelineState, SearchResult},
    services::generation::Generator,
};

/// Sole recommendation when search found nothing
pub const NO_RESULTS_PLACEHOLDER: &str = "추천할 맛집을 찾지 못했습니다.";
/// `generated_by` marker for recommendations that are raw listing summaries
pub const FALLBACK_SOURCE: &str = "fallback";

/// Characters of a listing description kept in its summary
const DESCRIPTION_BUDGET: usize = 300;
/// Upper bound on the picks the model is asked to make
const MAX_PICKS: usize = 3;
const UNTITLED: &str = "제목 없음";
const NONE_LABEL: &str = "없음";

/// One enumerated, length-capped line per listing, 1-based
pub fn format_candidates(results: &[SearchResult]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let title = if result.title.trim().is_empty() {
                UNTITLED
            } else {
                result.title.as_str()
            };
            let truncated = result.description.chars().count() > DESCRIPTION_BUDGET;
            let description: String = result.description.chars().take(DESCRIPTION_BUDGET).collect();
            format!(
                "{}. {} - {}{}",
                i + 1,
                title,
                description,
                if truncated { "..." } else { "" }
            )
        })
        .collect()
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE_LABEL.to_string()
    } else {
        items.join(", ")
    }
}

/// Prompt embedding raw input, the derived profile and the listing summaries
pub fn build_prompt(state: &PipelineState, summaries: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("다음은 사용자 정보입니다:\n");
    prompt.push_str(&format!("나이: {}\n", state.age));
    prompt.push_str(&format!("선호 음식: {}\n", state.cuisine_preference));
    prompt.push_str(&format!("지역: {}\n", state.location));
    prompt.push_str(&format!("동반자유형: {}\n", state.companion_type));
    prompt.push_str(&format!("원하는 분위기: {}\n", state.ambiance));
    prompt.push_str(&format!(
        "특별 요구사항: {}\n",
        join_or_none(&state.special_requirements)
    ));

    if let Some(profile) = &state.profile {
        prompt.push_str("\n사용자 프로필 분석 결과:\n");
        prompt.push_str(&format!("- 나이대: {}\n", profile.age_group));
        prompt.push_str(&format!("- 계절: {}\n", profile.season));
        prompt.push_str(&format!("- 날씨: {}\n", profile.weather_condition));
        prompt.push_str(&format!(
            "- 나이대별 선호도: {}\n",
            join_or_none(&profile.age_based_preferences)
        ));
        prompt.push_str(&format!(
            "- 날씨별 선호도: {}\n",
            join_or_none(&profile.weather_based_preferences)
        ));
        prompt.push_str(&format!("- 동반자유형: {}\n", profile.companion_type));
        prompt.push_str(&format!("- 분위기 선호도: {}\n", profile.preferred_ambiance));
    }

    prompt.push_str("\n검색된 맛집 목록:\n");
    prompt.push_str(&summaries.join("\n"));
    prompt.push_str("\n\n");
    prompt.push_str("위 정보를 바탕으로 사용자에게 가장 적합한 맛집을 추천해주세요. ");
    prompt.push_str(
        "나이대별 선호도, 날씨, 계절, 동반자유형, 분위기, 특별 요구사항을 종합적으로 고려하여 \
         맛집을 선별하고 그 이유도 상세히 설명해주세요. ",
    );
    prompt.push_str(&format!(
        "최대 {}개의 맛집을 추천하고, 각 맛집에 대한 특징과 추천 이유를 \
         **대표 메뉴, 가격대, 분위기, 전반적인 평점(별점 표현), 동반자유형 적합성, 특별 요구사항 만족도**를 \
         포함하여 한국어로 작성해주세요.",
        MAX_PICKS
    ));

    prompt
}

/// Recommend stage: turns capped listings into user-facing text
///
/// Never fails. Generation problems degrade to the formatted summaries.
pub struct RecommendationSynthesizer {
    generator: Arc<dyn Generator>,
}

impl RecommendationSynthesizer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub async fn synthesize(&self, state: &mut PipelineState) {
        if state.has_failed() {
            tracing::debug!(stage = "recommend", "Skipping recommendation after failure");
            return;
        }

        if state.search_results.is_empty() {
            tracing::info!(stage = "recommend", "No listings to recommend");
            state.recommendations = vec![NO_RESULTS_PLACEHOLDER.to_string()];
            state.generated_by = None;
            return;
        }

        let summaries = format_candidates(&state.search_results);
        let prompt = build_prompt(state, &summaries);

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                state.recommendations = vec![text];
                state.generated_by = Some(self.generator.model());
            }
            Err(err) => {
                tracing::warn!(
                    stage = "recommend",
                    error = %err,
                    "Generation failed, returning listing summaries"
                );
                state.recommendations = summaries;
                state.generated_by = Some(FALLBACK_SOURCE.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::services::generation::MockGenerator;
    use crate::services::profile::derive_for_month;

    fn state_with_results(n: usize) -> PipelineState {
        let mut state = PipelineState {
            age: 25,
            cuisine_preference: "한식".to_string(),
            weather: "비".to_string(),
            location: "강남".to_string(),
            companion_type: "데이트".to_string(),
            ambiance: "아늑한".to_string(),
            ..Default::default()
        };
        state.profile = Some(derive_for_month(&state, 10));
        state.search_results = (1..=n)
            .map(|i| SearchResult::new(format!("식당 {}", i), "조용한 분위기", "https://r"))
            .collect();
        state
    }

    #[test]
    fn test_format_candidates_truncates_long_descriptions() {
        let long = "가".repeat(DESCRIPTION_BUDGET + 10);
        let results = vec![
            SearchResult::new("짧은집", "맛있다", ""),
            SearchResult::new("", long.clone(), ""),
        ];

        let formatted = format_candidates(&results);
        assert_eq!(formatted[0], "1. 짧은집 - 맛있다");
        assert!(formatted[1].starts_with("2. 제목 없음 - "));
        assert!(formatted[1].ends_with("..."));
        assert_eq!(
            formatted[1].chars().filter(|c| *c == '가').count(),
            DESCRIPTION_BUDGET
        );
    }

    #[test]
    fn test_format_candidates_exact_budget_has_no_ellipsis() {
        let exact = "나".repeat(DESCRIPTION_BUDGET);
        let formatted = format_candidates(&[SearchResult::new("집", exact, "")]);
        assert!(!formatted[0].ends_with("..."));
    }

    #[test]
    fn test_prompt_contains_profile_and_candidates() {
        let state = state_with_results(2);
        let summaries = format_candidates(&state.search_results);
        let prompt = build_prompt(&state, &summaries);

        assert!(prompt.contains("나이: 25"));
        assert!(prompt.contains("나이대: 20대"));
        assert!(prompt.contains("계절: 가을"));
        assert!(prompt.contains("특별 요구사항: 없음"));
        assert!(prompt.contains("따뜻한 국"));
        assert!(prompt.contains("1. 식당 1 - 조용한 분위기"));
        assert!(prompt.contains("최대 3개의 맛집"));
    }

    #[tokio::test]
    async fn test_empty_results_yield_placeholder_without_generation() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let mut state = state_with_results(0);
        RecommendationSynthesizer::new(Arc::new(generator))
            .synthesize(&mut state)
            .await;

        assert_eq!(state.recommendations, vec![NO_RESULTS_PLACEHOLDER.to_string()]);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_generated_text_becomes_single_recommendation() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|prompt| Ok(format!("prompt length {}", prompt.chars().count())));
        generator
            .expect_model()
            .returning(|| "gemini-2.0-flash".to_string());

        let mut state = state_with_results(3);
        RecommendationSynthesizer::new(Arc::new(generator))
            .synthesize(&mut state)
            .await;

        assert_eq!(state.recommendations.len(), 1);
        assert!(state.recommendations[0].starts_with("prompt length "));
        assert_eq!(state.generated_by.as_deref(), Some("gemini-2.0-flash"));
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back_to_summaries() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(GenerationError::Request("quota exceeded".to_string())));

        let mut state = state_with_results(4);
        RecommendationSynthesizer::new(Arc::new(generator))
            .synthesize(&mut state)
            .await;

        assert_eq!(state.recommendations.len(), 4);
        for (i, rec) in state.recommendations.iter().enumerate() {
            assert!(rec.starts_with(&format!("{}. ", i + 1)));
        }
        assert!(state.error.is_none());
        assert_eq!(state.generated_by.as_deref(), Some(FALLBACK_SOURCE));
    }

    #[tokio::test]
    async fn test_failed_state_is_left_alone() {
        let mut generator = MockGenerator::new();
        generator.expect_generate().never();

        let mut state = state_with_results(2);
        state.error = Some("boom".to_string());
        RecommendationSynthesizer::new(Arc::new(generator))
            .synthesize(&mut state)
            .await;

        assert!(state.recommendations.is_empty());
    }
}
