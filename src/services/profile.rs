use chrono::{Datelike, Local};

use crate::models::{AgeGroup, DerivedProfile, PipelineState, Season};

/// Food types that suit the given weather; unknown weather yields nothing
pub fn weather_affinities(weather: &str) -> &'static [&'static str] {
    match weather {
        "맑음" => &["BBQ", "피자", "치킨", "샐러드", "아이스크림", "카페"],
        "흐림" => &["국수", "스튜", "핫팟", "커피", "따뜻한 음식"],
        "비" => &["국수", "스튜", "핫팟", "따뜻한 국", "커피", "따뜻한 음식"],
        "눈" => &["핫팟", "스튜", "따뜻한 국", "따뜻한 음료", "커피"],
        "더움" => &["냉면", "샐러드", "아이스크림", "콜드브루", "빙수", "냉국"],
        "추움" => &["핫팟", "스튜", "따뜻한 국", "따뜻한 음료", "커피", "따뜻한 음식"],
        _ => &[],
    }
}

/// Food types commonly preferred by an age bracket
pub fn age_affinities(group: AgeGroup) -> &'static [&'static str] {
    match group {
        AgeGroup::Teens => &["피자", "햄버거", "치킨", "아이스크림", "떡볶이"],
        AgeGroup::Twenties => &["카페", "분식", "치킨", "피자", "샐러드"],
        AgeGroup::Thirties => &["한식", "양식", "카페", "치킨", "피자"],
        AgeGroup::Forties => &["한식", "양식", "중식", "일식", "카페"],
        AgeGroup::Fifties => &["한식", "중식", "일식", "양식", "전통음식"],
        AgeGroup::SixtiesPlus => &["한식", "전통음식", "중식", "일식", "건강식"],
    }
}

fn to_owned_tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

/// Builds the profile for `state` as of the given calendar month
pub fn derive_for_month(state: &PipelineState, month: u32) -> DerivedProfile {
    let age_group = AgeGroup::from_age(state.age);

    DerivedProfile {
        location: state.location.clone(),
        age_group,
        season: Season::from_month(month),
        weather_condition: state.weather.clone(),
        preferred_cuisine: state.cuisine_preference.clone(),
        companion_type: state.companion_type.clone(),
        preferred_ambiance: state.ambiance.clone(),
        special_requirements: state.special_requirements.clone(),
        age_based_preferences: to_owned_tags(age_affinities(age_group)),
        weather_based_preferences: to_owned_tags(weather_affinities(&state.weather)),
    }
}

/// DeriveProfile stage: writes the derived profile into the state
///
/// Only consults the wall clock, for season bucketing.
pub fn derive(state: &mut PipelineState) {
    let profile = derive_for_month(state, Local::now().month());

    tracing::info!(
        stage = "derive_profile",
        age_group = %profile.age_group,
        season = %profile.season,
        weather = %profile.weather_condition,
        weather_preferences = profile.weather_based_preferences.len(),
        "User profile derived"
    );

    state.profile = Some(profile);
}
