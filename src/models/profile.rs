use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Age bracket used to pick age-based food affinities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    #[serde(rename = "10대")]
    Teens,
    #[serde(rename = "20대")]
    Twenties,
    #[serde(rename = "30대")]
    Thirties,
    #[serde(rename = "40대")]
    Forties,
    #[serde(rename = "50대")]
    Fifties,
    #[serde(rename = "60대 이상")]
    SixtiesPlus,
}

impl AgeGroup {
    /// Buckets an age into half-open decade ranges; everything under 20 is `Teens`
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=19 => AgeGroup::Teens,
            20..=29 => AgeGroup::Twenties,
            30..=39 => AgeGroup::Thirties,
            40..=49 => AgeGroup::Forties,
            50..=59 => AgeGroup::Fifties,
            _ => AgeGroup::SixtiesPlus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Teens => "10대",
            AgeGroup::Twenties => "20대",
            AgeGroup::Thirties => "30대",
            AgeGroup::Forties => "40대",
            AgeGroup::Fifties => "50대",
            AgeGroup::SixtiesPlus => "60대 이상",
        }
    }
}

impl Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    #[serde(rename = "봄")]
    Spring,
    #[serde(rename = "여름")]
    Summer,
    #[serde(rename = "가을")]
    Autumn,
    #[serde(rename = "겨울")]
    Winter,
}

impl Season {
    /// Maps a calendar month (1-12) to its season; anything else counts as winter
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "봄",
            Season::Summer => "여름",
            Season::Autumn => "가을",
            Season::Winter => "겨울",
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Preference profile derived once from the raw user input
///
/// Never mutated after creation; downstream stages only read it to build
/// search queries and generation prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DerivedProfile {
    pub location: String,
    pub age_group: AgeGroup,
    pub season: Season,
    pub weather_condition: String,
    pub preferred_cuisine: String,
    pub companion_type: String,
    pub preferred_ambiance: String,
    pub special_requirements: Vec<String>,
    pub age_based_preferences: Vec<String>,
    pub weather_based_preferences: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(0), AgeGroup::Teens);
        assert_eq!(AgeGroup::from_age(19), AgeGroup::Teens);
        assert_eq!(AgeGroup::from_age(20), AgeGroup::Twenties);
        assert_eq!(AgeGroup::from_age(29), AgeGroup::Twenties);
        assert_eq!(AgeGroup::from_age(30), AgeGroup::Thirties);
        assert_eq!(AgeGroup::from_age(39), AgeGroup::Thirties);
        assert_eq!(AgeGroup::from_age(40), AgeGroup::Forties);
        assert_eq!(AgeGroup::from_age(49), AgeGroup::Forties);
        assert_eq!(AgeGroup::from_age(50), AgeGroup::Fifties);
        assert_eq!(AgeGroup::from_age(59), AgeGroup::Fifties);
        assert_eq!(AgeGroup::from_age(60), AgeGroup::SixtiesPlus);
        assert_eq!(AgeGroup::from_age(199), AgeGroup::SixtiesPlus);
    }

    #[test]
    fn test_age_groups_partition_the_domain() {
        let mut previous = AgeGroup::from_age(0);
        let mut transitions = Vec::new();
        for age in 1..200 {
            let group = AgeGroup::from_age(age);
            if group != previous {
                transitions.push(age);
                previous = group;
            }
        }
        assert_eq!(transitions, vec![20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_season_from_month() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), season, "month {}", month);
        }
    }

    #[test]
    fn test_labels_serialize_in_korean() {
        assert_eq!(
            serde_json::to_string(&AgeGroup::SixtiesPlus).unwrap(),
            "\"60대 이상\""
        );
        assert_eq!(serde_json::to_string(&Season::Autumn).unwrap(), "\"가을\"");
        assert_eq!(AgeGroup::Twenties.to_string(), "20대");
    }
}
