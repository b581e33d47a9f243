use serde::{Deserialize, Serialize};

use super::{DerivedProfile, SearchResult};
use crate::error::PipelineError;

/// Marker users type when they have no special requirements
const NO_REQUIREMENTS: &str = "없음";

/// Special requirements as supplied at the request boundary
///
/// Accepts either a comma-separated string or a list of tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequirementsInput {
    Text(String),
    List(Vec<String>),
}

impl Default for RequirementsInput {
    fn default() -> Self {
        RequirementsInput::Text(String::new())
    }
}

impl RequirementsInput {
    /// Splits into trimmed tags, dropping blanks and the "none" marker
    pub fn into_tags(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            RequirementsInput::Text(text) => text.split(',').map(str::to_string).collect(),
            RequirementsInput::List(items) => items,
        };

        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty() && tag != NO_REQUIREMENTS)
            .collect()
    }
}

/// Raw user preferences as they arrive from the HTTP or CLI boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInput {
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub cuisine_preference: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub companion_type: String,
    #[serde(default)]
    pub ambiance: String,
    #[serde(default)]
    pub special_requirements: RequirementsInput,
}

/// Absorbing stage the pipeline finished in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    Recommended,
    Failed,
}

/// Request-scoped record threaded through every pipeline stage
///
/// Created once per request, owned exclusively by the running pipeline and
/// handed back to the caller when a terminal stage completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineState {
    pub age: u32,
    pub cuisine_preference: String,
    pub weather: String,
    pub location: String,
    pub companion_type: String,
    pub ambiance: String,
    pub special_requirements: Vec<String>,
    pub profile: Option<DerivedProfile>,
    pub search_results: Vec<SearchResult>,
    /// Name of the provider that produced `search_results`
    pub search_source: Option<String>,
    pub recommendations: Vec<String>,
    /// Model that wrote `recommendations`, or `"fallback"` for raw summaries
    pub generated_by: Option<String>,
    pub error: Option<String>,
    pub terminal: Option<Terminal>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies raw user fields into the state
    pub fn apply_input(&mut self, input: UserInput) {
        self.age = input.age;
        self.cuisine_preference = input.cuisine_preference.trim().to_string();
        self.weather = input.weather.trim().to_string();
        self.location = input.location.trim().to_string();
        self.companion_type = input.companion_type.trim().to_string();
        self.ambiance = input.ambiance.trim().to_string();
        self.special_requirements = input.special_requirements.into_tags();
    }

    pub fn has_failed(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Records a halting failure; results gathered so far are discarded
    pub fn fail(&mut self, err: &PipelineError) {
        self.error = Some(err.to_string());
        self.search_results.clear();
        self.search_source = None;
    }
}
