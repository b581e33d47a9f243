pub mod generation;
pub mod pipeline;
pub mod profile;
pub mod providers;
pub mod recommendation;
pub mod search;

pub use pipeline::{InputCollector, Pipeline, Stage};
pub use recommendation::RecommendationSynthesizer;
pub use search::{SearchOrchestrator, SearchPolicy};
