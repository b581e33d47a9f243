mod listing;
mod profile;
mod state;

pub use listing::{NaverItem, NaverSearchResponse, SearchResult};
pub use profile::{AgeGroup, DerivedProfile, Season};
pub use state::{PipelineState, RequirementsInput, Terminal, UserInput};
