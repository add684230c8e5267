//! The backend seam and the request-level service.

mod provider;
mod service;

pub use provider::{
    OperationProvider, WILDCARD, comparison_value, contains_tokens, like_pattern, like_to_regex,
    required_cast, required_value,
};
pub use service::{OperationService, SearchPlan};
