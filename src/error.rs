use thiserror::Error;

/// Failures from the collaborators the planner talks to.
///
/// A fixture search that finds nothing is not an error; see
/// [`crate::model::fixture::ResolvedMatch::NoMatch`].
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{service} unavailable: {reason}")]
    UpstreamUnavailable { service: &'static str, reason: String },

    #[error("no {service} API key configured")]
    NotConfigured { service: &'static str },

    #[error("{service} returned an unexpected response: {reason}")]
    MalformedResponse { service: &'static str, reason: String },

    #[error("location cache I/O error: {0}")]
    Cache(#[from] std::io::Error),

    #[error("location cache is not valid JSON: {0}")]
    CacheFormat(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AgentError {
    pub fn upstream(service: &'static str, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable { service, reason: reason.to_string() }
    }

    pub fn malformed(service: &'static str, reason: impl ToString) -> Self {
        Self::MalformedResponse { service, reason: reason.to_string() }
    }
}
