use chrono::NaiveDate;
use tracing::{error, warn};

use crate::error::AgentError;
use crate::llm::TextGenerator;
use crate::model::forecast::DailyForecast;
use crate::prompts;

/// Short nutrition and gear tips for the event, or an explanation of why there are none.
pub fn nutrition_tips(
    generator: &dyn TextGenerator,
    event_type: &str,
    when: NaiveDate,
    weather: Option<&DailyForecast>,
) -> String {
    let prompt = prompts::nutrition_tips(event_type, when, weather);
    generator
        .complete(&prompt)
        .unwrap_or_else(|e| unavailable("Nutrition guidance", &e))
}

/// Phased recovery plan for an injury question.
pub fn recovery_plan(generator: &dyn TextGenerator, query: &str) -> String {
    let prompt = prompts::recovery_plan(query);
    generator
        .complete(&prompt)
        .unwrap_or_else(|e| unavailable("Recovery guidance", &e))
}

fn unavailable(what: &str, e: &AgentError) -> String {
    match e {
        AgentError::NotConfigured { service } => {
            warn!(%service, "{what} skipped: capability not configured");
            format!("{what} currently unavailable (no {service} API key configured).")
        }
        other => {
            error!(error = %other, "{what} request failed");
            format!("{what} currently unavailable ({other}).")
        }
    }
}
