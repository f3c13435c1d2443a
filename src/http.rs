use std::time::Duration;

use ureq::Agent;

/// Per-request ceiling for every outbound call. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP agent shared by the upstream clients.
pub fn agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .into()
}
