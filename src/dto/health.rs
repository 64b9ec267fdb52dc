use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded" when running local-only).
    pub status: String,
}

impl HealthResponse {
    /// Local and remote stores are both usable.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Running on the local store only.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
        }
    }
}
