/// OpenAPI documentation generation.
pub mod documentation;
/// Haptic and visual feedback fan-out.
pub mod feedback_service;
/// Health check service.
pub mod health_service;
/// Ambient display mirroring the live scores.
pub mod live_activity_service;
/// Panel input to score mutations.
pub mod scoring_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Remote preset store supervisor.
pub mod sync_service;
/// Live teams, presets and persistence.
pub mod team_service;
