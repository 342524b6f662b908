use crate::error::PlannerError;

/// Initialize structured logging with tracing.
/// Call once at process startup; a second call reports an error instead of panicking.
pub fn init_logging() -> Result<(), PlannerError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json() // JSON output for structured logging
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PlannerError::new(
            format!("Failed to set global tracing subscriber: {}", e),
            "startup"
        ))?;

    tracing::info!("Structured logging initialized");
    Ok(())
}

pub fn log_recommendation(
    eligible: usize,
    candidates: usize,
    selected: usize,
    total_time: u32,
    budget: u32,
    exploration_day: bool,
) {
    tracing::info!(
        eligible = eligible,
        candidates = candidates,
        selected = selected,
        total_time = total_time,
        budget = budget,
        exploration_day = exploration_day,
        "Daily recommendation built"
    );
}

pub fn log_fallback(provider: &str, kind: &str, reason: &str) {
    tracing::warn!(provider = provider, kind = kind, reason = reason, "Insight fallback used");
}

pub fn log_model_call(model: &str, stage: &str, success: bool, latency_ms: u64) {
    tracing::info!(
        model = model,
        stage = stage,
        success = success,
        latency_ms = latency_ms,
        "Model call"
    );
}

pub fn log_timeout(model: &str, duration_secs: u64) {
    tracing::error!(model = model, duration_secs = duration_secs, "Timeout exceeded");
}
