use std::time::Instant;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout, Duration};
use crate::cache::InsightCache;
use crate::circuit_breaker::{CircuitBreaker, ExponentialBackoff};
use crate::config::planner::InsightConfig;
use crate::error::PlannerError;
use crate::insight::{prompts, InsightProvider};
use crate::logging::{log_model_call, log_timeout};
use crate::metrics::Metrics;
use crate::profile::UserProfile;
use crate::tasks::model::Task;

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Insight provider backed by a local Ollama model.
///
/// Each call is bounded by the configured timeout, retried with exponential
/// backoff, and skipped while the circuit breaker is open. Non-blank answers
/// are cached per prompt for a day.
pub struct OllamaInsightProvider {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
    max_retries: u32,
    breaker: CircuitBreaker,
    backoff: ExponentialBackoff,
    cache: InsightCache,
    metrics: Metrics,
}

impl OllamaInsightProvider {
    pub fn new(config: &InsightConfig) -> Result<Self, PlannerError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| PlannerError::new(
                format!("Failed to create HTTP client: {}", e),
                "insight"
            ))?;

        Ok(OllamaInsightProvider {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
            max_retries: config.max_retries,
            breaker: CircuitBreaker::new(
                config.failure_threshold,
                Duration::from_secs(config.cooldown_secs),
            ),
            backoff: ExponentialBackoff::default(),
            cache: InsightCache::new(config.cache_capacity, chrono::Duration::hours(24)),
            metrics: Metrics::new(),
        })
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Generate text for `prompt`, consulting the cache first.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        if let Some(text) = self.cache.get(&self.model, prompt) {
            self.metrics.record_cache_hit();
            return Ok(text);
        }
        self.metrics.record_cache_miss();

        if !self.breaker.try_acquire() {
            anyhow::bail!("Insight circuit open for model '{}'", self.model);
        }

        let mut last_error = anyhow::anyhow!("Model '{}' was not called", self.model);
        for attempt in 0..=self.max_retries {
            let start = Instant::now();
            match timeout(self.timeout, self.call_once(prompt)).await {
                Ok(Ok(text)) => {
                    log_model_call(&self.model, "generate", true, start.elapsed().as_millis() as u64);
                    self.breaker.record_success();
                    if !text.is_empty() {
                        self.cache.put(&self.model, prompt, &text);
                    }
                    return Ok(text);
                }
                Ok(Err(e)) => {
                    log_model_call(&self.model, "generate", false, start.elapsed().as_millis() as u64);
                    last_error = e;
                }
                Err(_) => {
                    log_timeout(&self.model, self.timeout.as_secs());
                    last_error = anyhow::anyhow!(
                        "Model '{}' call timed out after {}s",
                        self.model,
                        self.timeout.as_secs()
                    );
                }
            }

            self.breaker.record_failure();
            if self.breaker.is_open() {
                break;
            }
            if attempt < self.max_retries {
                sleep(self.backoff.delay_for_attempt(attempt)).await;
            }
        }
        Err(last_error)
    }

    async fn call_once(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&OllamaRequest {
                model: &self.model,
                prompt,
                stream: true,
            })
            .send()
            .await
            .with_context(|| format!("Failed to connect to Ollama API for model '{}'", self.model))?
            .error_for_status()
            .with_context(|| format!("Ollama API rejected request for model '{}'", self.model))?;

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from model '{}'", self.model))?;

        // Streaming response: one JSON object per line
        let mut full_response = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(chunk) = serde_json::from_str::<OllamaResponse>(line) {
                full_response.push_str(&chunk.response);
                if chunk.done {
                    break;
                }
            }
        }

        if full_response.trim().is_empty() {
            tracing::warn!(model = %self.model, "Model returned empty response");
        }
        Ok(full_response.trim().to_string())
    }
}

#[async_trait]
impl InsightProvider for OllamaInsightProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn motivational_insight(&self, target_band: f64) -> Result<String> {
        self.generate(&prompts::motivational_prompt(target_band)).await
    }

    async fn explain_tasks(&self, tasks: &[Task], profile: &UserProfile) -> Result<String> {
        self.generate(&prompts::explanation_prompt(tasks, profile)).await
    }

    async fn weekly_feedback(&self, profile: &UserProfile) -> Result<String> {
        self.generate(&prompts::weekly_feedback_prompt(profile, Utc::now())).await
    }
}
