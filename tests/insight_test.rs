use std::sync::Arc;
use async_trait::async_trait;
use aiee_lib::brain::exploration::FixedDraw;
use aiee_lib::brain::{RecommendationEngine, STATIC_REASONING};
use aiee_lib::circuit_breaker::ExponentialBackoff;
use aiee_lib::catalog::Catalog;
use aiee_lib::config::planner::InsightConfig;
use aiee_lib::config::PlannerConfig;
use aiee_lib::insight::{
    self, InsightProvider, OllamaInsightProvider, StaticInsightProvider,
    EMPTY_EXPLANATION, EMPTY_WEEKLY, FALLBACK_EXPLANATION, FALLBACK_INSIGHT, FALLBACK_WEEKLY,
};
use aiee_lib::profile::{DailyTimeBudget, UserProfile};
use aiee_lib::tasks::Task;
use chrono::NaiveDate;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn learner() -> UserProfile {
    UserProfile::onboarding(
        NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        7.5,
        DailyTimeBudget::Standard,
    )
}

fn insight_config(endpoint: &str) -> InsightConfig {
    InsightConfig {
        endpoint: endpoint.to_string(),
        model: "qwen2.5:7b-instruct".to_string(),
        timeout_secs: 1,
        max_retries: 0,
        failure_threshold: 1,
        cooldown_secs: 300,
        cache_capacity: 8,
    }
}

fn streamed(chunks: &[&str]) -> String {
    let mut body = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let line = serde_json::json!({ "response": chunk, "done": i + 1 == chunks.len() });
        body.push_str(&line.to_string());
        body.push('\n');
    }
    body
}

struct FailingProvider;

#[async_trait]
impl InsightProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn motivational_insight(&self, _target_band: f64) -> anyhow::Result<String> {
        anyhow::bail!("quota exceeded")
    }

    async fn explain_tasks(&self, _tasks: &[Task], _profile: &UserProfile) -> anyhow::Result<String> {
        anyhow::bail!("quota exceeded")
    }

    async fn weekly_feedback(&self, _profile: &UserProfile) -> anyhow::Result<String> {
        Ok("   ".to_string())
    }
}

#[tokio::test]
async fn test_failures_fall_back_to_fixed_sentences() {
    let provider = FailingProvider;
    let profile = learner();
    assert_eq!(insight::motivational_insight_or_fallback(&provider, 7.5).await, FALLBACK_INSIGHT);
    assert_eq!(insight::explain_tasks_or_fallback(&provider, &[], &profile).await, FALLBACK_EXPLANATION);
    // blank text gets its own default, distinct from the failure sentence
    assert_eq!(insight::weekly_feedback_or_fallback(&provider, &profile).await, EMPTY_WEEKLY);
}

#[tokio::test]
async fn test_static_provider_answers_offline() {
    let provider = StaticInsightProvider;
    assert_eq!(insight::motivational_insight_or_fallback(&provider, 6.0).await, FALLBACK_INSIGHT);
}

#[tokio::test]
async fn test_explained_recommendation_keeps_plan_on_failure() {
    let engine = RecommendationEngine::new(Catalog::builtin(), &PlannerConfig::default())
        .unwrap()
        .with_random_source(Arc::new(FixedDraw(0.9)));
    let profile = learner();

    let plain = engine.get_daily_recommendation(&profile);
    let explained = engine.get_daily_recommendation_explained(&profile, &FailingProvider).await;

    assert_eq!(explained.tasks, plain.tasks);
    assert_eq!(explained.total_time, plain.total_time);
    assert_eq!(explained.reasoning, STATIC_REASONING);
    assert_eq!(engine.metrics().snapshot().insight_fallbacks, 1);
}

#[tokio::test]
async fn test_ollama_streamed_response_is_joined() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(streamed(&["Small daily ", "wins compound."])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();
    let text = insight::motivational_insight_or_fallback(&provider, 7.5).await;
    assert_eq!(text, "Small daily wins compound.");

    // second call is served from the cache, so the mock sees a single request
    let again = provider.motivational_insight(7.5).await.unwrap();
    assert_eq!(again, text);
}

#[tokio::test]
async fn test_ollama_explanation_replaces_reasoning() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(streamed(&["Grammar first, then vocabulary."])))
        .mount(&mock_server)
        .await;

    let engine = RecommendationEngine::new(Catalog::builtin(), &PlannerConfig::default())
        .unwrap()
        .with_random_source(Arc::new(FixedDraw(0.9)));
    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();

    let rec = engine.get_daily_recommendation_explained(&learner(), &provider).await;
    assert_eq!(rec.reasoning, "Grammar first, then vocabulary.");
    assert_eq!(rec.total_time, 23);
}

#[tokio::test]
async fn test_ollama_server_error_opens_circuit() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();
    let profile = learner();

    assert_eq!(insight::weekly_feedback_or_fallback(&provider, &profile).await, FALLBACK_WEEKLY);
    assert!(provider.breaker().is_open());

    // circuit is open: no request reaches the server
    assert_eq!(insight::motivational_insight_or_fallback(&provider, 7.5).await, FALLBACK_INSIGHT);
}

#[tokio::test]
async fn test_ollama_empty_response_falls_back() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(streamed(&[""])))
        .mount(&mock_server)
        .await;

    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();
    assert_eq!(insight::motivational_insight_or_fallback(&provider, 7.5).await, FALLBACK_INSIGHT);
    assert!(!provider.breaker().is_open());
}

#[tokio::test]
async fn test_ollama_empty_explanation_uses_empty_default_and_is_not_cached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(streamed(&["  "])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();
    let profile = learner();
    assert_eq!(insight::explain_tasks_or_fallback(&provider, &[], &profile).await, EMPTY_EXPLANATION);
    assert_eq!(insight::explain_tasks_or_fallback(&provider, &[], &profile).await, EMPTY_EXPLANATION);
}

#[tokio::test]
async fn test_ollama_retries_before_falling_back() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = InsightConfig {
        max_retries: 2,
        failure_threshold: 5,
        ..insight_config(&mock_server.uri())
    };
    let provider = OllamaInsightProvider::new(&config)
        .unwrap()
        .with_backoff(ExponentialBackoff::new(0, 0));

    assert_eq!(insight::weekly_feedback_or_fallback(&provider, &learner()).await, FALLBACK_WEEKLY);
    assert_eq!(provider.breaker().failure_count(), 3);
    assert!(!provider.breaker().is_open());
}

#[tokio::test]
async fn test_ollama_timeout_falls_back() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(streamed(&["too late"]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let provider = OllamaInsightProvider::new(&insight_config(&mock_server.uri())).unwrap();
    let text = insight::explain_tasks_or_fallback(&provider, &[], &learner()).await;
    assert_eq!(text, FALLBACK_EXPLANATION);
}
