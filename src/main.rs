use std::path::PathBuf;
use aiee_lib::brain::RecommendationEngine;
use aiee_lib::catalog::Catalog;
use aiee_lib::config::planner;
use aiee_lib::error::PlannerError;
use aiee_lib::insight::{self, OllamaInsightProvider};
use aiee_lib::logging;
use aiee_lib::profile::{DailyTimeBudget, UserProfile};

struct Args {
    profile: Option<PathBuf>,
    catalog: Option<PathBuf>,
    insight: bool,
}

const USAGE: &str = "Usage: aiee [--profile FILE] [--catalog FILE] [--insight]";

fn usage_error(message: String) -> PlannerError {
    PlannerError::new(format!("{}. {}", message, USAGE), "startup")
}

fn parse_args<I: IntoIterator<Item = String>>(raw: I) -> Result<Args, PlannerError> {
    let mut args = Args { profile: None, catalog: None, insight: false };
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--profile" | "--catalog" => {
                let value = iter
                    .next()
                    .filter(|v| !v.starts_with("--"))
                    .map(PathBuf::from)
                    .ok_or_else(|| usage_error(format!("Missing file after '{}'", arg)))?;
                if arg == "--profile" {
                    args.profile = Some(value);
                } else {
                    args.catalog = Some(value);
                }
            }
            "--insight" => args.insight = true,
            other => return Err(usage_error(format!("Unknown argument '{}'", other))),
        }
    }
    Ok(args)
}

fn load_profile(path: Option<&PathBuf>) -> Result<UserProfile, PlannerError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| PlannerError::new(
                    format!("Failed to read profile: {}", e),
                    "io"
                ).with_context(format!("path: {:?}", path)))?;
            UserProfile::from_json(&content)
        }
        None => {
            let exam_date = chrono::Utc::now().date_naive() + chrono::Duration::days(60);
            tracing::info!("No profile given, using onboarding defaults");
            Ok(UserProfile::onboarding(exam_date, 7.0, DailyTimeBudget::Standard))
        }
    }
}

fn run() -> Result<(), PlannerError> {
    logging::init_logging()?;
    tracing::info!("aiee planner starting");

    let args = parse_args(std::env::args().skip(1))?;
    let config = planner::get_planner_config();
    let catalog = match args.catalog.as_ref() {
        Some(path) => Catalog::load_from_path(path)?,
        None => Catalog::builtin(),
    };
    let engine = RecommendationEngine::new(catalog, config)?;
    let profile = load_profile(args.profile.as_ref())?;

    let output = if args.insight {
        let provider = OllamaInsightProvider::new(&config.insight)?
            .with_metrics(engine.metrics().clone());
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| PlannerError::new(
                format!("Failed to create async runtime: {}", e),
                "startup"
            ))?;
        rt.block_on(async {
            let recommendation = engine.get_daily_recommendation_explained(&profile, &provider).await;
            let motivation = insight::motivational_insight_or_fallback(&provider, profile.target_band).await;
            serde_json::json!({
                "recommendation": recommendation,
                "insight": motivation,
            })
        })
    } else {
        serde_json::json!({ "recommendation": engine.get_daily_recommendation(&profile) })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    tracing::info!(metrics = ?engine.metrics().snapshot(), "aiee planner finished");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
