// src/cli/run.rs — Pipeline commands (summarize, extract, analyze, diagnose)

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{CloudAnalyzer, CloudModels, CostMeter, LocalAnalyzer, TieredPricing};
use crate::infra::config::Config;
use crate::provider::ollama::OllamaBackend;
use crate::provider::openai::OpenAIBackend;
use crate::provider::Backend;
use crate::telemetry::Category;

/// Display form of a per-call cost.
pub fn format_cost(cost: Option<f64>) -> String {
    match cost {
        Some(usd) => format!("Cost: ${usd:.6} USD"),
        None => "Cost: n/a (unmetered backend)".into(),
    }
}

pub fn cloud_backend(config: &Config) -> anyhow::Result<Arc<dyn Backend>> {
    let api_key = config.cloud.require_api_key()?;
    Ok(Arc::new(OpenAIBackend::with_base_url(
        api_key,
        config.cloud.base_url.clone(),
    )))
}

pub fn local_backend(config: &Config) -> Arc<dyn Backend> {
    Arc::new(OllamaBackend::new(Some(config.local.base_url.clone())))
}

pub async fn run_summarize(
    config: &Config,
    model: Option<String>,
    chat_model: Option<String>,
    chat: bool,
    show_cost: bool,
) -> anyhow::Result<()> {
    let backend = cloud_backend(config)?;
    let models = CloudModels {
        summary: model.unwrap_or_else(|| config.cloud.summary_model.clone()),
        chat: chat_model.unwrap_or_else(|| config.cloud.chat_model.clone()),
    };
    let meter = CostMeter::new(Box::new(TieredPricing::from(&config.pricing)));
    let mut analyzer = CloudAnalyzer::new(backend, models.clone(), &config.paths).with_meter(meter);

    eprintln!("Running {} summarization...", models.summary);
    let summary = analyzer.summarize_all().await?;

    println!("=== Summary ===\n{summary}\n");
    eprintln!("Saved to {}", analyzer.summary_path().display());
    if show_cost {
        eprintln!("{}", format_cost(analyzer.last_cost()));
    }

    if chat {
        super::chat::run_chat(&mut analyzer, show_cost).await?;
    }
    Ok(())
}

pub async fn run_extract(
    config: &Config,
    category: &str,
    file: Option<&str>,
    model: Option<String>,
) -> anyhow::Result<()> {
    let category = Category::parse(category)
        .ok_or_else(|| anyhow::anyhow!("Unknown category '{category}' (expected alarm or pm)"))?;
    let model = model.unwrap_or_else(|| config.local.model.clone());
    let analyzer = LocalAnalyzer::new(local_backend(config), model, &config.paths);

    let summary = analyzer.extract(category, file).await?;
    println!("=== Simplified Output for {} ===", category.as_str().to_uppercase());
    println!("{summary}");
    eprintln!(
        "\nSimplified result saved to: {}",
        analyzer.summary_path(category).display()
    );
    Ok(())
}

pub async fn run_analyze(
    config: &Config,
    alarm: Option<String>,
    pm_summary: Option<String>,
    out: Option<String>,
    model: Option<String>,
) -> anyhow::Result<()> {
    let model = model.unwrap_or_else(|| config.local.model.clone());
    let analyzer = LocalAnalyzer::new(local_backend(config), model, &config.paths);

    let alarm_path = match alarm {
        Some(p) => PathBuf::from(p),
        None => first_alarm_file(config),
    };
    let pm_summary_path = pm_summary
        .map(PathBuf::from)
        .unwrap_or_else(|| analyzer.summary_path(Category::Pm));
    let save_to = out
        .map(PathBuf::from)
        .unwrap_or_else(|| config.paths.analysis_path());

    let analysis = analyzer
        .analyze_files(&alarm_path, &pm_summary_path, &save_to)
        .await?;
    println!("\n=== Diagnostic Analysis ===\n{analysis}");
    eprintln!("\nAnalysis result saved to: {}", save_to.display());
    Ok(())
}

pub async fn run_diagnose(config: &Config, model: Option<String>) -> anyhow::Result<()> {
    let model = model.unwrap_or_else(|| config.local.model.clone());
    let analyzer = LocalAnalyzer::new(local_backend(config), model, &config.paths);

    let diagnosis = analyzer.diagnose().await?;
    println!("=== PM Summary ===\n{}\n", diagnosis.pm_summary);
    println!("=== Diagnostic Analysis ===\n{}", diagnosis.analysis);
    eprintln!(
        "\nAnalysis result saved to: {}",
        diagnosis.analysis_path.display()
    );
    Ok(())
}

/// Path of the alarm export the loader would pick; a placeholder path when
/// none exists so the analysis degrades to an empty alarm block.
fn first_alarm_file(config: &Config) -> PathBuf {
    let loader = crate::telemetry::TelemetryLoader::new(config.paths.clone());
    loader
        .locate(Category::Alarm)
        .unwrap_or_else(|_| loader.folder(Category::Alarm).join("missing.xml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::OptiscopeError;

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(Some(0.01)), "Cost: $0.010000 USD");
        assert_eq!(format_cost(Some(0.000015)), "Cost: $0.000015 USD");
        assert!(format_cost(None).contains("unmetered"));
    }

    #[test]
    fn test_cloud_backend_with_explicit_key() {
        let mut config = Config::default();
        config.cloud.api_key = Some("sk-test".into());
        assert!(cloud_backend(&config).is_ok());
    }

    #[test]
    fn test_cloud_backend_without_key_fails() {
        let mut config = Config::default();
        config.cloud.api_key_env = "OPTISCOPE_TEST_KEY_NEVER_SET".into();
        let err = cloud_backend(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<OptiscopeError>(),
            Some(OptiscopeError::Config(_))
        ));
    }
}
