// src/core/analyzer.rs — Diagnostic pipelines over raw XML telemetry
//
// CloudAnalyzer: one combined summarize-all call (truncated XML), metered,
//   followed by a grounded follow-up chat.
// LocalAnalyzer: extraction pass under strict rules, then an analysis pass
//   over the compressed PM summary plus the full alarm XML.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::cost::CostMeter;
use super::results::{self, ResultSink, SUMMARY_FILE};
use super::session::ChatSession;
use crate::infra::config::PathsConfig;
use crate::infra::errors::OptiscopeError;
use crate::prompt::{self, templates::SUMMARY_SYSTEM};
use crate::provider::{Backend, Message, Prompt};
use crate::telemetry::{Category, TelemetryLoader};

/// Model names for the two roles of the cloud pipeline.
#[derive(Debug, Clone)]
pub struct CloudModels {
    pub summary: String,
    pub chat: String,
}

impl Default for CloudModels {
    fn default() -> Self {
        Self {
            summary: "gpt-4o".into(),
            chat: "gpt-4o-mini".into(),
        }
    }
}

pub struct CloudAnalyzer {
    backend: Arc<dyn Backend>,
    models: CloudModels,
    loader: TelemetryLoader,
    sink: ResultSink,
    meter: CostMeter,
    session: ChatSession,
    summary: Option<String>,
}

impl CloudAnalyzer {
    pub fn new(backend: Arc<dyn Backend>, models: CloudModels, paths: &PathsConfig) -> Self {
        Self {
            backend,
            models,
            loader: TelemetryLoader::new(paths.clone()),
            sink: ResultSink::new(paths.summary_dir()),
            meter: CostMeter::default(),
            session: ChatSession::new(),
            summary: None,
        }
    }

    pub fn with_meter(mut self, meter: CostMeter) -> Self {
        self.meter = meter;
        self
    }

    /// Summarize all available telemetry, persist it, and seed the chat.
    ///
    /// A missing category folder yields an empty block instead of an error.
    pub async fn summarize_all(&mut self) -> Result<String, OptiscopeError> {
        let alarm = self.loader.load_or_empty(Category::Alarm)?;
        let pm = self.loader.load_or_empty(Category::Pm)?;
        let topology = self.loader.load_or_empty(Category::Topology)?;

        let user_prompt = prompt::summarize_all(&alarm, &pm, &topology);
        tracing::debug!("summarize-all prompt: {} chars", user_prompt.len());

        let messages = vec![Message::system(SUMMARY_SYSTEM), Message::user(user_prompt)];
        let completion = self
            .backend
            .complete(&self.models.summary, Prompt::Messages(messages))
            .await?;
        // Only a persisted summary is metered and seeds the chat.
        let summary = completion.content;
        self.sink.write(SUMMARY_FILE, &summary)?;
        self.meter
            .observe(&self.models.summary, completion.usage.as_ref());
        self.session.seed(&summary);
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Ask a follow-up question with the full transcript as context.
    pub async fn chat(&mut self, input: &str) -> Result<String, OptiscopeError> {
        let completion = self
            .session
            .ask(self.backend.as_ref(), &self.models.chat, input)
            .await?;
        self.meter.observe(&self.models.chat, completion.usage.as_ref());
        Ok(completion.content)
    }

    /// Cost of the most recent backend call, if it was metered.
    pub fn last_cost(&self) -> Option<f64> {
        self.meter.last_cost()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn summary_path(&self) -> PathBuf {
        self.sink.path_of(SUMMARY_FILE)
    }

    pub fn sample_questions(&self) -> &'static [&'static str] {
        &prompt::SAMPLE_QUESTIONS
    }
}

/// Output of the two-pass local pipeline.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub pm_summary: String,
    pub analysis: String,
    pub analysis_path: PathBuf,
}

pub struct LocalAnalyzer {
    backend: Arc<dyn Backend>,
    model: String,
    paths: PathsConfig,
    loader: TelemetryLoader,
}

impl LocalAnalyzer {
    pub fn new(backend: Arc<dyn Backend>, model: impl Into<String>, paths: &PathsConfig) -> Self {
        Self {
            backend,
            model: model.into(),
            paths: paths.clone(),
            loader: TelemetryLoader::new(paths.clone()),
        }
    }

    /// Where the extraction pass stores its output for a category.
    pub fn summary_path(&self, category: Category) -> PathBuf {
        self.paths.category_dir(category).join(SUMMARY_FILE)
    }

    /// Compress one category's XML under its extraction rules and save the
    /// result as `summary.txt` in that category's folder.
    pub async fn extract(
        &self,
        category: Category,
        file_name: Option<&str>,
    ) -> Result<String, OptiscopeError> {
        if prompt::rules_for(category).is_none() {
            return Err(OptiscopeError::NoExtractionRules { category });
        }

        let doc = match file_name {
            Some(name) => self.loader.load_file(category, name)?,
            None => self.loader.load(category)?,
        };
        let extraction = prompt::extraction_prompt(category, doc.content())?;
        tracing::debug!(
            "{} extraction prompt from {}: {} chars",
            category,
            doc.source().display(),
            extraction.len()
        );

        let completion = self
            .backend
            .complete(&self.model, Prompt::Text(extraction))
            .await?;

        results::write_result(&self.summary_path(category), &completion.content)?;
        Ok(completion.content)
    }

    /// Analysis pass from files. Missing inputs render as empty blocks.
    pub async fn analyze_files(
        &self,
        alarm_xml_path: &Path,
        pm_summary_path: &Path,
        save_to: &Path,
    ) -> Result<String, OptiscopeError> {
        let alarm = read_or_empty(alarm_xml_path)?;
        let pm_summary = read_or_empty(pm_summary_path)?;
        self.analyze_text(&alarm, &pm_summary, save_to).await
    }

    /// Analysis pass over already loaded text; the result is written to `save_to`.
    pub async fn analyze_text(
        &self,
        alarm_xml: &str,
        pm_summary: &str,
        save_to: &Path,
    ) -> Result<String, OptiscopeError> {
        let analysis_prompt = prompt::analyze_summary(alarm_xml, pm_summary);
        tracing::debug!("analysis prompt: {} chars", analysis_prompt.len());

        let completion = self
            .backend
            .complete(&self.model, Prompt::Text(analysis_prompt))
            .await?;

        results::write_result(save_to, &completion.content)?;
        Ok(completion.content)
    }

    /// Full local pipeline: PM extraction, then analysis with the raw alarm XML.
    pub async fn diagnose(&self) -> Result<Diagnosis, OptiscopeError> {
        let pm_summary = self.extract(Category::Pm, None).await?;
        let alarm = self.loader.load_or_empty(Category::Alarm)?;
        let analysis_path = self.paths.analysis_path();
        let analysis = self.analyze_text(&alarm, &pm_summary, &analysis_path).await?;
        Ok(Diagnosis {
            pm_summary,
            analysis,
            analysis_path,
        })
    }
}

fn read_or_empty(path: &Path) -> Result<String, OptiscopeError> {
    if !path.exists() {
        tracing::warn!("{} not found; continuing with an empty block", path.display());
        return Ok(String::new());
    }
    results::read_result(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every prompt and replies with scripted text.
    struct ScriptedBackend {
        reply: String,
        usage: Option<TokenUsage>,
        prompts: Mutex<Vec<(String, Prompt)>>,
    }

    impl ScriptedBackend {
        fn new(reply: &str, usage: Option<TokenUsage>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                usage,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        fn id(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, model: &str, prompt: Prompt) -> Result<Completion, OptiscopeError> {
            self.prompts.lock().unwrap().push((model.to_string(), prompt));
            Ok(Completion {
                content: self.reply.clone(),
                usage: self.usage,
            })
        }
    }

    fn paths_in(tmp: &TempDir) -> PathsConfig {
        PathsConfig {
            data_dir: tmp.path().to_path_buf(),
            ..Default::default()
        }
    }

    fn write(tmp: &TempDir, rel: &str, content: &str) {
        let path = tmp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_summarize_all_uses_summary_model_and_meters() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "alarm/a.xml", "<alarm>LOS</alarm>");
        write(&tmp, "pm/p.xml", "<pm>opticalPowerInput</pm>");
        let backend = ScriptedBackend::new("Network degraded", Some(TokenUsage::new(1000, 500)));
        let mut a = CloudAnalyzer::new(backend.clone(), CloudModels::default(), &paths_in(&tmp));

        let summary = a.summarize_all().await.unwrap();
        assert_eq!(summary, "Network degraded");
        assert_eq!(a.last_cost(), Some(0.01));

        let prompts = backend.prompts.lock().unwrap();
        let (model, prompt) = &prompts[0];
        assert_eq!(model, "gpt-4o");
        let Prompt::Messages(messages) = prompt else {
            panic!("expected a message list");
        };
        assert_eq!(messages[0], Message::system(SUMMARY_SYSTEM));
        assert!(messages[1].content.contains("<alarm>LOS</alarm>"));
        assert!(messages[1].content.contains("=== TOPOLOGY XML ===\n\n\n"));
    }

    #[tokio::test]
    async fn test_summary_written_to_summary_dir() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "pm/p.xml", "<pm/>");
        let backend = ScriptedBackend::new("All good", None);
        let mut a = CloudAnalyzer::new(backend, CloudModels::default(), &paths_in(&tmp));
        a.summarize_all().await.unwrap();
        let saved = std::fs::read_to_string(tmp.path().join("summary/summary.txt")).unwrap();
        assert_eq!(saved, "All good");
        assert_eq!(a.summary(), Some("All good"));
    }

    #[tokio::test]
    async fn test_failed_summary_write_is_not_metered() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "pm/p.xml", "<pm/>");
        // A plain file where the summary folder should be.
        write(&tmp, "summary", "blocked");
        let backend = ScriptedBackend::new("lost", Some(TokenUsage::new(1000, 500)));
        let mut a = CloudAnalyzer::new(backend, CloudModels::default(), &paths_in(&tmp));

        let err = a.summarize_all().await.unwrap_err();
        assert!(matches!(err, OptiscopeError::Io(_)));
        assert_eq!(a.last_cost(), None);
        assert_eq!(a.summary(), None);
        assert_eq!(a.session().state(), crate::core::SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_chat_uses_chat_model() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new("answer", Some(TokenUsage::new(2000, 1000)));
        let mut a = CloudAnalyzer::new(backend.clone(), CloudModels::default(), &paths_in(&tmp));
        a.summarize_all().await.unwrap();
        a.chat("which port?").await.unwrap();

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts[1].0, "gpt-4o-mini");
        // gpt-4o-mini still matches the premium prefix
        assert_eq!(a.last_cost(), Some(0.02));
    }

    #[tokio::test]
    async fn test_extract_pm_writes_summary_into_pm_folder() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "pm/Ciena_ROADMA.xml", "<pm-type>opticalPowerOutput</pm-type>");
        let backend = ScriptedBackend::new("Port 1: output -3.2 dBm", None);
        let a = LocalAnalyzer::new(backend.clone(), "llama3", &paths_in(&tmp));

        let out = a.extract(Category::Pm, None).await.unwrap();
        assert_eq!(out, "Port 1: output -3.2 dBm");
        let saved = std::fs::read_to_string(tmp.path().join("pm/summary.txt")).unwrap();
        assert_eq!(saved, out);

        let prompts = backend.prompts.lock().unwrap();
        let Prompt::Text(text) = &prompts[0].1 else {
            panic!("expected a text prompt");
        };
        assert!(text.starts_with(prompt::PM_RULES));
        assert!(text.ends_with("<pm-type>opticalPowerOutput</pm-type>"));
    }

    #[tokio::test]
    async fn test_extract_missing_input_fails() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new("unused", None);
        let a = LocalAnalyzer::new(backend.clone(), "llama3", &paths_in(&tmp));
        let err = a.extract(Category::Alarm, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_topology_rejected() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "topology/t.xml", "<t/>");
        let a = LocalAnalyzer::new(ScriptedBackend::new("x", None), "llama3", &paths_in(&tmp));
        let err = a.extract(Category::Topology, None).await.unwrap_err();
        assert!(matches!(err, OptiscopeError::NoExtractionRules { .. }));
    }

    #[tokio::test]
    async fn test_analyze_files_missing_inputs_are_empty() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new("Observations: none", None);
        let a = LocalAnalyzer::new(backend.clone(), "llama3", &paths_in(&tmp));
        let save_to = tmp.path().join("analysis.txt");

        let out = a
            .analyze_files(
                &tmp.path().join("alarm/missing.xml"),
                &tmp.path().join("pm/summary.txt"),
                &save_to,
            )
            .await
            .unwrap();
        assert_eq!(out, "Observations: none");
        assert_eq!(std::fs::read_to_string(&save_to).unwrap(), out);

        let prompts = backend.prompts.lock().unwrap();
        let text = prompts[0].1.clone().into_text();
        assert!(text.contains("=== ALARM XML (full) ===\n\n\n=== PM SUMMARY ===\n\n\n"));
    }
}
