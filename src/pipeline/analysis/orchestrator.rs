//! Sequences the eight analysis stages into one comparison report.
//!
//! Stage order: outline A and outline B (concurrent) → align → diff →
//! stakeholders and bias (concurrent) → forecast → critique. Every stage
//! goes through the same path: render prompt, check the stage cache, call
//! the model with retries, parse strictly, cache, enforce invariants.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cache::StageCache;
use super::openai::LlmJson;
use super::prompt;
use super::types::{
    AlignmentSet, BiasReport, ChangeSet, CompareReport, Critique, Forecast, Outline,
    ReportMetadata, StakeholderSet,
};
use super::{parser, validate, AnalysisError};

/// The two documents to compare, already reduced to plain text.
#[derive(Debug, Clone)]
pub struct CompareInput {
    pub bill_a_name: String,
    pub bill_b_name: String,
    pub bill_a_text: String,
    pub bill_b_text: String,
}

pub struct ComparePipeline {
    llm: Arc<dyn LlmJson>,
    cache: StageCache,
    max_retries: usize,
}

impl ComparePipeline {
    pub fn new(llm: Arc<dyn LlmJson>, max_retries: usize) -> Self {
        Self {
            llm,
            cache: StageCache::new(),
            max_retries,
        }
    }

    /// Run the full chain and assemble the report.
    pub async fn run(&self, input: CompareInput) -> Result<CompareReport, AnalysisError> {
        tracing::info!(
            bill_a = %input.bill_a_name,
            bill_b = %input.bill_b_name,
            a_chars = input.bill_a_text.len(),
            b_chars = input.bill_b_text.len(),
            "Starting comparison pipeline"
        );

        let outline_a_prompt = prompt::outline_prompt("A", &input.bill_a_text);
        let outline_b_prompt = prompt::outline_prompt("B", &input.bill_b_text);
        let (outline_a, outline_b) = tokio::join!(
            self.run_stage::<Outline>("outline_a", &outline_a_prompt, parser::parse_outline),
            self.run_stage::<Outline>("outline_b", &outline_b_prompt, parser::parse_outline),
        );
        let (outline_a, outline_b) = (outline_a?, outline_b?);
        validate::check_outline(&outline_a);
        validate::check_outline(&outline_b);

        let outline_a_json = serde_json::to_string(&outline_a)?;
        let outline_b_json = serde_json::to_string(&outline_b)?;

        let align_prompt = prompt::align_prompt(&outline_a_json, &outline_b_json);
        let pairs = self
            .run_stage::<AlignmentSet>("align", &align_prompt, parser::parse_alignment)
            .await?;
        let pairs = validate::enforce_pair_invariants(pairs);

        let pairs_json = serde_json::to_string(&pairs.pairs)?;
        let diff_prompt = prompt::diff_prompt(&outline_a_json, &outline_b_json, &pairs_json);
        let changes = self
            .run_stage::<ChangeSet>("diff", &diff_prompt, parser::parse_changes)
            .await?;
        let changes = validate::finalize_changes(changes);

        let changes_json = serde_json::to_string(&changes.changes)?;
        let stakeholder_prompt = prompt::stakeholder_prompt(&changes_json);
        let bias_prompt = prompt::bias_prompt(&input.bill_a_text)?;
        let (stakeholders, bias) = tokio::join!(
            self.run_stage::<StakeholderSet>(
                "stakeholders",
                &stakeholder_prompt,
                parser::parse_stakeholders,
            ),
            self.run_stage::<BiasReport>("bias", &bias_prompt, parser::parse_bias),
        );
        let (stakeholders, bias) = (stakeholders?, bias?);

        let stakeholders_json = serde_json::to_string(&stakeholders.stakeholders)?;
        let forecast_prompt = prompt::forecast_prompt(&changes_json, &stakeholders_json);
        let forecast = self
            .run_stage::<Forecast>("forecast", &forecast_prompt, parser::parse_forecast)
            .await?;

        let combined = serde_json::json!({
            "normalizedA": &outline_a,
            "normalizedB": &outline_b,
            "pairs": &pairs,
            "changes": &changes,
            "stakeholders": &stakeholders,
            "forecast": &forecast,
            "bias_analysis": &bias,
        });
        let critique_prompt = prompt::critique_prompt(&serde_json::to_string(&combined)?);
        let critique = self
            .run_stage::<Critique>("critique", &critique_prompt, parser::parse_critique)
            .await?;

        tracing::info!(
            changes = changes.changes.len(),
            stakeholders = stakeholders.stakeholders.len(),
            critique_ok = critique.ok,
            "Comparison pipeline complete"
        );

        Ok(CompareReport {
            normalized_a: outline_a,
            normalized_b: outline_b,
            pairs,
            changes,
            stakeholders,
            forecast,
            critique,
            bias_analysis: bias,
            metadata: ReportMetadata {
                bill_a_name: input.bill_a_name,
                bill_b_name: input.bill_b_name,
                processed_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// One stage: cache lookup, model call with retries, strict parse, cache
    /// store. Transport and parse failures both retry up to `max_retries`
    /// extra attempts; parse retries request a fresh completion.
    async fn run_stage<T>(
        &self,
        stage: &'static str,
        prompt: &str,
        parse: fn(&str) -> Result<T, AnalysisError>,
    ) -> Result<T, AnalysisError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = StageCache::key(stage, prompt);
        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    tracing::debug!(stage, "Stage cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(stage, error = %e, "Discarding undeserializable cache entry");
                }
            }
        }

        let started = std::time::Instant::now();
        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::warn!(stage, attempt, "Retrying analysis stage");
            }

            let raw = match self.llm.complete_json(prompt::SYSTEM_MSG, prompt).await {
                Ok(raw) => raw,
                Err(e) if e.is_retryable_call() && attempt < self.max_retries => {
                    tracing::warn!(stage, error = %e, "Model call failed, will retry");
                    last_error = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match parse(&raw) {
                Ok(value) => {
                    self.cache.put(key, serde_json::to_value(&value)?);
                    tracing::info!(
                        stage,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Stage complete"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable_parse() && attempt < self.max_retries => {
                    tracing::warn!(stage, error = %e, "Malformed stage response, will retry");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(AnalysisError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::fixtures;
    use crate::pipeline::analysis::openai::MockLlmClient;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn demo_input() -> CompareInput {
        CompareInput {
            bill_a_name: "bill_a.txt".into(),
            bill_b_name: "bill_b.txt".into(),
            bill_a_text: "SECTION 1. A filing fee of $25 is established.".into(),
            bill_b_text: "SECTION 1. A filing fee of $50 is established.".into(),
        }
    }

    /// Counts calls before delegating to an inner client.
    struct CountingLlm<T> {
        inner: T,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl<T: LlmJson> LlmJson for CountingLlm<T> {
        async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.complete_json(system, prompt).await
        }
    }

    /// Fails with a connection error a fixed number of times, then delegates.
    struct FlakyLlm<T> {
        inner: T,
        remaining_failures: AtomicUsize,
    }

    #[async_trait]
    impl<T: LlmJson> LlmJson for FlakyLlm<T> {
        async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AnalysisError> {
            let remaining = self.remaining_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.remaining_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AnalysisError::Connection("http://mock".into()));
            }
            self.inner.complete_json(system, prompt).await
        }
    }

    #[tokio::test]
    async fn scripted_run_produces_a_full_report() {
        let pipeline = ComparePipeline::new(Arc::new(fixtures::scripted_mock()), 0);
        let report = pipeline.run(demo_input()).await.unwrap();

        assert_eq!(report.normalized_a.bill_id, "A");
        assert_eq!(report.normalized_b.bill_id, "B");
        assert_eq!(report.normalized_a.sections.len(), 2);
        // The two-sided high-similarity pair plus the two orphans survive.
        assert_eq!(report.pairs.pairs.len(), 3);
        assert_eq!(report.changes.changes.len(), 2);
        // The second canned change carries no id; one is synthesized.
        assert_eq!(report.changes.changes[0].id, "chg_001");
        assert!(!report.changes.changes[1].id.is_empty());
        assert_eq!(report.stakeholders.stakeholders.len(), 1);
        assert_eq!(report.bias_analysis.bias_analysis.len(), 1);
        assert_eq!(report.forecast.forecasts.short_1y.len(), 1);
        assert!(report.critique.ok);
        assert_eq!(report.metadata.bill_a_name, "bill_a.txt");
        assert!(!report.metadata.processed_at.is_empty());
    }

    /// Records every prompt before delegating to an inner client.
    struct RecordingLlm<T> {
        inner: T,
        prompts: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl<T: LlmJson> LlmJson for RecordingLlm<T> {
        async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AnalysisError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            self.inner.complete_json(system, prompt).await
        }
    }

    #[tokio::test]
    async fn critique_reviews_the_bias_findings_too() {
        let recording = Arc::new(RecordingLlm {
            inner: fixtures::scripted_mock(),
            prompts: std::sync::Mutex::new(Vec::new()),
        });
        let pipeline = ComparePipeline::new(recording.clone(), 0);
        pipeline.run(demo_input()).await.unwrap();

        let prompts = recording.prompts.lock().unwrap();
        let critique_prompt = prompts
            .iter()
            .find(|p| p.contains("overclaims"))
            .expect("critique stage should have run");
        assert!(critique_prompt.contains("\"bias_analysis\""));
        // The finding itself, not just the key, is in the reviewed payload.
        assert!(critique_prompt.contains("Flat fee weighs more heavily"));
    }

    #[tokio::test]
    async fn repeated_run_is_served_from_the_stage_cache() {
        let counting = Arc::new(CountingLlm {
            inner: fixtures::scripted_mock(),
            calls: AtomicUsize::new(0),
        });
        let pipeline = ComparePipeline::new(counting.clone(), 0);

        pipeline.run(demo_input()).await.unwrap();
        let first_run = counting.calls.load(Ordering::SeqCst);
        assert_eq!(first_run, 8);

        pipeline.run(demo_input()).await.unwrap();
        // All eight stages hit the cache; the critique prompt embeds the
        // prior (deterministic) combined output, so even it is stable.
        assert_eq!(counting.calls.load(Ordering::SeqCst), first_run);
    }

    #[tokio::test]
    async fn transient_connection_failures_are_retried() {
        let flaky = Arc::new(FlakyLlm {
            inner: fixtures::scripted_mock(),
            remaining_failures: AtomicUsize::new(2),
        });
        let pipeline = ComparePipeline::new(flaky, 2);
        let report = pipeline.run(demo_input()).await.unwrap();
        assert_eq!(report.changes.changes.len(), 2);
    }

    #[tokio::test]
    async fn persistent_garbage_fails_after_retries() {
        let counting = Arc::new(CountingLlm {
            inner: MockLlmClient::new("not json at all"),
            calls: AtomicUsize::new(0),
        });
        let pipeline = ComparePipeline::new(counting.clone(), 1);
        let result = pipeline.run(demo_input()).await;
        assert!(matches!(result, Err(AnalysisError::JsonParsing(_))));
        // Both concurrent outline stages exhaust their two attempts.
        assert_eq!(counting.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn missing_api_key_surfaces_unretried() {
        struct NoKey;

        #[async_trait]
        impl LlmJson for NoKey {
            async fn complete_json(&self, _: &str, _: &str) -> Result<String, AnalysisError> {
                Err(AnalysisError::ApiKeyMissing)
            }
        }

        let pipeline = ComparePipeline::new(Arc::new(NoKey), 3);
        let result = pipeline.run(demo_input()).await;
        assert!(matches!(result, Err(AnalysisError::ApiKeyMissing)));
    }
}
