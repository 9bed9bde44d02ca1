//! The sequential batch loop: one candidate at a time, one model call
//! per candidate, artifacts written as flat files.
//!
//! Failure policy: a missing job description or any artifact-write I/O
//! error aborts the run; every other failure skips only the affected
//! candidate and the loop continues.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::ScreenError;
use crate::llm_client::schema::evaluation_schema;
use crate::llm_client::{ModelInvoker, SchemaDescriptor, MODEL};
use crate::loader::read_text;
use crate::models::evaluation::{EvaluationRequest, EvaluationResult, Verdict};
use crate::screening::prompts::build_prompt;
use crate::screening::report::render_report;
use crate::screening::validator::is_valid_evaluation;

/// Per-run settings, assembled in `main` from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding `jd.txt` and `cv<N>.txt`.
    pub input_dir: PathBuf,
    /// Directory for JSON results, raw artifacts and Markdown reports.
    pub output_dir: PathBuf,
    /// Directory where each rendered prompt is saved verbatim.
    pub prompt_dir: PathBuf,
    /// Number of candidate files: `cv1.txt` through `cv<N>.txt`.
    pub candidates: u32,
    /// Sampling temperature forwarded to the model.
    pub temperature: f64,
    /// Fixed pause after each successfully evaluated candidate, to stay
    /// under coarse external rate limits. Zero disables it.
    pub pause: Duration,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated: u32,
    pub skipped: u32,
}

/// Runs the whole batch. Loads the JD once (missing JD aborts before any
/// output directory entry exists), then processes candidates strictly in
/// order, one blocking model call each.
pub async fn run(
    invoker: &dyn ModelInvoker,
    cfg: &RunConfig,
) -> Result<RunSummary, ScreenError> {
    let jd_text = read_text(&cfg.input_dir.join("jd.txt"))?;

    // Output directories are created only after the JD loads, so an
    // aborted run leaves nothing behind.
    fs::create_dir_all(&cfg.output_dir)?;
    fs::create_dir_all(&cfg.prompt_dir)?;

    let schema = evaluation_schema();
    let mut summary = RunSummary::default();

    for index in 1..=cfg.candidates {
        match process_candidate(invoker, cfg, &jd_text, &schema, index).await {
            Ok(()) => {
                summary.evaluated += 1;
                if !cfg.pause.is_zero() {
                    tokio::time::sleep(cfg.pause).await;
                }
            }
            Err(e @ ScreenError::Io(_)) => return Err(e),
            Err(e) => {
                warn!("candidate {index}: {e}; skipping");
                summary.skipped += 1;
            }
        }
    }

    info!(
        "run complete: {} evaluated, {} skipped",
        summary.evaluated, summary.skipped
    );
    Ok(summary)
}

/// One candidate's full path through the pipeline: load, prompt, invoke,
/// parse, validate, persist.
async fn process_candidate(
    invoker: &dyn ModelInvoker,
    cfg: &RunConfig,
    jd_text: &str,
    schema: &SchemaDescriptor,
    index: u32,
) -> Result<(), ScreenError> {
    let cv_text = read_text(&cfg.input_dir.join(format!("cv{index}.txt")))?;

    let request = EvaluationRequest {
        job_description: jd_text.to_string(),
        candidate_document: cv_text,
        candidate_label: format!("Candidate {index}"),
    };
    let label = &request.candidate_label;

    let prompt = build_prompt(&request);
    let prompt_path = cfg.prompt_dir.join(format!("prompt_cv{index}.md"));
    fs::write(&prompt_path, &prompt)?;
    info!("saved prompt for {label} -> {}", prompt_path.display());

    info!("calling model {MODEL} for {label}");
    let raw = invoker.invoke(&prompt, schema, cfg.temperature).await?;

    let parsed: Value = serde_json::from_str(&raw)
        .map_err(|source| ScreenError::MalformedResponse { source, raw })?;

    if !is_valid_evaluation(&parsed) {
        // Keep the offending response for manual inspection; no report.
        let raw_path = cfg.output_dir.join(format!("cv{index}_raw.json"));
        write_pretty_json(&raw_path, &parsed)?;
        warn!("saved raw artifact for {label} -> {}", raw_path.display());
        return Err(ScreenError::SchemaValidation);
    }

    warn_on_band_mismatch(&parsed, label);

    let json_path = cfg.output_dir.join(format!("cv{index}.json"));
    write_pretty_json(&json_path, &parsed)?;
    info!("saved JSON result for {label} -> {}", json_path.display());

    let report_path = cfg.output_dir.join(format!("cv{index}_report.md"));
    fs::write(&report_path, render_report(&parsed, label))?;
    info!("saved report for {label} -> {}", report_path.display());

    Ok(())
}

/// Indented JSON with non-ASCII characters preserved literally.
fn write_pretty_json(path: &Path, value: &Value) -> Result<(), ScreenError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ScreenError::Io(e.into()))?;
    fs::write(path, text)?;
    Ok(())
}

/// The validator accepts band-inconsistent results on purpose; surface
/// the mismatch as a diagnostic so a human can review it. Best effort:
/// results with exotic array elements don't fit the typed model and get
/// no verdict check.
fn warn_on_band_mismatch(parsed: &Value, label: &str) {
    let Ok(result) = serde_json::from_value::<EvaluationResult>(parsed.clone()) else {
        return;
    };
    if !result.verdict_matches_band() {
        let expected = Verdict::for_score(result.match_score);
        warn!(
            "{label}: verdict '{}' is inconsistent with score {} (band prescribes '{expected}')",
            result.verdict, result.match_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Invoker that replays scripted responses in order and records the
    /// prompts it was asked to send.
    struct ScriptedInvoker {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedInvoker {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            prompt: &str,
            _schema: &SchemaDescriptor,
            _temperature: f64,
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    const VALID_RESPONSE: &str = r#"{"match_score": 85, "summary": "Strong fit.",
        "strengths": ["Go"], "missing_requirements": [], "verdict": "strong match"}"#;

    fn setup(candidates: u32) -> (TempDir, RunConfig) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = RunConfig {
            input_dir: dir.path().join("sample_inputs"),
            output_dir: dir.path().join("outputs"),
            prompt_dir: dir.path().join("prompts"),
            candidates,
            temperature: 0.2,
            pause: Duration::ZERO,
        };
        fs::create_dir_all(&cfg.input_dir).unwrap();
        (dir, cfg)
    }

    fn write_input(cfg: &RunConfig, name: &str, content: &str) {
        fs::write(cfg.input_dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_missing_jd_aborts_without_outputs() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "cv1.txt", "Jane Doe, Rust engineer");
        let invoker = ScriptedInvoker::new(vec![]);

        let err = run(&invoker, &cfg).await.unwrap_err();
        assert!(matches!(err, ScreenError::MissingInput(_)));
        assert!(!cfg.output_dir.exists());
        assert!(!cfg.prompt_dir.exists());
        assert!(invoker.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_candidate_is_skipped_others_complete() {
        let (_dir, cfg) = setup(3);
        write_input(&cfg, "jd.txt", "Rust engineer wanted");
        write_input(&cfg, "cv1.txt", "First candidate");
        write_input(&cfg, "cv3.txt", "Third candidate");
        let invoker = ScriptedInvoker::new(vec![
            Ok(VALID_RESPONSE.to_string()),
            Ok(VALID_RESPONSE.to_string()),
        ]);

        let summary = run(&invoker, &cfg).await.unwrap();
        assert_eq!(summary, RunSummary { evaluated: 2, skipped: 1 });
        assert!(cfg.output_dir.join("cv1.json").exists());
        assert!(cfg.output_dir.join("cv3.json").exists());
        assert!(!cfg.output_dir.join("cv2.json").exists());
        assert!(!cfg.output_dir.join("cv2_raw.json").exists());
    }

    #[tokio::test]
    async fn test_valid_response_writes_json_and_report() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "jd.txt", "Go engineer wanted");
        write_input(&cfg, "cv1.txt", "Go expert");
        let invoker = ScriptedInvoker::new(vec![Ok(VALID_RESPONSE.to_string())]);

        let summary = run(&invoker, &cfg).await.unwrap();
        assert_eq!(summary.evaluated, 1);

        let json = fs::read_to_string(cfg.output_dir.join("cv1.json")).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["match_score"], 85);

        let report = fs::read_to_string(cfg.output_dir.join("cv1_report.md")).unwrap();
        assert!(report.contains("85 / 100"));
        assert!(report.contains("strong match"));
        assert!(report.contains("Candidate 1"));
    }

    #[tokio::test]
    async fn test_prompt_artifact_saved_verbatim() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "jd.txt", "Go engineer wanted");
        write_input(&cfg, "cv1.txt", "Go expert");
        let invoker = ScriptedInvoker::new(vec![Ok(VALID_RESPONSE.to_string())]);

        run(&invoker, &cfg).await.unwrap();

        let saved = fs::read_to_string(cfg.prompt_dir.join("prompt_cv1.md")).unwrap();
        let sent = invoker.prompts.lock().unwrap();
        assert_eq!(saved, sent[0]);
        assert!(saved.contains("Go engineer wanted"));
        assert!(saved.contains("Go expert"));
    }

    #[tokio::test]
    async fn test_invalid_response_saves_raw_artifact_only() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "jd.txt", "Rust engineer wanted");
        write_input(&cfg, "cv1.txt", "Jane Doe");
        // verdict missing: fails validation
        let invoker = ScriptedInvoker::new(vec![Ok(
            r#"{"match_score": 50, "summary": "ok", "strengths": [], "missing_requirements": []}"#
                .to_string(),
        )]);

        let summary = run(&invoker, &cfg).await.unwrap();
        assert_eq!(summary, RunSummary { evaluated: 0, skipped: 1 });
        assert!(cfg.output_dir.join("cv1_raw.json").exists());
        assert!(!cfg.output_dir.join("cv1.json").exists());
        assert!(!cfg.output_dir.join("cv1_report.md").exists());
    }

    #[tokio::test]
    async fn test_unparseable_response_skips_candidate() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "jd.txt", "Rust engineer wanted");
        write_input(&cfg, "cv1.txt", "Jane Doe");
        let invoker =
            ScriptedInvoker::new(vec![Ok("I am not JSON, sorry about that".to_string())]);

        let summary = run(&invoker, &cfg).await.unwrap();
        assert_eq!(summary, RunSummary { evaluated: 0, skipped: 1 });
        assert!(!cfg.output_dir.join("cv1.json").exists());
        assert!(!cfg.output_dir.join("cv1_raw.json").exists());
    }

    #[tokio::test]
    async fn test_invocation_failure_skips_candidate_run_continues() {
        let (_dir, cfg) = setup(2);
        write_input(&cfg, "jd.txt", "Rust engineer wanted");
        write_input(&cfg, "cv1.txt", "First");
        write_input(&cfg, "cv2.txt", "Second");
        let invoker = ScriptedInvoker::new(vec![
            Err(LlmError::Api {
                status: 500,
                message: "backend exploded".to_string(),
            }),
            Ok(VALID_RESPONSE.to_string()),
        ]);

        let summary = run(&invoker, &cfg).await.unwrap();
        assert_eq!(summary, RunSummary { evaluated: 1, skipped: 1 });
        assert!(!cfg.output_dir.join("cv1.json").exists());
        assert!(cfg.output_dir.join("cv2.json").exists());
    }

    #[tokio::test]
    async fn test_non_ascii_preserved_in_json_artifact() {
        let (_dir, cfg) = setup(1);
        write_input(&cfg, "jd.txt", "Inženieris");
        write_input(&cfg, "cv1.txt", "Jānis Bērziņš");
        let invoker = ScriptedInvoker::new(vec![Ok(
            r#"{"match_score": 70, "summary": "Labs kandidāts.", "strengths": ["C++"],
                "missing_requirements": [], "verdict": "strong match"}"#
                .to_string(),
        )]);

        run(&invoker, &cfg).await.unwrap();
        let json = fs::read_to_string(cfg.output_dir.join("cv1.json")).unwrap();
        assert!(json.contains("Labs kandidāts."));
        assert!(!json.contains("\\u"));
    }
}
