use std::fmt;

use serde::{Deserialize, Serialize};

/// One evaluation request: a JD, one candidate document, and the label
/// used for the prompt section header and the report title. Built once
/// per candidate and never mutated.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub job_description: String,
    pub candidate_document: String,
    pub candidate_label: String,
}

/// Three-way categorical outcome, serialized exactly as the model is
/// instructed to emit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "strong match")]
    StrongMatch,
    #[serde(rename = "possible match")]
    PossibleMatch,
    #[serde(rename = "not a match")]
    NotAMatch,
}

impl Verdict {
    /// The verdict the fixed score bands prescribe: 0-39 not a match,
    /// 40-69 possible match, 70-100 strong match.
    pub fn for_score(score: i64) -> Verdict {
        match score {
            70..=100 => Verdict::StrongMatch,
            40..=69 => Verdict::PossibleMatch,
            _ => Verdict::NotAMatch,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::StrongMatch => "strong match",
            Verdict::PossibleMatch => "possible match",
            Verdict::NotAMatch => "not a match",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated evaluation. The batch pipeline works with untrusted
/// `serde_json::Value`s until validation passes; this typed form exists
/// for callers that construct or post-process results directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub match_score: i64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub verdict: Verdict,
}

impl EvaluationResult {
    /// Whether `verdict` agrees with the band `match_score` falls in.
    /// The validator deliberately does not enforce this; the pipeline
    /// only warns on a mismatch.
    pub fn verdict_matches_band(&self) -> bool {
        self.verdict == Verdict::for_score(self.match_score)
    }
}
