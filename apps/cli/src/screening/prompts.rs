// Prompt constants for the screening module.
// Inputs are interpolated verbatim: a candidate document containing the
// dashed delimiter text will corrupt the rendered sections. Accepted
// limitation, recorded in DESIGN.md.

use crate::models::evaluation::EvaluationRequest;

/// Evaluation prompt template. Replace `{jd_text}`, `{cv_text}` and
/// `{candidate_label}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are a hiring-focused assistant. Compare a Job Description (JD) with a candidate CV and
produce a single JSON object (no extra text, no commentary) that assesses fit.

Requirements for the JSON output (HR focus):
- Respond ONLY with a single JSON object encoded in UTF-8 and valid JSON.
- Do not include any explanatory text, markdown, or trailing commas.
- IMPORTANT: The JSON must strictly adhere to the provided schema below.

JSON schema (exact keys):
{
  "match_score": integer between 0 and 100,
  "summary": string (short, 1-3 sentences describing overall fit),
  "strengths": array of strings (key skills/experience from CV that match JD),
  "missing_requirements": array of strings (important JD requirements not visible in CV),
  "verdict": one of ["strong match", "possible match", "not a match"]
}

Rules to score and produce fields:
1) Evaluate technical skills, years of experience, domain knowledge, tools, certifications,
   and soft skills required in the JD. Give more weight to mandatory requirements.
2) match_score: produce an integer 0-100. Use 0-39 = not a match, 40-69 = possible match, 70-100 = strong match.
3) strengths: up to 6 bullet items pulled verbatim or paraphrased from the CV.
4) missing_requirements: up to 6 items from the JD not found in the CV; prefer exact phrasing.
5) verdict: map from match_score using the ranges above.

Now compare the Job Description and the CV below.

JOB DESCRIPTION:
------------------------------------------------------------
{jd_text}
------------------------------------------------------------

{candidate_label} CV:
------------------------------------------------------------
{cv_text}
------------------------------------------------------------

Produce the JSON now."#;

/// Renders the complete evaluation prompt for one candidate: framing and
/// schema first, then the JD and the labeled CV in delimited sections.
pub fn build_prompt(request: &EvaluationRequest) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{jd_text}", &request.job_description)
        .replace("{candidate_label}", &request.candidate_label)
        .replace("{cv_text}", &request.candidate_document)
}
