//! Versioned prompt templates for the analysis chain.
//!
//! One template per stage, rendered by substituting pre-serialized JSON of
//! the earlier stages' typed output. `PROMPT_VERSION` participates in the
//! stage-cache key, so editing a template invalidates cached results.

/// Bump when any template below changes meaning.
pub const PROMPT_VERSION: &str = "v1";

/// System message shared by every stage.
pub const SYSTEM_MSG: &str = "You are a legislative analysis model. Always return valid UTF-8 JSON \
matching the requested schema. Cite evidence by section_id and line_range \
from the input. If unsure, set confidence='low' and explain. \
Never invent sections that don't exist in the input.";

/// Outline extraction: normalize one bill into sections with line ranges.
pub fn outline_prompt(bill_id: &str, bill_text: &str) -> String {
    format!(
        r#"Extract a hierarchical outline of the bill with stable IDs.

Return JSON:
{{
  "bill_id": "{bill_id}",
  "sections": [
    {{
      "section_id": "S<number or title>",
      "title": "string",
      "line_start": int,
      "line_end": int,
      "text": "verbatim text of this section"
    }}
  ]
}}

Rules:
- Preserve original order.
- Generate section_id from headings; if none, synthesize S1, S2...
- line_* are 1-based indices relative to the provided text split by newline.
- Return JSON only.

--- BILL {bill_id} START ---
{bill_text}
--- BILL {bill_id} END ---
"#
    )
}

/// Section alignment: pair semantically similar sections across the bills.
pub fn align_prompt(outline_a_json: &str, outline_b_json: &str) -> String {
    format!(
        r#"Given two structured bills, align semantically similar sections.

Input JSON:
{{
  "billA": {outline_a_json},
  "billB": {outline_b_json}
}}

Return JSON:
{{
  "pairs": [
    {{
      "a_section_id": "string|null",
      "b_section_id": "string|null",
      "similarity": 0.0,
      "rationale": "one sentence"
    }}
  ]
}}

Rules:
- Unpaired additions/removals use null on the other side.
- Keep only pairs with similarity >= 0.35, else leave unpaired.
- JSON only.
"#
    )
}

/// Change synthesis: typed changes from aligned pairs plus orphans.
pub fn diff_prompt(outline_a_json: &str, outline_b_json: &str, pairs_json: &str) -> String {
    format!(
        r#"Produce a git-style diff by aligned pairs plus orphaned sections.

Input JSON:
{{
  "billA": {outline_a_json},
  "billB": {outline_b_json},
  "pairs": {pairs_json}
}}

Return JSON (not text blocks):
{{
  "changes": [
    {{
      "id": "chg_001",
      "change_type": "addition|removal|modification",
      "a_section_id": "string|null",
      "b_section_id": "string|null",
      "a_text": "string|null",
      "b_text": "string|null",
      "diff_preview": "git-like snippet, max 240 chars",
      "impact": {{
        "legal": "one sentence",
        "social": "one sentence",
        "economic": "one sentence"
      }},
      "evidence": [
        {{"bill_id": "A|B", "section_id": "string", "line_range": "Lstart-Lend"}}
      ],
      "confidence": "low|medium|high",
      "notes": "optional assumptions"
    }}
  ]
}}

Rules:
- For modifications, include the most changed sentences in diff_preview.
- Evidence must reference real section_id + line_range from inputs.
- JSON only.
"#
    )
}

/// Stakeholder analysis: affected groups linked to change IDs.
pub fn stakeholder_prompt(changes_json: &str) -> String {
    format!(
        r#"Identify stakeholders and link them to specific change IDs.

Input JSON:
{{
  "changes": {changes_json}
}}

Return JSON:
{{
  "stakeholders": [
    {{
      "name": "e.g., Independent contractors, State Medicaid agencies",
      "category": "industry|demographic|institution|ngo|other",
      "effect": "benefit|harm|mixed",
      "mechanism": "how the change affects them",
      "magnitude": "low|medium|high",
      "time_horizon": "short|medium|long",
      "linked_changes": ["chg_001","chg_002"],
      "confidence": "low|medium|high"
    }}
  ]
}}

Rules:
- Prefer referencing specific change IDs to justify claims.
- JSON only.
"#
    )
}

/// Bias detection over the raw bill text.
///
/// The text is embedded as a JSON string literal so quotes and newlines in
/// the bill cannot break the prompt structure.
pub fn bias_prompt(bill_text: &str) -> Result<String, serde_json::Error> {
    let escaped = serde_json::to_string(bill_text)?;
    Ok(format!(
        r#"Analyze the provided legislative text for potential biases or disproportionate impacts on specific groups.
Consider potential biases related to demographics, socioeconomic status, geographic location, or any other relevant factors.

Input JSON:
{{
  "bill_text": {escaped}
}}

Return JSON:
{{
  "bias_analysis": [
    {{
      "type": "demographic|socioeconomic|geographic|other",
      "description": "one sentence description of the potential bias",
      "impacted_groups": ["group1", "group2"],
      "evidence": [
        {{"bill_id": "A", "section_id": "string", "line_range": "Lstart-Lend"}}
      ],
      "confidence": "low|medium|high"
    }}
  ]
}}

Rules:
- Be specific about the type of bias and the impacted groups.
- Cite evidence from the original text where possible.
- JSON only.
"#
    ))
}

/// Multi-horizon impact forecast from changes and stakeholders.
pub fn forecast_prompt(changes_json: &str, stakeholders_json: &str) -> String {
    format!(
        r#"Forecast outcomes if Bill B (compared to Bill A) is enacted.

Input JSON:
{{
  "changes": {changes_json},
  "stakeholders": {stakeholders_json}
}}

Return JSON:
{{
  "assumptions": ["bullet assumptions"],
  "risks": ["key legal/political risks"],
  "forecasts": {{
    "short_1y": [
      {{
        "domain": "economic|social|political|legal|operational",
        "impact": "concise statement",
        "direction": "increase|decrease|mixed|unknown",
        "magnitude": "low|medium|high",
        "who": ["stakeholder names"],
        "linked_changes": ["chg_..."],
        "metrics_to_track": ["KPI1","KPI2"],
        "confidence": "low|medium|high"
      }}
    ],
    "medium_3y": [],
    "long_5y": []
  }}
}}

Rules:
- Tie each forecast to concrete changes and stakeholders.
- Include measurable KPIs where possible.
- JSON only.
"#
    )
}

/// Self-critique over the combined output.
pub fn critique_prompt(combined_json: &str) -> String {
    format!(
        r#"Review the JSON below for overclaims, missing evidence, or non-JSON parts.

Input:
{combined_json}

Return JSON:
{{
  "issues": [
    {{"path": "changes[3].impact.economic", "problem": "no evidence citation"}}
  ],
  "ok": true
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_prompt_embeds_bill_and_id() {
        let p = outline_prompt("A", "SECTION 1. Establishes a $50 fee.");
        assert!(p.contains("--- BILL A START ---"));
        assert!(p.contains("SECTION 1. Establishes a $50 fee."));
        assert!(p.contains("--- BILL A END ---"));
        assert!(p.contains("\"bill_id\": \"A\""));
    }

    #[test]
    fn align_prompt_embeds_both_outlines() {
        let p = align_prompt(r#"{"bill_id":"A"}"#, r#"{"bill_id":"B"}"#);
        assert!(p.contains(r#""billA": {"bill_id":"A"}"#));
        assert!(p.contains(r#""billB": {"bill_id":"B"}"#));
        assert!(p.contains("similarity >= 0.35"));
    }

    #[test]
    fn diff_prompt_embeds_pairs() {
        let p = diff_prompt("{}", "{}", r#"{"pairs":[]}"#);
        assert!(p.contains(r#""pairs": {"pairs":[]}"#));
        assert!(p.contains("max 240 chars"));
    }

    #[test]
    fn bias_prompt_escapes_quotes_and_newlines() {
        let p = bias_prompt("line one\nthe \"fee\" clause").unwrap();
        assert!(p.contains(r#""bill_text": "line one\nthe \"fee\" clause""#));
    }

    #[test]
    fn forecast_prompt_has_all_horizons() {
        let p = forecast_prompt("[]", "[]");
        assert!(p.contains("short_1y"));
        assert!(p.contains("medium_3y"));
        assert!(p.contains("long_5y"));
    }

    #[test]
    fn critique_prompt_embeds_payload() {
        let p = critique_prompt(r#"{"changes":{}}"#);
        assert!(p.contains(r#"{"changes":{}}"#));
        assert!(p.contains("overclaims"));
    }

    #[test]
    fn system_message_demands_json_and_evidence() {
        assert!(SYSTEM_MSG.contains("JSON"));
        assert!(SYSTEM_MSG.contains("section_id"));
        assert!(SYSTEM_MSG.contains("confidence"));
    }
}
